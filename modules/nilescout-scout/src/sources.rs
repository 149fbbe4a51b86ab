//! Default discovery sources for the Egypt profile.
//!
//! Queries seed the user-search stage, hashtags the video stage. Both lists
//! mix Latin and Arabic terms because creators tag in either script. The CLI
//! replaces these when the caller supplies its own lists.

/// Default search queries.
pub const DEFAULT_QUERIES: &[&str] = &[
    "Egypt",
    "Egyptian",
    "Cairo",
    "Alexandria",
    "مصر",
    "القاهرة",
    "الإسكندرية",
];

/// Default hashtags (without the `#`).
pub const DEFAULT_HASHTAGS: &[&str] = &[
    "egypt",
    "egyptian",
    "cairo",
    "alexandria",
    "مصر",
    "القاهرة",
    "الإسكندرية",
];
