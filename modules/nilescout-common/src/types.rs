use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Where a record's location association came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum LocationSource {
    #[default]
    #[serde(rename = "")]
    None,
    #[serde(rename = "region")]
    Region,
    #[serde(rename = "bio")]
    Bio,
}

impl LocationSource {
    pub fn is_set(&self) -> bool {
        !matches!(self, LocationSource::None)
    }
}

impl std::fmt::Display for LocationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LocationSource::None => "",
            LocationSource::Region => "region",
            LocationSource::Bio => "bio",
        };
        write!(f, "{s}")
    }
}

/// One partial observation of a creator from one source event. Ephemeral:
/// produced by field extraction, consumed by a registry merge, discarded.
#[derive(Debug, Clone, Default)]
pub struct Sighting {
    pub username: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub region_code: Option<String>,
    pub follower_count: Option<u64>,
    pub video_count: Option<u64>,
    /// Secondary platform id; kept for later profile lookups.
    pub sec_uid: Option<String>,
    /// Provenance tag, e.g. `search:Cairo` or `hashtag:egypt`. Empty for
    /// profile-lookup payloads, which have no discovery provenance.
    pub source: String,
}

/// The merged, canonical view of a creator across all sightings.
///
/// Created on the first sighting with a non-empty username, mutated in place
/// by every later merge, never deleted during a run. Scalar fields follow
/// first-writer-wins: a populated field is never overwritten and never nulled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatorRecord {
    #[serde(rename = "name")]
    pub display_name: String,
    pub username: String,
    pub profile_url: String,
    #[serde(rename = "followers")]
    pub follower_count: Option<u64>,
    #[serde(rename = "signature")]
    pub bio: String,
    #[serde(rename = "region")]
    pub region_code: String,
    pub video_count: Option<u64>,
    pub location_hint: String,
    pub location_source: LocationSource,
    /// Which queries/hashtags produced sightings of this creator. Grows
    /// monotonically; never shrinks.
    #[serde(rename = "sources")]
    pub sighting_sources: BTreeSet<String>,
    #[serde(skip)]
    pub sec_uid: Option<String>,
    pub discovered_at: DateTime<Utc>,
}

/// Canonical profile URL for a username.
pub fn profile_url(username: &str) -> String {
    format!("https://www.tiktok.com/@{username}")
}
