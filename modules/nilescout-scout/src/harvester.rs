//! Drains one platform stream into the registry.

use futures::StreamExt;
use tracing::{info, warn};

use crate::extract;
use crate::registry::{CreatorRegistry, MergeOutcome};
use crate::source::CreatorSource;

/// Which kind of stream a harvester consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Search,
    Hashtag,
}

impl SourceKind {
    fn label(&self) -> &'static str {
        match self {
            SourceKind::Search => "search",
            SourceKind::Hashtag => "hashtag",
        }
    }
}

/// Result of draining one source stream.
#[derive(Debug, Clone)]
pub struct HarvestReport {
    /// Provenance tag for the source, e.g. `search:Cairo`.
    pub source: String,
    /// Sightings yielded by the stream.
    pub attempted: u32,
    /// Sightings that created a new record.
    pub added: u32,
    /// Sightings merged into an existing record.
    pub updated: u32,
    /// Sightings dropped by the admission policy (or empty usernames).
    pub rejected: u32,
    /// Error that ended the stream early, if any.
    pub stream_error: Option<String>,
}

impl HarvestReport {
    fn new(source: String) -> Self {
        Self {
            source,
            attempted: 0,
            added: 0,
            updated: 0,
            rejected: 0,
            stream_error: None,
        }
    }
}

/// Drain one search or hashtag stream into the registry.
///
/// A stream-level failure ends this harvest only: everything merged before
/// the failure stays in the registry and the error is recorded on the report,
/// never raised past it. Consumption also stops within one iteration of the
/// registry filling up — the check runs after every merge, not just at
/// stream start.
pub async fn harvest_source<S: CreatorSource + ?Sized>(
    source: &S,
    kind: SourceKind,
    arg: &str,
    per_source_limit: u32,
    registry: &CreatorRegistry,
) -> HarvestReport {
    let tag = format!("{}:{arg}", kind.label());
    let mut report = HarvestReport::new(tag.clone());

    if registry.is_full() {
        info!(source = tag.as_str(), "Registry full, skipping source");
        return report;
    }

    info!(source = tag.as_str(), "Harvesting");
    let mut stream = match kind {
        SourceKind::Search => source.search_users(arg, per_source_limit),
        SourceKind::Hashtag => source.hashtag_videos(arg, per_source_limit),
    };

    while let Some(item) = stream.next().await {
        let item = match item {
            Ok(item) => item,
            Err(e) => {
                warn!(source = tag.as_str(), error = %e, "Stream failed mid-iteration");
                report.stream_error = Some(e.to_string());
                break;
            }
        };

        report.attempted += 1;
        let sighting = extract::sighting_from_item(&item, &tag);
        match registry.merge(&sighting) {
            MergeOutcome::Created => report.added += 1,
            MergeOutcome::Updated => report.updated += 1,
            MergeOutcome::Rejected(_) => report.rejected += 1,
        }

        if registry.is_full() {
            break;
        }
    }

    info!(
        source = tag.as_str(),
        attempted = report.attempted,
        added = report.added,
        updated = report.updated,
        rejected = report.rejected,
        failed = report.stream_error.is_some(),
        "Source drained"
    );
    report
}
