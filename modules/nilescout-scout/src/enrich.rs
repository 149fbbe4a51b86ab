//! Rate-limited profile enrichment for incomplete records.
//!
//! Harvest streams often carry partial author objects; a follow-up profile
//! lookup fills the gaps. Lookups run one at a time with a minimum delay
//! between them — a rate limit for the platform's abuse thresholds, not a
//! concurrency limit. Enrichment is strictly additive: it can only populate
//! fields the harvest left empty.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use nilescout_common::CreatorRecord;

use crate::extract;
use crate::registry::CreatorRegistry;
use crate::source::CreatorSource;

/// Which gaps justify a profile lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnrichmentPolicy {
    /// Also look up records missing a bio or a video count.
    pub include_details: bool,
    /// Also look up records missing a region code.
    pub include_location: bool,
    /// Minimum delay between successive lookups.
    pub delay: Duration,
}

/// Result of one enrichment pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnrichmentReport {
    /// Records that needed a lookup.
    pub attempted: u32,
    /// Records where the lookup populated at least one field.
    pub updated: u32,
    /// Lookups that failed. Each failure is isolated to its record.
    pub errors: u32,
}

/// Whether a record still has gaps the policy wants filled. An unknown
/// follower count always qualifies; the rest is opt-in.
pub fn needs_enrichment(record: &CreatorRecord, policy: &EnrichmentPolicy) -> bool {
    if record.follower_count.is_none() {
        return true;
    }
    if policy.include_details && (record.bio.is_empty() || record.video_count.is_none()) {
        return true;
    }
    if policy.include_location && record.region_code.is_empty() {
        return true;
    }
    false
}

/// Fill gaps in registry records via rate-limited profile lookups. A failed
/// lookup is counted and skipped; the pass always visits every candidate.
pub async fn enrich_registry<S: CreatorSource + ?Sized>(
    source: &S,
    registry: &CreatorRegistry,
    policy: &EnrichmentPolicy,
) -> EnrichmentReport {
    let mut report = EnrichmentReport::default();
    let candidates: Vec<CreatorRecord> = registry
        .snapshot()
        .into_iter()
        .filter(|record| needs_enrichment(record, policy))
        .collect();

    debug!(candidates = candidates.len(), "Enrichment pass starting");

    for (i, record) in candidates.iter().enumerate() {
        if i > 0 && !policy.delay.is_zero() {
            sleep(policy.delay).await;
        }
        report.attempted += 1;

        match source
            .user_info(&record.username, record.sec_uid.as_deref())
            .await
        {
            Ok(info) => {
                let sighting = extract::sighting_from_profile(&info);
                if registry.apply_profile(&record.username, &sighting) {
                    report.updated += 1;
                }
            }
            Err(e) => {
                warn!(username = record.username.as_str(), error = %e, "Profile lookup failed");
                report.errors += 1;
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::AdmissionPolicy;
    use crate::testing::{profile_info, MockSource};
    use nilescout_common::{LocationSource, Sighting};

    fn seeded_registry(sightings: &[Sighting]) -> CreatorRegistry {
        let registry = CreatorRegistry::new(AdmissionPolicy::default(), 0);
        for s in sightings {
            registry.merge(s);
        }
        registry
    }

    fn harvested(username: &str, followers: Option<u64>) -> Sighting {
        Sighting {
            username: username.to_string(),
            follower_count: followers,
            source: format!("search:{username}"),
            ..Default::default()
        }
    }

    #[test]
    fn unknown_followers_always_select() {
        let registry = seeded_registry(&[harvested("a", None)]);
        let record = registry.get("a").unwrap();
        assert!(needs_enrichment(&record, &EnrichmentPolicy::default()));
    }

    #[test]
    fn complete_record_is_skipped_by_default_policy() {
        let registry = seeded_registry(&[harvested("a", Some(10))]);
        let record = registry.get("a").unwrap();
        assert!(!needs_enrichment(&record, &EnrichmentPolicy::default()));
    }

    #[test]
    fn details_and_location_widen_the_selection() {
        let registry = seeded_registry(&[harvested("a", Some(10))]);
        let record = registry.get("a").unwrap();

        // Missing bio/video count only matters with include_details.
        assert!(needs_enrichment(
            &record,
            &EnrichmentPolicy {
                include_details: true,
                ..Default::default()
            }
        ));
        // Missing region only matters with include_location.
        assert!(needs_enrichment(
            &record,
            &EnrichmentPolicy {
                include_location: true,
                ..Default::default()
            }
        ));
    }

    #[tokio::test]
    async fn lookup_fills_gaps_and_derives_location_hint() {
        let registry = seeded_registry(&[harvested("a", None)]);
        let source = MockSource::new().on_profile(
            "a",
            profile_info("a", "street food in Cairo", "", Some(5000), Some(42)),
        );

        let report = enrich_registry(&source, &registry, &EnrichmentPolicy::default()).await;

        assert_eq!(report.attempted, 1);
        assert_eq!(report.updated, 1);
        assert_eq!(report.errors, 0);

        let record = registry.get("a").unwrap();
        assert_eq!(record.follower_count, Some(5000));
        assert_eq!(record.video_count, Some(42));
        assert_eq!(record.location_hint, "cairo");
        assert_eq!(record.location_source, LocationSource::Bio);
    }

    #[tokio::test]
    async fn enrichment_never_clobbers_harvested_fields() {
        let mut seeded = harvested("a", None);
        seeded.bio = Some("original bio from Luxor".to_string());
        let registry = seeded_registry(&[seeded]);

        let source = MockSource::new().on_profile(
            "a",
            profile_info("a", "replacement bio", "SA", Some(100), None),
        );
        enrich_registry(&source, &registry, &EnrichmentPolicy::default()).await;

        let record = registry.get("a").unwrap();
        assert_eq!(record.bio, "original bio from Luxor");
        assert_eq!(record.follower_count, Some(100));
    }

    #[tokio::test]
    async fn failed_lookup_is_isolated_and_the_pass_continues() {
        let registry = seeded_registry(&[harvested("missing", None), harvested("b", None)]);
        let source = MockSource::new()
            .on_profile("b", profile_info("b", "", "EG", Some(9), None));

        let report = enrich_registry(&source, &registry, &EnrichmentPolicy::default()).await;

        assert_eq!(report.attempted, 2);
        assert_eq!(report.errors, 1);
        assert_eq!(report.updated, 1);
        assert_eq!(registry.get("b").unwrap().follower_count, Some(9));
    }

    #[tokio::test]
    async fn lookups_happen_one_per_candidate_in_order() {
        let registry = seeded_registry(&[
            harvested("first", None),
            harvested("second", Some(10)),
            harvested("third", None),
        ]);
        let source = MockSource::new()
            .on_profile("first", profile_info("first", "", "", Some(1), None))
            .on_profile("third", profile_info("third", "", "", Some(3), None));

        enrich_registry(&source, &registry, &EnrichmentPolicy::default()).await;

        let lookups = source.lookups.lock().unwrap().clone();
        assert_eq!(lookups, vec!["first".to_string(), "third".to_string()]);
    }
}
