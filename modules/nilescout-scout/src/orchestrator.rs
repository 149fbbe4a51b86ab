//! Full discovery run: harvest every configured source, enrich, finalize.

use std::cmp::Reverse;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tracing::info;

use nilescout_common::CreatorRecord;

use crate::enrich::{self, EnrichmentPolicy, EnrichmentReport};
use crate::harvester::{self, HarvestReport, SourceKind};
use crate::registry::{AdmissionPolicy, CreatorRegistry};
use crate::source::CreatorSource;

/// Everything a discovery run needs to know.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Free-text search queries, one harvest each.
    pub queries: Vec<String>,
    /// Hashtags (without `#`), one harvest each.
    pub hashtags: Vec<String>,
    /// Per-query item cap for the search stage. 0 = unbounded.
    pub search_limit: u32,
    /// Per-hashtag item cap for the video stage. 0 = unbounded.
    pub hashtag_limit: u32,
    /// Stop discovering new creators once this many records exist. 0 = unbounded.
    pub max_creators: usize,
    /// Drop records below this follower count at finalize time. 0 = keep all.
    pub min_followers: u64,
    pub strict_filter: bool,
    pub require_region: bool,
    /// Run the enrichment pass after harvesting.
    pub fetch_info: bool,
    pub include_details: bool,
    pub include_location: bool,
    /// Minimum delay between enrichment lookups.
    pub info_delay: Duration,
    /// How many source streams to drain at once within a stage.
    pub source_concurrency: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            queries: Vec::new(),
            hashtags: Vec::new(),
            search_limit: 25,
            hashtag_limit: 25,
            max_creators: 200,
            min_followers: 0,
            strict_filter: false,
            require_region: false,
            fetch_info: true,
            include_details: false,
            include_location: false,
            info_delay: Duration::from_millis(300),
            source_concurrency: 2,
        }
    }
}

/// Stats from a discovery run.
#[derive(Debug, Default)]
pub struct DiscoveryStats {
    pub sources_harvested: u32,
    pub sources_failed: u32,
    pub sightings: u32,
    pub creators_added: u32,
    pub creators_updated: u32,
    pub sightings_rejected: u32,
    pub profiles_fetched: u32,
    pub profiles_failed: u32,
    pub below_min_followers: u32,
    pub creators_exported: u32,
}

impl std::fmt::Display for DiscoveryStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Discovery Run Complete ===")?;
        writeln!(f, "Sources harvested:  {}", self.sources_harvested)?;
        writeln!(f, "Sources failed:     {}", self.sources_failed)?;
        writeln!(f, "Sightings:          {}", self.sightings)?;
        writeln!(f, "Creators added:     {}", self.creators_added)?;
        writeln!(f, "Creators updated:   {}", self.creators_updated)?;
        writeln!(f, "Sightings rejected: {}", self.sightings_rejected)?;
        writeln!(f, "Profiles fetched:   {}", self.profiles_fetched)?;
        writeln!(f, "Profiles failed:    {}", self.profiles_failed)?;
        writeln!(f, "Below min follows:  {}", self.below_min_followers)?;
        writeln!(f, "Creators exported:  {}", self.creators_exported)?;
        Ok(())
    }
}

/// What a discovery run produced.
#[derive(Debug)]
pub struct DiscoveryOutcome {
    /// Final records: filtered by `min_followers`, sorted by follower count
    /// descending (unknown counts last, original order preserved among ties).
    pub creators: Vec<CreatorRecord>,
    /// One report per harvested source, both stages.
    pub reports: Vec<HarvestReport>,
    /// Present when the enrichment pass ran.
    pub enrichment: Option<EnrichmentReport>,
    pub stats: DiscoveryStats,
}

/// Drives one complete run against a [`CreatorSource`].
pub struct DiscoveryRun<'a, S: CreatorSource + ?Sized> {
    source: &'a S,
    config: DiscoveryConfig,
}

impl<'a, S: CreatorSource + ?Sized> DiscoveryRun<'a, S> {
    pub fn new(source: &'a S, config: DiscoveryConfig) -> Self {
        Self { source, config }
    }

    /// Run both harvest stages, the optional enrichment pass, and finalize.
    ///
    /// Stages run in order (search before hashtags); within a stage, up to
    /// `source_concurrency` streams drain at once, all racing against the
    /// same capacity cap.
    pub async fn run(&self) -> DiscoveryOutcome {
        let registry = CreatorRegistry::new(
            AdmissionPolicy {
                strict_filter: self.config.strict_filter,
                require_region: self.config.require_region,
            },
            self.config.max_creators,
        );

        let mut stats = DiscoveryStats::default();
        let mut reports = Vec::new();
        reports.extend(
            self.harvest_stage(
                SourceKind::Search,
                &self.config.queries,
                self.config.search_limit,
                &registry,
            )
            .await,
        );
        reports.extend(
            self.harvest_stage(
                SourceKind::Hashtag,
                &self.config.hashtags,
                self.config.hashtag_limit,
                &registry,
            )
            .await,
        );

        for report in &reports {
            stats.sources_harvested += 1;
            if report.stream_error.is_some() {
                stats.sources_failed += 1;
            }
            stats.sightings += report.attempted;
            stats.creators_added += report.added;
            stats.creators_updated += report.updated;
            stats.sightings_rejected += report.rejected;
        }

        let enrichment = if self.config.fetch_info {
            let policy = EnrichmentPolicy {
                include_details: self.config.include_details,
                include_location: self.config.include_location,
                delay: self.config.info_delay,
            };
            let report = enrich::enrich_registry(self.source, &registry, &policy).await;
            stats.profiles_fetched = report.attempted;
            stats.profiles_failed = report.errors;
            Some(report)
        } else {
            None
        };

        let harvested = registry.len();
        let creators = finalize(registry.snapshot(), self.config.min_followers);
        stats.below_min_followers = (harvested - creators.len()) as u32;
        stats.creators_exported = creators.len() as u32;

        info!(
            creators = creators.len(),
            sources = reports.len(),
            "Discovery run finished"
        );

        DiscoveryOutcome {
            creators,
            reports,
            enrichment,
            stats,
        }
    }

    async fn harvest_stage(
        &self,
        kind: SourceKind,
        args: &[String],
        per_source_limit: u32,
        registry: &CreatorRegistry,
    ) -> Vec<HarvestReport> {
        stream::iter(args)
            .map(|arg| harvester::harvest_source(self.source, kind, arg, per_source_limit, registry))
            .buffer_unordered(self.config.source_concurrency.max(1))
            .collect()
            .await
    }
}

/// Apply the follower floor and sort by follower count descending. The sort
/// is stable, so ties (and unknown counts, which sort as 0) keep their
/// discovery order.
fn finalize(mut creators: Vec<CreatorRecord>, min_followers: u64) -> Vec<CreatorRecord> {
    if min_followers > 0 {
        creators.retain(|c| c.follower_count.unwrap_or(0) >= min_followers);
    }
    creators.sort_by_key(|c| Reverse(c.follower_count.unwrap_or(0)));
    creators
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{profile_info, search_item, video_item, MockSource};

    fn config(queries: &[&str], hashtags: &[&str]) -> DiscoveryConfig {
        DiscoveryConfig {
            queries: queries.iter().map(|s| s.to_string()).collect(),
            hashtags: hashtags.iter().map(|s| s.to_string()).collect(),
            fetch_info: false,
            info_delay: Duration::ZERO,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn both_stages_feed_one_registry() {
        let source = MockSource::new()
            .on_search("Cairo", vec![search_item("a", "A", "", "EG", Some(10))])
            .on_hashtag("egypt", vec![video_item("a", "A", None)]);
        let run = DiscoveryRun::new(&source, config(&["Cairo"], &["egypt"]));

        let outcome = run.run().await;

        assert_eq!(outcome.creators.len(), 1);
        let record = &outcome.creators[0];
        assert!(record.sighting_sources.contains("search:Cairo"));
        assert!(record.sighting_sources.contains("hashtag:egypt"));
        assert_eq!(outcome.stats.creators_added, 1);
        assert_eq!(outcome.stats.creators_updated, 1);
    }

    #[tokio::test]
    async fn min_followers_filters_and_sorts_descending() {
        let source = MockSource::new().on_search(
            "Egypt",
            vec![
                search_item("small", "", "", "EG", Some(50)),
                search_item("big", "", "", "EG", Some(5000)),
                search_item("mid", "", "", "EG", Some(500)),
                search_item("unknown", "", "", "EG", None),
            ],
        );
        let mut cfg = config(&["Egypt"], &[]);
        cfg.min_followers = 100;
        let outcome = DiscoveryRun::new(&source, cfg).run().await;

        let names: Vec<&str> = outcome.creators.iter().map(|c| c.username.as_str()).collect();
        assert_eq!(names, vec!["big", "mid"]);
        assert_eq!(outcome.stats.below_min_followers, 2);
        assert_eq!(outcome.stats.creators_exported, 2);
    }

    #[tokio::test]
    async fn unknown_follower_counts_sort_last() {
        let source = MockSource::new().on_search(
            "Egypt",
            vec![
                search_item("unknown1", "", "", "EG", None),
                search_item("known", "", "", "EG", Some(1)),
                search_item("unknown2", "", "", "EG", None),
            ],
        );
        let outcome = DiscoveryRun::new(&source, config(&["Egypt"], &[])).run().await;

        let names: Vec<&str> = outcome.creators.iter().map(|c| c.username.as_str()).collect();
        // Stable sort: unknowns keep their discovery order behind the known.
        assert_eq!(names, vec!["known", "unknown1", "unknown2"]);
    }

    #[tokio::test]
    async fn one_failing_source_does_not_sink_the_run() {
        let source = MockSource::new()
            .on_search_failing("Cairo", vec![], "socket hangup")
            .on_search("Egypt", vec![search_item("a", "", "", "EG", Some(10))]);
        let outcome = DiscoveryRun::new(&source, config(&["Cairo", "Egypt"], &[]))
            .run()
            .await;

        assert_eq!(outcome.creators.len(), 1);
        assert_eq!(outcome.stats.sources_failed, 1);
        assert_eq!(outcome.stats.sources_harvested, 2);
    }

    #[tokio::test]
    async fn capacity_stops_later_stages() {
        let source = MockSource::new()
            .on_search(
                "Egypt",
                vec![
                    search_item("a", "", "", "EG", None),
                    search_item("b", "", "", "EG", None),
                ],
            )
            .on_hashtag("egypt", vec![video_item("c", "", None)]);
        let mut cfg = config(&["Egypt"], &["egypt"]);
        cfg.max_creators = 2;
        let outcome = DiscoveryRun::new(&source, cfg).run().await;

        assert_eq!(outcome.creators.len(), 2);
        let hashtag_report = outcome
            .reports
            .iter()
            .find(|r| r.source == "hashtag:egypt")
            .unwrap();
        // The hashtag stage started after the cap was hit and never pulled.
        assert_eq!(hashtag_report.attempted, 0);
    }

    #[tokio::test]
    async fn enrichment_fills_unknown_followers() {
        let source = MockSource::new()
            .on_search("Egypt", vec![search_item("a", "", "", "EG", None)])
            .on_profile("a", profile_info("a", "", "", Some(777), None));
        let mut cfg = config(&["Egypt"], &[]);
        cfg.fetch_info = true;
        let outcome = DiscoveryRun::new(&source, cfg).run().await;

        assert_eq!(outcome.creators[0].follower_count, Some(777));
        let enrichment = outcome.enrichment.unwrap();
        assert_eq!(enrichment.attempted, 1);
        assert_eq!(enrichment.updated, 1);
        assert_eq!(outcome.stats.profiles_fetched, 1);
    }

    #[tokio::test]
    async fn no_enrichment_without_fetch_info() {
        let source = MockSource::new()
            .on_search("Egypt", vec![search_item("a", "", "", "EG", None)]);
        let outcome = DiscoveryRun::new(&source, config(&["Egypt"], &[])).run().await;

        assert!(outcome.enrichment.is_none());
        assert!(source.lookups.lock().unwrap().is_empty());
    }
}
