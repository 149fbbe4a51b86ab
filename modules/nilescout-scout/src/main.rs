use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use nilescout_common::Config;
use nilescout_scout::orchestrator::{DiscoveryConfig, DiscoveryRun};
use nilescout_scout::{export, sources};
use tiktok_client::{ClientConfig, TikTokClient};

/// Discover Egyptian TikTok creators via search and hashtag harvesting.
#[derive(Debug, Parser)]
#[command(name = "nilescout", version)]
struct Args {
    /// Search queries, comma-separated. Defaults to the Egypt profile.
    #[arg(long, value_delimiter = ',')]
    queries: Vec<String>,

    /// Hashtags (without #), comma-separated. Defaults to the Egypt profile.
    #[arg(long, value_delimiter = ',')]
    hashtags: Vec<String>,

    /// Items to pull per search query. 0 = unbounded.
    #[arg(long, default_value_t = 25)]
    search_count: u32,

    /// Videos to pull per hashtag. 0 = unbounded.
    #[arg(long, default_value_t = 25)]
    hashtag_videos: u32,

    /// Stop once this many creators are discovered. 0 = unbounded.
    #[arg(long, default_value_t = 200)]
    max_creators: usize,

    /// Drop creators below this follower count from the exports.
    #[arg(long, default_value_t = 0)]
    min_followers: u64,

    /// CSV output path.
    #[arg(long, default_value = "data/egypt_creators.csv")]
    output: PathBuf,

    /// Also write the full records as JSON. Use - for stdout.
    #[arg(long)]
    json_output: Option<PathBuf>,

    /// Skip the CSV export.
    #[arg(long)]
    no_csv: bool,

    /// Skip the profile enrichment pass.
    #[arg(long)]
    no_fetch_info: bool,

    /// Minimum delay between profile lookups, in milliseconds.
    #[arg(long, default_value_t = 300)]
    info_delay_ms: u64,

    /// Only keep creators with an explicit Egypt signal (region or keyword);
    /// hashtag provenance alone is not enough.
    #[arg(long)]
    strict_filter: bool,

    /// Only keep creators whose platform region code is Egypt.
    #[arg(long)]
    require_region: bool,

    /// Also enrich creators missing a bio or video count.
    #[arg(long)]
    include_details: bool,

    /// Also enrich creators missing a region code.
    #[arg(long)]
    include_location: bool,

    /// Do not fall back to the default queries/hashtags when none are given.
    #[arg(long)]
    no_defaults: bool,

    /// Proxy URL; overrides TIKTOK_PROXY.
    #[arg(long)]
    proxy: Option<String>,

    /// How many source streams to drain concurrently.
    #[arg(long, default_value_t = 2)]
    source_concurrency: usize,
}

fn defaulted(given: Vec<String>, defaults: &[&str], no_defaults: bool) -> Vec<String> {
    if !given.is_empty() || no_defaults {
        given
    } else {
        defaults.iter().map(|s| s.to_string()).collect()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("nilescout_scout=info".parse()?),
        )
        .init();

    let args = Args::parse();

    info!("NileScout starting...");

    // Load config
    let mut config = Config::from_env()?;
    if args.proxy.is_some() {
        config.proxy = args.proxy.clone();
    }
    config.log_redacted();

    let client = TikTokClient::new(ClientConfig {
        ms_token: config.ms_token.clone(),
        proxy: config.proxy.clone(),
        timeout: Duration::from_secs(config.timeout_secs),
    })?;

    let discovery = DiscoveryConfig {
        queries: defaulted(args.queries, sources::DEFAULT_QUERIES, args.no_defaults),
        hashtags: defaulted(args.hashtags, sources::DEFAULT_HASHTAGS, args.no_defaults),
        search_limit: args.search_count,
        hashtag_limit: args.hashtag_videos,
        max_creators: args.max_creators,
        min_followers: args.min_followers,
        strict_filter: args.strict_filter,
        require_region: args.require_region,
        fetch_info: !args.no_fetch_info,
        include_details: args.include_details,
        include_location: args.include_location,
        info_delay: Duration::from_millis(args.info_delay_ms),
        source_concurrency: args.source_concurrency,
    };

    if discovery.queries.is_empty() && discovery.hashtags.is_empty() {
        anyhow::bail!("No queries or hashtags to harvest (see --queries/--hashtags)");
    }

    let outcome = DiscoveryRun::new(&client, discovery).run().await;

    if !args.no_csv {
        export::write_csv(&args.output, &outcome.creators)?;
    }
    if let Some(json_path) = &args.json_output {
        export::write_json(json_path, &outcome.creators)?;
    }

    println!("{}", outcome.stats);
    Ok(())
}
