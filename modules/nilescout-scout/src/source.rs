//! The platform capability the harvest engine consumes.
//!
//! `CreatorSource` is the seam between the engine and the TikTok client: two
//! lazy result streams plus a single-shot profile lookup. The mock in
//! `testing` implements the same trait for deterministic pipeline tests —
//! no network, no browser session.

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde_json::Value;

use tiktok_client::{Result as ClientResult, TikTokClient};

/// A lazy stream of raw platform items. Any element may be an error; the
/// consumer decides what ends the stream.
pub type ItemStream<'a> = BoxStream<'a, ClientResult<Value>>;

#[async_trait]
pub trait CreatorSource: Send + Sync {
    /// Search creator profiles by free-text query. `count` caps the number
    /// of yielded items; 0 means unbounded.
    fn search_users(&self, query: &str, count: u32) -> ItemStream<'_>;

    /// Videos under a hashtag; each item embeds its author. Same `count`
    /// contract as [`search_users`].
    ///
    /// [`search_users`]: CreatorSource::search_users
    fn hashtag_videos(&self, tag: &str, count: u32) -> ItemStream<'_>;

    /// Single profile lookup by username, with the secondary id when known.
    async fn user_info(&self, username: &str, sec_uid: Option<&str>) -> ClientResult<Value>;
}

#[async_trait]
impl CreatorSource for TikTokClient {
    fn search_users(&self, query: &str, count: u32) -> ItemStream<'_> {
        Box::pin(TikTokClient::search_users(self, query, count))
    }

    fn hashtag_videos(&self, tag: &str, count: u32) -> ItemStream<'_> {
        Box::pin(TikTokClient::hashtag_videos(self, tag, count))
    }

    async fn user_info(&self, username: &str, sec_uid: Option<&str>) -> ClientResult<Value> {
        TikTokClient::user_info(self, username, sec_uid).await
    }
}
