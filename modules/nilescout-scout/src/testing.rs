//! Scripted [`CreatorSource`] for pipeline tests.
//!
//! Streams are registered per query/tag; an unregistered key yields a single
//! error, which exercises the same path as a network failure.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use futures::stream;
use serde_json::{json, Value};

use tiktok_client::{Result as ClientResult, TikTokError};

use crate::source::{CreatorSource, ItemStream};

#[derive(Default)]
struct Script {
    items: Vec<Value>,
    trailing_error: Option<String>,
}

/// In-memory [`CreatorSource`] driven by pre-registered responses.
#[derive(Default)]
pub struct MockSource {
    searches: HashMap<String, Script>,
    hashtags: HashMap<String, Script>,
    profiles: HashMap<String, Value>,
    /// Usernames passed to `user_info`, in call order.
    pub lookups: Mutex<Vec<String>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a search stream that yields `items` and ends cleanly.
    pub fn on_search(mut self, query: &str, items: Vec<Value>) -> Self {
        self.searches.insert(
            query.to_string(),
            Script {
                items,
                trailing_error: None,
            },
        );
        self
    }

    /// Register a search stream that yields `items`, then fails.
    pub fn on_search_failing(mut self, query: &str, items: Vec<Value>, error: &str) -> Self {
        self.searches.insert(
            query.to_string(),
            Script {
                items,
                trailing_error: Some(error.to_string()),
            },
        );
        self
    }

    /// Register a hashtag stream that yields `items` and ends cleanly.
    pub fn on_hashtag(mut self, tag: &str, items: Vec<Value>) -> Self {
        self.hashtags.insert(
            tag.to_string(),
            Script {
                items,
                trailing_error: None,
            },
        );
        self
    }

    /// Register a hashtag stream that yields `items`, then fails.
    pub fn on_hashtag_failing(mut self, tag: &str, items: Vec<Value>, error: &str) -> Self {
        self.hashtags.insert(
            tag.to_string(),
            Script {
                items,
                trailing_error: Some(error.to_string()),
            },
        );
        self
    }

    /// Register a profile lookup response for `username`.
    pub fn on_profile(mut self, username: &str, info: Value) -> Self {
        self.profiles.insert(username.to_string(), info);
        self
    }
}

fn scripted<'a>(script: Option<&Script>, kind: &str, key: &str) -> ItemStream<'a> {
    let results: Vec<ClientResult<Value>> = match script {
        Some(script) => {
            let mut out: Vec<ClientResult<Value>> =
                script.items.iter().cloned().map(Ok).collect();
            if let Some(msg) = &script.trailing_error {
                out.push(Err(TikTokError::Network(msg.clone())));
            }
            out
        }
        None => vec![Err(TikTokError::Network(format!(
            "no {kind} response registered for {key}"
        )))],
    };
    Box::pin(stream::iter(results))
}

#[async_trait]
impl CreatorSource for MockSource {
    fn search_users(&self, query: &str, _count: u32) -> ItemStream<'_> {
        scripted(self.searches.get(query), "search", query)
    }

    fn hashtag_videos(&self, tag: &str, _count: u32) -> ItemStream<'_> {
        scripted(self.hashtags.get(tag), "hashtag", tag)
    }

    async fn user_info(&self, username: &str, _sec_uid: Option<&str>) -> ClientResult<Value> {
        self.lookups.lock().unwrap().push(username.to_string());
        self.profiles
            .get(username)
            .cloned()
            .ok_or_else(|| TikTokError::Network(format!("no profile registered for {username}")))
    }
}

/// A user item in the shape the search endpoint returns.
pub fn search_item(
    username: &str,
    nickname: &str,
    signature: &str,
    region: &str,
    followers: Option<u64>,
) -> Value {
    let mut user = json!({
        "uniqueId": username,
        "nickname": nickname,
        "signature": signature,
    });
    if !region.is_empty() {
        user["region"] = json!(region);
    }
    let mut item = json!({ "user_info": user });
    if let Some(n) = followers {
        item["user_info"]["follower_count"] = json!(n);
    }
    item
}

/// A video item in the shape the hashtag endpoint returns, with an embedded
/// author.
pub fn video_item(username: &str, nickname: &str, followers: Option<u64>) -> Value {
    let mut item = json!({
        "author": {
            "uniqueId": username,
            "nickname": nickname,
        },
        "authorStats": {},
    });
    if let Some(n) = followers {
        item["authorStats"]["followerCount"] = json!(n);
    }
    item
}

/// A profile lookup response in the `userInfo` envelope shape.
pub fn profile_info(
    username: &str,
    signature: &str,
    region: &str,
    followers: Option<u64>,
    videos: Option<u64>,
) -> Value {
    let mut info = json!({
        "userInfo": {
            "user": {
                "uniqueId": username,
                "signature": signature,
            },
            "stats": {},
        }
    });
    if !region.is_empty() {
        info["userInfo"]["user"]["region"] = json!(region);
    }
    if let Some(n) = followers {
        info["userInfo"]["stats"]["followerCount"] = json!(n);
    }
    if let Some(n) = videos {
        info["userInfo"]["stats"]["videoCount"] = json!(n);
    }
    info
}
