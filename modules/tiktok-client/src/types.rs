use serde::Deserialize;
use serde_json::Value;

// Result items are kept as raw `serde_json::Value`: TikTok reshuffles item
// schemas between web deployments, so field resolution lives downstream
// where it can be tested against every known shape. Only the page envelopes
// are typed here.

/// One page from the user search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchUserPage {
    #[serde(default, rename = "user_list")]
    pub users: Vec<Value>,
    #[serde(default)]
    pub cursor: i64,
    /// 1 while more pages exist. An integer, not a bool, on this endpoint.
    #[serde(default)]
    pub has_more: u8,
}

/// One page from the challenge (hashtag) item-list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct HashtagVideoPage {
    #[serde(default, rename = "itemList")]
    pub items: Vec<Value>,
    /// String on current deployments, integer on older ones.
    #[serde(default)]
    pub cursor: Value,
    #[serde(default, rename = "hasMore")]
    pub has_more: bool,
}

impl HashtagVideoPage {
    /// The cursor to pass to the next page request, whatever shape it came in.
    pub fn next_cursor(&self) -> String {
        match &self.cursor {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => "0".to_string(),
        }
    }
}

/// Envelope for the challenge detail endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ChallengeDetail {
    #[serde(rename = "challengeInfo")]
    pub challenge_info: Option<ChallengeInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChallengeInfo {
    pub challenge: Option<Challenge>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Challenge {
    pub id: Option<String>,
    pub title: Option<String>,
}

impl ChallengeDetail {
    pub fn challenge_id(&self) -> Option<&str> {
        self.challenge_info
            .as_ref()?
            .challenge
            .as_ref()?
            .id
            .as_deref()
    }
}
