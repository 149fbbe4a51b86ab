//! Sighting extraction from raw platform payloads.
//!
//! Upstream item schemas are not stable: the same logical field arrives under
//! different keys (and different nesting) depending on endpoint and web
//! deployment. Every field is resolved through an explicit ordered key chain,
//! tried in order, so the precedence is documented and testable. A field that
//! cannot be parsed into its expected shape is treated as absent; extraction
//! never fails an item.

use serde_json::Value;

use nilescout_common::Sighting;

/// Containers that may hold the author object inside a search or video item.
/// Falls back to the item itself for flat schemas.
const USER_CONTAINERS: &[&str] = &["user", "user_info", "author"];

/// Containers that may hold the author's counters. Falls back to the user
/// container for flat schemas.
const STATS_CONTAINERS: &[&str] = &["stats", "authorStats", "authorStatsV2"];

const USERNAME_KEYS: &[&str] = &["uniqueId", "unique_id", "username"];
const DISPLAY_NAME_KEYS: &[&str] = &["nickname", "displayName", "name"];
const BIO_KEYS: &[&str] = &["signature", "bio", "desc"];
const REGION_KEYS: &[&str] = &["region", "regionCode", "region_code"];
const SEC_UID_KEYS: &[&str] = &["secUid", "sec_uid"];
const FOLLOWER_KEYS: &[&str] = &["followerCount", "follower_count", "followers", "followers_count"];
const VIDEO_COUNT_KEYS: &[&str] = &["videoCount", "video_count"];

/// Build a sighting from one user-search hit or hashtag-video item.
pub fn sighting_from_item(item: &Value, source: &str) -> Sighting {
    let user = object_at(item, USER_CONTAINERS).unwrap_or(item);
    let stats = object_at(item, STATS_CONTAINERS).unwrap_or(user);
    build_sighting(user, stats, source)
}

/// Build a sighting from a profile-detail payload: a `userInfo` envelope on
/// current deployments, bare `user`/`stats` objects on older ones.
pub fn sighting_from_profile(info: &Value) -> Sighting {
    let envelope = info.get("userInfo").filter(|v| v.is_object()).unwrap_or(info);
    let user = object_at(envelope, &["user"])
        .or_else(|| object_at(info, &["user"]))
        .unwrap_or(envelope);
    let stats = object_at(envelope, &["stats"])
        .or_else(|| object_at(info, &["stats"]))
        .unwrap_or(user);
    build_sighting(user, stats, "")
}

fn build_sighting(user: &Value, stats: &Value, source: &str) -> Sighting {
    Sighting {
        username: first_string(user, USERNAME_KEYS).unwrap_or_default(),
        display_name: first_string(user, DISPLAY_NAME_KEYS),
        bio: first_string(user, BIO_KEYS),
        region_code: first_string(user, REGION_KEYS),
        sec_uid: first_string(user, SEC_UID_KEYS),
        follower_count: first_count(stats, FOLLOWER_KEYS),
        video_count: first_count(stats, VIDEO_COUNT_KEYS),
        source: source.to_string(),
    }
}

/// First nested object found under any of `keys`.
fn object_at<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .find(|v| v.is_object())
}

/// First non-empty string found under any of `keys`. An empty string does not
/// stop the chain: some schemas ship placeholder empties next to the real key.
fn first_string(obj: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| obj.get(*key).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// First parseable count found under any of `keys`.
fn first_count(obj: &Value, keys: &[&str]) -> Option<u64> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find_map(parse_count)
}

/// Parse a count that upstream may ship as an integer, a float, or a string
/// with separators. Booleans always map to unknown, never zero: schemas that
/// conflate absent and false must not fabricate a count.
pub fn parse_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                Some(v)
            } else {
                n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)
            }
        }
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| *c != ',' && *c != '_' && !c.is_whitespace())
                .collect();
            if cleaned.is_empty() {
                return None;
            }
            cleaned
                .parse::<u64>()
                .ok()
                .or_else(|| cleaned.parse::<f64>().ok().filter(|f| *f >= 0.0).map(|f| f as u64))
        }
        _ => None,
    }
}
