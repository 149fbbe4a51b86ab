//! In-memory store of merged creator records.
//!
//! The registry is the single synchronization point of the harvest engine:
//! every harvester funnels its sightings through [`CreatorRegistry::merge`],
//! which takes the inner lock only for the duration of the merge itself —
//! never across an await. Scalar fields follow first-writer-wins-if-null;
//! provenance is an additive set union.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;
use nilescout_common::{profile_url, CreatorRecord, LocationSource, Sighting};

use crate::classifier;

/// Admission policy applied to every sighting before it is merged.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdmissionPolicy {
    /// Require an explicit region/text match; provenance alone is not enough.
    pub strict_filter: bool,
    /// Require the platform region code itself to match.
    pub require_region: bool,
}

/// Outcome of merging one sighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// First sighting of this username — a record was inserted.
    Created,
    /// The username was already known — fields merged in place.
    Updated,
    /// The sighting was dropped.
    Rejected(RejectReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    EmptyUsername,
    FilteredOut,
    AtCapacity,
}

struct Inner {
    records: HashMap<String, CreatorRecord>,
    /// Usernames in insertion order; `snapshot` must be stable across calls.
    order: Vec<String>,
}

pub struct CreatorRegistry {
    inner: Mutex<Inner>,
    policy: AdmissionPolicy,
    /// Maximum number of records, 0 = unbounded. Enforced on creation, so the
    /// registry can never exceed it no matter how many harvesters race.
    capacity: usize,
}

impl CreatorRegistry {
    pub fn new(policy: AdmissionPolicy, capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                records: HashMap::new(),
                order: Vec::new(),
            }),
            policy,
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the capacity cap has been reached. Never true when unbounded.
    pub fn is_full(&self) -> bool {
        self.capacity > 0 && self.len() >= self.capacity
    }

    /// Merge one sighting. See the module docs for the field semantics.
    pub fn merge(&self, sighting: &Sighting) -> MergeOutcome {
        if sighting.username.is_empty() {
            return MergeOutcome::Rejected(RejectReason::EmptyUsername);
        }

        let text_blob = text_blob(sighting);
        let region = sighting.region_code.as_deref().unwrap_or("");

        if self.policy.require_region && !classifier::region_matches(region) {
            return MergeOutcome::Rejected(RejectReason::FilteredOut);
        }
        if self.policy.strict_filter {
            // Strict mode: provenance alone does not admit a sighting.
            let verdict = classifier::classify(&text_blob, region, &sighting.source, false);
            if !verdict.is_candidate() {
                return MergeOutcome::Rejected(RejectReason::FilteredOut);
            }
        }

        let mut inner = self.lock();
        if let Some(record) = inner.records.get_mut(&sighting.username) {
            apply_sighting(record, sighting);
            return MergeOutcome::Updated;
        }

        if self.capacity > 0 && inner.records.len() >= self.capacity {
            return MergeOutcome::Rejected(RejectReason::AtCapacity);
        }

        let record = create_record(sighting, &text_blob, region);
        inner.order.push(sighting.username.clone());
        inner.records.insert(sighting.username.clone(), record);
        MergeOutcome::Created
    }

    /// Merge a profile-lookup payload into an existing record. Strictly
    /// additive: same first-writer-wins field semantics as `merge`, but no
    /// admission filter, no capacity check, and never a creation. Returns
    /// whether anything was newly populated.
    pub fn apply_profile(&self, username: &str, sighting: &Sighting) -> bool {
        let mut inner = self.lock();
        let Some(record) = inner.records.get_mut(username) else {
            return false;
        };
        apply_sighting(record, sighting)
    }

    pub fn get(&self, username: &str) -> Option<CreatorRecord> {
        self.lock().records.get(username).cloned()
    }

    /// All records, cloned, in insertion order.
    pub fn snapshot(&self) -> Vec<CreatorRecord> {
        let inner = self.lock();
        inner
            .order
            .iter()
            .filter_map(|username| inner.records.get(username))
            .cloned()
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("registry lock poisoned")
    }
}

/// The free-text fields scanned for location keywords, joined.
fn text_blob(sighting: &Sighting) -> String {
    let mut parts = vec![sighting.username.as_str()];
    if let Some(name) = sighting.display_name.as_deref() {
        parts.push(name);
    }
    if let Some(bio) = sighting.bio.as_deref() {
        parts.push(bio);
    }
    parts.join(" ")
}

fn create_record(sighting: &Sighting, text_blob: &str, region: &str) -> CreatorRecord {
    let location_hint = classifier::find_location_hint(text_blob).unwrap_or("");
    let location_source = if !region.is_empty() {
        LocationSource::Region
    } else if !location_hint.is_empty() {
        LocationSource::Bio
    } else {
        LocationSource::None
    };

    let mut sighting_sources = std::collections::BTreeSet::new();
    if !sighting.source.is_empty() {
        sighting_sources.insert(sighting.source.clone());
    }

    CreatorRecord {
        display_name: sighting.display_name.clone().unwrap_or_default(),
        username: sighting.username.clone(),
        profile_url: profile_url(&sighting.username),
        follower_count: sighting.follower_count,
        bio: sighting.bio.clone().unwrap_or_default(),
        region_code: region.to_string(),
        video_count: sighting.video_count,
        location_hint: location_hint.to_string(),
        location_source,
        sighting_sources,
        sec_uid: sighting.sec_uid.clone(),
        discovered_at: Utc::now(),
    }
}

/// First-writer-wins merge of one sighting into an existing record. Returns
/// whether any field was newly populated (provenance growth counts).
fn apply_sighting(record: &mut CreatorRecord, sighting: &Sighting) -> bool {
    let mut changed = false;

    if record.display_name.is_empty() {
        if let Some(name) = sighting.display_name.as_deref().filter(|s| !s.is_empty()) {
            record.display_name = name.to_string();
            changed = true;
        }
    }
    if record.bio.is_empty() {
        if let Some(bio) = sighting.bio.as_deref().filter(|s| !s.is_empty()) {
            record.bio = bio.to_string();
            changed = true;
        }
    }
    if record.region_code.is_empty() {
        if let Some(region) = sighting.region_code.as_deref().filter(|s| !s.is_empty()) {
            record.region_code = region.to_string();
            changed = true;
        }
    }
    if record.follower_count.is_none() && sighting.follower_count.is_some() {
        record.follower_count = sighting.follower_count;
        changed = true;
    }
    if record.video_count.is_none() && sighting.video_count.is_some() {
        record.video_count = sighting.video_count;
        changed = true;
    }
    if record.sec_uid.is_none() && sighting.sec_uid.is_some() {
        record.sec_uid = sighting.sec_uid.clone();
        changed = true;
    }

    // Location enrichment only while unset: a settled attribution stays.
    if !record.location_source.is_set() {
        let hint = classifier::find_location_hint(&text_blob(sighting));
        if !record.region_code.is_empty() {
            record.location_source = LocationSource::Region;
            changed = true;
        } else if hint.is_some() {
            record.location_source = LocationSource::Bio;
            changed = true;
        }
        if record.location_hint.is_empty() {
            if let Some(hint) = hint {
                record.location_hint = hint.to_string();
                changed = true;
            }
        }
    }

    if !sighting.source.is_empty() && record.sighting_sources.insert(sighting.source.clone()) {
        changed = true;
    }

    changed
}
