//! Region classification for discovered creators.
//!
//! Pure functions that decide whether a creator plausibly belongs to the
//! target region based on the platform region code, free profile text, and
//! the provenance of the sighting.

/// Accepted region codes, compared case-insensitively.
const EGYPT_REGION_CODES: &[&str] = &["eg", "egy", "egypt"];

/// Latin-script location keywords, matched case-insensitively, in order.
const EGYPT_KEYWORDS: &[&str] = &[
    "egypt",
    "egyptian",
    "cairo",
    "alexandria",
    "giza",
    "zagazig",
    "mansoura",
    "tanta",
    "aswan",
    "luxor",
    "sohag",
    "ismailia",
    "port said",
    "portsaid",
    "suez",
    "fayoum",
    "sharm",
    "sharm el sheikh",
    "hurghada",
    "dahab",
    "minya",
    "beni suef",
    "banha",
    "damietta",
    "mallawi",
    "el mahalla",
    "kafr",
    "matrouh",
    "qena",
    "asyut",
];

/// Arabic-script keywords, matched as-is (case does not apply), in order.
const EGYPT_KEYWORDS_AR: &[&str] = &[
    "مصر",
    "مصري",
    "مصرية",
    "القاهرة",
    "الجيزة",
    "جيزة",
    "الإسكندرية",
    "اسكندرية",
    "سوهاج",
    "أسوان",
    "اسوان",
    "الأقصر",
    "الاقصر",
    "الغردقة",
    "شرم",
    "الفيوم",
    "الإسماعيلية",
    "الاسماعيلية",
    "بورسعيد",
    "دمياط",
    "المنيا",
    "بنها",
    "أسيوط",
    "اسيوط",
    "قنا",
    "مطروح",
];

/// Result of classifying one sighting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionVerdict {
    /// The platform region code matched the accepted set — authoritative,
    /// no text scan needed.
    Region,
    /// Accepted only because the sighting came from a targeted query or
    /// hashtag. Only produced when `allow_source_hint` is set.
    SourceHint,
    /// A location keyword matched in the profile text.
    Keyword(&'static str),
    /// No region signal at all.
    Reject,
}

impl RegionVerdict {
    pub fn is_candidate(&self) -> bool {
        !matches!(self, RegionVerdict::Reject)
    }

    /// The extracted location hint. Empty unless a keyword matched: a region
    /// code is authoritative on its own and provenance carries no location.
    pub fn location_hint(&self) -> &'static str {
        match self {
            RegionVerdict::Keyword(keyword) => keyword,
            _ => "",
        }
    }
}

/// Classify one sighting. Precedence is fixed and load-bearing:
///
/// 1. region code match
/// 2. provenance hint (only when `allow_source_hint`)
/// 3. Latin keyword
/// 4. Arabic keyword
/// 5. reject
pub fn classify(
    text: &str,
    region_code: &str,
    source_hint: &str,
    allow_source_hint: bool,
) -> RegionVerdict {
    if region_matches(region_code) {
        return RegionVerdict::Region;
    }
    if allow_source_hint && !source_hint.is_empty() {
        return RegionVerdict::SourceHint;
    }
    match find_location_hint(text) {
        Some(keyword) => RegionVerdict::Keyword(keyword),
        None => RegionVerdict::Reject,
    }
}

/// Whether a region code is in the accepted set, case-insensitively.
pub fn region_matches(region_code: &str) -> bool {
    let lowered = region_code.to_ascii_lowercase();
    EGYPT_REGION_CODES.contains(&lowered.as_str())
}

/// Scan free text for a location keyword. Latin keywords are checked
/// case-insensitively before Arabic keywords, each in table order; the
/// first match wins.
pub fn find_location_hint(text: &str) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    for keyword in EGYPT_KEYWORDS {
        if lowered.contains(keyword) {
            return Some(keyword);
        }
    }
    for keyword in EGYPT_KEYWORDS_AR {
        if text.contains(keyword) {
            return Some(keyword);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_code_wins_regardless_of_text() {
        let verdict = classify("lives in Austin, Texas", "EG", "", false);
        assert_eq!(verdict, RegionVerdict::Region);
        assert!(verdict.is_candidate());
        assert_eq!(verdict.location_hint(), "");
    }

    #[test]
    fn region_code_is_case_insensitive() {
        assert!(region_matches("eg"));
        assert!(region_matches("EG"));
        assert!(region_matches("Egy"));
        assert!(region_matches("EGYPT"));
        assert!(!region_matches("sa"));
        assert!(!region_matches(""));
    }

    #[test]
    fn region_beats_source_hint() {
        // Both signals present: the verdict must be Region, not SourceHint.
        let verdict = classify("", "EG", "hashtag:egypt", true);
        assert_eq!(verdict, RegionVerdict::Region);
    }

    #[test]
    fn source_hint_beats_keyword_scan() {
        let verdict = classify("from cairo", "", "search:Cairo", true);
        assert_eq!(verdict, RegionVerdict::SourceHint);
        assert_eq!(verdict.location_hint(), "");
    }

    #[test]
    fn source_hint_requires_the_flag() {
        let verdict = classify("", "", "search:Cairo", false);
        assert_eq!(verdict, RegionVerdict::Reject);
        assert!(!verdict.is_candidate());
    }

    #[test]
    fn keyword_match_carries_the_hint() {
        let verdict = classify("foodie based in Cairo", "", "", false);
        assert_eq!(verdict, RegionVerdict::Keyword("cairo"));
        assert!(verdict.is_candidate());
        assert_eq!(verdict.location_hint(), "cairo");
    }

    #[test]
    fn arabic_keyword_matches_without_lowercasing() {
        let verdict = classify("صانع محتوى من القاهرة", "", "", false);
        assert_eq!(verdict, RegionVerdict::Keyword("القاهرة"));
    }

    #[test]
    fn latin_keywords_scan_before_arabic() {
        // Text contains both scripts; the Latin table is scanned first.
        let verdict = classify("Luxor والأقصر", "", "", false);
        assert_eq!(verdict, RegionVerdict::Keyword("luxor"));
    }

    #[test]
    fn table_order_decides_among_latin_matches() {
        // "egypt" precedes "cairo" in the table even though "cairo" appears
        // first in the text.
        let verdict = classify("cairo, egypt", "", "", false);
        assert_eq!(verdict, RegionVerdict::Keyword("egypt"));
    }

    #[test]
    fn no_signal_rejects() {
        let verdict = classify("just another creator", "", "", false);
        assert_eq!(verdict, RegionVerdict::Reject);
        assert_eq!(verdict.location_hint(), "");
    }

    #[test]
    fn empty_source_hint_never_accepts() {
        let verdict = classify("", "", "", true);
        assert_eq!(verdict, RegionVerdict::Reject);
    }
}
