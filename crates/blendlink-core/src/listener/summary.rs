//! Payload decoding and sampling.
//!
//! Datagrams are expected (not enforced) to carry UTF-8 JSON with a
//! top-level "data" mapping of blendshape name to value. Anything else is
//! reported with a bounded raw preview and the stream keeps going.

use std::collections::BTreeMap;

use regex::Regex;
use serde_json::Value;

/// Blendshape keys sampled by default, to keep per-packet output short.
pub const SAMPLE_KEYS: &[&str] = &["jawOpen", "mouthSmileLeft", "tongueOut"];

/// Maximum number of raw payload bytes echoed for an unparseable packet.
pub const RAW_PREVIEW_LIMIT: usize = 100;

/// Compiled allow-list of sampled keys.
///
/// Accepts glob-style patterns ("mouth*", "?awOpen"); a bare name matches
/// exactly.
#[derive(Debug)]
pub struct KeyFilter {
    patterns: Vec<Regex>,
}

impl KeyFilter {
    /// Compile a set of glob-style key patterns.
    pub fn new<S: AsRef<str>>(specs: &[S]) -> Result<Self, regex::Error> {
        let patterns = specs
            .iter()
            .map(|spec| {
                let regex_pattern = spec.as_ref().replace('*', ".*").replace('?', ".");
                Regex::new(&format!("^{}$", regex_pattern))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    /// Whether a blendshape key is selected for display.
    pub fn matches(&self, key: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(key))
    }
}

impl Default for KeyFilter {
    fn default() -> Self {
        Self::new(SAMPLE_KEYS).unwrap()
    }
}

/// Outcome of decoding one payload.
#[derive(Debug)]
pub enum PayloadSummary {
    /// UTF-8 JSON; a missing or non-mapping "data" field counts as empty.
    Frame {
        /// Allow-listed entries of the "data" mapping, values verbatim.
        sampled: BTreeMap<String, Value>,
        /// Entry count of the full "data" mapping.
        total: usize,
    },
    /// Invalid UTF-8 or invalid JSON.
    Malformed { error: String, preview: RawPreview },
}

/// Bounded echo of a raw payload.
#[derive(Debug)]
pub struct RawPreview {
    pub bytes: Vec<u8>,
    pub truncated: bool,
}

impl RawPreview {
    fn capture(payload: &[u8]) -> Self {
        if payload.len() > RAW_PREVIEW_LIMIT {
            Self {
                bytes: payload[..RAW_PREVIEW_LIMIT].to_vec(),
                truncated: true,
            }
        } else {
            Self {
                bytes: payload.to_vec(),
                truncated: false,
            }
        }
    }
}

/// Summarize one payload. Never fails; decode problems come back as
/// [`PayloadSummary::Malformed`].
pub fn summarize(payload: &[u8], keys: &KeyFilter) -> PayloadSummary {
    let text = match std::str::from_utf8(payload) {
        Ok(text) => text,
        Err(e) => {
            return PayloadSummary::Malformed {
                error: format!("invalid UTF-8: {}", e),
                preview: RawPreview::capture(payload),
            }
        }
    };

    let json: Value = match serde_json::from_str(text) {
        Ok(json) => json,
        Err(e) => {
            return PayloadSummary::Malformed {
                error: format!("invalid JSON: {}", e),
                preview: RawPreview::capture(payload),
            }
        }
    };

    let data = json.get("data").and_then(Value::as_object);

    let total = data.map(|map| map.len()).unwrap_or(0);
    let sampled = data
        .map(|map| {
            map.iter()
                .filter(|(key, _)| keys.matches(key.as_str()))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect()
        })
        .unwrap_or_default();

    PayloadSummary::Frame { sampled, total }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expect_frame(summary: PayloadSummary) -> (BTreeMap<String, Value>, usize) {
        match summary {
            PayloadSummary::Frame { sampled, total } => (sampled, total),
            PayloadSummary::Malformed { error, .. } => panic!("unexpected decode error: {}", error),
        }
    }

    fn expect_malformed(summary: PayloadSummary) -> (String, RawPreview) {
        match summary {
            PayloadSummary::Malformed { error, preview } => (error, preview),
            PayloadSummary::Frame { .. } => panic!("expected a decode error"),
        }
    }

    #[test]
    fn test_samples_only_allow_listed_keys() {
        let payload = br#"{"data": {"jawOpen": 0.5, "eyeBlinkLeft": 0.2, "tongueOut": 0.0}}"#;
        let (sampled, total) = expect_frame(summarize(payload, &KeyFilter::default()));

        assert_eq!(total, 3);
        assert_eq!(sampled.len(), 2);
        assert_eq!(sampled["jawOpen"], Value::from(0.5));
        assert_eq!(sampled["tongueOut"], Value::from(0.0));
        assert!(!sampled.contains_key("eyeBlinkLeft"));
    }

    #[test]
    fn test_empty_data_mapping() {
        let (sampled, total) = expect_frame(summarize(br#"{"data": {}}"#, &KeyFilter::default()));
        assert!(sampled.is_empty());
        assert_eq!(total, 0);
    }

    #[test]
    fn test_missing_data_key_counts_as_empty() {
        let (sampled, total) = expect_frame(summarize(br#"{"foo": 1}"#, &KeyFilter::default()));
        assert!(sampled.is_empty());
        assert_eq!(total, 0);
    }

    #[test]
    fn test_non_mapping_data_counts_as_empty() {
        let (sampled, total) = expect_frame(summarize(br#"{"data": 5}"#, &KeyFilter::default()));
        assert!(sampled.is_empty());
        assert_eq!(total, 0);
    }

    #[test]
    fn test_non_numeric_values_are_preserved() {
        let payload = br#"{"data": {"jawOpen": "wide"}}"#;
        let (sampled, total) = expect_frame(summarize(payload, &KeyFilter::default()));
        assert_eq!(total, 1);
        assert_eq!(sampled["jawOpen"], Value::from("wide"));
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let (error, preview) = expect_malformed(summarize(&[0xff, 0xfe], &KeyFilter::default()));
        assert!(error.contains("invalid UTF-8"));
        assert_eq!(preview.bytes, vec![0xff, 0xfe]);
        assert!(!preview.truncated);
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let (error, _) = expect_malformed(summarize(b"{not json", &KeyFilter::default()));
        assert!(error.contains("invalid JSON"));
    }

    #[test]
    fn test_preview_truncates_long_payloads() {
        let payload = vec![b'a'; 150];
        let (_, preview) = expect_malformed(summarize(&payload, &KeyFilter::default()));
        assert_eq!(preview.bytes.len(), RAW_PREVIEW_LIMIT);
        assert!(preview.truncated);
    }

    #[test]
    fn test_preview_keeps_short_payloads_whole() {
        let (_, preview) = expect_malformed(summarize(b"{oops", &KeyFilter::default()));
        assert_eq!(preview.bytes, b"{oops".to_vec());
        assert!(!preview.truncated);
    }

    #[test]
    fn test_glob_patterns_select_key_families() {
        let filter = KeyFilter::new(&["mouth*"]).unwrap();
        let payload = br#"{"data": {"mouthSmileLeft": 0.1, "mouthSmileRight": 0.2, "jawOpen": 0.9}}"#;
        let (sampled, total) = expect_frame(summarize(payload, &filter));

        assert_eq!(total, 3);
        assert_eq!(sampled.len(), 2);
        assert!(sampled.contains_key("mouthSmileLeft"));
        assert!(sampled.contains_key("mouthSmileRight"));
    }

    #[test]
    fn test_bare_names_match_exactly() {
        let filter = KeyFilter::new(&["jawOpen"]).unwrap();
        assert!(filter.matches("jawOpen"));
        assert!(!filter.matches("jawOpenLeft"));
        assert!(!filter.matches("awOpen"));
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        assert!(KeyFilter::new(&["mouth("]).is_err());
    }
}
