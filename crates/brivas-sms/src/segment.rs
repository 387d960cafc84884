//! Single-segment sizing of composed campaign messages

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::gsm::{weighted_length, SmsEncoding};
use crate::{OPT_OUT_RESERVE, OPT_OUT_SUFFIX, PREFIX_SEPARATOR};

/// Size metrics for one message body under a sender prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentationResult {
    /// Body length with placeholder braces removed
    pub current_length: usize,
    /// Weighted length of prefix, body and opt-out footer together
    pub total_length: usize,
    pub encoding: SmsEncoding,
    pub segment_capacity: usize,
    /// Room left for content; negative when the prefix alone overflows
    #[serde(rename = "max")]
    pub max_content_chars: i32,
}

impl SegmentationResult {
    /// Value safe to hand to a text-area length limit
    pub fn editable_limit(&self) -> usize {
        usize::try_from(self.max_content_chars).unwrap_or(0)
    }

    /// Content characters still available, negative once over the limit
    pub fn remaining(&self) -> i64 {
        i64::from(self.max_content_chars) - self.current_length as i64
    }

    pub fn fits_single_segment(&self) -> bool {
        self.total_length <= self.segment_capacity
    }

    /// True when the body length is within the editable limit
    pub fn within_limit(&self) -> bool {
        self.current_length <= self.editable_limit()
    }
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\{([^{}]*)\}").expect("placeholder pattern is a valid regex")
    })
}

/// Trim any run of whitespace and colons from both ends of a sender label
pub fn normalize_company_prefix(raw: &str) -> &str {
    raw.trim_matches(|c: char| c == ':' || c.is_whitespace())
}

/// Drop the braces around every `{...}` token, keeping the name inside
pub fn strip_placeholder_braces(body: &str) -> String {
    placeholder_pattern().replace_all(body, "$1").into_owned()
}

/// Full outbound text: `<prefix>: <body> Reply STOP to opt-out.`
pub fn compose_message(company_prefix: &str, body: &str) -> String {
    compose_normalized(normalize_company_prefix(company_prefix), body)
}

fn compose_normalized(prefix: &str, body: &str) -> String {
    let text = strip_placeholder_braces(body);

    let mut composed =
        String::with_capacity(prefix.len() + PREFIX_SEPARATOR.len() + text.len() + OPT_OUT_SUFFIX.len());
    composed.push_str(prefix);
    composed.push_str(PREFIX_SEPARATOR);
    composed.push_str(&text);
    composed.push_str(OPT_OUT_SUFFIX);
    composed
}

/// Size a campaign message body for a single SMS segment
pub fn compute_segmentation(body: &str, company_prefix: &str) -> SegmentationResult {
    let prefix = normalize_company_prefix(company_prefix);
    let current_length = strip_placeholder_braces(body).chars().count();
    let composed = compose_normalized(prefix, body);

    let encoding = SmsEncoding::detect(&composed);
    let segment_capacity = encoding.segment_capacity();
    let total_length = weighted_length(&composed);

    let prefix_overhead = prefix.chars().count() + PREFIX_SEPARATOR.chars().count();
    let max_content_chars = segment_capacity as i64 - prefix_overhead as i64 - OPT_OUT_RESERVE as i64;
    let max_content_chars = i32::try_from(max_content_chars).unwrap_or(i32::MIN);

    tracing::trace!(
        current_length,
        total_length,
        encoding = %encoding,
        max_content_chars,
        "Computed SMS segmentation"
    );

    SegmentationResult {
        current_length,
        total_length,
        encoding,
        segment_capacity,
        max_content_chars,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_message() {
        let result = compute_segmentation("", "");
        assert_eq!(result.encoding, SmsEncoding::Gsm7);
        assert_eq!(result.current_length, 0);
        // ":  Reply STOP to opt-out." (empty prefix and body, suffix keeps its space)
        assert_eq!(result.total_length, 25);
        assert_eq!(result.segment_capacity, 160);
        assert_eq!(result.max_content_chars, 136);
    }

    #[test]
    fn test_braces_do_not_count() {
        let body = "Hello {firstName}, appt at {appointmentTime}";
        let result = compute_segmentation(body, "Acme");
        let expected = "Hello firstName, appt at appointmentTime";
        assert_eq!(result.current_length, expected.chars().count());
        assert_eq!(result.max_content_chars, 160 - 6 - 22);

        let composed = format!("Acme: {} Reply STOP to opt-out.", expected);
        assert_eq!(result.total_length, composed.chars().count());
    }

    #[test]
    fn test_emoji_forces_ucs2() {
        let result = compute_segmentation("See you soon 😀", "Acme");
        assert_eq!(result.encoding, SmsEncoding::Ucs2);
        assert_eq!(result.segment_capacity, 70);
        assert_eq!(result.max_content_chars, 70 - 6 - 22);
    }

    #[test]
    fn test_non_gsm_prefix_forces_ucs2() {
        let result = compute_segmentation("Hello", "Café Ñandú ç");
        assert_eq!(result.encoding, SmsEncoding::Ucs2);
    }

    #[test]
    fn test_extension_characters_weigh_two() {
        let result = compute_segmentation("Total [5] ~ 10€", "A");
        let composed = compose_message("A", "Total [5] ~ 10€");
        assert_eq!(result.encoding, SmsEncoding::Gsm7);
        assert_eq!(result.total_length, composed.chars().count() + 4);
    }

    #[test]
    fn test_long_prefix_leaves_no_room() {
        let prefix = "a".repeat(150);
        let result = compute_segmentation("Hi", &prefix);
        assert_eq!(result.max_content_chars, 160 - 152 - 22);
        assert!(result.max_content_chars < 0);
        assert_eq!(result.editable_limit(), 0);
        assert!(!result.within_limit());
        assert!(!result.fits_single_segment());
    }

    #[test]
    fn test_prefix_normalization() {
        assert_eq!(normalize_company_prefix("  Acme:: "), "Acme");
        assert_eq!(normalize_company_prefix(":Acme"), "Acme");
        assert_eq!(normalize_company_prefix("Acme Dental"), "Acme Dental");
        assert_eq!(normalize_company_prefix(":::"), "");
        assert_eq!(normalize_company_prefix("Acme: :"), "Acme");
        assert_eq!(normalize_company_prefix(" : Acme Dental :: "), "Acme Dental");

        let normalized = compute_segmentation("Hi", "Acme:");
        let plain = compute_segmentation("Hi", "Acme");
        assert_eq!(normalized, plain);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        for raw in ["Acme: :", ": :Acme", "  Acme ::: ", "Acme Dental: "] {
            let once = normalize_company_prefix(raw);
            assert_eq!(normalize_company_prefix(once), once);
        }
    }

    #[test]
    fn test_total_length_matches_composed_text() {
        for raw in ["Acme: :", ": Acme :", "Acme", ""] {
            let result = compute_segmentation("Hi {firstName}", raw);
            let composed = compose_message(raw, "Hi {firstName}");
            assert_eq!(result.total_length, composed.chars().count());
        }

        let result = compute_segmentation("", "Acme: :");
        assert_eq!(result.total_length, "Acme:  Reply STOP to opt-out.".chars().count());
        assert_eq!(result.max_content_chars, 160 - 6 - 22);
    }

    #[test]
    fn test_compose_message() {
        assert_eq!(
            compose_message("Acme:", "Hi {firstName}"),
            "Acme: Hi firstName Reply STOP to opt-out."
        );
    }

    #[test]
    fn test_strip_only_innermost_braces() {
        assert_eq!(strip_placeholder_braces("{a} and {b}"), "a and b");
        assert_eq!(strip_placeholder_braces("{{x}}"), "{x}");
        assert_eq!(strip_placeholder_braces("no tokens {"), "no tokens {");
    }

    #[test]
    fn test_remaining() {
        let result = compute_segmentation("abcd", "Acme");
        assert_eq!(result.remaining(), 132 - 4);
        assert!(result.within_limit());
        assert!(result.fits_single_segment());
    }

    #[test]
    fn test_serializes_with_wire_names() {
        let result = compute_segmentation("", "");
        let json = serde_json::to_value(result).unwrap();
        assert_eq!(json["currentLength"], 0);
        assert_eq!(json["max"], 136);
        assert_eq!(json["encoding"], "GSM-7");
        assert_eq!(json["segmentCapacity"], 160);
    }
}
