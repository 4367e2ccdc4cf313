//! Secret-scrubbing algorithm used by the egress filter on both URLs and
//! request bodies.

use std::collections::HashSet;
use vibedom_config::CompiledPattern;

/// Bodies larger than this switch to chunked scanning.
const CHUNK_THRESHOLD_BYTES: usize = 512_000;
const CHUNK_SIZE_BYTES: usize = 512_000;
const CHUNK_OVERLAP_BYTES: usize = 2_048;

/// One redaction applied to the input, in the order a human reading the
/// audit log would expect (left to right).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub pattern_id: String,
    pub category: String,
    pub original: String,
    pub replaced_with: String,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrubOutput {
    pub text: String,
    pub findings: Vec<Finding>,
}

#[derive(Debug, Clone)]
struct RawMatch {
    pattern_id: String,
    category: String,
    placeholder: String,
    start: usize,
    end: usize,
}

/// Scrub every compiled pattern's matches out of `s`, returning the
/// redacted text and the findings (left-to-right order). Inputs over
/// 512,000 bytes are processed in overlapping chunks rather than scanned
/// whole, so pathologically large bodies don't block the single-threaded
/// proxy event loop for long.
pub fn scrub(s: &str, patterns: &[CompiledPattern]) -> ScrubOutput {
    let raw = if s.len() > CHUNK_THRESHOLD_BYTES {
        collect_chunked(s, patterns)
    } else {
        collect_matches(s, patterns, 0)
    };

    let accepted = resolve_overlaps(raw);

    let mut text = s.to_string();
    let mut findings = Vec::with_capacity(accepted.len());
    for m in &accepted {
        let original = s[m.start..m.end].to_string();
        text.replace_range(m.start..m.end, &m.placeholder);
        findings.push(Finding {
            pattern_id: m.pattern_id.clone(),
            category: m.category.clone(),
            original,
            replaced_with: m.placeholder.clone(),
            start: m.start,
            end: m.end,
        });
    }
    findings.reverse();

    ScrubOutput { text, findings }
}

/// Full-scan match collection against every pattern, offsetting positions
/// by `base_offset` so chunked callers can report absolute spans.
fn collect_matches(text: &str, patterns: &[CompiledPattern], base_offset: usize) -> Vec<RawMatch> {
    let mut matches = Vec::new();
    for pattern in patterns {
        for captures in pattern.regex.captures_iter(text) {
            let m = captures.get(1).or_else(|| captures.get(0));
            let Some(m) = m else { continue };
            matches.push(RawMatch {
                pattern_id: pattern.id.clone(),
                category: pattern.category.clone(),
                placeholder: pattern.placeholder.clone(),
                start: base_offset + m.start(),
                end: base_offset + m.end(),
            });
        }
    }
    matches
}

fn char_boundary_floor(s: &str, mut idx: usize) -> usize {
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn char_boundary_ceil(s: &str, mut idx: usize) -> usize {
    while idx < s.len() && !s.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}

/// Chunked variant of [`collect_matches`]: processes overlapping 512 KB
/// windows and deduplicates findings whose `(pattern_id, start, end)` was
/// already seen in a previous, overlapping window.
fn collect_chunked(s: &str, patterns: &[CompiledPattern]) -> Vec<RawMatch> {
    let len = s.len();
    let mut seen: HashSet<(String, usize, usize)> = HashSet::new();
    let mut merged = Vec::new();
    let mut pos = 0;

    loop {
        let window_end = char_boundary_ceil(s, (pos + CHUNK_SIZE_BYTES).min(len));
        let window_start = char_boundary_floor(s, pos);
        let chunk = &s[window_start..window_end];

        for m in collect_matches(chunk, patterns, window_start) {
            let key = (m.pattern_id.clone(), m.start, m.end);
            if seen.insert(key) {
                merged.push(m);
            }
        }

        if window_end >= len {
            break;
        }
        let next = window_end.saturating_sub(CHUNK_OVERLAP_BYTES);
        pos = char_boundary_floor(s, next.max(pos + 1));
    }

    merged
}

/// Sort by `start` descending and greedily accept non-overlapping matches,
/// biased toward the rightmost candidate at each position. The result stays
/// in descending-`start` order, which is exactly the order right-to-left
/// string replacement needs.
fn resolve_overlaps(mut matches: Vec<RawMatch>) -> Vec<RawMatch> {
    matches.sort_by(|a, b| b.start.cmp(&a.start));

    let mut accepted = Vec::new();
    let mut min_start = usize::MAX;
    for m in matches {
        if m.end <= min_start {
            min_start = m.start;
            accepted.push(m);
        }
    }
    accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use vibedom_config::patterns::{builtin_pii_patterns, placeholder_for, CompiledPattern};

    fn pattern(id: &str, regex: &str) -> CompiledPattern {
        CompiledPattern {
            id: id.to_string(),
            category: id.to_string(),
            regex: regex::Regex::new(regex).unwrap(),
            placeholder: placeholder_for(id),
        }
    }

    #[test]
    fn scrub_replaces_a_single_match() {
        let patterns = vec![pattern("digits", r"\d+")];
        let out = scrub("order id 12345 confirmed", &patterns);
        assert_eq!(out.text, "order id [REDACTED_DIGITS] confirmed");
        assert_eq!(out.findings.len(), 1);
        assert_eq!(out.findings[0].original, "12345");
    }

    #[test]
    fn scrub_prefers_first_capture_group_over_full_match() {
        let patterns = vec![pattern("bearer", r"Bearer (\S+)")];
        let out = scrub("Authorization: Bearer abc123", &patterns);
        assert_eq!(out.text, "Authorization: Bearer [REDACTED_BEARER]");
    }

    #[test]
    fn findings_are_returned_left_to_right() {
        let patterns = vec![pattern("digits", r"\d+")];
        let out = scrub("first 111 then 222 then 333", &patterns);
        let originals: Vec<&str> = out.findings.iter().map(|f| f.original.as_str()).collect();
        assert_eq!(originals, vec!["111", "222", "333"]);
    }

    #[test]
    fn replacement_is_correct_even_with_differing_placeholder_lengths() {
        // right-to-left replacement must not corrupt earlier offsets when a
        // placeholder is a different length than the text it replaces.
        let patterns = vec![pattern("word", r"[a-z]+")];
        let out = scrub("aa bb cc", &patterns);
        assert_eq!(
            out.text,
            "[REDACTED_WORD] [REDACTED_WORD] [REDACTED_WORD]"
        );
    }

    #[test]
    fn overlapping_matches_keep_only_non_overlapping_set() {
        let patterns = vec![pattern("three", r"\w{3}"), pattern("five", r"\w{5}")];
        // "hello" at 0..5 (five) overlaps with "hel" at 0..3 (three).
        let out = scrub("hello", &patterns);
        assert_eq!(out.findings.len(), 1);
    }

    #[test]
    fn no_match_leaves_text_untouched() {
        let patterns = vec![pattern("digits", r"\d+")];
        let out = scrub("nothing to see here", &patterns);
        assert_eq!(out.text, "nothing to see here");
        assert!(out.findings.is_empty());
    }

    #[test]
    fn input_at_chunk_threshold_is_not_chunked() {
        let patterns = vec![pattern("marker", r"MARK")];
        let body = "a".repeat(CHUNK_THRESHOLD_BYTES - 4) + "MARK";
        let out = scrub(&body, &patterns);
        assert_eq!(out.findings.len(), 1);
    }

    #[test]
    fn input_over_chunk_threshold_uses_chunked_path_and_still_finds_matches() {
        let patterns = vec![pattern("marker", r"MARK")];
        let mut body = "a".repeat(CHUNK_THRESHOLD_BYTES + 1);
        body.push_str("MARK");
        body.push_str(&"b".repeat(10));

        let out = scrub(&body, &patterns);
        assert_eq!(out.findings.len(), 1);
        assert_eq!(out.findings[0].original, "MARK");
    }

    #[test]
    fn a_match_inside_the_overlap_region_is_seen_by_two_chunks_but_not_duplicated() {
        let patterns = vec![pattern("marker", r"MARK-\d{4}")];
        // CHUNK_SIZE_BYTES - CHUNK_OVERLAP_BYTES is where the second window
        // starts; placing the marker just after that point puts it inside
        // both the first window (which runs to CHUNK_SIZE_BYTES) and the
        // second (which starts CHUNK_OVERLAP_BYTES earlier) at the same
        // time, so both windows would independently detect it.
        let marker_start = CHUNK_SIZE_BYTES - CHUNK_OVERLAP_BYTES + 100;
        let mut body = "x".repeat(marker_start);
        body.push_str("MARK-9999");
        body.push_str(&"y".repeat(5_000));

        let out = scrub(&body, &patterns);
        assert_eq!(out.findings.len(), 1);
        assert_eq!(out.findings[0].original, "MARK-9999");
        assert_eq!(out.findings[0].start, marker_start);
    }

    #[test]
    fn builtin_patterns_scrub_an_email_address() {
        let patterns = builtin_pii_patterns();
        let out = scrub("reach me at person@example.com thanks", &patterns);
        assert!(!out.text.contains("person@example.com"));
        assert!(out.findings.iter().any(|f| f.pattern_id == "email-address"));
    }
}
