//! TOML-defined scrub pattern library, plus the hard-coded PII patterns that
//! ship unconditionally with every build.

use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use vibedom_core::VibedomError;

#[derive(Debug, Deserialize)]
struct PatternFile {
    #[serde(default)]
    rules: Vec<RawRule>,
}

#[derive(Debug, Deserialize)]
struct RawRule {
    id: String,
    #[serde(default)]
    description: String,
    regex: String,
    #[serde(default)]
    #[allow(dead_code)]
    tags: Vec<String>,
}

/// One compiled, ready-to-match scrub rule.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub id: String,
    pub category: String,
    pub regex: Regex,
    pub placeholder: String,
}

/// Result of loading the pattern library: the patterns that compiled plus
/// any warnings for rules that didn't.
#[derive(Debug)]
pub struct PatternLibrary {
    pub patterns: Vec<CompiledPattern>,
    pub warnings: Vec<VibedomError>,
}

/// Render the redaction placeholder for a rule id, e.g. `aws-access-key` →
/// `[REDACTED_AWS_ACCESS_KEY]`.
pub fn placeholder_for(id: &str) -> String {
    format!("[REDACTED_{}]", id.to_uppercase().replace(['-', ' '], "_"))
}

fn compile_rule(rule: &RawRule) -> Result<CompiledPattern, VibedomError> {
    let regex = Regex::new(&rule.regex).map_err(|e| VibedomError::PatternCompileWarn {
        id: rule.id.clone(),
        reason: e.to_string(),
    })?;
    Ok(CompiledPattern {
        id: rule.id.clone(),
        category: if rule.description.is_empty() { rule.id.clone() } else { rule.description.clone() },
        regex,
        placeholder: placeholder_for(&rule.id),
    })
}

/// Parse `path` as a TOML pattern file and compile every rule. A rule whose
/// regex fails to compile under this engine is dropped and recorded as a
/// warning rather than aborting the whole load; built-in PII patterns are
/// appended afterward and are not subject to this failure mode.
pub fn load_pattern_library(path: &Path) -> anyhow::Result<PatternLibrary> {
    let contents = std::fs::read_to_string(path)?;
    let file: PatternFile = toml::from_str(&contents)?;

    let mut patterns = Vec::new();
    let mut warnings = Vec::new();
    for rule in &file.rules {
        match compile_rule(rule) {
            Ok(compiled) => patterns.push(compiled),
            Err(warn) => {
                tracing::warn!(rule = %rule.id, "pattern failed to compile");
                warnings.push(warn);
            }
        }
    }

    if !file.rules.is_empty() && patterns.is_empty() {
        tracing::warn!("every pattern in the library failed to compile; no secrets will be scrubbed");
    }

    patterns.extend(builtin_pii_patterns());
    Ok(PatternLibrary { patterns, warnings })
}

/// PII patterns shipped unconditionally, independent of the TOML library.
/// These are assumed to compile on every supported target; a failure here
/// is a programmer error and panics rather than degrading silently.
pub fn builtin_pii_patterns() -> Vec<CompiledPattern> {
    let specs: &[(&str, &str, &str)] = &[
        ("email-address", "Email address", r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b"),
        (
            "credit-card-number",
            "Credit card number",
            r"\b(?:\d[ -]?){13,16}\b",
        ),
        ("us-ssn", "US Social Security Number", r"\b\d{3}-\d{2}-\d{4}\b"),
        ("us-phone-number", "US phone number", r"\b\(?\d{3}\)?[ .-]?\d{3}[ .-]?\d{4}\b"),
        (
            "private-ipv4",
            "Private IPv4 address",
            r"\b(?:10\.\d{1,3}\.\d{1,3}\.\d{1,3}|192\.168\.\d{1,3}\.\d{1,3}|172\.(?:1[6-9]|2\d|3[0-1])\.\d{1,3}\.\d{1,3})\b",
        ),
    ];

    specs
        .iter()
        .map(|(id, description, pattern)| CompiledPattern {
            id: id.to_string(),
            category: description.to_string(),
            regex: Regex::new(pattern).expect("builtin PII pattern must compile"),
            placeholder: placeholder_for(id),
        })
        .collect()
}
