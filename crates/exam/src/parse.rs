//! Parsing of model output: unit lists and section headers.

use std::sync::OnceLock;

use regex::Regex;

fn unit_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+\.\s+.+").expect("unit line regex"))
}

fn section_header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*(Part [ABC] \(\d+ marks.*?\))").expect("section header regex"))
}

/// Extract numbered chapter/unit lines (`N. Title`) from model output,
/// trimmed, in the order they appear.
pub fn parse_units(text: &str) -> Vec<String> {
    unit_line_re()
        .find_iter(text)
        .map(|m| m.as_str().trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Re-anchor `Part A/B/C (… marks …)` headers on their own lines so the
/// generated paper renders with one blank line before each section.
pub fn normalize_sections(text: &str) -> String {
    section_header_re()
        .replace_all(text, "\n\n$1\n")
        .trim()
        .to_string()
}
