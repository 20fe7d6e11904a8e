//! Utility functions and helpers.

pub mod http;
pub mod log;

use std::sync::LazyLock;

use regex::Regex;

/// Subject letters, lazily-matched course number, 2-3 digit section, optional suffix.
static STRICT_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]+(\d+?)(\d{2,3})[A-Za-z]*$").expect("valid strict section pattern")
});

/// Last 2-3 digit run before an optional letter suffix.
static LOOSE_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{2,3})[A-Za-z]*$").expect("valid loose section pattern")
});

/// Extract the section number from a raw course code.
///
/// The strict form splits `PHYS22804042` into course `22804` and section
/// `042`: because the course-number group is lazy, the section is the last
/// three digits when four or more are present and the last two when exactly
/// three are. Codes that do not fit (no leading letters, separators inside)
/// fall back to the trailing 2-3 digit run. Returns an empty string when
/// neither form matches.
pub fn extract_section_number(code: &str) -> String {
    if let Some(caps) = STRICT_SECTION.captures(code) {
        if let Some(section) = caps.get(2) {
            return section.as_str().to_string();
        }
    }

    LOOSE_SECTION
        .captures(code)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Collapse whitespace runs into single spaces and trim the ends.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
