//! Watched course definitions.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Keyword that disables section filtering.
const ALL_SECTIONS: &str = "all";

/// A course the monitor polls, loaded once from configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WatchedCourse {
    /// Display name (e.g., "PHYS228 - Fundamentals of Physics Lab II")
    pub label: String,

    /// Search key sent to the course search (e.g., "phys228")
    pub course_sec: String,

    /// Term code (e.g., "2263")
    pub term: String,

    /// Section numbers to watch; omitted means every section
    #[serde(default)]
    pub sections: SectionFilter,

    /// Section numbers that warrant urgent alerts
    #[serde(default)]
    pub priority: BTreeSet<String>,
}

impl WatchedCourse {
    /// Whether the given section number is being watched.
    pub fn watches(&self, section_number: &str) -> bool {
        self.sections.contains(section_number)
    }

    /// Whether the given section number is a priority section.
    pub fn is_priority(&self, section_number: &str) -> bool {
        self.priority.contains(section_number)
    }

    /// State-store key for a section code in this course's term.
    pub fn state_key(&self, code: &str) -> String {
        format!("{}_{}", self.term, code)
    }
}

/// Set of watched section numbers, or every section.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawSectionFilter", into = "RawSectionFilter")]
pub enum SectionFilter {
    #[default]
    All,
    Only(BTreeSet<String>),
}

impl SectionFilter {
    pub fn contains(&self, section_number: &str) -> bool {
        match self {
            SectionFilter::All => true,
            SectionFilter::Only(set) => set.contains(section_number),
        }
    }
}

/// TOML shape: `"all"` or a list of section numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawSectionFilter {
    Keyword(String),
    List(Vec<String>),
}

impl TryFrom<RawSectionFilter> for SectionFilter {
    type Error = AppError;

    fn try_from(raw: RawSectionFilter) -> Result<Self, Self::Error> {
        match raw {
            RawSectionFilter::Keyword(word) if word.eq_ignore_ascii_case(ALL_SECTIONS) => {
                Ok(SectionFilter::All)
            }
            RawSectionFilter::Keyword(word) => Err(AppError::config(format!(
                "sections must be a list or \"{ALL_SECTIONS}\", got \"{word}\""
            ))),
            RawSectionFilter::List(list) => Ok(SectionFilter::Only(list.into_iter().collect())),
        }
    }
}

impl From<SectionFilter> for RawSectionFilter {
    fn from(filter: SectionFilter) -> Self {
        match filter {
            SectionFilter::All => RawSectionFilter::Keyword(ALL_SECTIONS.to_string()),
            SectionFilter::Only(set) => RawSectionFilter::List(set.into_iter().collect()),
        }
    }
}
