//! Section record scraped from a search results page.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One section as observed on the search page at a single poll.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SectionRecord {
    /// Full course code (e.g., "PHYS22804042")
    pub code: String,

    /// Lecture/lab tag
    #[serde(rename = "type")]
    pub section_type: String,

    /// Course title
    pub title: String,

    /// Open seats
    pub available: u32,

    /// Total seats
    pub capacity: u32,

    /// Page's own full badge; not derived from `available`
    pub full: bool,

    pub campus: String,
    pub days: String,
    pub time: String,

    /// Waitlist label shown next to the course code
    pub waitlisted: bool,
}

impl SectionRecord {
    /// Whether at least one seat is open.
    pub fn has_open_seats(&self) -> bool {
        self.available > 0
    }

    /// Status line used in the per-cycle log.
    pub fn status(&self, priority: bool) -> String {
        format!(
            "{}{}/{} seats{}{}",
            if self.waitlisted { "[WL] " } else { "" },
            self.available,
            self.capacity,
            if self.full { " - FULL" } else { " - OPEN" },
            if priority { " [PRIORITY]" } else { "" },
        )
    }
}

impl fmt::Display for SectionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code, self.section_type)
    }
}
