//! Seat transition detection.
//!
//! Compares freshly parsed sections of one watched course against the
//! stored state, records open and fill transitions, and overwrites the
//! stored record for every watched section.
//!
//! Only the numeric `available` field drives transitions; the page's `full`
//! badge is carried along but never consulted here.

use chrono::{DateTime, Local};

use crate::models::{SectionRecord, StateMap, WatchedCourse};
use crate::utils::extract_section_number;

/// A section that went from zero to some open seats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatAlert {
    /// Section number (e.g., "042")
    pub section: String,
    /// Section as observed this cycle
    pub record: SectionRecord,
    /// Priority sections get high-emphasis delivery
    pub urgent: bool,
}

impl SeatAlert {
    /// Notification title.
    pub fn title(&self) -> String {
        if self.urgent {
            format!("PRIORITY SEAT OPENED - {}", self.record.code)
        } else {
            format!("Seat opened - {}", self.record.code)
        }
    }

    /// Notification body, stamped with `now`.
    pub fn body(&self, now: DateTime<Local>) -> String {
        let r = &self.record;
        format!(
            "{}\nSection: {} ({})\nSeats: {} of {} now open\n{}  {}  {}\n- {}",
            r.title,
            r.code,
            r.section_type,
            r.available,
            r.capacity,
            r.days,
            r.time,
            r.campus,
            now.format("%I:%M %p"),
        )
    }
}

/// A watched section seen this cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub record: SectionRecord,
    pub priority: bool,
}

impl Observation {
    /// Per-cycle status line, e.g. `PHYS22804042 (LAB) 0/24 seats - FULL [PRIORITY]`.
    pub fn status_line(&self) -> String {
        format!("{} {}", self.record, self.record.status(self.priority))
    }
}

/// Result of diffing one course's sections against state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffOutcome {
    /// Watched sections in page order
    pub observed: Vec<Observation>,
    /// Open transitions
    pub alerts: Vec<SeatAlert>,
    /// Codes of sections that went from open to zero seats
    pub filled: Vec<String>,
}

impl DiffOutcome {
    /// Check if any transition fired.
    pub fn has_changes(&self) -> bool {
        !self.alerts.is_empty() || !self.filled.is_empty()
    }
}

/// Diff `sections` of `course` against `state`, updating `state` in place.
pub fn apply_sections(
    course: &WatchedCourse,
    sections: &[SectionRecord],
    state: &mut StateMap,
) -> DiffOutcome {
    let mut outcome = DiffOutcome::default();

    for record in sections {
        let section = extract_section_number(&record.code);
        if !course.watches(&section) {
            continue;
        }

        let priority = course.is_priority(&section);
        let key = course.state_key(&record.code);

        if let Some(prev) = state.get(&key) {
            if !prev.has_open_seats() && record.has_open_seats() {
                outcome.alerts.push(SeatAlert {
                    section: section.clone(),
                    record: record.clone(),
                    urgent: priority,
                });
            } else if prev.has_open_seats() && !record.has_open_seats() {
                outcome.filled.push(record.code.clone());
            }
        }

        state.insert(key, record.clone());
        outcome.observed.push(Observation {
            record: record.clone(),
            priority,
        });
    }

    outcome
}
