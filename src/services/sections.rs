// src/services/sections.rs

//! Section parser for course search result pages.
//!
//! Each result row carrying a `td.course a.coursenum` link becomes one
//! [`SectionRecord`]. Missing cells degrade to empty strings or zero seats
//! instead of failing the page.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::SectionRecord;
use crate::utils::normalize_whitespace;

/// `<available> OF <capacity>` inside the seats cell.
static SEATS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s+OF\s+(\d+)").expect("valid seats pattern"));

/// Parser holding the compiled selectors for a results page.
pub struct SectionParser {
    row: Selector,
    code: Selector,
    section_type: Selector,
    cell: Selector,
    seats: Selector,
    full_badge: Selector,
    waitlist_badge: Selector,
    campus: Selector,
    days: Selector,
    time: Selector,
}

impl SectionParser {
    /// Compile the selectors for the course search layout.
    pub fn new() -> Result<Self> {
        Ok(Self {
            row: Self::parse_selector("table tr")?,
            code: Self::parse_selector("td.course a.coursenum")?,
            section_type: Self::parse_selector("td.course .coursetype")?,
            cell: Self::parse_selector("td")?,
            seats: Self::parse_selector("td.openseats")?,
            full_badge: Self::parse_selector(".label-danger")?,
            waitlist_badge: Self::parse_selector("td.course .label-info")?,
            campus: Self::parse_selector("td.campus")?,
            days: Self::parse_selector("td.day")?,
            time: Self::parse_selector("td.time")?,
        })
    }

    /// Parse every section row on the page.
    pub fn parse(&self, html: &str) -> Vec<SectionRecord> {
        let document = Html::parse_document(html);
        document
            .select(&self.row)
            .filter_map(|row| self.parse_row(&row))
            .collect()
    }

    fn parse_row(&self, row: &ElementRef) -> Option<SectionRecord> {
        let code = joined_text_of(&row.select(&self.code).next()?);

        let title = row
            .select(&self.cell)
            .nth(1)
            .map(|cell| text_of(&cell))
            .unwrap_or_default();

        // No seats cell at all reads as full with zero seats.
        let (available, capacity, full) = match row.select(&self.seats).next() {
            Some(cell) => {
                let (available, capacity) = parse_seats(&cell.text().collect::<String>());
                let full = cell.select(&self.full_badge).next().is_some();
                (available, capacity, full)
            }
            None => (0, 0, true),
        };

        Some(SectionRecord {
            code,
            section_type: self.first_text(row, &self.section_type),
            title,
            available,
            capacity,
            full,
            campus: self.first_text(row, &self.campus),
            days: self.first_text(row, &self.days),
            time: self.first_text(row, &self.time),
            waitlisted: row.select(&self.waitlist_badge).next().is_some(),
        })
    }

    fn first_text(&self, row: &ElementRef, selector: &Selector) -> String {
        row.select(selector)
            .next()
            .map(|el| text_of(&el))
            .unwrap_or_default()
    }

    fn parse_selector(s: &str) -> Result<Selector> {
        Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
    }
}

fn text_of(element: &ElementRef) -> String {
    normalize_whitespace(&element.text().collect::<String>())
}

/// Trimmed text nodes concatenated with no separator. Section codes split
/// across inline markup must still form a single token.
fn joined_text_of(element: &ElementRef) -> String {
    element.text().map(str::trim).collect()
}

/// Read `(available, capacity)` from seat text, or `(0, 0)` when absent.
fn parse_seats(text: &str) -> (u32, u32) {
    SEATS
        .captures(text)
        .and_then(|caps| {
            let available = caps.get(1)?.as_str().parse().ok()?;
            let capacity = caps.get(2)?.as_str().parse().ok()?;
            Some((available, capacity))
        })
        .unwrap_or((0, 0))
}
