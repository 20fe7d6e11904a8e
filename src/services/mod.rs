//! Service layer for the seat monitor.
//!
//! This module contains:
//! - Course search fetching (`CourseSearchClient`, behind `SectionSource`)
//! - Result page parsing (`SectionParser`)

mod search;
mod sections;

pub use search::{CourseSearchClient, SectionSource};
pub use sections::SectionParser;
