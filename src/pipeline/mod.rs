//! Monitoring pipeline.
//!
//! - `diff`: seat transition detection against stored state
//! - `monitor`: the fetch → parse → diff → notify → persist → sleep loop

pub mod diff;
pub mod monitor;

pub use diff::{DiffOutcome, Observation, SeatAlert, apply_sections};
pub use monitor::{CycleReport, Monitor};
