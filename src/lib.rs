// src/lib.rs

//! seatwatch: course seat availability monitor

pub mod background;
pub mod error;
pub mod models;
pub mod notify;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
