//! Canonical data types for the reservation engine.

pub mod assembly;
pub mod candidate;
pub mod change_set;
pub mod codes;
pub mod config;
pub mod reservation;
