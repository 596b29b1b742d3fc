//! Core domain types and logic.

pub mod price;
pub mod indicator;
pub mod signal;
pub mod analysis;
pub mod error;
