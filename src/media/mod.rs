//! Media items and enriched catalog records.

pub mod models;

pub use models::*;
