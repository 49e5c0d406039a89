//! Storage types and definition table
//!
//! This module provides the hardware/memory type enumerations, the
//! per-entry attribute record and the table loaded from a definition file.

mod database;
mod entry;
mod types;

pub use database::*;
pub use types::*;
