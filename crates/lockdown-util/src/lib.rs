//! Shared utilities for the lockdown controller
//!
//! This crate provides:
//! - ID types (PackageId, OverlayId)
//! - Error types and the error-kind taxonomy
//! - Default paths for config and data directories
//! - Tracing subscriber setup for embedding hosts

mod error;
mod ids;
mod logging;
mod paths;

pub use error::*;
pub use ids::*;
pub use logging::*;
pub use paths::*;
