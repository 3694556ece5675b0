//! Shared domain types for the lockdown controller
//!
//! This crate defines the values exchanged between the controller, its
//! platform adapters and the host UI:
//! - Configuration snapshots and device identity
//! - Lockdown state, allow lists and feature masks
//! - Operation outcomes (success / degraded success)
//! - Overlay surface geometry

mod outcome;
mod overlay;
mod types;

pub use outcome::*;
pub use overlay::*;
pub use types::*;

/// Well-known package id of the system settings app
pub const DEFAULT_SETTINGS_PACKAGE: &str = "com.android.settings";
