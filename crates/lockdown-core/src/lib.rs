//! Core lockdown logic
//!
//! Provides:
//! - Capability gate over the device platform
//! - Pure feature mask and allow list computation
//! - The lockdown state machine (enter / refresh / exit)
//! - Overlay surfaces that harden the locked device

mod allowlist;
mod controller;
mod features;
mod gate;
mod overlay;

pub use allowlist::*;
pub use controller::*;
pub use features::*;
pub use gate::*;
pub use overlay::*;
