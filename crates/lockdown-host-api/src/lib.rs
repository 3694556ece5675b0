//! Platform boundary traits for the lockdown controller
//!
//! This crate defines the interface between the controller core and the
//! hosting platform (policy authority, lock task primitive, app launcher,
//! window service). It contains no platform code itself, only the traits,
//! the overlay handle type and in-memory test doubles.

mod handle;
mod mock;
mod traits;
mod window;

pub use handle::*;
pub use mock::*;
pub use traits::*;
pub use window::*;
