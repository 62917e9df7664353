//! Driver glue for `glow` contexts.
//!
//! Only available with the `render` feature. Everything above this module
//! is pure text processing; these helpers are the two points where a live
//! context is consulted: picking a [`Profile`](crate::Profile) from what
//! the driver reports, and handing assembled text to the driver.
//!
//! - [`context`] -- Profile detection from driver version and extensions.
//! - [`program`] -- Compiling and linking assembled sources.

pub mod context;
pub mod program;

pub use context::detect_profile;
pub use program::{compile_sources, ProgramError, ATTRIBUTE_LOCATIONS};
