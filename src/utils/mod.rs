//! Helpers shared across feature modules.
//!
//! - [`access`]: The caller's visibility scope and ownership checks

pub mod access;
