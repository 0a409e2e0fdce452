//! # EduGroup Core
//!
//! Core types, errors, and utilities shared by every EduGroupManager crate.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`password`]: Password hashing and verification (bcrypt)
//! - [`serde`]: Custom serde deserialization helpers for query strings and patches
//!
//! # Example
//!
//! ```ignore
//! use edugroup_core::{AppError, hash_password};
//!
//! let error = AppError::not_found(anyhow::anyhow!("Module not found"));
//! let hash = hash_password("secure_password")?;
//! ```

pub mod errors;
pub mod password;
pub mod serde;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use password::{hash_password, verify_password};
