//! # EduGroup CLI
//!
//! Account bootstrap and database seeding for EduGroupManager development.
//!
//! ## Usage
//!
//! ```ignore
//! use edugroup_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::new(3); // 3 teachers with defaults
//! seed_all(&pool, config).await?;
//! ```

pub mod accounts;
pub mod seeder;
