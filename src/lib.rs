//! # EduGroupManager API
//!
//! A REST API built with Rust, Axum, and PostgreSQL for running group
//! coursework: teachers create course modules, projects with ordered steps,
//! tasks and student groups; students submit deliverables, receive grades and
//! exchange direct messages.
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── middleware/       # Auth extractor, role checks, rate limiting
//! ├── modules/          # Feature modules
//! │   ├── auth/            # Registration, login, current user
//! │   ├── users/           # User directory
//! │   ├── course_modules/  # Modules and enrolment
//! │   ├── projects/        # Projects and steps
//! │   ├── tasks/           # Tasks
//! │   ├── groups/          # Student groups and membership
//! │   ├── submissions/     # Submissions, grading, comments
//! │   └── messages/        # Direct messages and conversations
//! └── utils/           # Visibility scoping shared by the services
//! ```
//!
//! Each feature module follows a consistent structure:
//!
//! - `mod.rs`: Module exports
//! - `controller.rs`: HTTP handlers (routes)
//! - `service.rs`: Business logic and SQL
//! - `model.rs`: Re-exports of the DTOs from `edugroup-models`
//! - `router.rs`: Axum router configuration
//!
//! ## Roles
//!
//! | Role | Sees |
//! |------|------|
//! | Teacher | Everything attached to the modules they own |
//! | Student | Modules they are enrolled in, their groups, their submissions |
//! | Coordinator | Same as a student; additionally manages the groups they lead |
//!
//! Out-of-scope resources are reported as `404 Not Found`.
//!
//! ## Modules
//!
//! - [`docs`]: OpenAPI documentation setup
//! - [`logging`]: Tracing subscriber and request logging
//! - [`metrics`]: Prometheus metrics endpoint and business counters
//! - [`middleware`]: Authentication, authorization and rate limiting
//! - [`modules`]: Feature modules
//! - [`router`]: Main application router
//! - [`state`]: Shared application state
//! - [`utils`]: Shared helpers
//! - [`validator`]: Request validation extractor

pub mod docs;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod utils;
pub mod validator;

// Re-export workspace crates for convenience
pub use edugroup_auth;
pub use edugroup_config;
pub use edugroup_core;
pub use edugroup_db;
pub use edugroup_models;
