//! # EduGroup Models
//!
//! Domain models and DTOs for the EduGroupManager API: database rows,
//! request/response DTOs with their validation rules, and OpenAPI schemas.
//!
//! # Modules
//!
//! - [`ids`]: Strongly-typed entity identifiers
//! - [`users`]: Users and roles
//! - [`auth`]: Registration and login
//! - [`modules`]: Course modules and enrolment
//! - [`projects`]: Projects and their ordered steps
//! - [`tasks`]: Tasks
//! - [`groups`]: Student groups and membership
//! - [`submissions`]: Submissions, grading and comments
//! - [`messages`]: Direct messages and conversation summaries
//! - [`validation`]: Shared field validators

pub mod auth;
pub mod groups;
pub mod ids;
pub mod messages;
pub mod modules;
pub mod projects;
pub mod submissions;
pub mod tasks;
pub mod users;
pub mod validation;

pub use auth::{AuthResponse, LoginRequest, MessageResponse, RegisterRequest};
pub use ids::{
    CommentId, GroupId, MessageId, ModuleId, ProjectId, StepId, SubmissionId, TaskId, UserId,
};
pub use users::{User, UserRole, UserSummary};
