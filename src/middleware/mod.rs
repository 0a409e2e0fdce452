//! Middleware and extractors for cross-cutting request concerns.
//!
//! - [`auth`]: Bearer token extractor
//! - [`role`]: Role checks as route layers, extractors and plain helpers
//! - [`rate_limit`]: Per-client token bucket limiting
//!
//! # Authentication Flow
//!
//! 1. Client sends request with `Authorization: Bearer <token>` header
//! 2. `AuthUser` extractor validates the JWT and exposes its claims
//! 3. Role checks (`RequireTeacher`, `require_teacher`) reject other roles with 403
//! 4. Services apply the visibility scope of the authenticated user
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::AuthUser;
//! use crate::middleware::role::RequireTeacher;
//!
//! async fn create_module(RequireTeacher(auth_user): RequireTeacher) -> impl IntoResponse {
//!     let teacher_id = auth_user.user_id()?;
//!     // ...
//! }
//! ```

pub mod auth;
pub mod rate_limit;
pub mod role;
