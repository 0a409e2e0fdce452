//! # EduGroup Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`jwt`]: JWT signing secret and token lifetime
//! - [`cors`]: Allowed front-end origins
//! - [`rate_limit`]: Per-IP request quotas
//! - [`server`]: Bind address for the API and metrics listeners
//!
//! # Example
//!
//! ```ignore
//! use edugroup_config::{CorsConfig, JwtConfig, RateLimitConfig, ServerConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let server_config = ServerConfig::from_env();
//! ```

pub mod cors;
pub mod jwt;
pub mod rate_limit;
pub mod server;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use rate_limit::{KeyedLimiter, RateLimitConfig};
pub use server::ServerConfig;
