pub use edugroup_models::UserId;
pub use edugroup_models::users::{User, UserRole, UserSummary};
