pub use edugroup_models::auth::{AuthResponse, LoginRequest, MessageResponse, RegisterRequest};

/// Body of every error response; documented once for the OpenAPI schema.
#[derive(utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
