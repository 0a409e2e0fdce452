use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use edugroup_auth::{Claims, verify_token};
use edugroup_core::AppError;
use edugroup_models::{UserId, UserRole};

use crate::state::AppState;
use crate::utils::access::Actor;

/// Extractor that validates the bearer token and exposes its claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn user_id(&self) -> Result<UserId, AppError> {
        self.0
            .sub
            .parse()
            .map_err(|_| AppError::unauthorized("Invalid user ID in token"))
    }

    pub fn role(&self) -> Result<UserRole, AppError> {
        self.0
            .role
            .parse()
            .map_err(|_| AppError::unauthorized("Invalid role in token"))
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }

    /// The caller as seen by the visibility rules.
    pub fn actor(&self) -> Result<Actor, AppError> {
        Ok(Actor {
            id: self.user_id()?,
            role: self.role()?,
        })
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))?;

        let claims = verify_token(token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn claims(sub: String, role: &str) -> Claims {
        Claims {
            sub,
            email: "test@example.com".to_string(),
            role: role.to_string(),
            exp: 9999999999,
            iat: 1234567890,
        }
    }

    #[test]
    fn test_user_id() {
        let id = Uuid::new_v4();
        let auth_user = AuthUser(claims(id.to_string(), "student"));
        assert_eq!(auth_user.user_id().unwrap(), UserId::from(id));
    }

    #[test]
    fn test_invalid_subject_is_unauthorized() {
        let auth_user = AuthUser(claims("not-a-uuid".to_string(), "student"));
        let err = auth_user.user_id().unwrap_err();
        assert_eq!(err.status.as_u16(), 401);
    }

    #[test]
    fn test_role_and_actor() {
        let id = Uuid::new_v4();
        let auth_user = AuthUser(claims(id.to_string(), "coordinator"));
        let actor = auth_user.actor().unwrap();

        assert_eq!(actor.role, UserRole::Coordinator);
        assert!(actor.is_learner());
        assert_eq!(auth_user.email(), "test@example.com");
    }

    #[test]
    fn test_unknown_role_is_unauthorized() {
        let auth_user = AuthUser(claims(Uuid::new_v4().to_string(), "admin"));
        assert!(auth_user.role().is_err());
    }
}
