//! Student group models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{GroupId, ModuleId, UserId};
use crate::users::UserSummary;

/// Group row joined with its module and coordinator.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct GroupDetails {
    pub id: GroupId,
    pub name: String,
    pub module_id: ModuleId,
    pub module_name: String,
    pub teacher_id: UserId,
    pub coordinator_id: Option<UserId>,
    pub coordinator_first_name: Option<String>,
    pub coordinator_last_name: Option<String>,
    pub member_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GroupWithMembers {
    #[serde(flatten)]
    pub group: GroupDetails,
    pub members: Vec<UserSummary>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateGroupDto {
    #[validate(
        length(max = 200),
        custom(function = "crate::validation::min_two_chars_trimmed")
    )]
    #[schema(example = "Team Rocket")]
    pub name: String,
    pub module_id: ModuleId,
    #[validate(length(min = 1, message = "At least one member is required"))]
    pub member_ids: Vec<UserId>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateGroupDto {
    #[validate(
        length(max = 200),
        custom(function = "crate::validation::min_two_chars_trimmed")
    )]
    pub name: Option<String>,
    pub coordinator_id: Option<UserId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MembershipAction {
    Add,
    Remove,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ManageMembershipDto {
    pub user_id: UserId,
    pub action: MembershipAction,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_group_requires_members() {
        let dto = CreateGroupDto {
            name: "Alpha".to_string(),
            module_id: ModuleId::new(),
            member_ids: vec![UserId::new()],
        };
        assert!(dto.validate().is_ok());

        let empty = CreateGroupDto {
            member_ids: vec![],
            ..dto
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_membership_action_parses_lowercase() {
        let dto: ManageMembershipDto = serde_json::from_str(
            r#"{"user_id":"12345678-1234-1234-1234-123456789abc","action":"remove"}"#,
        )
        .unwrap();
        assert_eq!(dto.action, MembershipAction::Remove);

        let bad = serde_json::from_str::<ManageMembershipDto>(
            r#"{"user_id":"12345678-1234-1234-1234-123456789abc","action":"kick"}"#,
        );
        assert!(bad.is_err());
    }
}
