use std::collections::HashMap;

use sqlx::{FromRow, PgPool};
use tracing::instrument;

use edugroup_core::AppError;
use edugroup_models::ModuleId;

use crate::utils::access::{Actor, ensure_module_owner, is_enrolled, is_group_member};

use super::model::{
    CreateGroupDto, GroupDetails, GroupId, GroupWithMembers, ManageMembershipDto,
    MembershipAction, UpdateGroupDto, UserId, UserSummary,
};

const GROUP_DETAILS: &str = r#"SELECT
        g.id,
        g.name,
        g.module_id,
        m.name AS module_name,
        m.teacher_id,
        g.coordinator_id,
        c.first_name AS coordinator_first_name,
        c.last_name AS coordinator_last_name,
        (SELECT COUNT(*) FROM group_members gm WHERE gm.group_id = g.id) AS member_count,
        g.created_at,
        g.updated_at
       FROM student_groups g
       JOIN modules m ON m.id = g.module_id
       LEFT JOIN users c ON c.id = g.coordinator_id"#;

/// Learners see the groups they belong to; teachers see the groups of their
/// modules.
fn group_scope(actor: &Actor, param: usize) -> String {
    if actor.is_teacher() {
        format!("m.teacher_id = ${param}")
    } else {
        format!("g.id IN (SELECT group_id FROM group_members WHERE user_id = ${param})")
    }
}

/// Member list in request order with duplicates dropped. `creator`, when
/// given, always comes first.
fn collect_members(creator: Option<UserId>, requested: &[UserId]) -> Vec<UserId> {
    let mut members: Vec<UserId> = Vec::with_capacity(requested.len() + 1);
    for id in creator.into_iter().chain(requested.iter().copied()) {
        if !members.contains(&id) {
            members.push(id);
        }
    }
    members
}

#[derive(Debug, FromRow)]
struct GroupOwnership {
    module_id: ModuleId,
    teacher_id: UserId,
    coordinator_id: Option<UserId>,
}

#[derive(FromRow)]
struct MemberRow {
    group_id: GroupId,
    #[sqlx(flatten)]
    user: UserSummary,
}

pub struct GroupService;

impl GroupService {
    #[instrument(skip(db))]
    pub async fn list_groups(
        db: &PgPool,
        actor: Actor,
    ) -> Result<Vec<GroupWithMembers>, AppError> {
        let sql = format!(
            "{GROUP_DETAILS} WHERE {} ORDER BY g.created_at DESC",
            group_scope(&actor, 1)
        );

        let groups = sqlx::query_as::<_, GroupDetails>(&sql)
            .bind(actor.id)
            .fetch_all(db)
            .await?;

        let ids: Vec<GroupId> = groups.iter().map(|g| g.id).collect();
        let mut members = Self::members_by_group(db, &ids).await?;

        Ok(groups
            .into_iter()
            .map(|group| GroupWithMembers {
                members: members.remove(&group.id).unwrap_or_default(),
                group,
            })
            .collect())
    }

    /// Creates a group inside a module.
    ///
    /// A learner creating the group must be enrolled and becomes its
    /// coordinator. The owning teacher may also create one; the first listed
    /// member then coordinates. Every member must be enrolled in the module.
    #[instrument(skip(db))]
    pub async fn create_group(
        db: &PgPool,
        actor: Actor,
        dto: CreateGroupDto,
    ) -> Result<GroupWithMembers, AppError> {
        let members = if actor.is_teacher() {
            ensure_module_owner(db, &actor, dto.module_id, "Module not found").await?;
            collect_members(None, &dto.member_ids)
        } else {
            if !is_enrolled(db, dto.module_id, actor.id).await? {
                return Err(AppError::forbidden("You are not enrolled in this module"));
            }
            collect_members(Some(actor.id), &dto.member_ids)
        };

        let coordinator_id = members.first().copied().ok_or_else(|| {
            AppError::bad_request(anyhow::anyhow!("At least one member is required"))
        })?;

        let enrolled = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM module_students
               WHERE module_id = $1 AND student_id = ANY($2)"#,
        )
        .bind(dto.module_id)
        .bind(&members)
        .fetch_one(db)
        .await?;

        if enrolled != members.len() as i64 {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "All members must be enrolled in the module"
            )));
        }

        let mut tx = db.begin().await?;

        let group_id = sqlx::query_scalar::<_, GroupId>(
            r#"INSERT INTO student_groups (name, module_id, coordinator_id)
               VALUES ($1, $2, $3)
               RETURNING id"#,
        )
        .bind(dto.name.trim())
        .bind(dto.module_id)
        .bind(coordinator_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"INSERT INTO group_members (group_id, user_id)
               SELECT $1, UNNEST($2::uuid[])"#,
        )
        .bind(group_id)
        .bind(&members)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(%group_id, members = members.len(), "Group created");

        Self::get_group(db, actor, group_id).await
    }

    #[instrument(skip(db))]
    pub async fn get_group(
        db: &PgPool,
        actor: Actor,
        group_id: GroupId,
    ) -> Result<GroupWithMembers, AppError> {
        let sql = format!("{GROUP_DETAILS} WHERE g.id = $2 AND {}", group_scope(&actor, 1));

        let group = sqlx::query_as::<_, GroupDetails>(&sql)
            .bind(actor.id)
            .bind(group_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Group not found")))?;

        let members = Self::members(db, group_id).await?;

        Ok(GroupWithMembers { group, members })
    }

    #[instrument(skip(db))]
    pub async fn list_members(
        db: &PgPool,
        actor: Actor,
        group_id: GroupId,
    ) -> Result<Vec<UserSummary>, AppError> {
        Ok(Self::get_group(db, actor, group_id).await?.members)
    }

    /// Renames the group or hands coordination to another member.
    #[instrument(skip(db))]
    pub async fn update_group(
        db: &PgPool,
        actor: Actor,
        group_id: GroupId,
        dto: UpdateGroupDto,
    ) -> Result<GroupWithMembers, AppError> {
        Self::authorize_manage(db, &actor, group_id).await?;

        if let Some(coordinator_id) = dto.coordinator_id
            && !is_group_member(db, group_id, coordinator_id).await?
        {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "The new coordinator must be a member of the group"
            )));
        }

        sqlx::query(
            r#"UPDATE student_groups
               SET name = COALESCE($2, name),
                   coordinator_id = COALESCE($3, coordinator_id),
                   updated_at = NOW()
               WHERE id = $1"#,
        )
        .bind(group_id)
        .bind(dto.name.as_deref().map(str::trim))
        .bind(dto.coordinator_id)
        .execute(db)
        .await?;

        Self::get_group(db, actor, group_id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_group(
        db: &PgPool,
        actor: Actor,
        group_id: GroupId,
    ) -> Result<(), AppError> {
        let group = Self::ownership(db, group_id).await?;
        if group.teacher_id != actor.id {
            let message = "Only the module's teacher can delete a group";
            return Err(Self::denied(db, &actor, group_id, message).await);
        }

        sqlx::query("DELETE FROM student_groups WHERE id = $1")
            .bind(group_id)
            .execute(db)
            .await?;

        Ok(())
    }

    /// Adds or removes one member. The coordinator cannot be removed; hand
    /// coordination to someone else first.
    #[instrument(skip(db))]
    pub async fn manage_membership(
        db: &PgPool,
        actor: Actor,
        group_id: GroupId,
        dto: ManageMembershipDto,
    ) -> Result<GroupWithMembers, AppError> {
        let group = Self::authorize_manage(db, &actor, group_id).await?;

        match dto.action {
            MembershipAction::Add => {
                if !is_enrolled(db, group.module_id, dto.user_id).await? {
                    return Err(AppError::bad_request(anyhow::anyhow!(
                        "User is not enrolled in the group's module"
                    )));
                }

                sqlx::query(
                    r#"INSERT INTO group_members (group_id, user_id)
                       VALUES ($1, $2)
                       ON CONFLICT (group_id, user_id) DO NOTHING"#,
                )
                .bind(group_id)
                .bind(dto.user_id)
                .execute(db)
                .await?;
            }
            MembershipAction::Remove => {
                if group.coordinator_id == Some(dto.user_id) {
                    return Err(AppError::bad_request(anyhow::anyhow!(
                        "The coordinator cannot be removed from the group"
                    )));
                }

                let result =
                    sqlx::query("DELETE FROM group_members WHERE group_id = $1 AND user_id = $2")
                        .bind(group_id)
                        .bind(dto.user_id)
                        .execute(db)
                        .await?;

                if result.rows_affected() == 0 {
                    return Err(AppError::not_found(anyhow::anyhow!(
                        "User is not a member of this group"
                    )));
                }
            }
        }

        Self::get_group(db, actor, group_id).await
    }

    /// The owning teacher and the group's coordinator may manage it.
    async fn authorize_manage(
        db: &PgPool,
        actor: &Actor,
        group_id: GroupId,
    ) -> Result<GroupOwnership, AppError> {
        let group = Self::ownership(db, group_id).await?;
        if group.teacher_id == actor.id || group.coordinator_id == Some(actor.id) {
            return Ok(group);
        }

        Err(Self::denied(
            db,
            actor,
            group_id,
            "Only the teacher or the group coordinator can manage this group",
        )
        .await)
    }

    /// 403 for members who can see the group, 404 for everyone else.
    async fn denied(
        db: &PgPool,
        actor: &Actor,
        group_id: GroupId,
        message: &'static str,
    ) -> AppError {
        if actor.is_learner() {
            match is_group_member(db, group_id, actor.id).await {
                Ok(true) => return AppError::forbidden(message),
                Ok(false) => {}
                Err(e) => return e,
            }
        }
        AppError::not_found(anyhow::anyhow!("Group not found"))
    }

    async fn ownership(db: &PgPool, group_id: GroupId) -> Result<GroupOwnership, AppError> {
        sqlx::query_as::<_, GroupOwnership>(
            r#"SELECT g.module_id, m.teacher_id, g.coordinator_id
               FROM student_groups g
               JOIN modules m ON m.id = g.module_id
               WHERE g.id = $1"#,
        )
        .bind(group_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Group not found")))
    }

    async fn members(db: &PgPool, group_id: GroupId) -> Result<Vec<UserSummary>, AppError> {
        let mut grouped = Self::members_by_group(db, &[group_id]).await?;
        Ok(grouped.remove(&group_id).unwrap_or_default())
    }

    async fn members_by_group(
        db: &PgPool,
        group_ids: &[GroupId],
    ) -> Result<HashMap<GroupId, Vec<UserSummary>>, AppError> {
        if group_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, MemberRow>(
            r#"SELECT gm.group_id, u.id, u.first_name, u.last_name, u.email, u.role
               FROM group_members gm
               JOIN users u ON u.id = gm.user_id
               WHERE gm.group_id = ANY($1)
               ORDER BY u.first_name, u.last_name"#,
        )
        .bind(group_ids)
        .fetch_all(db)
        .await?;

        let mut grouped: HashMap<GroupId, Vec<UserSummary>> = HashMap::new();
        for row in rows {
            grouped.entry(row.group_id).or_default().push(row.user);
        }
        Ok(grouped)
    }
}
