//! Projects, tasks, groups and messages for seeded modules.

use chrono::{Duration, Utc};
use edugroup_models::{GroupId, ModuleId, ProjectId, UserId};
use fake::Fake;
use fake::faker::company::en::CatchPhrase;
use fake::faker::lorem::en::{Sentence, Word};
use sqlx::PgPool;
use std::time::Instant;

use super::models::{CourseworkPerModule, ProjectSeed};

pub fn generate_projects(
    module_id: ModuleId,
    count: usize,
    steps_per_project: usize,
) -> Vec<ProjectSeed> {
    (0..count)
        .map(|idx| ProjectSeed {
            module_id,
            title: CatchPhrase().fake(),
            description: Sentence(8..16).fake(),
            due_date: Utc::now() + Duration::weeks(2 * (idx as i64 + 1)),
            steps: (0..steps_per_project)
                .map(|_| Sentence(2..5).fake())
                .collect(),
        })
        .collect()
}

/// Seeds projects with their steps, then tasks for each project.
/// Returns the number of projects and tasks created.
pub async fn seed_projects_and_tasks(
    db: &PgPool,
    modules: &[(ModuleId, UserId)],
    sizing: &CourseworkPerModule,
) -> Result<(usize, usize), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗂️  Seeding projects and tasks...");

    let mut tx = db.begin().await?;
    let mut project_count = 0;
    let mut task_count = 0;

    for &(module_id, teacher_id) in modules {
        for project in generate_projects(module_id, sizing.projects, sizing.steps_per_project) {
            let project_id: ProjectId = sqlx::query_scalar(
                "INSERT INTO projects (title, description, module_id, due_date)
                 VALUES ($1, $2, $3, $4) RETURNING id",
            )
            .bind(&project.title)
            .bind(&project.description)
            .bind(project.module_id)
            .bind(project.due_date)
            .fetch_one(&mut *tx)
            .await?;
            project_count += 1;

            for (order, title) in project.steps.iter().enumerate() {
                sqlx::query(
                    "INSERT INTO project_steps (project_id, title, step_order) VALUES ($1, $2, $3)",
                )
                .bind(project_id)
                .bind(title)
                .bind(order as i32 + 1)
                .execute(&mut *tx)
                .await?;
            }

            for idx in 0..sizing.tasks_per_project {
                let word: String = Word().fake();
                let days_before = 3 * (sizing.tasks_per_project - idx) as i64;
                let due = project.due_date - Duration::days(days_before);
                sqlx::query(
                    "INSERT INTO tasks (title, description, due_date, module_id, project_id, assigned_by)
                     VALUES ($1, $2, $3, $4, $5, $6)",
                )
                .bind(format!("Deliver {}", word))
                .bind(Sentence(4..10).fake::<String>())
                .bind(due)
                .bind(module_id)
                .bind(project_id)
                .bind(teacher_id)
                .execute(&mut *tx)
                .await?;
                task_count += 1;
            }
        }
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} projects and {} tasks in {:?}",
        project_count,
        task_count,
        start_time.elapsed()
    );
    Ok((project_count, task_count))
}

/// Splits a roster into groups of `group_size`; the first member of each
/// group leads it.
pub fn partition_groups(roster: &[UserId], group_size: usize) -> Vec<Vec<UserId>> {
    if group_size == 0 {
        return Vec::new();
    }
    roster.chunks(group_size).map(<[UserId]>::to_vec).collect()
}

/// Seeds groups for every module. Returns the ids of the group coordinators.
pub async fn seed_groups(
    db: &PgPool,
    modules: &[(ModuleId, UserId)],
    rosters: &[Vec<UserId>],
    group_size: usize,
) -> Result<Vec<UserId>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🤝 Seeding groups...");

    let mut tx = db.begin().await?;
    let mut coordinators = Vec::new();

    for ((module_id, _), roster) in modules.iter().zip(rosters) {
        for (idx, members) in partition_groups(roster, group_size).iter().enumerate() {
            let Some(&coordinator) = members.first() else {
                continue;
            };

            let group_id: GroupId = sqlx::query_scalar(
                "INSERT INTO student_groups (name, module_id, coordinator_id)
                 VALUES ($1, $2, $3) RETURNING id",
            )
            .bind(format!("Team {}", idx + 1))
            .bind(module_id)
            .bind(coordinator)
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query(
                "INSERT INTO group_members (group_id, user_id) SELECT $1, UNNEST($2::uuid[])",
            )
            .bind(group_id)
            .bind(members)
            .execute(&mut *tx)
            .await?;

            coordinators.push(coordinator);
        }
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} groups in {:?}",
        coordinators.len(),
        start_time.elapsed()
    );
    Ok(coordinators)
}

/// Each enrolled student asks their teacher a question and gets a reply.
pub async fn seed_messages(
    db: &PgPool,
    modules: &[(ModuleId, UserId)],
    rosters: &[Vec<UserId>],
    per_module: usize,
) -> Result<usize, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("💬 Seeding messages...");

    let mut tx = db.begin().await?;
    let mut count = 0;

    for ((_, teacher_id), roster) in modules.iter().zip(rosters) {
        for (idx, &student_id) in roster.iter().take(per_module).enumerate() {
            let asked_at = Utc::now() - Duration::hours(idx as i64 + 2);
            for (sender, recipient, at, is_read) in [
                (student_id, *teacher_id, asked_at, true),
                (*teacher_id, student_id, asked_at + Duration::minutes(30), false),
            ] {
                sqlx::query(
                    "INSERT INTO messages (sender_id, recipient_id, content, is_read, created_at)
                     VALUES ($1, $2, $3, $4, $5)",
                )
                .bind(sender)
                .bind(recipient)
                .bind(Sentence(4..14).fake::<String>())
                .bind(is_read)
                .bind(at)
                .execute(&mut *tx)
                .await?;
                count += 1;
            }
        }
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} messages in {:?}",
        count,
        start_time.elapsed()
    );
    Ok(count)
}
