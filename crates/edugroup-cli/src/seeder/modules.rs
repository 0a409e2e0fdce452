//! Course module seeding and student enrolment.

use edugroup_models::{ModuleId, UserId};
use fake::Fake;
use fake::faker::company::en::Buzzword;
use fake::faker::lorem::en::Sentence;
use rayon::prelude::*;
use sqlx::PgPool;
use std::time::Instant;

use super::models::ModuleSeed;

pub fn generate_modules(count: usize) -> Vec<ModuleSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let topic: String = Buzzword().fake();
            ModuleSeed {
                name: format!("{} {}", capitalize(&topic), 100 + idx),
                description: Sentence(6..12).fake(),
            }
        })
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Seeds `per_teacher` modules for every teacher. Returns `(module, owner)` pairs.
pub async fn seed_modules(
    db: &PgPool,
    teacher_ids: &[UserId],
    per_teacher: usize,
) -> Result<Vec<(ModuleId, UserId)>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    let total = teacher_ids.len() * per_teacher;
    println!("📚 Seeding {} modules...", total);

    let seeds = generate_modules(total);
    let mut tx = db.begin().await?;
    let mut modules = Vec::with_capacity(total);

    for (idx, seed) in seeds.iter().enumerate() {
        let teacher_id = teacher_ids[idx / per_teacher];
        let id: ModuleId = sqlx::query_scalar(
            "INSERT INTO modules (name, description, teacher_id) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&seed.name)
        .bind(&seed.description)
        .bind(teacher_id)
        .fetch_one(&mut *tx)
        .await?;
        modules.push((id, teacher_id));
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} modules in {:?}",
        modules.len(),
        start_time.elapsed()
    );
    Ok(modules)
}

/// Round-robin roster: module `m` takes `per_module` consecutive students
/// starting at offset `m * per_module`, wrapping around the pool.
pub fn build_rosters(
    module_count: usize,
    student_ids: &[UserId],
    per_module: usize,
) -> Vec<Vec<UserId>> {
    if student_ids.is_empty() {
        return vec![Vec::new(); module_count];
    }
    let per_module = per_module.min(student_ids.len());

    (0..module_count)
        .map(|m| {
            (0..per_module)
                .map(|j| student_ids[(m * per_module + j) % student_ids.len()])
                .collect()
        })
        .collect()
}

/// Enrols each roster into its module with one UNNEST insert per module.
pub async fn enroll_students(
    db: &PgPool,
    modules: &[(ModuleId, UserId)],
    rosters: &[Vec<UserId>],
) -> Result<usize, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("📝 Enrolling students...");

    let mut tx = db.begin().await?;
    let mut total = 0;

    for ((module_id, _), roster) in modules.iter().zip(rosters) {
        sqlx::query(
            "INSERT INTO module_students (module_id, student_id)
             SELECT $1, UNNEST($2::uuid[])
             ON CONFLICT DO NOTHING",
        )
        .bind(module_id)
        .bind(roster)
        .execute(&mut *tx)
        .await?;
        total += roster.len();
    }

    tx.commit().await?;

    println!(
        "   ✓ Created {} enrolments in {:?}",
        total,
        start_time.elapsed()
    );
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rosters_wrap_around_pool() {
        let students: Vec<UserId> = (0..5).map(|_| UserId::new()).collect();
        let rosters = build_rosters(3, &students, 3);

        assert_eq!(rosters.len(), 3);
        assert_eq!(rosters[0], students[0..3].to_vec());
        assert_eq!(rosters[1], vec![students[3], students[4], students[0]]);
    }

    #[test]
    fn test_rosters_never_repeat_within_module() {
        let students: Vec<UserId> = (0..4).map(|_| UserId::new()).collect();
        for roster in build_rosters(6, &students, 10) {
            let unique: std::collections::HashSet<_> = roster.iter().collect();
            assert_eq!(unique.len(), roster.len());
        }
    }

    #[test]
    fn test_rosters_with_empty_pool() {
        let rosters = build_rosters(2, &[], 5);
        assert!(rosters.iter().all(Vec::is_empty));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("systems"), "Systems");
        assert_eq!(capitalize(""), "");
    }
}
