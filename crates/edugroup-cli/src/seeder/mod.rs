//! Database seeding for local development.
//!
//! # Module Structure
//!
//! - [`users`] - Teacher and student generation with batch inserts
//! - [`modules`] - Course modules and enrolment rosters
//! - [`coursework`] - Projects with steps, tasks, groups and messages
//! - [`models`] - Seed records and sizing configuration
//!
//! # Performance
//!
//! - Parallel data generation using Rayon
//! - Batch inserts with multi-value INSERT statements
//! - Single bcrypt hash reused for all users (cost 4 for speed)

pub mod coursework;
pub mod models;
pub mod modules;
pub mod users;

pub use models::{CourseworkPerModule, SeedConfig};

use bcrypt::hash;
use edugroup_models::UserRole;
use sqlx::PgPool;
use std::time::Instant;

/// Password shared by every seeded account.
pub const SEED_PASSWORD: &str = "password123";

/// Messages seeded per module (one question and one reply each).
const MESSAGE_THREADS_PER_MODULE: usize = 3;

/// Seeds users, modules, enrolments, coursework, groups and messages.
pub async fn seed_all(db: &PgPool, config: SeedConfig) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();

    println!("🌱 Starting full database seeding...");
    println!(
        "   - Teachers: {}, modules per teacher: {}",
        config.num_teachers, config.modules_per_teacher
    );
    println!(
        "   - Students: {}, enrolled per module: {}",
        config.num_students,
        config.effective_students_per_module()
    );

    let password_hash = hash_password()?;

    let teacher_ids =
        users::seed_users(db, config.num_teachers, UserRole::Teacher, &password_hash).await?;
    let student_ids =
        users::seed_users(db, config.num_students, UserRole::Student, &password_hash).await?;

    let module_refs = modules::seed_modules(db, &teacher_ids, config.modules_per_teacher).await?;
    let rosters = modules::build_rosters(
        module_refs.len(),
        &student_ids,
        config.effective_students_per_module(),
    );
    modules::enroll_students(db, &module_refs, &rosters).await?;

    coursework::seed_projects_and_tasks(db, &module_refs, &config.coursework).await?;

    let coordinators =
        coursework::seed_groups(db, &module_refs, &rosters, config.coursework.group_size).await?;
    users::promote_coordinators(db, &coordinators).await?;

    coursework::seed_messages(db, &module_refs, &rosters, MESSAGE_THREADS_PER_MODULE).await?;

    println!(
        "\n✅ Seeding complete! Created {} teachers, {} students, {} modules in {:?}",
        teacher_ids.len(),
        student_ids.len(),
        module_refs.len(),
        start_time.elapsed()
    );
    println!("\n📝 Default password for all users: {}", SEED_PASSWORD);

    Ok(())
}

/// Clears all seeded data. Modules, coursework and messages go with their users.
pub async fn clear_all(db: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗑️  Clearing all seeded data...");

    users::clear_users(db).await?;

    println!("✅ All seeded data cleared in {:?}", start_time.elapsed());
    Ok(())
}

fn hash_password() -> Result<String, Box<dyn std::error::Error>> {
    println!("🔐 Hashing password...");
    let start = Instant::now();
    // Low cost keeps seeding fast; these accounts are throwaway.
    let hash = hash(SEED_PASSWORD, 4).map_err(|e| format!("Failed to hash password: {}", e))?;
    println!("   ✓ Hashed password in {:?}", start.elapsed());
    Ok(hash)
}
