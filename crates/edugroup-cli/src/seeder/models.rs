//! Seed records and the knobs that size a seeding run.

use chrono::{DateTime, Utc};
use edugroup_models::{ModuleId, UserRole};

/// Seed data for creating a user.
pub struct UserSeed {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}

/// Seed data for creating a course module.
pub struct ModuleSeed {
    pub name: String,
    pub description: String,
}

/// Seed data for a project and its ordered steps.
pub struct ProjectSeed {
    pub module_id: ModuleId,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub steps: Vec<String>,
}

/// Per-module coursework sizing.
#[derive(Clone, Debug)]
pub struct CourseworkPerModule {
    pub projects: usize,
    pub steps_per_project: usize,
    pub tasks_per_project: usize,
    pub group_size: usize,
}

impl Default for CourseworkPerModule {
    fn default() -> Self {
        Self {
            projects: 2,
            steps_per_project: 4,
            tasks_per_project: 3,
            group_size: 4,
        }
    }
}

/// Complete configuration for database seeding.
#[derive(Clone, Debug)]
pub struct SeedConfig {
    pub num_teachers: usize,
    pub modules_per_teacher: usize,
    pub num_students: usize,
    pub students_per_module: usize,
    pub coursework: CourseworkPerModule,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            num_teachers: 3,
            modules_per_teacher: 2,
            num_students: 60,
            students_per_module: 20,
            coursework: CourseworkPerModule::default(),
        }
    }
}

impl SeedConfig {
    /// Creates a new seed configuration with the specified number of teachers.
    pub fn new(num_teachers: usize) -> Self {
        Self {
            num_teachers,
            ..Default::default()
        }
    }

    pub fn with_students(mut self, num_students: usize, per_module: usize) -> Self {
        self.num_students = num_students;
        self.students_per_module = per_module;
        self
    }

    pub fn with_modules(mut self, modules_per_teacher: usize) -> Self {
        self.modules_per_teacher = modules_per_teacher;
        self
    }

    pub fn with_coursework(mut self, coursework: CourseworkPerModule) -> Self {
        self.coursework = coursework;
        self
    }

    pub fn total_modules(&self) -> usize {
        self.num_teachers * self.modules_per_teacher
    }

    /// Enrolment can never exceed the student pool.
    pub fn effective_students_per_module(&self) -> usize {
        self.students_per_module.min(self.num_students)
    }
}
