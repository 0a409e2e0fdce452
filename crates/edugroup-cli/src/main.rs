use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use edugroup_cli::accounts;
use edugroup_cli::seeder::{self, CourseworkPerModule, SeedConfig};

#[derive(Parser)]
#[command(name = "edugroup-cli")]
#[command(about = "EduGroup CLI - Administrative tools for EduGroupManager", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new teacher account
    CreateTeacher {
        /// First name of the teacher
        #[arg(short = 'f', long)]
        first_name: Option<String>,

        /// Last name of the teacher
        #[arg(short = 'l', long)]
        last_name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the database with fake teachers, students, modules and coursework
    Seed {
        /// Number of teachers to create
        #[arg(short = 't', long, default_value = "3")]
        teachers: usize,

        /// Number of modules per teacher
        #[arg(short = 'm', long, default_value = "2")]
        modules: usize,

        /// Number of students to create
        #[arg(short = 's', long, default_value = "60")]
        students: usize,

        /// Number of students enrolled in each module
        #[arg(long, default_value = "20")]
        enrolled: usize,

        /// Number of projects per module
        #[arg(long, default_value = "2")]
        projects: usize,

        /// Number of tasks per project
        #[arg(long, default_value = "3")]
        tasks: usize,

        /// Number of students per group
        #[arg(long, default_value = "4")]
        group_size: usize,
    },
    /// Clear all seeded data (every @example.com account and what it owns)
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");

    let cli = Cli::parse();

    match cli.command {
        Commands::CreateTeacher {
            first_name,
            last_name,
            email,
            password,
        } => handle_create_teacher(&pool, first_name, last_name, email, password).await,
        Commands::Seed {
            teachers,
            modules,
            students,
            enrolled,
            projects,
            tasks,
            group_size,
        } => {
            let config = SeedConfig::new(teachers)
                .with_modules(modules)
                .with_students(students, enrolled)
                .with_coursework(CourseworkPerModule {
                    projects,
                    tasks_per_project: tasks,
                    group_size,
                    ..Default::default()
                });
            handle_seed(&pool, config).await
        }
        Commands::ClearSeed => handle_clear_seed(&pool).await,
    }
}

async fn handle_create_teacher(
    pool: &sqlx::postgres::PgPool,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) {
    let first_name = first_name.unwrap_or_else(|| {
        Input::new()
            .with_prompt("First name")
            .interact_text()
            .expect("Failed to read first name")
    });

    let last_name = last_name.unwrap_or_else(|| {
        Input::new()
            .with_prompt("Last name")
            .interact_text()
            .expect("Failed to read last name")
    });

    let email = email.unwrap_or_else(|| {
        Input::new()
            .with_prompt("Email address")
            .interact_text()
            .expect("Failed to read email")
    });

    let password = password.unwrap_or_else(|| {
        Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .expect("Failed to read password")
    });

    match accounts::create_teacher(pool, &first_name, &last_name, &email, &password).await {
        Ok(id) => {
            println!("\n✅ Teacher created successfully!");
            println!("   ID: {}", id);
            println!("   Email: {}", email);
            println!("   Name: {} {}", first_name, last_name);
        }
        Err(e) => {
            eprintln!("\n❌ Error creating teacher: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_seed(pool: &sqlx::postgres::PgPool, config: SeedConfig) {
    if let Err(e) = seeder::seed_all(pool, config).await {
        eprintln!("\n❌ Error seeding database: {}", e);
        std::process::exit(1);
    }
}

async fn handle_clear_seed(pool: &sqlx::postgres::PgPool) {
    if let Err(e) = seeder::clear_all(pool).await {
        eprintln!("\n❌ Error clearing seeded data: {}", e);
        std::process::exit(1);
    }
}
