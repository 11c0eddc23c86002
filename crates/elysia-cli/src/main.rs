use anyhow::Context;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use sqlx::PgPool;

use elysia_cli::admin::create_admin;
use elysia_cli::seeder::{self, SeedConfig};
use elysia_db::{init_db_pool, run_migrations};
use elysia_models::admins::CreateAdminRequest;

#[derive(Parser)]
#[command(name = "elysia-cli")]
#[command(about = "Elysia CLI - Administrative tools for Elysia", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an enabled admin account
    CreateAdmin {
        /// Login name (3-128 chars of letters, digits, `_`, `.`, `-`)
        #[arg(short = 'u', long)]
        username: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Mobile phone number, enables phone login
        #[arg(long)]
        phone: Option<String>,

        /// Display name
        #[arg(short = 'n', long)]
        real_name: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the database with fake students, teachers and subjects
    Seed {
        #[arg(long, default_value = "200")]
        students: usize,

        #[arg(long, default_value = "20")]
        teachers: usize,

        #[arg(long, default_value = "12")]
        subjects: usize,

        /// Password for every seeded account
        #[arg(long, default_value = "Password@123")]
        password: String,
    },
    /// Remove all seeded rows
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("\n❌ Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = init_db_pool(&database_url, 5)
        .await
        .context("failed to connect to database")?;
    run_migrations(&pool)
        .await
        .context("failed to run database migrations")?;

    match cli.command {
        Commands::CreateAdmin {
            username,
            email,
            phone,
            real_name,
            password,
        } => handle_create_admin(&pool, username, email, phone, real_name, password).await,
        Commands::Seed {
            students,
            teachers,
            subjects,
            password,
        } => {
            let config = SeedConfig {
                students,
                teachers,
                subjects,
                password,
            };
            seeder::seed_all(&pool, config).await
        }
        Commands::ClearSeed => seeder::clear_all(&pool).await.map(|_| ()),
    }
}

fn prompt(label: &str, value: Option<String>) -> anyhow::Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Input::new()
            .with_prompt(label)
            .interact_text()
            .with_context(|| format!("failed to read {label}")),
    }
}

async fn handle_create_admin(
    pool: &PgPool,
    username: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    real_name: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let username = prompt("Username", username)?;
    let email = prompt("Email address", email)?;
    let password = match password {
        Some(p) => p,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .context("failed to read password")?,
    };

    let request = CreateAdminRequest {
        username: username.clone(),
        password,
        email: email.clone(),
        phone_number: phone,
        real_name,
        role: None,
        remark: Some("created from CLI".into()),
    };
    let admin_id = create_admin(pool, request).await?;

    println!("\n✅ Admin created successfully!");
    println!("   ID: {admin_id}");
    println!("   Username: {username}");
    println!("   Email: {email}");
    Ok(())
}
