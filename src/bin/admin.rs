//! CLI administration tool for tinylink.
//!
//! Manages user accounts, shows statistics, and performs database checks
//! without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Bootstrap the first administrator
//! cargo run --bin admin -- user create-admin
//!
//! # List all users / users awaiting approval
//! cargo run --bin admin -- user list
//! cargo run --bin admin -- user pending
//!
//! # Approve an account, or grant it the ADMIN role
//! cargo run --bin admin -- user approve alice
//! cargo run --bin admin -- user promote alice
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string

use tinylink::application::services::UserService;
use tinylink::domain::entities::{NewUser, Role, User};
use tinylink::domain::repositories::{ClickRepository, ShortUrlRepository, UserRepository};
use tinylink::infrastructure::persistence::{
    PgClickRepository, PgShortUrlRepository, PgUserRepository,
};
use tinylink::utils::password::hash_password;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Password};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing tinylink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// List all users
    List,

    /// List users awaiting approval
    Pending,

    /// Approve a user account
    Approve {
        username: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Grant the ADMIN role to a user
    Promote { username: String },

    /// Create an approved administrator account
    CreateAdmin {
        #[arg(short, long)]
        username: Option<String>,

        #[arg(short, long)]
        email: Option<String>,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

struct Repos {
    users: Arc<PgUserRepository>,
    short_urls: Arc<PgShortUrlRepository>,
    clicks: Arc<PgClickRepository>,
}

impl Repos {
    fn new(pool: &PgPool) -> Self {
        let pool = Arc::new(pool.clone());
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            short_urls: Arc::new(PgShortUrlRepository::new(pool.clone())),
            clicks: Arc::new(PgClickRepository::new(pool)),
        }
    }

    fn user_service(&self) -> UserService {
        UserService::new(self.users.clone(), self.short_urls.clone())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    let repos = Repos::new(&pool);

    match cli.command {
        Commands::User { action } => handle_user_action(action, &repos).await?,
        Commands::Stats => handle_stats(&repos).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches user management commands.
async fn handle_user_action(action: UserAction, repos: &Repos) -> Result<()> {
    let service = repos.user_service();

    match action {
        UserAction::List => {
            let users = service
                .all_users()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;
            print_users("Users", &users);
        }
        UserAction::Pending => {
            let users = service
                .pending_users()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;
            print_users("Pending approval", &users);
        }
        UserAction::Approve { username, yes } => {
            if !yes
                && !Confirm::new()
                    .with_prompt(format!("Approve {username}?"))
                    .default(true)
                    .interact()?
            {
                println!("{}", "Cancelled".red());
                return Ok(());
            }

            let user = service
                .approve(&username)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to approve user: {}", e))?;
            println!("{} {}", "Approved".green().bold(), user.username.cyan());
        }
        UserAction::Promote { username } => {
            let confirmed = Confirm::new()
                .with_prompt(format!("Grant ADMIN role to {username}?"))
                .default(false)
                .interact()?;

            if !confirmed {
                println!("{}", "Cancelled".red());
                return Ok(());
            }

            let user = service
                .promote(&username)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to promote user: {}", e))?;
            println!(
                "{} {} is now {}",
                "Done:".green().bold(),
                user.username.cyan(),
                user.role.to_string().bright_yellow()
            );
        }
        UserAction::CreateAdmin { username, email } => {
            create_admin(repos.users.clone(), username, email).await?;
        }
    }

    Ok(())
}

/// Creates an approved `ADMIN` account with interactive prompts.
///
/// The password is always read interactively and never echoed.
async fn create_admin(
    users: Arc<PgUserRepository>,
    username: Option<String>,
    email: Option<String>,
) -> Result<()> {
    println!("{}", "Create administrator".bright_blue().bold());
    println!();

    let username = match username {
        Some(u) => u,
        None => Input::new().with_prompt("Username").interact_text()?,
    };

    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };

    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Repeat password", "Passwords do not match")
        .interact()?;

    if password.len() < 6 {
        anyhow::bail!("Password must be at least 6 characters");
    }

    let password_hash = hash_password(&password)?;

    let user = users
        .create(NewUser {
            email,
            username,
            password_hash,
            role: Role::Admin,
            approved: true,
            created_at: chrono::Utc::now(),
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))?;

    println!();
    println!(
        "{} {} (id {})",
        "Administrator created:".green().bold(),
        user.username.cyan(),
        user.id
    );

    Ok(())
}

/// Prints users as a table.
///
/// # Output Format
///
/// ```text
/// Users
///
///   ID  Username             Email                          Role   Approved  Created
///   ---------------------------------------------------------------------------------
///   1   alice                alice@example.com              ADMIN  yes       2025-01-15
/// ```
fn print_users(title: &str, users: &[User]) {
    println!("{}", title.bright_blue().bold());
    println!();

    if users.is_empty() {
        println!("{}", "  No users found".yellow());
        return;
    }

    println!(
        "  {:<4} {:<20} {:<30} {:<6} {:<9} {}",
        "ID".bright_white().bold(),
        "Username".bright_white().bold(),
        "Email".bright_white().bold(),
        "Role".bright_white().bold(),
        "Approved".bright_white().bold(),
        "Created".bright_white().bold()
    );
    println!("  {}", "-".repeat(85).bright_black());

    for user in users {
        let approved = if user.approved {
            "yes".green()
        } else {
            "no".red()
        };

        println!(
            "  {:<4} {:<20} {:<30} {:<6} {:<9} {}",
            user.id.to_string().bright_black(),
            user.username.cyan(),
            user.email,
            user.role.to_string(),
            approved,
            user.created_at.format("%Y-%m-%d").to_string().bright_black()
        );
    }

    println!();
    println!("  Total: {}", users.len().to_string().bright_white().bold());
    println!();
}

/// Displays system statistics.
async fn handle_stats(repos: &Repos) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let users = repos
        .users
        .list_all()
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;
    let pending = users.iter().filter(|u| !u.approved).count();

    let urls_count = repos
        .short_urls
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    let clicks_count = repos
        .clicks
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    println!(
        "  Users:       {} ({} pending)",
        users.len().to_string().bright_green().bold(),
        pending.to_string().yellow()
    );
    println!(
        "  Short URLs:  {}",
        urls_count.to_string().bright_green().bold()
    );
    println!(
        "  Clicks:      {}",
        clicks_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}
