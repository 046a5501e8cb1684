use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use dialoguer::{Confirm, Input, Password};
use dotenvy::dotenv;
use taskly::cli::{create_user, purge_expired_sessions};
use taskly_config::DatabaseConfig;
use taskly_db::{PgStore, init_db_pool, run_migrations};

#[derive(Parser)]
#[command(name = "taskly-cli")]
#[command(about = "Taskly CLI - Administrative tools for Taskly", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a user account
    CreateUser {
        /// Username (3-20 letters, digits, '_' or '-')
        #[arg(short = 'u', long)]
        username: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,

        /// Create the account without a password; it cannot log in
        #[arg(long, conflicts_with = "password")]
        no_password: bool,
    },
    /// Delete expired sessions
    PurgeSessions,
    /// Apply pending database migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    let pool = init_db_pool(&DatabaseConfig::from_env()?)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::CreateUser {
            username,
            email,
            password,
            no_password,
        } => {
            let store = PgStore::new(pool);
            handle_create_user(&store, username, email, password, no_password).await
        }
        Commands::PurgeSessions => {
            let store = PgStore::new(pool);
            let removed = purge_expired_sessions(&store, Utc::now()).await?;
            println!("Removed {removed} expired session(s)");
            Ok(())
        }
        Commands::Migrate => {
            run_migrations(&pool).await?;
            println!("Migrations applied");
            Ok(())
        }
    }
}

async fn handle_create_user(
    store: &PgStore,
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
    no_password: bool,
) -> anyhow::Result<()> {
    let username = match username {
        Some(username) => username,
        None => Input::<String>::new().with_prompt("Username").interact_text()?,
    };

    let email = match email {
        Some(email) => email,
        None => Input::<String>::new().with_prompt("Email address").interact_text()?,
    };

    let password = match password {
        Some(password) => Some(password),
        None if no_password => None,
        None => {
            if Confirm::new()
                .with_prompt("Set a password (required to log in)?")
                .default(true)
                .interact()?
            {
                Some(
                    Password::new()
                        .with_prompt("Password")
                        .with_confirmation("Confirm password", "Passwords don't match")
                        .interact()?,
                )
            } else {
                None
            }
        }
    };

    let user = create_user(store, &username, &email, password).await?;

    println!("User created successfully!");
    println!("   ID: {}", user.id);
    println!("   Username: {}", user.username);
    println!("   Email: {}", user.email);
    Ok(())
}
