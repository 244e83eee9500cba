use anyhow::Context;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;

use ridegate::cli::{NewAdmin, create_admin};
use ridegate::ridegate_auth::{Role, TokenCodec};
use ridegate::ridegate_config::{JwtConfig, LoginConfig};
use ridegate::ridegate_core::BcryptHasher;
use ridegate::ridegate_db::{PgUserRepository, init_db_pool, run_migrations};

#[derive(Parser)]
#[command(name = "ridegate-cli")]
#[command(about = "Ridegate CLI - Administrative tools for the ridegate gateway", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an administrator account (requires DATABASE_URL)
    CreateAdmin {
        /// Username
        #[arg(short = 'u', long)]
        username: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Phone number
        #[arg(long)]
        phone: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Issue a token for a known identity using JWT_SECRET
    IssueToken {
        /// Username carried as the token subject
        #[arg(short = 'u', long)]
        username: String,

        /// Numeric user id
        #[arg(short = 'i', long)]
        user_id: i64,

        /// CUSTOMER, DRIVER or ADMIN
        #[arg(short = 'r', long)]
        role: Role,
    },
    /// Verify a token and print the identity it carries
    VerifyToken {
        /// The token (will be prompted if not provided)
        token: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::CreateAdmin {
            username,
            email,
            phone,
            password,
        } => handle_create_admin(username, email, phone, password).await,
        Commands::IssueToken {
            username,
            user_id,
            role,
        } => handle_issue_token(&username, user_id, role),
        Commands::VerifyToken { token } => handle_verify_token(token),
    };

    if let Err(e) = result {
        eprintln!("\n❌ Error: {e:#}");
        std::process::exit(1);
    }
}

async fn handle_create_admin(
    username: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    // Use provided values or prompt interactively
    let username = match username {
        Some(username) => username,
        None => Input::new().with_prompt("Username").interact_text()?,
    };

    let email = match email {
        Some(email) => email,
        None => Input::new().with_prompt("Email address").interact_text()?,
    };

    let phone = match phone {
        Some(phone) => Some(phone),
        None => {
            let phone: String = Input::new()
                .with_prompt("Phone (optional)")
                .allow_empty(true)
                .interact_text()?;
            Some(phone).filter(|p| !p.trim().is_empty())
        }
    };

    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()?,
    };

    let pool = init_db_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let users = PgUserRepository::new(pool);
    let hasher = BcryptHasher::new(LoginConfig::from_env()?.password_hash_cost);

    let user = create_admin(
        &users,
        &hasher,
        NewAdmin {
            username,
            email,
            phone,
            password,
        },
    )
    .await?;

    println!("\n✅ Admin created successfully!");
    println!("   Id: {}", user.id);
    println!("   Username: {}", user.username);
    println!("   Email: {}", user.email);
    Ok(())
}

fn token_codec() -> anyhow::Result<TokenCodec> {
    let config = JwtConfig::from_env().context("Invalid JWT configuration")?;
    Ok(TokenCodec::from_config(&config))
}

fn handle_issue_token(username: &str, user_id: i64, role: Role) -> anyhow::Result<()> {
    let token = token_codec()?.issue(username, user_id, role)?;
    println!("{token}");
    Ok(())
}

fn handle_verify_token(token: Option<String>) -> anyhow::Result<()> {
    let token = match token {
        Some(token) => token,
        None => Input::new().with_prompt("Token").interact_text()?,
    };

    match token_codec()?.verify(token.trim()) {
        Ok(identity) => {
            println!("✅ Token is valid");
            println!("   User id: {}", identity.subject_id());
            println!("   Username: {}", identity.username());
            println!("   Role: {}", identity.role());
            println!("   Expires at: {}", identity.expires_at());
            Ok(())
        }
        Err(e) => anyhow::bail!("Token rejected ({}): {e}", e.kind()),
    }
}
