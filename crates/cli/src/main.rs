//! Shopfront CLI - terminal front-end for the storefront and admin console.
//!
//! # Usage
//!
//! ```bash
//! # Sign in; the session is kept in SHOPFRONT_SESSION_FILE
//! shopfront login -u alice -p secret
//!
//! # Browse and buy
//! shopfront products list --category Books
//! shopfront cart add 65f1a2b3c4d5e6f7a8b9c0d1
//! shopfront cart update 65f1a2b3c4d5e6f7a8b9c0d1 2
//! shopfront cart checkout --address "221B Baker Street"
//!
//! # Administer (admin accounts only)
//! shopfront admin dashboard
//! shopfront admin order-status 65f1a2b3c4d5e6f7a8b9c0d1 shipped
//! ```
//!
//! # Commands
//!
//! - `login`, `logout`, `register`, `forgot-password`, `whoami` - Account
//! - `route` - Show how a client route resolves for the current session
//! - `products` - Catalog browsing and admin product management
//! - `cart` - Cart and checkout
//! - `admin` - Dashboard, users, orders and product statistics

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use shopfront_storefront::config::{ClientConfig, LogFormat};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod render;

use commands::{CliError, Context};

#[derive(Parser)]
#[command(name = "shopfront")]
#[command(author, version, about = "Shopfront storefront and admin console")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,
    },
    /// Sign out and clear the stored session
    Logout,
    /// Create an account
    Register {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },
    /// Reset a password with the recovery answer
    ForgotPassword {
        #[arg(short, long)]
        username: String,

        /// Recovery answer set at registration
        #[arg(long)]
        help_text: String,

        #[arg(short = 'p', long)]
        new_password: String,
    },
    /// Show the signed-in user
    Whoami,
    /// Resolve a client route (e.g. `/admin/users`) for the current session
    Route { path: String },
    /// Browse and manage products
    Products {
        #[command(subcommand)]
        action: commands::products::ProductAction,
    },
    /// View and check out the cart
    Cart {
        #[command(subcommand)]
        action: commands::cart::CartAction,
    },
    /// Admin console
    Admin {
        #[command(subcommand)]
        action: commands::admin::AdminAction,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(LogFormat::Text);
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };
    init_tracing(config.log_format);

    if let Err(e) = run(cli, config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

/// Log to stderr so command output on stdout stays clean.
///
/// Defaults to warnings only if `RUST_LOG` is not set.
fn init_tracing(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into());

    let json = format == LogFormat::Json;
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

async fn run(cli: Cli, config: ClientConfig) -> Result<(), CliError> {
    let ctx = Context::new(config)?;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Login { username, password } => {
            commands::auth::login(&ctx, &mut out, username, password).await
        }
        Commands::Logout => commands::auth::logout(&ctx, &mut out),
        Commands::Register {
            username,
            email,
            password,
        } => commands::auth::register(&ctx, &mut out, username, email, password).await,
        Commands::ForgotPassword {
            username,
            help_text,
            new_password,
        } => {
            commands::auth::forgot_password(&ctx, &mut out, username, help_text, new_password)
                .await
        }
        Commands::Whoami => commands::auth::whoami(&ctx, &mut out),
        Commands::Route { path } => commands::auth::route(&ctx, &mut out, &path),
        Commands::Products { action } => commands::products::run(&ctx, &mut out, action).await,
        Commands::Cart { action } => commands::cart::run(&ctx, &mut out, action).await,
        Commands::Admin { action } => commands::admin::run(&ctx, &mut out, action).await,
    }
}
