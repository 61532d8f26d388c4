//! ShopCart CLI - drive the storefront from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! shopcart items
//! shopcart item 42
//!
//! # Add to the cart (sends you to login first if signed out)
//! shopcart add 42 -q 2
//!
//! # Sign in; resumes wherever you were turned back from
//! SHOPCART_PASSWORD=... shopcart login -u alice
//!
//! # Review and place the order
//! shopcart cart
//! shopcart checkout
//! ```
//!
//! Session and redirect intent live in the state directory, so a login in
//! one invocation is seen by the next.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use shopcart_core::ItemId;
use shopcart_storefront::Storefront;
use shopcart_storefront::config::StorefrontConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "shopcart")]
#[command(author, version, about = "ShopCart storefront client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long, env = "SHOPCART_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account
    Signup {
        #[arg(short, long)]
        username: String,

        #[arg(short, long, env = "SHOPCART_PASSWORD", hide_env_values = true)]
        password: String,

        /// Repeat the password
        #[arg(short, long)]
        confirm: String,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List the catalog
    Items,
    /// Show one catalog item
    Item { id: i64 },
    /// Add an item to the cart
    Add {
        id: i64,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Show the cart
    Cart,
    /// Remove a line from the cart
    Remove { id: i64 },
    /// Merge duplicate cart lines
    Cleanup,
    /// Place an order for the cart
    Checkout,
    /// List past orders
    Orders,
    /// Open a storefront path such as `/cart` or `/product/42`
    Visit { path: String },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Warnings and errors become Sentry events, info and debug breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = StorefrontConfig::from_env();

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopcart_storefront=info,shopcart_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result = match config {
        Ok(config) => run(cli, &config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &StorefrontConfig) -> Result<(), CliError> {
    let storefront = Storefront::open(config)?;
    tracing::debug!(api = %config.api.base_url, "Storefront opened");

    match cli.command {
        Commands::Login { username, password } => {
            commands::account::login(&storefront, &username, &password).await?;
        }
        Commands::Signup {
            username,
            password,
            confirm,
        } => commands::account::signup(&storefront, &username, &password, &confirm).await?,
        Commands::Logout => commands::account::logout(&storefront)?,
        Commands::Whoami => commands::account::whoami(&storefront),
        Commands::Items => commands::catalog::items(&storefront).await?,
        Commands::Item { id } => commands::catalog::item(&storefront, ItemId::new(id)).await?,
        Commands::Add { id, quantity } => {
            commands::catalog::add(&storefront, ItemId::new(id), quantity).await?;
        }
        Commands::Cart => commands::cart::show(&storefront).await?,
        Commands::Remove { id } => commands::cart::remove(&storefront, ItemId::new(id)).await?,
        Commands::Cleanup => commands::cart::cleanup(&storefront).await?,
        Commands::Checkout => commands::cart::checkout(&storefront).await?,
        Commands::Orders => commands::cart::orders(&storefront).await?,
        Commands::Visit { path } => commands::visit(&storefront, &path).await?,
    }
    Ok(())
}
