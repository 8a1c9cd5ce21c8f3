//! # checkout
//!
//! Drives one checkout attempt from the terminal against a real
//! session endpoint.
//!
//! ## Usage
//!
//! ```bash
//! export STRIPE_PUBLISHABLE_KEY=pk_test_...
//!
//! # Redirect variant against a local shop
//! checkout --cart cart.toml --base-url http://localhost:8000
//!
//! # Embedded variant
//! checkout --variant embedded
//! ```

mod cart_file;
mod console;

use checkout_core::{
    Activation, CheckoutConfig, CheckoutController, CheckoutInitiator, CheckoutVariant, Handoff,
};
use checkout_http::HttpSessionTransport;
use clap::{Parser, ValueEnum};
use console::{ConsoleSdk, StderrNotifier};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Variant {
    Embedded,
    Redirect,
}

impl From<Variant> for CheckoutVariant {
    fn from(v: Variant) -> Self {
        match v {
            Variant::Embedded => CheckoutVariant::Embedded,
            Variant::Redirect => CheckoutVariant::Redirect,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "checkout", version, about = "Start a checkout session from the terminal")]
struct Cli {
    /// TOML file with [[rows]] entries (id, quantity)
    #[arg(long, default_value = "cart.toml")]
    cart: PathBuf,

    /// Origin that serves the session endpoint
    #[arg(long, env = "CHECKOUT_BASE_URL", default_value = "http://localhost:8000")]
    base_url: String,

    /// Session endpoint path or URL
    #[arg(long, env = "CHECKOUT_ENDPOINT")]
    endpoint: Option<String>,

    #[arg(long, value_enum, default_value_t = Variant::Redirect)]
    variant: Variant,

    /// Publishable key (pk_test_... or pk_live_...)
    #[arg(long, env = "STRIPE_PUBLISHABLE_KEY")]
    publishable_key: Option<String>,

    /// Give up on the session request after this many seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Emit logs as JSON lines
    #[arg(long, env = "CHECKOUT_LOG_JSON")]
    log_json: bool,
}

fn build_config(cli: &Cli) -> CheckoutConfig {
    let mut config = CheckoutConfig::from_env();
    if let Some(endpoint) = &cli.endpoint {
        config = config.with_endpoint(endpoint);
    }
    if let Some(key) = &cli.publishable_key {
        config = config.with_publishable_key(key);
    }
    config
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize logging
    let env_filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();
    if cli.log_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let config = build_config(&cli);
    let rows = cart_file::load_cart(&cli.cart)?;

    let transport = match cli.timeout_secs {
        Some(secs) => HttpSessionTransport::with_timeout(&cli.base_url, Duration::from_secs(secs))?,
        None => HttpSessionTransport::new(&cli.base_url)?,
    };

    let variant = CheckoutVariant::from(cli.variant);
    info!("Variant: {}", variant);
    info!("Session endpoint: {}", transport.resolve(&config.endpoint));
    if config.is_test_mode() {
        info!("Using Stripe test key");
    }

    let initiator = CheckoutInitiator::new(
        variant,
        config,
        Box::new(rows),
        Box::new(transport),
        Box::new(ConsoleSdk),
    );
    let controller = CheckoutController::new(initiator, Box::new(StderrNotifier));

    match controller.activate().await {
        Activation::Completed(outcome) => {
            match outcome.handoff {
                Handoff::Navigating { session_id } => info!("Checkout session {} ready", session_id),
                Handoff::Mounted { container } => info!("Embedded checkout mounted in {}", container),
            }
            Ok(ExitCode::SUCCESS)
        }
        Activation::Failed(_) => Ok(ExitCode::FAILURE),
        Activation::Ignored => Ok(ExitCode::FAILURE),
    }
}
