//! Token-2022 permanent delegate walkthrough
//!
//! Connects to a cluster, makes sure the payer is funded, creates a mint
//! with the payer as permanent delegate and runs four transfer/burn probes
//! to show who may move tokens out of someone else's account.

// Compiler warning configuration
#![deny(unused_imports)]
#![deny(unused_mut)]
#![deny(unused_variables)]
#![warn(unused_must_use)]

use anyhow::{Context, Result};
use clap::Parser;
use solana_sdk::native_token::lamports_to_sol;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use permanent_delegate_demo::{
    config::Config,
    demo::{self, DemoSettings},
    ledger::{Ledger, RpcLedger},
    structured_logging::RunContext,
    wallet::WalletManager,
};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "demo.toml")]
    config: String,

    /// Cluster moniker or RPC URL, overrides the config file
    #[arg(long, env = "SOLANA_CLUSTER")]
    cluster: Option<String>,

    /// Payer keypair file, overrides the config file
    #[arg(short, long, env = "PAYER_KEYPAIR")]
    keypair: Option<String>,

    /// Exit non-zero if any probe does not behave as expected
    #[arg(long)]
    strict: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env first so clap's env fallbacks see it
    dotenvy::dotenv().ok();
    let args = Args::parse();

    init_logging(args.verbose, args.json_logs)?;

    info!("🚀 Permanent delegate walkthrough");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut config = load_config(&args.config)?;
    if let Some(cluster) = args.cluster {
        config.cluster.name = cluster;
    }
    if let Some(keypair) = args.keypair {
        config.wallet.keypair_path = keypair;
    }
    config.validate().context("Invalid configuration")?;

    // Connection bootstrap
    let url = config.cluster.rpc_url()?;
    let commitment = config.cluster.commitment()?;
    info!("🌐 Cluster: {} ({:?})", url, commitment.commitment);
    let ledger = RpcLedger::new(url, commitment);
    let ctx = RunContext::new(ledger.endpoint());
    info!(
        run_id = %ctx.run_id,
        endpoint = %ctx.endpoint,
        started_at = ctx.started_at,
        "Run started"
    );

    // Signer acquisition
    let (wallet, source) =
        WalletManager::load_or_create(&config.wallet).context("Failed to load payer keypair")?;
    info!("🔑 Payer: {} ({:?})", wallet.pubkey(), source);
    let balance = wallet
        .ensure_funded(
            &ledger,
            config.wallet.min_balance_lamports,
            config.wallet.airdrop_lamports,
        )
        .await
        .context("Failed to fund payer")?;
    info!("💼 Payer balance: {} SOL", lamports_to_sol(balance));

    let settings = DemoSettings::from(&config);
    let report = demo::run(&ledger, wallet.keypair(), &settings, &ctx)
        .await
        .context("Walkthrough setup failed")?;

    info!("Mint: {}", report.mint);
    info!("Source account: {}", report.source);
    info!("Destination account: {}", report.destination);
    println!("{}", report.summary());

    report.check(args.strict)?;

    Ok(())
}

/// Initialize logging subsystem
fn init_logging(verbose: bool, json: bool) -> Result<()> {
    let env_filter = if verbose {
        "permanent_delegate_demo=debug,info"
    } else {
        "permanent_delegate_demo=info,warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| env_filter.into());

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()?;
    }

    Ok(())
}

/// Load configuration from file with fallback to defaults
fn load_config(path: &str) -> Result<Config> {
    if std::path::Path::new(path).exists() {
        Config::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path))
    } else {
        warn!("Config file '{}' not found, using defaults", path);
        Ok(Config::default())
    }
}
