//! Configuration module for the permanent delegate walkthrough
//!
//! This module handles configuration loading from TOML files
//! and provides structured configuration types. Every field has a default,
//! so an empty or missing file reproduces the stock devnet run.

use serde::{Deserialize, Serialize};
use solana_sdk::{commitment_config::CommitmentConfig, native_token::LAMPORTS_PER_SOL};
use std::{fmt, str::FromStr};

use crate::errors::DemoError;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Cluster connection
    #[serde(default)]
    pub cluster: ClusterConfig,

    /// Payer keypair and funding
    #[serde(default)]
    pub wallet: WalletConfig,

    /// Mint parameters
    #[serde(default)]
    pub mint: MintConfig,

    /// Probe parameters
    #[serde(default)]
    pub probe: ProbeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Cluster moniker (`devnet`, `testnet`, `mainnet-beta`, `localnet`)
    /// or a full RPC URL
    #[serde(default = "default_cluster")]
    pub name: String,

    /// Commitment level for queries and confirmation
    #[serde(default = "default_commitment")]
    pub commitment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Path to keypair file, created on first run if absent
    #[serde(default = "default_keypair_path")]
    pub keypair_path: String,

    /// Environment variable that may hold the secret key
    #[serde(default = "default_secret_env_var")]
    pub secret_env_var: String,

    /// Airdrop when the payer holds less than this
    #[serde(default = "default_min_balance")]
    pub min_balance_lamports: u64,

    /// Airdrop size
    #[serde(default = "default_airdrop")]
    pub airdrop_lamports: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintConfig {
    #[serde(default = "default_decimals")]
    pub decimals: u8,

    /// Base units minted into the source account before probing
    #[serde(default = "default_initial_supply")]
    pub initial_supply: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Base units each probe tries to move or burn
    #[serde(default = "default_probe_amount")]
    pub amount: u64,
}

// Default value functions
fn default_cluster() -> String { "devnet".to_string() }
fn default_commitment() -> String { "confirmed".to_string() }
fn default_keypair_path() -> String { "payer-keypair.json".to_string() }
fn default_secret_env_var() -> String { "PRIVATE_KEY".to_string() }
fn default_min_balance() -> u64 { LAMPORTS_PER_SOL / 2 }
fn default_airdrop() -> u64 { LAMPORTS_PER_SOL }
fn default_decimals() -> u8 { 9 }
fn default_initial_supply() -> u64 { 200 }
fn default_probe_amount() -> u64 { 100 }

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            name: default_cluster(),
            commitment: default_commitment(),
        }
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            keypair_path: default_keypair_path(),
            secret_env_var: default_secret_env_var(),
            min_balance_lamports: default_min_balance(),
            airdrop_lamports: default_airdrop(),
        }
    }
}

impl Default for MintConfig {
    fn default() -> Self {
        Self {
            decimals: default_decimals(),
            initial_supply: default_initial_supply(),
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            amount: default_probe_amount(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Check cross-field constraints before anything touches the network
    pub fn validate(&self) -> Result<(), DemoError> {
        self.cluster.cluster()?;
        self.cluster.commitment()?;

        if self.wallet.keypair_path.trim().is_empty() {
            return Err(DemoError::Configuration(
                "wallet.keypair_path must not be empty".to_string(),
            ));
        }
        if self.mint.initial_supply == 0 {
            return Err(DemoError::Configuration(
                "mint.initial_supply must be greater than zero".to_string(),
            ));
        }
        if self.probe.amount == 0 {
            return Err(DemoError::Configuration(
                "probe.amount must be greater than zero".to_string(),
            ));
        }
        if self.probe.amount > self.mint.initial_supply {
            return Err(DemoError::Configuration(format!(
                "probe.amount ({}) exceeds mint.initial_supply ({})",
                self.probe.amount, self.mint.initial_supply
            )));
        }
        Ok(())
    }
}

impl ClusterConfig {
    pub fn cluster(&self) -> Result<Cluster, DemoError> {
        self.name.parse()
    }

    pub fn rpc_url(&self) -> Result<String, DemoError> {
        Ok(self.cluster()?.url().to_string())
    }

    pub fn commitment(&self) -> Result<CommitmentConfig, DemoError> {
        match self.commitment.as_str() {
            "processed" => Ok(CommitmentConfig::processed()),
            "confirmed" => Ok(CommitmentConfig::confirmed()),
            "finalized" => Ok(CommitmentConfig::finalized()),
            other => Err(DemoError::Configuration(format!(
                "unknown commitment level '{}'",
                other
            ))),
        }
    }
}

/// Cluster selection, by moniker or explicit URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cluster {
    MainnetBeta,
    Testnet,
    Devnet,
    Localnet,
    Custom(String),
}

impl Cluster {
    /// JSON-RPC endpoint for the cluster
    pub fn url(&self) -> &str {
        match self {
            Cluster::MainnetBeta => "https://api.mainnet-beta.solana.com",
            Cluster::Testnet => "https://api.testnet.solana.com",
            Cluster::Devnet => "https://api.devnet.solana.com",
            Cluster::Localnet => "http://127.0.0.1:8899",
            Cluster::Custom(url) => url,
        }
    }
}

impl FromStr for Cluster {
    type Err = DemoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "mainnet-beta" | "mainnet" => Ok(Cluster::MainnetBeta),
            "testnet" => Ok(Cluster::Testnet),
            "devnet" => Ok(Cluster::Devnet),
            "localnet" | "localhost" => Ok(Cluster::Localnet),
            url if url.starts_with("http://") || url.starts_with("https://") => {
                Ok(Cluster::Custom(url.to_string()))
            }
            other => Err(DemoError::Configuration(format!(
                "unknown cluster '{}' (expected a moniker or http(s) URL)",
                other
            ))),
        }
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cluster::MainnetBeta => write!(f, "mainnet-beta"),
            Cluster::Testnet => write!(f, "testnet"),
            Cluster::Devnet => write!(f, "devnet"),
            Cluster::Localnet => write!(f, "localnet"),
            Cluster::Custom(url) => write!(f, "{}", url),
        }
    }
}
