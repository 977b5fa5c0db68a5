//! Wallet management module
//!
//! Obtains the payer keypair (environment, file, or freshly generated) and
//! tops it up from the cluster faucet when it runs low.

use anyhow::{Context, Result};
use solana_sdk::{
    native_token::lamports_to_sol,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};
use std::{
    io::Write,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::{info, warn};

use crate::config::WalletConfig;
use crate::ledger::Ledger;

/// Where the payer keypair came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeypairSource {
    Environment(String),
    File(PathBuf),
    Generated(PathBuf),
}

/// Wallet manager for handling the payer keypair
pub struct WalletManager {
    keypair: Arc<Keypair>,
}

impl WalletManager {
    /// Create a new wallet manager from a keypair file
    pub fn from_file(path: &str) -> Result<Self> {
        let keypair_bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read keypair file: {}", path))?;

        let keypair = if keypair_bytes.len() == 64 {
            // Raw bytes format
            keypair_from_secret(&keypair_bytes)?
        } else {
            // JSON format (solana-keygen)
            let json: Vec<u8> = serde_json::from_slice(&keypair_bytes)
                .context("Failed to parse keypair JSON")?;
            keypair_from_secret(&json)?
        };

        Ok(Self::from_keypair(keypair))
    }

    /// Parse a secret key held in an environment variable value.
    ///
    /// Accepts a JSON byte array (`[12,34,...]`) or a base58 string.
    pub fn from_secret_str(secret: &str) -> Result<Self> {
        let secret = secret.trim();
        let bytes: Vec<u8> = if secret.starts_with('[') {
            serde_json::from_str(secret).context("Failed to parse secret key JSON")?
        } else {
            bs58::decode(secret)
                .into_vec()
                .context("Failed to decode base58 secret key")?
        };
        Ok(Self::from_keypair(keypair_from_secret(&bytes)?))
    }

    /// Create a new wallet manager from a keypair
    pub fn from_keypair(keypair: Keypair) -> Self {
        Self {
            keypair: Arc::new(keypair),
        }
    }

    /// Generate a new keypair and persist it as a JSON byte array
    pub fn generate_and_persist(path: &Path) -> Result<Self> {
        let keypair = Keypair::new();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string(&keypair.to_bytes().to_vec())?;

        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        // Owner-only from creation on
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options
            .open(path)
            .with_context(|| format!("Failed to create keypair file: {}", path.display()))?;
        file.write_all(json.as_bytes())
            .with_context(|| format!("Failed to write keypair file: {}", path.display()))?;

        Ok(Self::from_keypair(keypair))
    }

    /// Obtain the payer: environment variable, then keypair file, then a
    /// newly generated keypair written to the keypair file
    pub fn load_or_create(config: &WalletConfig) -> Result<(Self, KeypairSource)> {
        if let Ok(secret) = std::env::var(&config.secret_env_var) {
            if !secret.trim().is_empty() {
                let wallet = Self::from_secret_str(&secret).with_context(|| {
                    format!("Invalid secret key in ${}", config.secret_env_var)
                })?;
                return Ok((wallet, KeypairSource::Environment(config.secret_env_var.clone())));
            }
        }

        let path = PathBuf::from(&config.keypair_path);
        if path.exists() {
            let wallet = Self::from_file(&config.keypair_path)?;
            return Ok((wallet, KeypairSource::File(path)));
        }

        warn!(path = %path.display(), "No payer keypair found, generating a new one");
        let wallet = Self::generate_and_persist(&path)?;
        Ok((wallet, KeypairSource::Generated(path)))
    }

    /// Get the public key
    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    /// Get a reference to the keypair
    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }

    /// Airdrop `airdrop_lamports` if the balance is below `min_balance`.
    /// Returns the balance after any top-up.
    pub async fn ensure_funded(
        &self,
        ledger: &dyn Ledger,
        min_balance: u64,
        airdrop_lamports: u64,
    ) -> Result<u64> {
        let pubkey = self.pubkey();
        let balance = ledger
            .get_balance(&pubkey)
            .await
            .context("Failed to read payer balance")?;

        if balance >= min_balance {
            info!(payer = %pubkey, sol = lamports_to_sol(balance), "Payer already funded");
            return Ok(balance);
        }

        info!(
            payer = %pubkey,
            sol = lamports_to_sol(balance),
            airdrop_sol = lamports_to_sol(airdrop_lamports),
            "Requesting airdrop"
        );
        let signature = ledger
            .request_airdrop(&pubkey, airdrop_lamports)
            .await
            .with_context(|| format!("Airdrop to {} failed", pubkey))?;
        let balance = ledger.get_balance(&pubkey).await?;
        info!(%signature, sol = lamports_to_sol(balance), "Airdrop confirmed");

        Ok(balance)
    }
}

impl Clone for WalletManager {
    fn clone(&self) -> Self {
        Self {
            keypair: Arc::clone(&self.keypair),
        }
    }
}

// Manual impl so the secret key never appears in debug output.
impl std::fmt::Debug for WalletManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletManager")
            .field("pubkey", &self.pubkey())
            .finish_non_exhaustive()
    }
}

fn keypair_from_secret(bytes: &[u8]) -> Result<Keypair> {
    if bytes.len() != 64 {
        anyhow::bail!("Invalid keypair length: expected 64 bytes, got {}", bytes.len());
    }
    if bytes.iter().all(|&b| b == 0) {
        anyhow::bail!("Invalid keypair: all-zero key rejected");
    }
    Keypair::try_from(bytes).context("Invalid keypair bytes")
}
