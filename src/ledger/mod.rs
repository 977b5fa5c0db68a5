//! Ledger access
//!
//! Everything the walkthrough needs from a Solana cluster goes through the
//! [`Ledger`] trait. [`RpcLedger`] talks JSON-RPC to a real cluster; the
//! integration tests plug in an in-process bank instead.

use async_trait::async_trait;
use solana_sdk::{
    account::Account, hash::Hash, pubkey::Pubkey, signature::Signature,
    transaction::Transaction,
};

// Submodules
pub mod ledger_errors;
pub mod rpc_ledger;

// Re-exports for convenience
pub use ledger_errors::LedgerError;
pub use rpc_ledger::RpcLedger;

/// Minimal cluster surface used by the setup steps and the probes
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Human-readable endpoint, used in logs and error messages
    fn endpoint(&self) -> &str;

    async fn latest_blockhash(&self) -> Result<Hash, LedgerError>;

    async fn minimum_balance_for_rent_exemption(&self, data_len: usize)
        -> Result<u64, LedgerError>;

    /// Submit a signed transaction and wait until it reaches the ledger's
    /// commitment level
    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature, LedgerError>;

    /// Fetch an account, `None` if it does not exist
    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>, LedgerError>;

    /// Lamport balance of an address
    async fn get_balance(&self, address: &Pubkey) -> Result<u64, LedgerError>;

    /// Fund an address and wait for the funding to be confirmed
    async fn request_airdrop(&self, address: &Pubkey, lamports: u64)
        -> Result<Signature, LedgerError>;
}
