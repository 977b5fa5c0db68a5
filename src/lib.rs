//! Token-2022 permanent delegate walkthrough
//!
//! Creates a mint whose permanent delegate is the payer, funds a token
//! account owned by someone else, then shows that only the permanent
//! delegate can move or burn those tokens.

pub mod config;
pub mod demo;
pub mod errors;
pub mod ledger;
pub mod probe;
pub mod structured_logging;
pub mod token;
pub mod wallet;

// Re-export commonly used types
pub use demo::{DemoReport, DemoSettings, DemoSetup};
pub use errors::DemoError;
pub use ledger::{Ledger, LedgerError, RpcLedger};
pub use solana_sdk::{pubkey::Pubkey, signature::Signature};
