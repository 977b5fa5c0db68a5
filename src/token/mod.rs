//! Token-2022 plumbing: mint and account creation, submission, read-back
//!
//! - **instructions**: mint instruction plan and ordering check
//! - **submit**: signing and submission through a [`Ledger`](crate::ledger::Ledger)
//! - **mint**: mint creation with a permanent delegate, mint-to
//! - **accounts**: associated token accounts
//! - **state**: decoding mints and token accounts

pub mod accounts;
pub mod instructions;
pub mod mint;
pub mod state;
pub mod submit;

pub use accounts::{associated_token_address, create_token_account};
pub use instructions::{
    mint_account_len, plan_mint_instructions, sanity_check_mint_ix_order, InstructionPlan,
    MintPlanParams, MINT_EXTENSIONS,
};
pub use mint::{create_mint_with_permanent_delegate, mint_to, MintParams};
pub use state::{fetch_mint, fetch_token_account, token_balance, MintSnapshot, TokenAccountSnapshot};
pub use submit::{build_transaction, send_instructions, SigningMode};
