//! Read-back of mint and token account state

use solana_sdk::{account::Account, pubkey::Pubkey};
use spl_token_2022::{
    extension::{permanent_delegate::get_permanent_delegate, StateWithExtensions},
    state::{Account as TokenAccount, Mint},
};

use crate::errors::DemoError;
use crate::ledger::Ledger;

/// Decoded view of a Token-2022 mint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintSnapshot {
    pub address: Pubkey,
    pub decimals: u8,
    pub supply: u64,
    pub mint_authority: Option<Pubkey>,
    /// `None` when the mint carries no permanent delegate extension
    pub permanent_delegate: Option<Pubkey>,
}

/// Decoded view of a Token-2022 token account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAccountSnapshot {
    pub address: Pubkey,
    pub mint: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
}

fn ensure_token_2022_owned(address: &Pubkey, account: &Account) -> Result<(), DemoError> {
    if account.owner != spl_token_2022::id() {
        return Err(DemoError::invalid_state(format!(
            "{} is owned by {}, not the Token-2022 program",
            address, account.owner
        )));
    }
    Ok(())
}

pub fn decode_mint(address: &Pubkey, account: &Account) -> Result<MintSnapshot, DemoError> {
    ensure_token_2022_owned(address, account)?;
    let state = StateWithExtensions::<Mint>::unpack(&account.data).map_err(|e| {
        DemoError::invalid_state(format!("{} is not a Token-2022 mint: {}", address, e))
    })?;

    Ok(MintSnapshot {
        address: *address,
        decimals: state.base.decimals,
        supply: state.base.supply,
        mint_authority: state.base.mint_authority.into(),
        permanent_delegate: get_permanent_delegate(&state),
    })
}

pub fn decode_token_account(
    address: &Pubkey,
    account: &Account,
) -> Result<TokenAccountSnapshot, DemoError> {
    ensure_token_2022_owned(address, account)?;
    let state = StateWithExtensions::<TokenAccount>::unpack(&account.data).map_err(|e| {
        DemoError::invalid_state(format!("{} is not a Token-2022 account: {}", address, e))
    })?;

    Ok(TokenAccountSnapshot {
        address: *address,
        mint: state.base.mint,
        owner: state.base.owner,
        amount: state.base.amount,
    })
}

pub async fn fetch_mint(ledger: &dyn Ledger, address: &Pubkey) -> Result<MintSnapshot, DemoError> {
    let account = ledger
        .get_account(address)
        .await?
        .ok_or_else(|| DemoError::invalid_state(format!("mint {} not found", address)))?;
    decode_mint(address, &account)
}

pub async fn fetch_token_account(
    ledger: &dyn Ledger,
    address: &Pubkey,
) -> Result<TokenAccountSnapshot, DemoError> {
    let account = ledger
        .get_account(address)
        .await?
        .ok_or_else(|| DemoError::invalid_state(format!("token account {} not found", address)))?;
    decode_token_account(address, &account)
}

/// Balance of a token account in base units
pub async fn token_balance(ledger: &dyn Ledger, address: &Pubkey) -> Result<u64, DemoError> {
    Ok(fetch_token_account(ledger, address).await?.amount)
}
