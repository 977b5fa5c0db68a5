//! Mint creation and supply

use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
};
use spl_token_2022::instruction as token_instruction;
use tracing::debug;

use super::instructions::{mint_account_len, plan_mint_instructions, MintPlanParams, MINT_EXTENSIONS};
use super::submit::{send_instructions, SigningMode};
use crate::errors::DemoError;
use crate::ledger::Ledger;

/// Parameters of the walkthrough mint
#[derive(Debug, Clone)]
pub struct MintParams {
    pub decimals: u8,
    pub mint_authority: Pubkey,
    pub permanent_delegate: Pubkey,
}

/// Allocate the mint account, attach the permanent delegate extension and
/// initialize the mint, all in one transaction signed by `payer` and
/// `mint_keypair`
pub async fn create_mint_with_permanent_delegate(
    ledger: &dyn Ledger,
    payer: &Keypair,
    mint_keypair: &Keypair,
    params: &MintParams,
) -> Result<Signature, DemoError> {
    let space = mint_account_len(&MINT_EXTENSIONS)?;
    let lamports = ledger.minimum_balance_for_rent_exemption(space).await?;

    let plan = plan_mint_instructions(&MintPlanParams {
        payer: payer.pubkey(),
        mint: mint_keypair.pubkey(),
        mint_authority: params.mint_authority,
        permanent_delegate: params.permanent_delegate,
        decimals: params.decimals,
        space,
        lamports,
    })?;
    debug!(
        mint = %mint_keypair.pubkey(),
        space,
        lamports,
        extensions = ?plan.extensions,
        instructions = plan.instructions.len(),
        "Mint plan ready"
    );

    let signature = send_instructions(
        ledger,
        &plan.instructions,
        payer,
        &[mint_keypair],
        SigningMode::Complete,
    )
    .await?;
    Ok(signature)
}

/// Mint `amount` base units into `destination`
pub async fn mint_to(
    ledger: &dyn Ledger,
    payer: &Keypair,
    mint: &Pubkey,
    destination: &Pubkey,
    mint_authority: &Keypair,
    amount: u64,
) -> Result<Signature, DemoError> {
    let ix = token_instruction::mint_to(
        &spl_token_2022::id(),
        mint,
        destination,
        &mint_authority.pubkey(),
        &[],
        amount,
    )
    .map_err(|e| DemoError::instruction_failed("mint_to", e))?;

    let signature =
        send_instructions(ledger, &[ix], payer, &[mint_authority], SigningMode::Complete).await?;
    Ok(signature)
}
