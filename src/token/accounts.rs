//! Associated token accounts under the Token-2022 program

use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
};
use spl_associated_token_account::{
    get_associated_token_address_with_program_id, instruction::create_associated_token_account,
};

use super::submit::{send_instructions, SigningMode};
use crate::errors::DemoError;
use crate::ledger::Ledger;

/// Associated token account of `owner` for a Token-2022 `mint`
pub fn associated_token_address(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    get_associated_token_address_with_program_id(owner, mint, &spl_token_2022::id())
}

pub fn create_account_instruction(payer: &Pubkey, owner: &Pubkey, mint: &Pubkey) -> Instruction {
    create_associated_token_account(payer, owner, mint, &spl_token_2022::id())
}

/// Create the associated token account of `owner`, paid for by `payer`.
/// Returns the account address and the confirming signature.
pub async fn create_token_account(
    ledger: &dyn Ledger,
    payer: &Keypair,
    owner: &Pubkey,
    mint: &Pubkey,
) -> Result<(Pubkey, Signature), DemoError> {
    let address = associated_token_address(owner, mint);
    let ix = create_account_instruction(&payer.pubkey(), owner, mint);
    let signature = send_instructions(ledger, &[ix], payer, &[], SigningMode::Complete).await?;
    Ok((address, signature))
}
