//! Transaction assembly and submission

use solana_sdk::{
    hash::Hash,
    instruction::Instruction,
    signature::{Keypair, Signature, Signer},
    transaction::Transaction,
};

use crate::ledger::{Ledger, LedgerError};

/// How strictly the transaction must be signed before submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningMode {
    /// Every required signature must be present; missing keys fail locally
    Complete,
    /// Sign what we can and leave the rest for the ledger to judge
    Partial,
}

/// Build a transaction with `payer` as fee payer and sign it with the payer
/// plus `co_signers`. Duplicate signers are collapsed.
pub fn build_transaction(
    instructions: &[Instruction],
    payer: &Keypair,
    co_signers: &[&Keypair],
    blockhash: Hash,
    mode: SigningMode,
) -> Result<Transaction, LedgerError> {
    let mut signers: Vec<&Keypair> = Vec::with_capacity(1 + co_signers.len());
    signers.push(payer);
    for signer in co_signers {
        if !signers.iter().any(|s| s.pubkey() == signer.pubkey()) {
            signers.push(signer);
        }
    }

    let mut transaction = Transaction::new_with_payer(instructions, Some(&payer.pubkey()));
    match mode {
        SigningMode::Complete => transaction.try_sign(signers.as_slice(), blockhash)?,
        SigningMode::Partial => transaction.try_partial_sign(signers.as_slice(), blockhash)?,
    }
    Ok(transaction)
}

/// Fetch a blockhash, sign, submit and wait for confirmation
pub async fn send_instructions(
    ledger: &dyn Ledger,
    instructions: &[Instruction],
    payer: &Keypair,
    co_signers: &[&Keypair],
    mode: SigningMode,
) -> Result<Signature, LedgerError> {
    let blockhash = ledger.latest_blockhash().await?;
    let transaction = build_transaction(instructions, payer, co_signers, blockhash, mode)?;
    ledger.send_and_confirm(&transaction).await
}
