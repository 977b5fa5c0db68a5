//! Shared test harness: a [`Ledger`] over an in-process bank
//!
//! `solana-program-test` boots a bank with the SPL programs preloaded, so
//! Token-2022 and the associated token account program run for real.

#![allow(dead_code)]

use async_trait::async_trait;
use permanent_delegate_demo::{
    ledger::{Ledger, LedgerError},
    structured_logging::RunContext,
    wallet::WalletManager,
};
use solana_program_test::{BanksClient, BanksClientError, ProgramTest};
use solana_sdk::{
    account::Account,
    hash::Hash,
    native_token::LAMPORTS_PER_SOL,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    system_instruction,
    transaction::Transaction,
};

const ENDPOINT: &str = "banks://program-test";

/// [`Ledger`] backed by `BanksClient`; airdrops are paid by the genesis payer
pub struct BanksLedger {
    client: BanksClient,
    faucet: Keypair,
}

impl BanksLedger {
    pub async fn start() -> Self {
        let (client, faucet, _blockhash) = ProgramTest::default().start().await;
        Self { client, faucet }
    }
}

fn map_err(err: BanksClientError) -> LedgerError {
    match err {
        BanksClientError::TransactionError(e) => LedgerError::rejected(e),
        BanksClientError::SimulationError { err, .. } => LedgerError::rejected(err),
        other => LedgerError::Transport {
            endpoint: ENDPOINT.to_string(),
            message: other.to_string(),
        },
    }
}

#[async_trait]
impl Ledger for BanksLedger {
    fn endpoint(&self) -> &str {
        ENDPOINT
    }

    async fn latest_blockhash(&self) -> Result<Hash, LedgerError> {
        let mut client = self.client.clone();
        client.get_latest_blockhash().await.map_err(map_err)
    }

    async fn minimum_balance_for_rent_exemption(
        &self,
        data_len: usize,
    ) -> Result<u64, LedgerError> {
        let mut client = self.client.clone();
        let rent = client.get_rent().await.map_err(map_err)?;
        Ok(rent.minimum_balance(data_len))
    }

    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature, LedgerError> {
        let mut client = self.client.clone();
        client
            .process_transaction(transaction.clone())
            .await
            .map_err(map_err)?;
        Ok(transaction.signatures[0])
    }

    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>, LedgerError> {
        let mut client = self.client.clone();
        client.get_account(*address).await.map_err(map_err)
    }

    async fn get_balance(&self, address: &Pubkey) -> Result<u64, LedgerError> {
        let mut client = self.client.clone();
        client.get_balance(*address).await.map_err(map_err)
    }

    async fn request_airdrop(
        &self,
        address: &Pubkey,
        lamports: u64,
    ) -> Result<Signature, LedgerError> {
        let blockhash = self.latest_blockhash().await?;
        let transaction = Transaction::new_signed_with_payer(
            &[system_instruction::transfer(
                &self.faucet.pubkey(),
                address,
                lamports,
            )],
            Some(&self.faucet.pubkey()),
            &[&self.faucet],
            blockhash,
        );
        self.send_and_confirm(&transaction).await
    }
}

/// Fresh bank plus a funded payer
pub async fn start_with_payer() -> (BanksLedger, Keypair) {
    let ledger = BanksLedger::start().await;
    let payer = Keypair::new();
    ledger
        .request_airdrop(&payer.pubkey(), 10 * LAMPORTS_PER_SOL)
        .await
        .unwrap();
    (ledger, payer)
}

pub fn run_context() -> RunContext {
    RunContext::new(ENDPOINT)
}

pub fn wallet_for(keypair: &Keypair) -> WalletManager {
    WalletManager::from_keypair(keypair.insecure_clone())
}
