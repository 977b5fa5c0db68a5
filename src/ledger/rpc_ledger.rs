//! JSON-RPC backed ledger

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    account::Account, commitment_config::CommitmentConfig, hash::Hash, pubkey::Pubkey,
    signature::Signature, transaction::Transaction,
};
use tracing::debug;

use super::{Ledger, LedgerError};

/// [`Ledger`] over a cluster's JSON-RPC endpoint
pub struct RpcLedger {
    client: RpcClient,
    endpoint: String,
}

impl RpcLedger {
    /// Open a connection handle; no request is made until the first call
    pub fn new(url: impl Into<String>, commitment: CommitmentConfig) -> Self {
        let endpoint = url.into();
        let client = RpcClient::new_with_commitment(endpoint.clone(), commitment);
        Self { client, endpoint }
    }

    /// Commitment used for queries and confirmation
    pub fn commitment(&self) -> CommitmentConfig {
        self.client.commitment()
    }

    fn map_err(&self, err: solana_client::client_error::ClientError) -> LedgerError {
        LedgerError::from_client_error(&self.endpoint, err)
    }
}

impl std::fmt::Debug for RpcLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcLedger")
            .field("endpoint", &self.endpoint)
            .field("commitment", &self.client.commitment().commitment)
            .finish()
    }
}

#[async_trait]
impl Ledger for RpcLedger {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn latest_blockhash(&self) -> Result<Hash, LedgerError> {
        self.client
            .get_latest_blockhash()
            .await
            .map_err(|e| self.map_err(e))
    }

    async fn minimum_balance_for_rent_exemption(
        &self,
        data_len: usize,
    ) -> Result<u64, LedgerError> {
        self.client
            .get_minimum_balance_for_rent_exemption(data_len)
            .await
            .map_err(|e| self.map_err(e))
    }

    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature, LedgerError> {
        let signature = self
            .client
            .send_and_confirm_transaction(transaction)
            .await
            .map_err(|e| self.map_err(e))?;
        debug!(endpoint = %self.endpoint, %signature, "Transaction confirmed");
        Ok(signature)
    }

    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>, LedgerError> {
        let response = self
            .client
            .get_account_with_commitment(address, self.client.commitment())
            .await
            .map_err(|e| self.map_err(e))?;
        Ok(response.value)
    }

    async fn get_balance(&self, address: &Pubkey) -> Result<u64, LedgerError> {
        self.client
            .get_balance(address)
            .await
            .map_err(|e| self.map_err(e))
    }

    async fn request_airdrop(
        &self,
        address: &Pubkey,
        lamports: u64,
    ) -> Result<Signature, LedgerError> {
        let signature = self
            .client
            .request_airdrop(address, lamports)
            .await
            .map_err(|e| self.map_err(e))?;
        self.client
            .poll_for_signature_with_commitment(&signature, self.client.commitment())
            .await
            .map_err(|e| self.map_err(e))?;
        Ok(signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    #[tokio::test]
    async fn test_rent_exemption_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(
                json!({ "method": "getMinimumBalanceForRentExemption" }),
            ))
            .with_header("content-type", "application/json")
            .with_body(json!({ "jsonrpc": "2.0", "result": 2_519_520u64, "id": 1 }).to_string())
            .create_async()
            .await;

        let ledger = RpcLedger::new(server.url(), CommitmentConfig::confirmed());
        let lamports = ledger.minimum_balance_for_rent_exemption(234).await.unwrap();

        assert_eq!(lamports, 2_519_520);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_balance_query() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({ "method": "getBalance" })))
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "jsonrpc": "2.0",
                    "result": { "context": { "slot": 42 }, "value": 1_000_000_000u64 },
                    "id": 1
                })
                .to_string(),
            )
            .create_async()
            .await;

        let ledger = RpcLedger::new(server.url(), CommitmentConfig::confirmed());
        let balance = ledger.get_balance(&Pubkey::new_unique()).await.unwrap();

        assert_eq!(balance, 1_000_000_000);
    }

    #[tokio::test]
    async fn test_rpc_error_is_classified() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "jsonrpc": "2.0",
                    "error": { "code": -32602, "message": "Invalid param: WrongSize" },
                    "id": 1
                })
                .to_string(),
            )
            .create_async()
            .await;

        let ledger = RpcLedger::new(server.url(), CommitmentConfig::confirmed());
        let err = ledger.get_balance(&Pubkey::new_unique()).await.unwrap_err();

        match err {
            LedgerError::RpcResponse { code, endpoint, .. } => {
                assert_eq!(code, Some(-32602));
                assert_eq!(endpoint, server.url());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_commitment_is_kept() {
        let ledger = RpcLedger::new("http://127.0.0.1:8899", CommitmentConfig::finalized());
        assert_eq!(ledger.commitment(), CommitmentConfig::finalized());
        assert_eq!(ledger.endpoint(), "http://127.0.0.1:8899");
    }
}
