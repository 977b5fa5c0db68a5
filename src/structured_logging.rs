//! Structured logging and run context

use solana_sdk::{pubkey::Pubkey, signature::Signature};
use uuid::Uuid;

use crate::errors::DemoError;
use crate::probe::ProbeOutcome;

/// Structured logger for walkthrough events
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    run_id: String,
}

impl StructuredLogger {
    pub fn new(run_id: String) -> Self {
        Self { run_id }
    }

    pub fn log_step(&self, step: &str, detail: &str) {
        tracing::info!(
            run_id = %self.run_id,
            step = %step,
            detail = %detail,
            "Setup step"
        );
    }

    pub fn log_tx_confirmed(&self, step: &str, signature: &Signature) {
        tracing::info!(
            run_id = %self.run_id,
            step = %step,
            signature = %signature,
            "Transaction confirmed"
        );
    }

    pub fn log_account_created(&self, role: &str, address: &Pubkey, owner: &Pubkey) {
        tracing::info!(
            run_id = %self.run_id,
            role = %role,
            address = %address,
            owner = %owner,
            "Token account created"
        );
    }

    pub fn log_setup_failure(&self, step: &str, error: &DemoError) {
        tracing::error!(
            run_id = %self.run_id,
            step = %step,
            category = %error.category(),
            error = %error,
            "Setup step failed"
        );
    }

    pub fn log_probe(&self, outcome: &ProbeOutcome) {
        if outcome.as_expected() {
            tracing::info!(
                run_id = %self.run_id,
                probe = %outcome.label(),
                observed = %outcome.observed.describe(),
                source_before = outcome.source_before,
                source_after = outcome.source_after,
                "Probe matched expectation"
            );
        } else {
            tracing::warn!(
                run_id = %self.run_id,
                probe = %outcome.label(),
                observed = %outcome.observed.describe(),
                source_before = outcome.source_before,
                source_after = outcome.source_after,
                "Probe did not match expectation"
            );
        }
    }
}

/// Context for one walkthrough run
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Unique run ID, attached to every structured event
    pub run_id: String,

    /// Endpoint the run talks to
    pub endpoint: String,

    /// Unix timestamp of the run start
    pub started_at: u64,

    /// Structured logger instance
    pub logger: StructuredLogger,
}

impl RunContext {
    pub fn new(endpoint: &str) -> Self {
        let started_at = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();

        let run_id = Uuid::new_v4().to_string();

        Self {
            run_id: run_id.clone(),
            endpoint: endpoint.to_string(),
            started_at,
            logger: StructuredLogger::new(run_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_ids_are_unique() {
        let a = RunContext::new("http://127.0.0.1:8899");
        let b = RunContext::new("http://127.0.0.1:8899");

        assert_ne!(a.run_id, b.run_id);
        assert_eq!(a.endpoint, "http://127.0.0.1:8899");
        assert!(a.started_at > 0);
    }
}
