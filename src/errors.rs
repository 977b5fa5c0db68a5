//! Error types for the walkthrough
//!
//! Setup steps return [`DemoError`] and are fatal: `main` attaches context
//! and exits non-zero. Probe submissions are the one place an error is
//! caught and turned into an outcome instead.

use solana_sdk::program_error::ProgramError;
use thiserror::Error;

use crate::ledger::LedgerError;

/// Error type for every setup and verification step
#[derive(Error, Debug)]
pub enum DemoError {
    /// Ledger access failed or the cluster rejected a setup transaction
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// An SPL instruction builder refused its inputs
    #[error("Instruction build error (step={step}): {reason}")]
    InstructionBuild {
        /// Setup step the instruction belongs to
        step: String,
        /// Detailed reason for the failure
        reason: String,
    },

    /// Instructions are out of the order the Token-2022 program requires
    #[error("Invalid instruction order: {0}")]
    InvalidInstructionOrder(String),

    /// Read-back of on-chain state did not match what was just written
    #[error("Unexpected on-chain state: {0}")]
    InvalidState(String),

    /// Configuration or validation error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A strict run saw at least one probe behave differently than expected
    #[error("Unexpected probe outcome: {0}")]
    UnexpectedOutcome(String),
}

impl DemoError {
    /// Get the error category for structured logs
    pub fn category(&self) -> &'static str {
        match self {
            Self::Ledger(inner) => inner.category(),
            Self::InstructionBuild { .. } => "instruction",
            Self::InvalidInstructionOrder(_) => "validation",
            Self::InvalidState(_) => "state",
            Self::Configuration(_) => "config",
            Self::UnexpectedOutcome(_) => "probe",
        }
    }
}

// Convenience constructors for common error scenarios
impl DemoError {
    /// Create an instruction build error for a specific step
    pub fn instruction_failed(step: impl Into<String>, err: ProgramError) -> Self {
        Self::InstructionBuild {
            step: step.into(),
            reason: err.to_string(),
        }
    }

    /// Create an invalid instruction order error
    pub fn invalid_order(reason: impl Into<String>) -> Self {
        Self::InvalidInstructionOrder(reason.into())
    }

    /// Create an on-chain state mismatch error
    pub fn invalid_state(reason: impl Into<String>) -> Self {
        Self::InvalidState(reason.into())
    }
}
