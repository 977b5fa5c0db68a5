//! Delegate-enforcement probes
//!
//! A probe submits a single `TransferChecked` or `BurnChecked` against the
//! source account with a chosen authority and records whether the cluster
//! accepted it. The submission is the only fallible step that is caught:
//! any error, transport or on-chain, counts as a rejection.

use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
};
use spl_token_2022::instruction as token_instruction;
use std::fmt;

use crate::errors::DemoError;
use crate::ledger::{Ledger, LedgerError};
use crate::token::{send_instructions, token_balance, SigningMode};

/// What the probe tries to do with the source balance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeKind {
    Transfer,
    Burn,
}

impl ProbeKind {
    fn verb(&self) -> &'static str {
        match self {
            ProbeKind::Transfer => "transfer",
            ProbeKind::Burn => "burn",
        }
    }

    fn actor(&self) -> &'static str {
        match self {
            ProbeKind::Transfer => "transferring",
            ProbeKind::Burn => "burning",
        }
    }
}

/// Which address the walkthrough passes as authority
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorityChoice {
    /// The source token account's own address; nobody can sign for it
    SourceAccount,
    /// The mint's permanent delegate (the payer)
    PermanentDelegate,
}

impl AuthorityChoice {
    /// Only the permanent delegate is expected to get through
    pub fn expectation(&self) -> Expectation {
        match self {
            AuthorityChoice::SourceAccount => Expectation::Rejected,
            AuthorityChoice::PermanentDelegate => Expectation::Accepted,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    Accepted,
    Rejected,
}

/// One scripted attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSpec {
    pub kind: ProbeKind,
    pub authority: AuthorityChoice,
}

impl ProbeSpec {
    pub const fn new(kind: ProbeKind, authority: AuthorityChoice) -> Self {
        Self { kind, authority }
    }

    pub fn expectation(&self) -> Expectation {
        self.authority.expectation()
    }
}

/// The four probes of the walkthrough, in run order
pub const DEMO_PROBES: [ProbeSpec; 4] = [
    ProbeSpec::new(ProbeKind::Transfer, AuthorityChoice::SourceAccount),
    ProbeSpec::new(ProbeKind::Transfer, AuthorityChoice::PermanentDelegate),
    ProbeSpec::new(ProbeKind::Burn, AuthorityChoice::SourceAccount),
    ProbeSpec::new(ProbeKind::Burn, AuthorityChoice::PermanentDelegate),
];

/// Accounts and amounts a probe operates on
#[derive(Debug, Clone)]
pub struct ProbeTarget {
    pub mint: Pubkey,
    pub source: Pubkey,
    /// Receives transfers; unused by burns
    pub destination: Pubkey,
    pub amount: u64,
    pub decimals: u8,
}

/// Authority as actually submitted
#[derive(Debug, Clone, Copy)]
pub enum ProbeAuthority<'a> {
    /// Address named as authority without a matching signature
    Unsigned(Pubkey),
    /// Keypair that names itself as authority and signs
    Signer(&'a Keypair),
}

impl ProbeAuthority<'_> {
    pub fn pubkey(&self) -> Pubkey {
        match self {
            ProbeAuthority::Unsigned(pubkey) => *pubkey,
            ProbeAuthority::Signer(keypair) => keypair.pubkey(),
        }
    }
}

/// What the cluster did with the probe transaction
#[derive(Debug, Clone)]
pub enum Observed {
    Accepted(Signature),
    Rejected(LedgerError),
}

impl Observed {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Observed::Accepted(_))
    }

    /// Short form for logs
    pub fn describe(&self) -> String {
        match self {
            Observed::Accepted(signature) => format!("accepted ({})", signature),
            Observed::Rejected(err) => format!("rejected [{}]: {}", err.category(), err),
        }
    }
}

/// Result of one probe with the source balance around it
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    pub kind: ProbeKind,
    pub authority: Pubkey,
    pub expectation: Expectation,
    pub observed: Observed,
    pub source_before: u64,
    pub source_after: u64,
}

impl ProbeOutcome {
    pub fn as_expected(&self) -> bool {
        match self.expectation {
            Expectation::Accepted => self.observed.is_accepted(),
            Expectation::Rejected => !self.observed.is_accepted(),
        }
    }

    /// Base units that left the source account during the probe
    pub fn moved(&self) -> u64 {
        self.source_before.saturating_sub(self.source_after)
    }

    pub fn label(&self) -> String {
        let with = match self.expectation {
            Expectation::Accepted => "with",
            Expectation::Rejected => "without",
        };
        format!("{} {} delegate", self.kind.verb(), with)
    }

    /// Console line for this outcome
    pub fn message(&self) -> String {
        let (verb, actor) = (self.kind.verb(), self.kind.actor());
        match (self.expectation, self.as_expected()) {
            (Expectation::Rejected, true) => format!(
                "✅ - We expected this to fail because the {} account is not the delegate.",
                actor
            ),
            (Expectation::Rejected, false) => {
                format!("You should not be able to {} without the delegate.", verb)
            }
            (Expectation::Accepted, true) => format!(
                "✅ - We expected this to pass because the {} account is the delegate.",
                actor
            ),
            (Expectation::Accepted, false) => {
                format!("You should be able to {} with the delegate.", verb)
            }
        }
    }

    /// Print the console line: expected outcomes on stdout, the rest on stderr
    pub fn print(&self) {
        if self.as_expected() {
            println!("{}", self.message());
        } else {
            eprintln!("{}", self.message());
        }
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} (source {} -> {})",
            self.label(),
            self.observed.describe(),
            self.source_before,
            self.source_after
        )
    }
}

/// Build the checked instruction for a probe
pub fn probe_instruction(
    kind: ProbeKind,
    target: &ProbeTarget,
    authority: &Pubkey,
) -> Result<Instruction, DemoError> {
    let program_id = spl_token_2022::id();
    match kind {
        ProbeKind::Transfer => token_instruction::transfer_checked(
            &program_id,
            &target.source,
            &target.mint,
            &target.destination,
            authority,
            &[],
            target.amount,
            target.decimals,
        )
        .map_err(|e| DemoError::instruction_failed("transfer_checked", e)),
        ProbeKind::Burn => token_instruction::burn_checked(
            &program_id,
            &target.source,
            &target.mint,
            authority,
            &[],
            target.amount,
            target.decimals,
        )
        .map_err(|e| DemoError::instruction_failed("burn_checked", e)),
    }
}

/// Run one probe.
///
/// Balance reads around the attempt are setup-grade: their errors propagate.
/// The submission itself never fails the call; its result lands in
/// [`ProbeOutcome::observed`].
pub async fn run_probe(
    ledger: &dyn Ledger,
    payer: &Keypair,
    target: &ProbeTarget,
    kind: ProbeKind,
    authority: ProbeAuthority<'_>,
    expectation: Expectation,
) -> Result<ProbeOutcome, DemoError> {
    let authority_pubkey = authority.pubkey();
    let ix = probe_instruction(kind, target, &authority_pubkey)?;
    let source_before = token_balance(ledger, &target.source).await?;

    let co_signers: Vec<&Keypair> = match authority {
        ProbeAuthority::Signer(keypair) => vec![keypair],
        ProbeAuthority::Unsigned(_) => Vec::new(),
    };
    let observed = match send_instructions(
        ledger,
        &[ix],
        payer,
        &co_signers,
        SigningMode::Partial,
    )
    .await
    {
        Ok(signature) => Observed::Accepted(signature),
        Err(err) => Observed::Rejected(err),
    };

    let source_after = token_balance(ledger, &target.source).await?;

    Ok(ProbeOutcome {
        kind,
        authority: authority_pubkey,
        expectation,
        observed,
        source_before,
        source_after,
    })
}
