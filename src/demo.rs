//! The walkthrough itself: setup, then the four probes
//!
//! Every setup step is fatal on error. Each step reads back what it wrote
//! before the next one starts.

use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};
use tracing::info;

use crate::config::Config;
use crate::errors::DemoError;
use crate::ledger::Ledger;
use crate::probe::{
    run_probe, AuthorityChoice, ProbeAuthority, ProbeOutcome, ProbeSpec, ProbeTarget, DEMO_PROBES,
};
use crate::structured_logging::RunContext;
use crate::token::{
    create_mint_with_permanent_delegate, create_token_account, fetch_mint, mint_to,
    token_balance, MintParams,
};

/// Numbers that drive one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoSettings {
    pub decimals: u8,
    /// Minted into the source account before probing
    pub initial_supply: u64,
    /// Moved or burned by each probe
    pub probe_amount: u64,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            decimals: 9,
            initial_supply: 200,
            probe_amount: 100,
        }
    }
}

impl From<&Config> for DemoSettings {
    fn from(config: &Config) -> Self {
        Self {
            decimals: config.mint.decimals,
            initial_supply: config.mint.initial_supply,
            probe_amount: config.probe.amount,
        }
    }
}

/// Accounts produced by setup
pub struct DemoSetup {
    pub mint: Pubkey,
    pub decimals: u8,
    /// Funded account the probes draw from
    pub source: Pubkey,
    /// Owner of `source`, generated for the run
    pub source_owner: Keypair,
    /// Payer-owned account transfers land in
    pub destination: Pubkey,
}

impl DemoSetup {
    pub fn probe_target(&self, amount: u64) -> ProbeTarget {
        ProbeTarget {
            mint: self.mint,
            source: self.source,
            destination: self.destination,
            amount,
            decimals: self.decimals,
        }
    }
}

/// Everything a finished run observed
#[derive(Debug, Clone)]
pub struct DemoReport {
    pub mint: Pubkey,
    pub source: Pubkey,
    pub destination: Pubkey,
    pub outcomes: Vec<ProbeOutcome>,
}

impl DemoReport {
    pub fn all_expected(&self) -> bool {
        self.outcomes.iter().all(ProbeOutcome::as_expected)
    }

    pub fn expected_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.as_expected()).count()
    }

    pub fn summary(&self) -> String {
        format!(
            "{}/{} probes behaved as expected",
            self.expected_count(),
            self.outcomes.len()
        )
    }

    /// Exit policy for a finished run: with `strict`, any surprising probe
    /// is an error; otherwise only setup failures count
    pub fn check(&self, strict: bool) -> Result<(), DemoError> {
        if strict && !self.all_expected() {
            return Err(DemoError::UnexpectedOutcome(self.summary()));
        }
        Ok(())
    }
}

async fn step<T>(
    ctx: &RunContext,
    name: &str,
    fut: impl std::future::Future<Output = Result<T, DemoError>>,
) -> Result<T, DemoError> {
    fut.await.inspect_err(|err| ctx.logger.log_setup_failure(name, err))
}

/// Create and verify the mint, the two token accounts and the initial supply
pub async fn setup(
    ledger: &dyn Ledger,
    payer: &Keypair,
    settings: &DemoSettings,
    ctx: &RunContext,
) -> Result<DemoSetup, DemoError> {
    let mint_keypair = Keypair::new();
    let mint = mint_keypair.pubkey();
    let params = MintParams {
        decimals: settings.decimals,
        mint_authority: payer.pubkey(),
        permanent_delegate: payer.pubkey(),
    };

    ctx.logger
        .log_step("create_mint", &format!("mint={} decimals={}", mint, settings.decimals));
    let signature = step(
        ctx,
        "create_mint",
        create_mint_with_permanent_delegate(ledger, payer, &mint_keypair, &params),
    )
    .await?;
    ctx.logger.log_tx_confirmed("create_mint", &signature);

    step(ctx, "verify_mint", verify_mint(ledger, &mint, &params)).await?;

    let source_owner = Keypair::new();
    let (source, signature) = step(
        ctx,
        "create_source_account",
        create_token_account(ledger, payer, &source_owner.pubkey(), &mint),
    )
    .await?;
    ctx.logger.log_tx_confirmed("create_source_account", &signature);
    ctx.logger
        .log_account_created("source", &source, &source_owner.pubkey());

    let (destination, signature) = step(
        ctx,
        "create_destination_account",
        create_token_account(ledger, payer, &payer.pubkey(), &mint),
    )
    .await?;
    ctx.logger.log_tx_confirmed("create_destination_account", &signature);
    ctx.logger
        .log_account_created("destination", &destination, &payer.pubkey());

    let signature = step(
        ctx,
        "mint_to",
        mint_to(ledger, payer, &mint, &source, payer, settings.initial_supply),
    )
    .await?;
    ctx.logger.log_tx_confirmed("mint_to", &signature);

    step(
        ctx,
        "verify_supply",
        verify_balance(ledger, &source, settings.initial_supply),
    )
    .await?;

    Ok(DemoSetup {
        mint,
        decimals: settings.decimals,
        source,
        source_owner,
        destination,
    })
}

async fn verify_mint(
    ledger: &dyn Ledger,
    mint: &Pubkey,
    params: &MintParams,
) -> Result<(), DemoError> {
    let snapshot = fetch_mint(ledger, mint).await?;
    if snapshot.decimals != params.decimals {
        return Err(DemoError::invalid_state(format!(
            "mint {} has {} decimals, expected {}",
            mint, snapshot.decimals, params.decimals
        )));
    }
    if snapshot.permanent_delegate != Some(params.permanent_delegate) {
        return Err(DemoError::invalid_state(format!(
            "mint {} permanent delegate is {:?}, expected {}",
            mint, snapshot.permanent_delegate, params.permanent_delegate
        )));
    }
    info!(
        %mint,
        decimals = snapshot.decimals,
        permanent_delegate = %params.permanent_delegate,
        "Mint verified"
    );
    Ok(())
}

async fn verify_balance(
    ledger: &dyn Ledger,
    account: &Pubkey,
    expected: u64,
) -> Result<(), DemoError> {
    let balance = token_balance(ledger, account).await?;
    if balance != expected {
        return Err(DemoError::invalid_state(format!(
            "token account {} holds {}, expected {}",
            account, balance, expected
        )));
    }
    info!(%account, balance, "Balance verified");
    Ok(())
}

/// Run one scripted probe against the setup accounts
pub async fn run_demo_probe(
    ledger: &dyn Ledger,
    payer: &Keypair,
    setup: &DemoSetup,
    spec: ProbeSpec,
    amount: u64,
) -> Result<ProbeOutcome, DemoError> {
    let authority = match spec.authority {
        AuthorityChoice::SourceAccount => ProbeAuthority::Unsigned(setup.source),
        AuthorityChoice::PermanentDelegate => ProbeAuthority::Signer(payer),
    };
    run_probe(
        ledger,
        payer,
        &setup.probe_target(amount),
        spec.kind,
        authority,
        spec.expectation(),
    )
    .await
}

/// Run the four probes in order, printing each result as it lands
pub async fn run_probes(
    ledger: &dyn Ledger,
    payer: &Keypair,
    setup: &DemoSetup,
    settings: &DemoSettings,
    ctx: &RunContext,
) -> Result<Vec<ProbeOutcome>, DemoError> {
    let mut outcomes = Vec::with_capacity(DEMO_PROBES.len());
    for spec in DEMO_PROBES {
        let outcome = run_demo_probe(ledger, payer, setup, spec, settings.probe_amount).await?;
        ctx.logger.log_probe(&outcome);
        outcome.print();
        outcomes.push(outcome);
    }
    Ok(outcomes)
}

/// Full walkthrough: setup then probes
pub async fn run(
    ledger: &dyn Ledger,
    payer: &Keypair,
    settings: &DemoSettings,
    ctx: &RunContext,
) -> Result<DemoReport, DemoError> {
    let setup = setup(ledger, payer, settings, ctx).await?;
    let outcomes = run_probes(ledger, payer, &setup, settings, ctx).await?;

    Ok(DemoReport {
        mint: setup.mint,
        source: setup.source,
        destination: setup.destination,
        outcomes,
    })
}
