//! Integration tests for the permanent delegate walkthrough
//!
//! These run against an in-process bank with the real Token-2022 program:
//! - mint creation with the permanent delegate extension
//! - rejection of non-delegate authorities with balances untouched
//! - delegate transfers and burns
//! - the full four-probe run, twice

mod common;

use common::{run_context, start_with_payer, wallet_for, BanksLedger};
use permanent_delegate_demo::{
    demo::{self, DemoSettings},
    ledger::Ledger,
    probe::{run_probe, Expectation, ProbeAuthority, ProbeKind, DEMO_PROBES},
    token::{fetch_mint, fetch_token_account, token_balance},
};
use solana_sdk::{
    native_token::LAMPORTS_PER_SOL,
    signature::{Keypair, Signer},
};

#[tokio::test]
async fn test_setup_creates_delegated_mint() {
    let (ledger, payer) = start_with_payer().await;
    let ctx = run_context();

    let setup = demo::setup(&ledger, &payer, &DemoSettings::default(), &ctx)
        .await
        .unwrap();

    let mint = fetch_mint(&ledger, &setup.mint).await.unwrap();
    assert_eq!(mint.decimals, 9);
    assert_eq!(mint.permanent_delegate, Some(payer.pubkey()));
    assert_eq!(mint.mint_authority, Some(payer.pubkey()));
    assert_eq!(mint.supply, 200);
}

#[tokio::test]
async fn test_setup_funds_source_only() {
    let (ledger, payer) = start_with_payer().await;
    let ctx = run_context();

    let setup = demo::setup(&ledger, &payer, &DemoSettings::default(), &ctx)
        .await
        .unwrap();

    let source = fetch_token_account(&ledger, &setup.source).await.unwrap();
    assert_eq!(source.amount, 200);
    assert_eq!(source.mint, setup.mint);
    assert_eq!(source.owner, setup.source_owner.pubkey());
    assert_ne!(source.owner, payer.pubkey());

    let destination = fetch_token_account(&ledger, &setup.destination)
        .await
        .unwrap();
    assert_eq!(destination.amount, 0);
    assert_eq!(destination.owner, payer.pubkey());
}

#[tokio::test]
async fn test_source_address_cannot_authorize() {
    let (ledger, payer) = start_with_payer().await;
    let ctx = run_context();
    let setup = demo::setup(&ledger, &payer, &DemoSettings::default(), &ctx)
        .await
        .unwrap();
    let target = setup.probe_target(100);

    for kind in [ProbeKind::Transfer, ProbeKind::Burn] {
        let outcome = run_probe(
            &ledger,
            &payer,
            &target,
            kind,
            ProbeAuthority::Unsigned(setup.source),
            Expectation::Rejected,
        )
        .await
        .unwrap();

        assert!(outcome.as_expected(), "{}", outcome);
        assert!(!outcome.observed.is_accepted());
        assert_eq!(outcome.moved(), 0);
    }

    assert_eq!(token_balance(&ledger, &setup.source).await.unwrap(), 200);
    assert_eq!(token_balance(&ledger, &setup.destination).await.unwrap(), 0);
    assert_eq!(fetch_mint(&ledger, &setup.mint).await.unwrap().supply, 200);
}

#[tokio::test]
async fn test_impostor_signer_is_rejected_on_chain() {
    let (ledger, payer) = start_with_payer().await;
    let ctx = run_context();
    let setup = demo::setup(&ledger, &payer, &DemoSettings::default(), &ctx)
        .await
        .unwrap();
    let impostor = Keypair::new();

    let outcome = run_probe(
        &ledger,
        &payer,
        &setup.probe_target(100),
        ProbeKind::Transfer,
        ProbeAuthority::Signer(&impostor),
        Expectation::Rejected,
    )
    .await
    .unwrap();

    assert!(outcome.as_expected());
    match &outcome.observed {
        permanent_delegate_demo::probe::Observed::Rejected(err) => {
            assert!(err.is_on_chain_rejection(), "unexpected error: {}", err)
        }
        other => panic!("impostor transfer was accepted: {:?}", other),
    }
    assert_eq!(token_balance(&ledger, &setup.source).await.unwrap(), 200);
}

#[tokio::test]
async fn test_delegate_transfer_moves_exact_amount() {
    let (ledger, payer) = start_with_payer().await;
    let ctx = run_context();
    let setup = demo::setup(&ledger, &payer, &DemoSettings::default(), &ctx)
        .await
        .unwrap();

    let outcome = run_probe(
        &ledger,
        &payer,
        &setup.probe_target(100),
        ProbeKind::Transfer,
        ProbeAuthority::Signer(&payer),
        Expectation::Accepted,
    )
    .await
    .unwrap();

    assert!(outcome.as_expected(), "{}", outcome);
    assert_eq!(outcome.source_before, 200);
    assert_eq!(outcome.source_after, 100);
    assert_eq!(token_balance(&ledger, &setup.destination).await.unwrap(), 100);
    assert_eq!(fetch_mint(&ledger, &setup.mint).await.unwrap().supply, 200);
}

#[tokio::test]
async fn test_owner_keeps_transfer_rights() {
    let (ledger, payer) = start_with_payer().await;
    let ctx = run_context();
    let setup = demo::setup(&ledger, &payer, &DemoSettings::default(), &ctx)
        .await
        .unwrap();

    let outcome = run_probe(
        &ledger,
        &payer,
        &setup.probe_target(50),
        ProbeKind::Transfer,
        ProbeAuthority::Signer(&setup.source_owner),
        Expectation::Accepted,
    )
    .await
    .unwrap();

    assert!(outcome.as_expected(), "{}", outcome);
    assert_eq!(outcome.moved(), 50);
    assert_eq!(token_balance(&ledger, &setup.destination).await.unwrap(), 50);
}

#[tokio::test]
async fn test_delegate_burn_reduces_supply() {
    let (ledger, payer) = start_with_payer().await;
    let ctx = run_context();
    let setup = demo::setup(&ledger, &payer, &DemoSettings::default(), &ctx)
        .await
        .unwrap();

    let outcome = run_probe(
        &ledger,
        &payer,
        &setup.probe_target(100),
        ProbeKind::Burn,
        ProbeAuthority::Signer(&payer),
        Expectation::Accepted,
    )
    .await
    .unwrap();

    assert!(outcome.as_expected(), "{}", outcome);
    assert_eq!(outcome.moved(), 100);
    assert_eq!(token_balance(&ledger, &setup.source).await.unwrap(), 100);
    assert_eq!(token_balance(&ledger, &setup.destination).await.unwrap(), 0);
    assert_eq!(fetch_mint(&ledger, &setup.mint).await.unwrap().supply, 100);
}

#[tokio::test]
async fn test_wrong_decimals_are_rejected() {
    let (ledger, payer) = start_with_payer().await;
    let ctx = run_context();
    let setup = demo::setup(&ledger, &payer, &DemoSettings::default(), &ctx)
        .await
        .unwrap();
    let mut target = setup.probe_target(100);
    target.decimals = 6;

    let outcome = run_probe(
        &ledger,
        &payer,
        &target,
        ProbeKind::Transfer,
        ProbeAuthority::Signer(&payer),
        Expectation::Rejected,
    )
    .await
    .unwrap();

    assert!(outcome.as_expected());
    assert_eq!(outcome.moved(), 0);
}

#[tokio::test]
async fn test_full_run_matches_expectations() {
    let (ledger, payer) = start_with_payer().await;
    let ctx = run_context();

    let report = demo::run(&ledger, &payer, &DemoSettings::default(), &ctx)
        .await
        .unwrap();

    assert_eq!(report.outcomes.len(), DEMO_PROBES.len());
    assert!(report.all_expected(), "{}", report.summary());
    assert_eq!(report.summary(), "4/4 probes behaved as expected");

    let accepted: Vec<bool> = report
        .outcomes
        .iter()
        .map(|o| o.observed.is_accepted())
        .collect();
    assert_eq!(accepted, vec![false, true, false, true]);

    assert_eq!(token_balance(&ledger, &report.source).await.unwrap(), 0);
    assert_eq!(token_balance(&ledger, &report.destination).await.unwrap(), 100);
    assert_eq!(fetch_mint(&ledger, &report.mint).await.unwrap().supply, 100);
}

#[tokio::test]
async fn test_rerun_uses_fresh_mint_and_same_pattern() {
    let (ledger, payer) = start_with_payer().await;
    let ctx = run_context();
    let settings = DemoSettings::default();

    let first = demo::run(&ledger, &payer, &settings, &ctx).await.unwrap();
    let second = demo::run(&ledger, &payer, &settings, &ctx).await.unwrap();

    assert_ne!(first.mint, second.mint);
    assert_ne!(first.source, second.source);
    assert!(first.all_expected());
    assert!(second.all_expected());
    assert_eq!(token_balance(&ledger, &second.source).await.unwrap(), 0);
}

#[tokio::test]
async fn test_custom_settings_are_honoured() {
    let (ledger, payer) = start_with_payer().await;
    let ctx = run_context();
    let settings = DemoSettings {
        decimals: 6,
        initial_supply: 90,
        probe_amount: 30,
    };

    let report = demo::run(&ledger, &payer, &settings, &ctx).await.unwrap();

    assert!(report.all_expected(), "{}", report.summary());
    assert_eq!(fetch_mint(&ledger, &report.mint).await.unwrap().decimals, 6);
    assert_eq!(token_balance(&ledger, &report.source).await.unwrap(), 30);
    assert_eq!(token_balance(&ledger, &report.destination).await.unwrap(), 30);
    assert_eq!(fetch_mint(&ledger, &report.mint).await.unwrap().supply, 60);
}

#[tokio::test]
async fn test_wallet_airdrops_when_below_minimum() {
    let ledger = BanksLedger::start().await;
    let keypair = Keypair::new();
    let wallet = wallet_for(&keypair);

    let balance = wallet
        .ensure_funded(&ledger, LAMPORTS_PER_SOL / 2, LAMPORTS_PER_SOL)
        .await
        .unwrap();
    assert_eq!(balance, LAMPORTS_PER_SOL);

    // Already above the minimum: no second airdrop
    let balance = wallet
        .ensure_funded(&ledger, LAMPORTS_PER_SOL / 2, LAMPORTS_PER_SOL)
        .await
        .unwrap();
    assert_eq!(balance, LAMPORTS_PER_SOL);
    assert_eq!(
        ledger.get_balance(&keypair.pubkey()).await.unwrap(),
        LAMPORTS_PER_SOL
    );
}
