//! Subcommand implementations

use anyhow::{Context, Result};
use chain::{ChainClient, HttpChain};
use config::Config;
use pipeline::{DepositFlow, FlowConfig};
use seeder::{SeedPlan, VirtualNetworkSeeder};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use types::utils::{format_units, units_to_minor};
use types::{DepositRequest, DepositorError};

/// Run one simulate-then-submit deposit of `amount_units` whole tokens
pub async fn run_deposit(config: &Config, amount_units: u64) -> Result<()> {
    let contracts = config.parse_contracts().map_err(DepositorError::Config)?;
    let decimals = config.deposit.token_decimals;

    let chain = Arc::new(HttpChain::connect(
        &config.network.rpc_url,
        &config.signer.private_key,
    )?);
    info!("Using signer address: {}", chain.signer_address());

    let flow = DepositFlow::new(
        chain.clone(),
        FlowConfig {
            liquidity_manager: contracts.liquidity_manager,
            token: contracts.token,
            approval_ceiling: units_to_minor(config.deposit.approval_ceiling_units, decimals),
            token_decimals: decimals,
            timeout: Duration::from_secs(config.deposit.flow_timeout_seconds),
            explorer_base_url: config.network.explorer_base_url.clone(),
        },
    );

    let request = DepositRequest::new(
        chain.signer_address(),
        units_to_minor(amount_units, decimals),
    )?;

    let record = flow
        .run(&request)
        .await
        .context("Deposit flow failed")?;

    info!(
        tx_hash = %record.hash,
        amount = %format_units(request.amount, decimals),
        "Deposit confirmed"
    );
    Ok(())
}

/// Seed the virtual network so deposit flows have fixtures to act on
pub async fn run_seed(config: &Config) -> Result<()> {
    let contracts = config.parse_contracts().map_err(DepositorError::Config)?;
    let amounts = config.parse_seed_amounts().map_err(DepositorError::Config)?;

    let chain = Arc::new(HttpChain::connect(
        &config.network.rpc_url,
        &config.signer.private_key,
    )?);

    let seeder = VirtualNetworkSeeder::new(
        chain,
        SeedPlan {
            token: contracts.token,
            pool: contracts.pool,
            native_balance_wei: amounts.native_balance_wei,
            token_balance: amounts.token_balance,
            approval_ceiling: amounts.approval_ceiling,
        },
    );

    let report = seeder.seed().await.context("Seeding failed")?;

    info!(
        approval_tx = %report.approval_tx,
        allowance = %report.approval.amount,
        "Virtual network seeded"
    );
    Ok(())
}
