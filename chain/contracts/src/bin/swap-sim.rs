//! Walks one unique-for-unique swap through a wall-clock ledger and logs
//! every step. Set `RUST_LOG=debug` to include executability diagnoses.

use anyhow::{bail, Context};
use swap_contracts::config::SwapConfig;
use swap_contracts::ledger::{Ledger, SystemClock};
use swap_types::ids::{Address, AssetId};
use swap_types::numeric::Quantity;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {}", path))?;
            SwapConfig::from_json_str(&raw).context("parsing config")?
        }
        None => SwapConfig::new(Address::new()),
    };

    let mut ledger = Ledger::new(config, SystemClock);
    tracing::info!(
        contract = %ledger.contract_address(),
        dev_fund = %ledger.dev_fund(),
        "Swap contract deployed"
    );

    let opener = Address::new();
    let closer = Address::new();
    let nifty = ledger.deploy_unique_registry();
    let soda = ledger.deploy_unique_registry();
    ledger.mint_unique(nifty, opener, AssetId::new(420))?;
    ledger.mint_unique(soda, closer, AssetId::new(777))?;

    let expiry_date = ledger.now() + 3_600;
    let trade_id = ledger.open_new_trade(
        opener,
        nifty,
        AssetId::new(420),
        soda,
        AssetId::new(777),
        expiry_date,
    )?;
    tracing::info!(count = ledger.get_trade_count(), "Trade count after open");

    let operator = ledger.contract_address();
    ledger.set_approval_for_all(nifty, opener, operator, true)?;
    ledger.set_approval_for_all(soda, closer, operator, true)?;

    if !ledger.is_trade_executable(closer, trade_id, Quantity::ZERO, Quantity::ZERO) {
        let reason = ledger.diagnose(closer, trade_id, Quantity::ZERO, Quantity::ZERO);
        bail!("trade {} unexpectedly not executable: {:?}", trade_id, reason);
    }

    ledger.execute_trade(closer, trade_id, Quantity::ZERO, Quantity::ZERO)?;

    tracing::info!(
        nifty_420 = ?ledger.owner_of(nifty, AssetId::new(420)),
        soda_777 = ?ledger.owner_of(soda, AssetId::new(777)),
        status = ?ledger.trade_status(trade_id)?,
        "Swap settled"
    );

    for event in ledger.events() {
        println!("{}", serde_json::to_string(event)?);
    }

    Ok(())
}
