//! Session and contract status

use crate::app::App;
use crate::display;
use edicola_types::Result;

pub async fn run(app: &App) -> Result<()> {
    display::section("Session");
    match &app.session.signer {
        Some(signer) => {
            display::kv("signer", &signer.short());
            display::kv("chain id", &app.session.chain_id.to_string());
            display::kv("role", &app.session.role.to_string());
            display::kv("balance", &display::amount(app.session.balance));
        }
        None => display::info("no wallet connected (browse-only)"),
    }

    display::section("Contract");
    display::kv("address", &app.config.contract_address.short());
    display::kv("treasury", &display::amount(app.contract.treasury_balance().await?));
    let prices = app.prices().await?;
    display::kv("single issue", &display::amount(prices.single));
    display::kv("annual", &display::amount(prices.annual));
    Ok(())
}
