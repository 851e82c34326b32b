//! Owner operations: administrators and the treasury

use crate::app::App;
use crate::display;
use edicola_types::{Address, Result, Wei};

/// Grant the administrator role to an address
pub async fn add_admin(app: &mut App, admin: &str) -> Result<()> {
    let admin = Address::parse(admin)?;
    let signer = app.signer()?.clone();

    let bar = display::busy("adding administrator");
    let result = app.contract.add_administrator(&signer, &admin).await;
    bar.finish_and_clear();
    result?;

    display::success(&format!("{} is now an administrator", admin.short()));
    Ok(())
}

/// Withdraw from the treasury
pub async fn withdraw(app: &mut App, amount_wei: u128) -> Result<()> {
    let signer = app.signer()?.clone();
    let amount = Wei(amount_wei);

    let bar = display::busy("withdrawing");
    let result = app.contract.withdraw(&signer, amount).await;
    bar.finish_and_clear();
    result?;

    display::success(&format!("withdrew {}", display::amount(amount)));
    app.refresh_balances().await?;
    display::kv("treasury now", &display::amount(app.session.treasury));
    Ok(())
}

/// Split the treasury among the on-chain collaborator set
pub async fn split_profit(app: &mut App) -> Result<()> {
    let signer = app.signer()?.clone();

    let bar = display::busy("splitting profit");
    let result = app.contract.split_profit(&signer).await;
    bar.finish_and_clear();
    result?;

    display::success("profit distributed");
    app.refresh_balances().await?;
    display::kv("treasury now", &display::amount(app.session.treasury));
    Ok(())
}
