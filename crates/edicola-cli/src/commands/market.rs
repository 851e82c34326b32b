//! Customer operations: buy, subscribe, revoke, donate

use crate::app::App;
use crate::display;
use edicola_types::{Address, ContentPointer, Result, Wei};

/// Buy a single issue at the current price
pub async fn buy(app: &mut App, magazine: &str) -> Result<()> {
    let magazine = Address::parse(magazine)?;
    let signer = app.signer()?.clone();
    let price = app.prices().await?.single;

    let bar = display::busy("buying the issue");
    let result = app.contract.buy_magazine(&signer, &magazine, price).await;
    bar.finish_and_clear();
    result?;

    display::success(&format!(
        "bought {} for {}",
        magazine.short(),
        display::amount(price)
    ));
    // point the reader at the content right away instead of waiting for
    // the purchase event; the buy already succeeded, so a store hiccup
    // here is not a failure
    if let Ok(Some(doc)) = app.store.find(&magazine).await {
        if let Ok(pointer) = ContentPointer::parse(&doc.content) {
            display::kv("read it at", &pointer.resolve(&app.config.gateway_url));
        }
    }
    app.refresh_role().await?;
    app.refresh_balances().await?;
    Ok(())
}

/// Start an annual subscription at the current price
pub async fn subscribe(app: &mut App) -> Result<()> {
    let signer = app.signer()?.clone();
    let price = app.prices().await?.annual;

    let bar = display::busy("subscribing");
    let result = app.contract.subscribe_annual(&signer, price).await;
    bar.finish_and_clear();
    result?;

    display::success(&format!("subscribed for {}", display::amount(price)));
    display::info("watch for the confirmation event to see the expiry date");
    app.refresh_role().await?;
    app.refresh_balances().await?;
    Ok(())
}

/// Revoke the active subscription
pub async fn revoke(app: &mut App) -> Result<()> {
    let signer = app.signer()?.clone();
    let bar = display::busy("revoking subscription");
    let result = app.contract.revoke_subscription(&signer).await;
    bar.finish_and_clear();
    result?;

    display::success("subscription revoked");
    app.refresh_role().await?;
    Ok(())
}

/// Donate to the contract treasury
pub async fn donate(app: &mut App, amount_wei: u128) -> Result<()> {
    let signer = app.signer()?.clone();
    let amount = Wei(amount_wei);
    let bar = display::busy("sending donation");
    let result = app.contract.donate(&signer, amount).await;
    bar.finish_and_clear();
    result?;

    display::success(&format!("donated {}", display::amount(amount)));
    app.refresh_balances().await?;
    Ok(())
}
