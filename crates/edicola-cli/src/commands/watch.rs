//! Live contract event stream
//!
//! Subscribes to the contract's logs and prints reconciled notices until
//! interrupted. Purchase and subscription confirmations are shown only for
//! the configured signer; creation and release events are system-wide.

use crate::app::App;
use crate::display;
use edicola_bridge::{EventReconciler, EventWatcher, Notice};
use edicola_types::Result;
use tokio::sync::mpsc;
use tracing::warn;

pub async fn run(app: &App) -> Result<()> {
    let watcher = EventWatcher::new(app.contract.rpc(), app.config.contract_address.clone());
    let reconciler = EventReconciler::new(app.store.clone(), &app.config.gateway_url);

    let (tx, mut rx) = mpsc::channel(64);
    tokio::spawn(watcher.run(tx));

    display::section("Watching contract events (ctrl-c to stop)");
    while let Some(event) = rx.recv().await {
        match reconciler
            .reconcile(&event, app.session.signer.as_ref())
            .await
        {
            Ok(Some(notice)) => print_notice(&notice),
            Ok(None) => {}
            Err(err) => warn!(%err, "event reconciliation failed"),
        }
    }
    Ok(())
}

fn print_notice(notice: &Notice) {
    match notice {
        Notice::Purchased {
            magazine,
            content_url,
        } => {
            display::success(&format!("purchase confirmed for {}", magazine.short()));
            match content_url {
                Some(url) => display::kv("read it at", url),
                None => display::info("content not yet available"),
            }
        }
        Notice::Subscribed { expires } => {
            display::success(&format!("subscription active until {expires}"));
        }
        Notice::Created { magazine } => {
            display::info(&format!(
                "new issue announced at {}; run `edicola catalog`",
                magazine.short()
            ));
        }
        Notice::Released { magazine } => {
            display::info(&format!(
                "issue {} released; run `edicola catalog`",
                magazine.short()
            ));
        }
        Notice::Donated { value } => {
            display::success(&format!("donation of {} received", display::amount(*value)));
        }
    }
}
