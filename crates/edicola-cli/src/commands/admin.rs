//! Administrator operations: create and release magazines

use crate::app::App;
use crate::display;
use dialoguer::Input;
use edicola_types::{Address, ContentDocument, ContentPointer, Result};

/// Create a new, unreleased magazine
pub async fn new_magazine(app: &mut App, title: &str) -> Result<()> {
    let signer = app.signer()?.clone();
    let bar = display::busy("creating magazine");
    let result = app.contract.add_magazine(&signer, title).await;
    bar.finish_and_clear();
    result?;

    display::success(&format!("magazine {title:?} created"));
    display::info("its address will arrive with the creation event; run `edicola catalog`");
    Ok(())
}

/// Release a magazine: prompt for content, confirm on-chain, then write the
/// store document.
///
/// Strictly in that order. The content write happens only after the
/// transaction confirms, so no reader can see a released record whose
/// document was never going to arrive.
pub async fn release(app: &mut App, magazine: &str) -> Result<()> {
    let magazine = Address::parse(magazine)?;
    let signer = app.signer()?.clone();

    let cover: String = prompt("Cover pointer (cid?filename=...)")?;
    let content: String = prompt("Content pointer (cid?filename=...)")?;
    let summary: String = prompt("Summary")?;

    // local validation before any transaction is attempted
    ContentPointer::parse(&cover)?;
    ContentPointer::parse(&content)?;

    let bar = display::busy("releasing magazine");
    let result = app.contract.release_magazine(&signer, &magazine).await;
    bar.finish_and_clear();
    result?;

    let doc = ContentDocument {
        cover,
        content,
        summary,
    };
    app.store.update(&magazine, doc).await?;

    display::success(&format!("released {}", magazine.short()));
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    Input::<String>::new()
        .with_prompt(label)
        .allow_empty(false)
        .interact_text()
        .map_err(|e| edicola_types::EdicolaError::Validation(format!("prompt failed: {e}")))
}
