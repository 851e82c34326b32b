//! Search released issues by month and/or ownership
//!
//! Mirrors the storefront search rules: either restrict to the caller's own
//! purchases, or give a complete month/year pair, or both. The same window
//! predicate filters whichever collection is chosen.

use crate::app::App;
use crate::display;
use edicola_catalog::{filter_by_window, window_for};
use edicola_types::{EdicolaError, Result};

pub async fn run(app: &App, month: Option<u32>, year: Option<i32>, mine: bool) -> Result<()> {
    let window = match (month, year) {
        (Some(month), Some(year)) => Some(window_for(year, month)?),
        (None, None) => None,
        _ => {
            return Err(EdicolaError::Validation(
                "give both --month and --year, or neither".into(),
            ))
        }
    };
    if window.is_none() && !mine {
        return Err(EdicolaError::Validation(
            "select a criterion: --mine and/or --month with --year".into(),
        ));
    }

    let bar = display::busy("searching");
    let records = if mine {
        app.reconciler.customer_magazines(app.signer()?).await?
    } else {
        app.reconciler.build(app.session.role).await?.released
    };
    bar.finish_and_clear();

    let found = match window {
        Some((start, end)) => filter_by_window(&records, start, end),
        None => records,
    };

    display::section(if mine { "My issues" } else { "Search results" });
    if found.is_empty() {
        display::info("no magazines found");
    }
    for record in &found {
        display::magazine_line(record);
    }
    Ok(())
}
