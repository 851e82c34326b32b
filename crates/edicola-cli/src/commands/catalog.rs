//! Catalog view, partitioned by role

use crate::app::App;
use crate::display;
use edicola_types::Result;

pub async fn run(app: &App) -> Result<()> {
    let bar = display::busy("loading catalog");
    let catalog = app.reconciler.build(app.session.role).await?;
    bar.finish_and_clear();

    if let Some(latest) = &catalog.latest {
        display::section("Latest issue");
        display::magazine_line(latest);
        if app.session.role.is_reader() {
            if latest.content_missing() {
                display::info("content not yet available");
            } else {
                if !latest.summary.is_empty() {
                    display::kv("summary", &latest.summary);
                }
                if !latest.cover.is_empty() {
                    display::kv("cover", &latest.cover);
                }
            }
        }
    }

    display::section("Released");
    if catalog.released.is_empty() {
        display::info("nothing released yet");
    }
    for record in &catalog.released {
        display::magazine_line(record);
    }

    if app.session.role.is_staff() {
        display::section("Not yet released");
        if catalog.unreleased.is_empty() {
            display::info("nothing pending");
        }
        for record in &catalog.unreleased {
            display::magazine_line(record);
        }
    }
    Ok(())
}
