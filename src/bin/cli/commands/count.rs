use std::path::PathBuf;

use anyhow::Result;

use oboeru_lib::review::count_due;

use crate::app::App;

/// Print how many cards are due. Never writes the decks.
pub fn run(app: &App, decks: &[PathBuf]) -> Result<()> {
    let store = app.load_store(decks)?;
    let due = count_due(&store, app.now(), &app.config.scheduler);

    println!("Cards Due: {}", due);

    Ok(())
}
