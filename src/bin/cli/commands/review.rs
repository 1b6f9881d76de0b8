use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use oboeru_lib::review::progress::report_on_signal;
use oboeru_lib::review::{FifoChannel, ReviewSession, SessionEnd};

use crate::app::App;

pub fn run(app: &App, pipe: &Path, decks: &[PathBuf]) -> Result<()> {
    check_pipe(pipe)?;

    let store = app.load_store(decks)?;
    let mut session = ReviewSession::new(
        store,
        app.config.scheduler.clone(),
        app.now(),
        app.rng(),
    );

    let progress = session.progress();
    if let Err(e) = report_on_signal(Arc::clone(&progress)) {
        log::warn!("Progress reporting disabled: {}", e);
    }

    let mut channel = FifoChannel::new(pipe, Duration::from_millis(app.config.reply_delay_ms));
    let result = {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        session.run(&mut channel, &mut out)
    };

    // Grades applied so far are kept whatever ended the loop
    app.save_store(session.store())?;

    let end = result.context("Failed to write review prompt")?;
    match end {
        SessionEnd::Finished => log::info!("Review finished"),
        SessionEnd::Quit => log::info!("Review stopped by reviewer"),
        SessionEnd::ChannelClosed => log::info!("Review stopped, answer pipe closed"),
    }
    log::info!(
        "Reviewed {} of {} cards",
        progress.reviewed(),
        progress.total()
    );

    Ok(())
}

#[cfg(unix)]
fn check_pipe(pipe: &Path) -> Result<()> {
    use std::os::unix::fs::FileTypeExt;

    let meta = std::fs::metadata(pipe)
        .with_context(|| format!("Failed to stat answer pipe {}", pipe.display()))?;
    if !meta.file_type().is_fifo() {
        bail!("{} is not a named pipe", pipe.display());
    }
    Ok(())
}

#[cfg(not(unix))]
fn check_pipe(pipe: &Path) -> Result<()> {
    if !pipe.exists() {
        bail!("Answer pipe {} does not exist", pipe.display());
    }
    Ok(())
}
