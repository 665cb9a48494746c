use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use tracing_log::AsTrace;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;

/// Installs the global subscriber.
///
/// Console output follows the `-v`/`-q` verbosity. When `trace` is given every event, down to TRACE, is also
/// written to that file without ANSI colors; tests read it back to check what happened.
pub fn configure_tracing(trace: Option<PathBuf>, verbose: Verbosity<InfoLevel>) -> anyhow::Result<()> {
    let console_filter: LevelFilter = verbose.log_level_filter().as_trace();

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false)
        .without_time()
        .with_filter(console_filter);

    let file_layer = match trace {
        Some(path) => {
            let file = File::create(&path).with_context(|| format!("Creating trace log. path: {}", path.display()))?;

            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_filter(LevelFilter::TRACE),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .with_context(|| "Installing tracing subscriber".to_string())?;

    Ok(())
}
