use relay_errors::RelayError;
use std::error::Error;
use tracing::dispatcher::SetGlobalDefaultError;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Crates whose logs follow the requested level.
const RELAY_TARGETS: [&str; 2] = ["relay_core", "header_chain"];

/// Filter directives used when `RUST_LOG` is not set.
///
/// `level` applies to the relay's own crates, dependencies stay at `warn`.
/// Without a level nothing is logged.
pub fn default_directives(level: Option<LevelFilter>) -> String {
    let Some(level) = level else {
        return LevelFilter::OFF.to_string();
    };

    RELAY_TARGETS
        .iter()
        .fold(LevelFilter::WARN.to_string(), |directives, target| {
            format!("{directives},{target}={level}")
        })
}

/// Initializes `tracing` as the logger.
///
/// # Parameters
///
/// - `level`: Level for the relay's own crates, see [`default_directives`].
///   `RUST_LOG` overrides it when set.
///
/// Logs are printed as JSON when the `JSON_LOGS` env var is set.
///
/// # Returns
///
/// Returns `Err` if `tracing` can't be initialized. A logger that is already
/// installed is kept and `Ok(())` is returned.
pub fn initialize_logger(level: Option<LevelFilter>) -> Result<(), RelayError> {
    let filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) => EnvFilter::new(directives),
        Err(_) => EnvFilter::new(default_directives(level)),
    };

    let layer = fmt::layer().with_test_writer();
    let res = if std::env::var("JSON_LOGS").is_ok() {
        tracing_subscriber::registry()
            .with(layer.json())
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(layer)
            .with(filter)
            .try_init()
    };

    match res {
        Ok(()) => Ok(()),
        Err(e)
            if e.source()
                .is_some_and(|source| source.is::<SetGlobalDefaultError>()) =>
        {
            tracing::trace!("Tracing is already initialized, keeping it");
            Ok(())
        }
        Err(e) => Err(RelayError::ConfigError(e.to_string())),
    }
}

/// Parses a headers file: one hex encoded 80-byte header per line. Blank
/// lines and lines starting with `#` are skipped.
///
/// # Returns
///
/// `(line number, raw bytes)` pairs, line numbers starting from 1.
pub fn parse_header_lines(contents: &str) -> Result<Vec<(usize, Vec<u8>)>, RelayError> {
    contents
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(number, line)| Ok((number, hex::decode(line)?)))
        .collect()
}
