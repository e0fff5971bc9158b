//! # Command Line Interface
//!
//! This module defines command line interface for the `relay` binary. `Clap`
//! is used for easy generation of help messages and handling arguments.

use crate::utils;
use clap::Parser;
use relay_config::RelayConfig;
use relay_errors::RelayError;
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::exit;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;
use tracing::Level;

/// Bitcoin header relay
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// File with one hex encoded 80-byte header per line, submitted in order.
    pub headers_file: PathBuf,
    /// TOML formatted configuration file. Mainnet genesis is used if omitted.
    pub config_file: Option<PathBuf>,
    /// Verbosity level, ranging from 0 (config or `RUST_LOG`) to 5 (highest)
    #[arg(short, long, default_value_t = 0)]
    pub verbose: u8,
}

/// Parse all the command line arguments.
fn parse() -> Result<Args, RelayError> {
    parse_from(env::args())
}

/// Parse given iterator. This is good for isolated environments, like tests.
fn parse_from<I, T>(itr: I) -> Result<Args, RelayError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Args::try_parse_from(itr) {
        Ok(c) => Ok(c),
        Err(e) => Err(RelayError::ConfigError(e.to_string())),
    }
}

/// Reads the configuration file if one is given, defaults otherwise.
fn get_configuration_from(config_file: Option<PathBuf>) -> Result<RelayConfig, RelayError> {
    match config_file {
        Some(path) => RelayConfig::try_parse_file(path),
        None => Ok(RelayConfig::default()),
    }
}

/// Log level from `--verbose`, falling back to the configured `log_level`.
fn level_filter(verbose: u8, config: &RelayConfig) -> Option<LevelFilter> {
    match verbose {
        0 => config
            .log_level
            .as_deref()
            .and_then(|level| LevelFilter::from_str(level).ok()),
        other => Some(LevelFilter::from_level(
            Level::from_str(&other.to_string()).unwrap_or(Level::INFO),
        )),
    }
}

/// Gets configuration from CLI, for binaries. If there are any errors, prints
/// error and exits the program.
///
/// Steps:
///
/// 1. Get CLI arguments
/// 2. Read configuration file, if any
/// 3. Initialize logger
///
/// # Returns
///
/// A tuple, containing:
///
/// - [`RelayConfig`] from CLI argument
/// - [`Args`] from CLI options
pub fn get_configuration_from_cli() -> (RelayConfig, Args) {
    let args = match parse() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            exit(1);
        }
    };

    let config = match get_configuration_from(args.config_file.clone()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Can't read configuration file: {e}");
            exit(1);
        }
    };

    if let Err(e) = utils::initialize_logger(level_filter(args.verbose, &config)) {
        eprintln!("{e}");
        exit(1);
    }

    if args.config_file.is_none() {
        tracing::info!("No configuration file given, starting from the mainnet genesis block");
    }

    (config, args)
}
