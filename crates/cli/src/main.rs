//! jsonkv CLI: one store operation per invocation.
//!
//! `jsonkv [--db PATH | --config FILE] [--json] [-v] COMMAND ...`
//!
//! Exit codes:
//! - 0: success
//! - 1: the operation was rejected (bad key or value, missing key, wrong type,
//!   snapshot already exists)
//! - 2: the store cannot be opened or its file is unusable (I/O error,
//!   corrupt document, bad config)
//! - 3: timed out waiting for the store lock; retrying may succeed

mod commands;
mod dispatch;
mod format;
mod parse;
mod value;

use std::path::Path;
use std::process;
use std::time::Duration;

use clap::ArgMatches;
use jsonkv_core::Error;
use jsonkv_engine::{Database, StoreConfig};
use tracing_subscriber::EnvFilter;

use commands::build_cli;
use dispatch::execute;
use format::{format_error, format_output, OutputMode};
use parse::matches_to_action;

fn main() {
    let matches = build_cli().get_matches();
    init_logging(matches.get_flag("verbose"));

    let output_mode = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let action = match matches_to_action(&matches) {
        Ok(action) => action,
        Err(e) => {
            eprintln!("(error) {}", e);
            process::exit(EXIT_STORE_UNAVAILABLE);
        }
    };

    let db = match open_database(&matches) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("{}", format_error(&e, output_mode));
            process::exit(EXIT_STORE_UNAVAILABLE);
        }
    };

    match execute(&db, action) {
        Ok(output) => {
            println!("{}", format_output(&output, output_mode));
        }
        Err(e) => {
            eprintln!("{}", format_error(&e, output_mode));
            process::exit(exit_code(&e));
        }
    }
}

const EXIT_REJECTED: i32 = 1;
const EXIT_STORE_UNAVAILABLE: i32 = 2;
const EXIT_TIMED_OUT: i32 = 3;

/// Exit code for an operation that failed after the store was opened
fn exit_code(err: &Error) -> i32 {
    if err.is_retryable() {
        EXIT_TIMED_OUT
    } else if err.is_storage_error() {
        EXIT_STORE_UNAVAILABLE
    } else {
        EXIT_REJECTED
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_database(matches: &ArgMatches) -> jsonkv_core::Result<Database> {
    Database::open(store_config(matches)?)
}

/// `--config` file (if any), overridden by `--db` and `--timeout-ms`.
fn store_config(matches: &ArgMatches) -> jsonkv_core::Result<StoreConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => StoreConfig::from_file(Path::new(path))?,
        None => StoreConfig::default(),
    };
    if let Some(path) = matches.get_one::<String>("db") {
        config.path = path.into();
    }
    if let Some(ms) = matches.get_one::<u64>("timeout-ms") {
        config = config.with_lock_timeout(Duration::from_millis(*ms));
    }
    Ok(config)
}
