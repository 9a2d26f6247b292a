//! Logger setup for the binary
//!
//! The core never touches the logger directly; it reports through a
//! [`MergeObserver`](ntuple_merge_core::MergeObserver) and the `LogObserver`
//! forwards to the `log` facade configured here.

use std::io::Write;

/// Prefix of every merge log line in normal mode
pub const LINE_PREFIX: &str = "  [ Merging log ]: ";

/// Initialize `env_logger` once for the process
///
/// `RUST_LOG` still overrides the default filter.
pub fn init(debug: bool) {
    if debug {
        env_logger::Builder::from_env(env_logger::Env::default())
            .filter_level(log::LevelFilter::Debug)
            .filter_module("ntuple_merge_core", log::LevelFilter::Debug)
            .filter_module("ntuple_merge_cli", log::LevelFilter::Debug)
            .format_timestamp_millis()
            .init();
        eprintln!("Debug logging enabled");
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .format(|buf, record| writeln!(buf, "{LINE_PREFIX}{}", record.args()))
            .init();
    }
}
