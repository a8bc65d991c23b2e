// ============================================================================
// shutoh-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: env_logger initialization for the CLI
//
// Library code logs through the `log` facade. The binary installs
// env_logger as the backend once, before any command runs.
//
// USAGE:
// - default: info level
// - --verbose: debug level
// - RUST_LOG: overrides both, e.g. RUST_LOG=shutoh_core=trace

use log::LevelFilter;

/// Level used when `RUST_LOG` is not set.
pub fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Installs the global logger. Later calls are ignored.
pub fn init(verbose: bool) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(default_level(verbose))
        .format_target(verbose)
        .parse_default_env();
    let _ = builder.try_init();
}
