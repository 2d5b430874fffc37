//! Debug logging gated on an environment variable.
//!
//! Set `EMBED_INGEST_LOG` (to anything) to get `[DEBUG <scope>]` lines on stderr.
//! User-facing progress goes to stdout and is not affected.

/// Environment variable that enables debug output.
pub const LOG_ENV_VAR: &str = "EMBED_INGEST_LOG";

/// Whether debug logging is enabled for this process.
pub fn enabled() -> bool {
    std::env::var_os(LOG_ENV_VAR).is_some()
}

/// Write a debug line for `scope` if logging is enabled.
pub fn log_debug(scope: &str, msg: &str) {
    if enabled() {
        eprintln!("[DEBUG {}] {}", scope, msg);
    }
}
