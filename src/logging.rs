//! src/logging.rs
//!
//! Tracing setup for the command-line tool. Nothing is installed unless
//! `ENUMGEN_LOG` or `RUST_LOG` is set, and events go to stderr so the
//! generated file path printed on stdout stays clean.
//!
//! ```bash
//! ENUMGEN_LOG=debug enumgen --type status
//! ENUMGEN_LOG="enumgen::semantics=debug" enumgen --type status
//! ```

use crate::config::LOG_ENV;
use tracing_subscriber::EnvFilter;

/// Picks the filter directive: `ENUMGEN_LOG` first, then `RUST_LOG`.
fn select_directive(enumgen_log: Option<String>, rust_log: Option<String>) -> Option<String> {
    enumgen_log.or(rust_log)
}

/// Installs the global `fmt` subscriber when logging was requested.
pub fn init_tracing() {
    let Some(directive) = select_directive(std::env::var(LOG_ENV).ok(), std::env::var("RUST_LOG").ok())
    else {
        return;
    };

    let filter = EnvFilter::builder().parse_lossy(directive);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
