#![forbid(unsafe_code)]

//! Structured logging for native hosts.
//!
//! Every crate in the workspace logs through `tracing`; this module installs a
//! subscriber that prints one JSON object per event. Browser hosts use the
//! console writer in `guidepost-web` instead.
//!
//! The filter is read from `GUIDEPOST_LOG` (falling back to `RUST_LOG`) using
//! `EnvFilter` directive syntax, defaulting to `info`.

use tracing_subscriber::EnvFilter;

/// Environment variable consulted for the log filter.
pub const LOG_ENV: &str = "GUIDEPOST_LOG";

fn filter_from_env() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn install(filter: EnvFilter, source: &'static str) -> bool {
    let installed = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(false)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok();
    if installed {
        tracing::debug!(source, "installed JSON tracing subscriber");
    }
    installed
}

/// Install a global JSON subscriber writing to stderr.
///
/// Returns `false` if a global subscriber is already set.
pub fn init() -> bool {
    install(filter_from_env(), "env")
}

/// Same as [`init`] with an explicit filter, e.g. `"guidepost_runtime=debug"`.
pub fn init_with_filter(directives: &str) -> bool {
    install(EnvFilter::new(directives), "explicit")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_reports_existing_subscriber() {
        let first = init_with_filter("warn");
        let second = init();
        assert!(!(first && second));
    }
}
