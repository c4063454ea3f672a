//! Tracing subscriber setup for the binary.

use std::error::Error as StdError;

use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_FILTER: &str = "info";

/// The global subscriber could not be installed, usually because one already is.
#[derive(Error, Debug)]
#[error("failed to install the tracing subscriber")]
pub struct TelemetryError(#[source] Box<dyn StdError + Send + Sync + 'static>);

/// Installs the global subscriber. Filtering follows `RUST_LOG`, falling back to `info`.
pub fn init(json: bool) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = fmt().with_env_filter(filter);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(TelemetryError)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_is_reported() {
        // The first call may already fail if another test installed a subscriber.
        let _ = init(false);

        let err = init(true).unwrap_err();

        assert_eq!(err.to_string(), "failed to install the tracing subscriber");
        assert!(err.source().is_some());
    }
}
