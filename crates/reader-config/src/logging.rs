//! Tracing subscriber setup for the reader host application

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a global fmt subscriber
///
/// `RUST_LOG` takes precedence over `default_filter`. Fails if a global
/// subscriber is already installed.
pub fn init_tracing(default_filter: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_filter))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_filter(env_filter))
        .try_init()?;

    tracing::debug!("Logging initialized; override level with RUST_LOG");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails() {
        // Whichever test installs first wins; a second install must error.
        let _ = init_tracing("reader_config=debug");
        assert!(init_tracing("reader_config=debug").is_err());
    }
}
