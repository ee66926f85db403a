//! Logging setup for programs drawing charts with `aq_plot`.
//!
//! Saved figures are logged at `info`. Layers being drawn, empty box groups
//! and skipped displays are logged at `debug`. Programs with their own
//! `tracing` subscriber need none of this.

/// Filter used when no directives are given: this crate's saves only.
pub const DEFAULT_FILTER: &str = "aq_plot=info";

/// Installs a compact stderr subscriber filtered by `RUST_LOG`, falling back
/// to [`DEFAULT_FILTER`] when it is unset or unparsable.
///
/// Returns `false` when the `telemetry` feature is disabled or a global
/// subscriber is already set.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        return install(filter(None));
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}

/// Like [`init_default_tracing`], with explicit directives such as
/// `"aq_plot=debug"` instead of `RUST_LOG`.
#[must_use]
pub fn init_tracing(directives: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        return install(filter(Some(directives)));
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = directives;
        false
    }
}

#[cfg(feature = "telemetry")]
fn filter(directives: Option<&str>) -> tracing_subscriber::EnvFilter {
    use tracing_subscriber::EnvFilter;

    let parsed = match directives {
        Some(d) => EnvFilter::try_new(d).map_err(|e| e.to_string()),
        None => EnvFilter::try_from_default_env().map_err(|e| e.to_string()),
    };
    parsed.unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

#[cfg(feature = "telemetry")]
fn install(filter: tracing_subscriber::EnvFilter) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .is_ok()
}
