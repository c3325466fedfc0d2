// Tracing subscriber setup for the headless runner and tests.
//
// Library code only emits `tracing` events; installing a subscriber is left
// to the binary. `init_tracing` is idempotent (first call wins) so tests can
// call it freely. `RUST_LOG` overrides the filter passed in.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: Once = Once::new();

/// Install a compact `fmt` subscriber filtered by `RUST_LOG`, or by `filter`
/// (e.g. `"info"` or `"ledgewalk_level=debug,info"`) when that is unset.
pub fn init_tracing(filter: &str) {
    let filter = filter.to_owned();
    TRACING_INIT.call_once(move || {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact();

        // Another subscriber (e.g. a test harness) may already be installed.
        let _ = subscriber.try_init();
    });
}
