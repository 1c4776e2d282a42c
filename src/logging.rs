use std::sync::Once;

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub const LOG_ENV: &str = "VERDICT_LOG";

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Only installs a subscriber when
/// `VERDICT_LOG` is set, e.g. `VERDICT_LOG=verdict=debug`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) else {
            return;
        };
        // The host may already own the global subscriber.
        if let Err(e) = install(filter) {
            tracing::warn!(error = %e, "keeping the existing tracing subscriber");
        }
    });
}

fn install(filter: EnvFilter) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
        .with(filter)
        .try_init()
}
