use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "csbind=info,csbind_gen=info,csbind_decl=info";

/// Initialise the tracing subscriber once per process. `verbose` lowers the
/// default filter to `debug`; an explicit `RUST_LOG` always wins.
pub fn init_logging(verbose: bool) {
    INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            if verbose {
                EnvFilter::new(DEFAULT_FILTER.replace("=info", "=debug"))
            } else {
                EnvFilter::new(DEFAULT_FILTER)
            }
        });

        fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    });
}
