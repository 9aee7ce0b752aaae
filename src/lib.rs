pub mod advisory; // clinical suggestion boundary + offline rules
pub mod config;
pub mod db;
pub mod models;
pub mod prescribing; // prescription entry session
pub mod safety; // interaction/allergy safety-check engine

use tracing_subscriber::EnvFilter;

/// Initialize tracing for the embedding application.
///
/// Honors `RUST_LOG` when set, otherwise falls back to the default filter
/// from `config`. Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter()));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    tracing::debug!("Medsafe tracing initialized v{}", config::APP_VERSION);
}
