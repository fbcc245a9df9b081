//! Integration tests module
//!
//! Shared fixtures and setup for the integration tests.

pub mod curl_test;
pub mod substitution_test;

use cyberapi_core::config::EngineConfig;
use cyberapi_core::environment::{load_store, InMemoryStore};
use cyberapi_core::functions::Evaluator;
use cyberapi_core::history::LatestResponses;
use cyberapi_core::host::FixedClock;
use std::path::PathBuf;
use std::sync::{Arc, Once};

static INIT: Once = Once::new();

/// Fixed Unix time used by every test evaluator.
pub const NOW: i64 = 1_700_000_000;

/// Initialize test environment (run once)
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Path of a file under `tests/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Loads the shared environment fixture.
pub fn load_fixture_store() -> InMemoryStore {
    load_store(&fixture_path("store.json")).expect("Failed to load store fixture")
}

/// Evaluator over the given store and history with a frozen clock and a
/// seeded random source.
pub fn create_evaluator(store: &InMemoryStore, history: &LatestResponses) -> Evaluator {
    Evaluator::new(Arc::new(store.clone()), Arc::new(history.clone()))
        .with_config(EngineConfig::default())
        .with_clock(Arc::new(FixedClock::from_unix(NOW)))
        .with_seed(7)
}
