//! Tracing initialisation helpers for tests.
//!
//! The subscriber is installed at most once per process, so every test may
//! call [`init_test_tracing`].

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset: debug output from the workspace
/// crates, warnings from everything else.
pub const DEFAULT_TEST_FILTER: &str = "warn,idxtabs_core=debug,idxtabs_config=debug";

/// Install a subscriber that writes through the test harness.
///
/// ```ignore
/// idxtabs_test_utils::tracing_setup::init_test_tracing();
/// let table = idxtabs_core::load_artifact(&path, ArtifactFormat::Auto).await?;
/// ```
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_TEST_FILTER)),
        )
        .with_test_writer()
        .try_init();
}
