#![deny(unsafe_code)]

//! Shared test utilities for the idxtabs workspace.
//!
//! Provides artifact fixtures, config builders, and tracing helpers so that
//! individual crate tests stay concise and consistent.
//!
//! Add this crate as a `[dev-dependency]` in any workspace member:
//!
//! ```toml
//! [dev-dependencies]
//! idxtabs-test-utils = { workspace = true }
//! ```

pub mod artifact;
pub mod config;
pub mod tracing_setup;
