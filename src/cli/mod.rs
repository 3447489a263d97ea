//! CLI command handlers.
//!
//! Handlers are invoked by main.rs with a fully merged configuration and
//! return the process exit code.

mod export;

pub use export::run_export;
