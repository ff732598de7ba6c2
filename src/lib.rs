// Library surface for headless/integration tests and reuse.
// The binary in main.rs only wires terminal, CLI and logging around it.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod diff;
pub mod key;
pub mod metrics;
pub mod result;
pub mod runtime;
pub mod session;
pub mod ui;
pub mod words;
pub mod wrap;
