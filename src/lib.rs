// Library surface for the binary and for headless/integration tests.
pub mod app;
pub mod config;
pub mod runtime;
pub mod sample;
pub mod session;
pub mod ui;
