// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app;
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod error;
pub mod export;
pub mod gesture;
pub mod logging;
pub mod record;
pub mod runtime;
pub mod scramble;
pub mod session;
pub mod stats;
pub mod store;
pub mod time_series;
pub mod timer;
