//! Shared utilities for the Agora governance chain.

pub mod logging;

pub use logging::{init_logging, LogFormat, LoggingError};
