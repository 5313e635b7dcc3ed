//! Utility modules for apiguide

pub mod logging;
pub mod process;

pub use logging::{init_logging, parse_level, LoggingConfig};
pub use process::{run_bounded, BoundedOutput, ProcessError};
