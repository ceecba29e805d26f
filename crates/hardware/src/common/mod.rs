//! Common types and constants used throughout the controller model.
//!
//! This module provides the building blocks shared by every component:
//! 1. **Constants:** Word limits and STATUS flag bits.
//! 2. **Error Handling:** Error enums for configuration, scripts, and simulation runs.

/// Common constants used throughout the model.
pub mod constants;

/// Error types for the fallible surfaces around the controller.
pub mod error;

pub use constants::{MAX_WORD_WIDTH, STATUS_FLAG_AUTONOMOUS, STATUS_FLAG_STEPPING};
pub use error::{ConfigError, ScriptError, SimError};
