//! Global Controller Constants.
//!
//! This module defines constants shared across the controller model. It includes:
//! 1. **Word Constants:** Limits on the command/response word width.
//! 2. **Status Constants:** Bit assignments of the STATUS response flags.

/// Widest command/response word the model can carry (one `u64`).
pub const MAX_WORD_WIDTH: u32 = 64;

/// STATUS flag: cycle control is free-running the experiment clock.
pub const STATUS_FLAG_AUTONOMOUS: u64 = 1 << 0;

/// STATUS flag: cycle control is in the middle of a counted STEP.
pub const STATUS_FLAG_STEPPING: u64 = 1 << 1;
