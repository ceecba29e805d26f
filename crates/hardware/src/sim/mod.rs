//! Host-side simulation.
//!
//! Parses command scripts and plays them through a clocked system, collecting
//! every response the controller emits.

/// Script parsing.
pub mod script;

/// Run loop.
pub mod simulator;

pub use script::{ScriptItem, parse_script};
pub use simulator::{ResponseRecord, RunReport, Simulator};
