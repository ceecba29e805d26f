//! Pipeline stage implementations.
//!
//! The controller pipeline has two stages:
//! 1. **Execute:** Command control; accepts a command and drives experiment strobes.
//! 2. **Respond:** Response composition; answers the command accepted one cycle earlier.
//!
//! Both are pure functions of the current state and inputs.

/// Command control (EX stage).
pub mod execute;

/// Response composition (RES stage).
pub mod respond;

/// Execute stage entry point (EX stage).
pub use execute::execute_stage;
/// Respond stage entry point (RES stage).
pub use respond::respond_stage;
