//! Controller core.
//!
//! 1. **Cycle Control:** Manual stepping and autonomous free-running of the experiment clock.
//! 2. **Pipeline:** The EX/RES latch, strobes, and the two stages.
//! 3. **Controller:** The top-level evaluate-then-commit `tick`.

/// Top-level controller.
pub mod controller;

/// Experiment clock-enable state machine.
pub mod cycle_control;

/// Two-stage command pipeline.
pub mod pipeline;

pub use controller::{Controller, ControllerInputs, ControllerOutputs, ControllerState};
pub use cycle_control::{CycleControl, CycleMode, CycleTrigger};
