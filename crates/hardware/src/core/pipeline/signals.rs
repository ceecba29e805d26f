//! Pipeline control signals.
//!
//! This module defines the single-cycle strobes the EX stage drives. It covers:
//! 1. **Queue Strobes:** The receive-FIFO dequeue pulse.
//! 2. **Experiment Strobes:** Write-enable and reset pulses.
//! 3. **Cycle Triggers:** STEP/START/PAUSE requests toward cycle control.
//! 4. **Stalls:** Why no command was accepted in a cycle.
//!
//! Every strobe is an event recomputed each cycle; nothing here is ever held.

use crate::core::cycle_control::CycleTrigger;

/// Strobes produced by the EX stage for one cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlSignals {
    /// Pop the receive FIFO at the coming edge.
    pub rx_dequeue: bool,
    /// Write the experiment register at the coming edge.
    pub exp_wen: bool,
    /// Reset the experiment at the coming edge.
    pub exp_reset: bool,
    /// Request toward cycle control, if any.
    pub trigger: Option<CycleTrigger>,
}

impl ControlSignals {
    /// All strobes deasserted.
    pub const fn idle() -> Self {
        Self {
            rx_dequeue: false,
            exp_wen: false,
            exp_reset: false,
            trigger: None,
        }
    }
}

/// Why the EX stage accepted nothing this cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StallReason {
    /// Nothing queued.
    RxEmpty,
    /// A command is queued but its response would have nowhere to go.
    TxFull,
}
