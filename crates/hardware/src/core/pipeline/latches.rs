//! Pipeline latch structures for inter-stage communication.
//!
//! The controller has a single latch, EX/RES, between command execution and
//! response composition. It is written once per clock from the EX stage's next
//! values and read by the RESPOND stage in the following cycle. There is no other
//! path from EX to RESPOND.

use crate::core::pipeline::traits::PipelineLatch;
use crate::protocol::opcodes::ResponseKind;

/// Entry in the EX/RES pipeline latch (Execute to Respond stage).
///
/// Carries what the EX stage decided about the command it accepted, one clock
/// after the decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExResEntry {
    /// Result to report for the accepted command.
    pub result: ResponseKind,
    /// `true` when no command was accepted; RESPOND emits nothing.
    pub nop: bool,
    /// Cycle-control counter at the time of acceptance.
    pub cycle_count: u64,
    /// Address field of the accepted command.
    pub addr: u64,
}

impl ExResEntry {
    /// An empty slot. Also the reset value of the latch.
    pub const fn bubble() -> Self {
        Self {
            result: ResponseKind::Status,
            nop: true,
            cycle_count: 0,
            addr: 0,
        }
    }
}

impl Default for ExResEntry {
    fn default() -> Self {
        Self::bubble()
    }
}

/// The EX/RES pipeline register.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExRes {
    /// Latched entry.
    pub entry: ExResEntry,
}

impl PipelineLatch for ExRes {
    fn flush(&mut self) {
        self.entry = ExResEntry::bubble();
    }

    fn is_empty(&self) -> bool {
        self.entry.nop
    }
}
