//! Execute (EX) Stage.
//!
//! This module implements command control, the first pipeline stage. It performs:
//! 1. **Acceptance:** Decides whether the head-of-queue command is consumed this cycle.
//! 2. **Experiment Strobes:** Drives address/data and pulses write-enable or reset.
//! 3. **Cycle Triggers:** Raises STEP/START/PAUSE toward cycle control when allowed.
//! 4. **Latch Next:** Produces the EX/RES entry for the RESPOND stage.
//!
//! A command is accepted only if its response is guaranteed a slot in the
//! transmit FIFO, so every accepted command is answered exactly once.

use tracing::debug;

use crate::config::StepPolicy;
use crate::core::cycle_control::{CycleControl, CycleTrigger};
use crate::core::pipeline::latches::ExResEntry;
use crate::core::pipeline::signals::{ControlSignals, StallReason};
use crate::protocol::command::DecodedCommand;
use crate::protocol::opcodes::{Opcode, ResponseKind};

/// Everything the EX stage reads in one cycle.
#[derive(Clone, Copy, Debug)]
pub struct ExecuteInputs<'a> {
    /// Decoded head of the receive FIFO, `None` when it is empty.
    pub command: Option<DecodedCommand>,
    /// Transmit FIFO has no free slot.
    pub tx_full: bool,
    /// Transmit FIFO has at most one free slot.
    pub tx_almost_full: bool,
    /// The EX/RES latch holds a response that RESPOND enqueues this cycle.
    pub response_pending: bool,
    /// Current cycle-control state.
    pub cycle: &'a CycleControl,
    /// STEP re-arm policy.
    pub step_policy: StepPolicy,
}

/// Everything the EX stage drives in one cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExecuteOutput {
    /// Single-cycle strobes.
    pub signals: ControlSignals,
    /// Experiment address lines.
    pub exp_addr: u64,
    /// Experiment write-data lines.
    pub exp_data_write: u64,
    /// Value the EX/RES latch takes at the coming edge.
    pub latch_next: ExResEntry,
    /// Set when nothing was accepted.
    pub stall: Option<StallReason>,
}

/// Returns `true` if a new response could not be guaranteed a transmit slot.
///
/// A response already in the EX/RES latch takes the last free slot this cycle,
/// so an almost-full FIFO blocks acceptance while one is pending.
#[inline]
pub const fn tx_blocked(tx_full: bool, tx_almost_full: bool, response_pending: bool) -> bool {
    tx_full || (tx_almost_full && response_pending)
}

/// Runs command control for one cycle.
///
/// Besides a full transmit FIFO, acceptance also stalls on an almost-full FIFO
/// while a response is pending (see [`tx_blocked`]), so every accepted command
/// is answered.
pub fn execute_stage(inputs: &ExecuteInputs<'_>) -> ExecuteOutput {
    let Some(cmd) = inputs.command else {
        return stalled(StallReason::RxEmpty, 0, 0);
    };

    if tx_blocked(inputs.tx_full, inputs.tx_almost_full, inputs.response_pending) {
        return stalled(StallReason::TxFull, cmd.addr, cmd.data);
    }

    let (result, trigger) = resolve(&cmd, inputs.cycle, inputs.step_policy);
    debug!(
        opcode = %cmd.opcode,
        addr = cmd.addr,
        data = cmd.data,
        value = cmd.value,
        result = %result,
        "EX: command accepted"
    );

    ExecuteOutput {
        signals: ControlSignals {
            rx_dequeue: true,
            exp_wen: matches!(cmd.opcode, Opcode::Write),
            exp_reset: matches!(cmd.opcode, Opcode::Reset),
            trigger,
        },
        exp_addr: cmd.addr,
        exp_data_write: cmd.data,
        latch_next: ExResEntry {
            result,
            nop: false,
            cycle_count: inputs.cycle.cycle_count,
            addr: cmd.addr,
        },
        stall: None,
    }
}

/// Picks the response and cycle trigger for an accepted command.
fn resolve(
    cmd: &DecodedCommand,
    cycle: &CycleControl,
    policy: StepPolicy,
) -> (ResponseKind, Option<CycleTrigger>) {
    let timed = |trigger: CycleTrigger, ok: ResponseKind, rejected: ResponseKind| {
        if cycle.accepts(trigger, policy) {
            (ok, Some(trigger))
        } else {
            (rejected, None)
        }
    };

    match cmd.opcode {
        Opcode::Read => (ResponseKind::Read, None),
        Opcode::Write => (ResponseKind::Write, None),
        Opcode::Reset => (ResponseKind::Reset, None),
        Opcode::Status => (ResponseKind::Status, None),
        Opcode::Step => timed(
            CycleTrigger::Step(cmd.value),
            ResponseKind::Step,
            ResponseKind::StepRejected,
        ),
        Opcode::Start => timed(
            CycleTrigger::Start,
            ResponseKind::Start,
            ResponseKind::StartRejected,
        ),
        Opcode::Pause => timed(
            CycleTrigger::Pause,
            ResponseKind::Pause,
            ResponseKind::PauseRejected,
        ),
        Opcode::Unrecognized(opcode) => (ResponseKind::Unrecognized { opcode }, None),
    }
}

/// Output for a cycle that accepts nothing: no strobes, a bubble into the latch.
const fn stalled(reason: StallReason, exp_addr: u64, exp_data_write: u64) -> ExecuteOutput {
    ExecuteOutput {
        signals: ControlSignals::idle(),
        exp_addr,
        exp_data_write,
        latch_next: ExResEntry::bubble(),
        stall: Some(reason),
    }
}
