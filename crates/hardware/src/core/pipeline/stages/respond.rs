//! Respond (RES) Stage.
//!
//! Builds the reply word for the command the EX stage accepted one cycle earlier
//! and enqueues it to the transmit FIFO. Reads the EX/RES latch, the experiment's
//! registered read-data, and the live cycle-control state (for STATUS).

use tracing::warn;

use crate::config::ProtocolConfig;
use crate::core::cycle_control::CycleControl;
use crate::core::pipeline::latches::ExResEntry;
use crate::protocol::codec::{WordFields, pack};
use crate::protocol::opcodes::ResponseKind;

/// Everything the RESPOND stage reads in one cycle.
#[derive(Clone, Copy, Debug)]
pub struct RespondInputs<'a> {
    /// EX/RES latch contents.
    pub latch: &'a ExResEntry,
    /// Experiment read-data, registered from the address driven last cycle.
    pub read_data: u64,
    /// Live cycle-control state.
    pub cycle: &'a CycleControl,
    /// Transmit FIFO has no free slot.
    pub tx_full: bool,
}

/// What the RESPOND stage does with the transmit FIFO this cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RespondOutcome {
    /// Latch held a bubble.
    Idle,
    /// Pulse enqueue with this word.
    Enqueue(u64),
    /// A response was due but the FIFO was full. Not reachable when EX gates
    /// acceptance correctly; kept observable rather than silently lost.
    Dropped(u64),
}

impl RespondOutcome {
    /// The word on the transmit data lines when enqueue is pulsed.
    pub const fn enqueued(&self) -> Option<u64> {
        match self {
            Self::Enqueue(word) => Some(*word),
            Self::Idle | Self::Dropped(_) => None,
        }
    }
}

/// Runs response composition for one cycle.
pub fn respond_stage(inputs: &RespondInputs<'_>, protocol: &ProtocolConfig) -> RespondOutcome {
    if inputs.latch.nop {
        return RespondOutcome::Idle;
    }
    let word = compose(inputs.latch, inputs.read_data, inputs.cycle, protocol);
    if inputs.tx_full {
        warn!(
            result = %inputs.latch.result,
            word = format_args!("{word:#x}"),
            "RES: transmit FIFO full, response dropped"
        );
        return RespondOutcome::Dropped(word);
    }
    RespondOutcome::Enqueue(word)
}

/// Assembles the response word for a latched result.
///
/// Field use per result:
/// - READ: data = experiment read-data.
/// - STEP / STEP-REJECTED: value = latched cycle count.
/// - STATUS: addr = remaining steps, data = status flags, value = latched cycle count.
/// - UNRECOGNIZED: data = echoed command opcode, address zero.
/// - everything else: address echo only.
pub fn compose(
    latch: &ExResEntry,
    read_data: u64,
    cycle: &CycleControl,
    protocol: &ProtocolConfig,
) -> u64 {
    let mut fields = WordFields {
        opcode: protocol.responses.code(latch.result),
        addr: latch.addr,
        data: 0,
        value: 0,
    };

    match latch.result {
        ResponseKind::Read => fields.data = read_data,
        ResponseKind::Step | ResponseKind::StepRejected => fields.value = latch.cycle_count,
        ResponseKind::Status => {
            fields.addr = cycle.remaining;
            fields.data = cycle.status_flags();
            fields.value = latch.cycle_count;
        }
        ResponseKind::Unrecognized { opcode } => {
            fields.addr = 0;
            fields.data = opcode;
        }
        ResponseKind::Write
        | ResponseKind::Reset
        | ResponseKind::Start
        | ResponseKind::Pause
        | ResponseKind::StartRejected
        | ResponseKind::PauseRejected => {}
    }

    pack(&fields, &protocol.layout)
}
