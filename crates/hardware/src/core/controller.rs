//! Top-level controller.
//!
//! Composes command control, cycle control, and response composition into one
//! synchronous step. Each [`Controller::tick`] first evaluates every next value
//! from the current, immutable state and inputs ([`Controller::evaluate`]) and only
//! then commits them, so no stage ever observes another stage's same-cycle update.

use tracing::trace;

use crate::config::{Config, ProtocolConfig, StepPolicy};
use crate::core::cycle_control::CycleControl;
use crate::core::pipeline::latches::ExRes;
use crate::core::pipeline::signals::StallReason;
use crate::core::pipeline::stages::execute::ExecuteInputs;
use crate::core::pipeline::stages::respond::{RespondInputs, RespondOutcome};
use crate::core::pipeline::stages::{execute_stage, respond_stage};
use crate::core::pipeline::traits::PipelineLatch;
use crate::protocol::command::decode;
use crate::protocol::opcodes::{Opcode, ResponseKind};
use crate::stats::ControllerStats;

/// Signals sampled by the controller in one cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControllerInputs {
    /// Word at the head of the receive FIFO; `None` means the FIFO is empty.
    pub rx_head: Option<u64>,
    /// Transmit FIFO full flag.
    pub tx_full: bool,
    /// Transmit FIFO almost-full flag (at most one free slot).
    pub tx_almost_full: bool,
    /// Experiment read-data output.
    pub exp_read_data: u64,
}

/// Signals driven by the controller in one cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControllerOutputs {
    /// Receive FIFO dequeue pulse.
    pub rx_dequeue: bool,
    /// Transmit FIFO enqueue pulse.
    pub tx_enqueue: bool,
    /// Transmit FIFO data, meaningful while `tx_enqueue` is set.
    pub tx_data: u64,
    /// Experiment address.
    pub exp_addr: u64,
    /// Experiment write data.
    pub exp_data_write: u64,
    /// Experiment write-enable pulse.
    pub exp_wen: bool,
    /// Experiment reset pulse.
    pub exp_reset: bool,
    /// Experiment clock-enable level.
    pub exp_clk_en: bool,
}

/// All stored state of the controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControllerState {
    /// EX/RES pipeline register.
    pub ex_res: ExRes,
    /// Cycle-control mode and counters.
    pub cycle: CycleControl,
}

/// Result of evaluating one cycle without committing it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Evaluation {
    /// Signals driven this cycle.
    pub outputs: ControllerOutputs,
    /// State after the coming edge.
    pub next: ControllerState,
    /// Command accepted by the EX stage and the result it was given.
    pub accepted: Option<(Opcode, ResponseKind)>,
    /// Why the EX stage accepted nothing.
    pub stall: Option<StallReason>,
    /// What the RESPOND stage did.
    pub respond: RespondOutcome,
}

/// The fixed-latency command controller.
#[derive(Debug, Clone)]
pub struct Controller {
    protocol: ProtocolConfig,
    step_policy: StepPolicy,
    trace: bool,
    state: ControllerState,
    /// Counters updated on every committed cycle.
    pub stats: ControllerStats,
}

impl Controller {
    /// Creates a controller in its reset state.
    ///
    /// `config` is assumed validated (see [`Config::validate`]).
    pub fn new(config: &Config) -> Self {
        Self {
            protocol: config.protocol,
            step_policy: config.controller.step_policy,
            trace: config.general.trace,
            state: ControllerState::default(),
            stats: ControllerStats::default(),
        }
    }

    /// Current stored state.
    pub const fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Word protocol in use.
    pub const fn protocol(&self) -> &ProtocolConfig {
        &self.protocol
    }

    /// Experiment clock-enable for the current cycle.
    pub const fn clock_enable(&self) -> bool {
        self.state.cycle.clock_enable()
    }

    /// `true` when no response is waiting in the EX/RES latch.
    pub fn is_idle(&self) -> bool {
        self.state.ex_res.is_empty()
    }

    /// Computes this cycle's outputs and next state without changing anything.
    pub fn evaluate(&self, inputs: &ControllerInputs) -> Evaluation {
        let state = &self.state;
        let command = inputs.rx_head.map(|word| decode(word, &self.protocol));

        let ex = execute_stage(&ExecuteInputs {
            command,
            tx_full: inputs.tx_full,
            tx_almost_full: inputs.tx_almost_full,
            response_pending: !state.ex_res.is_empty(),
            cycle: &state.cycle,
            step_policy: self.step_policy,
        });

        let respond = respond_stage(
            &RespondInputs {
                latch: &state.ex_res.entry,
                read_data: inputs.exp_read_data,
                cycle: &state.cycle,
                tx_full: inputs.tx_full,
            },
            &self.protocol,
        );

        let cycle_next = state.cycle.next(
            ex.signals.trigger,
            self.step_policy,
            self.protocol.layout.value.mask(),
        );

        let outputs = ControllerOutputs {
            rx_dequeue: ex.signals.rx_dequeue,
            tx_enqueue: respond.enqueued().is_some(),
            tx_data: respond.enqueued().unwrap_or(0),
            exp_addr: ex.exp_addr,
            exp_data_write: ex.exp_data_write,
            exp_wen: ex.signals.exp_wen,
            exp_reset: ex.signals.exp_reset,
            exp_clk_en: state.cycle.clock_enable(),
        };

        Evaluation {
            outputs,
            next: ControllerState {
                ex_res: ExRes {
                    entry: ex.latch_next,
                },
                cycle: cycle_next,
            },
            accepted: command
                .filter(|_| ex.signals.rx_dequeue)
                .map(|cmd| (cmd.opcode, ex.latch_next.result)),
            stall: ex.stall,
            respond,
        }
    }

    /// Advances one clock: evaluates, commits, and returns the driven signals.
    pub fn tick(&mut self, inputs: &ControllerInputs) -> ControllerOutputs {
        let eval = self.evaluate(inputs);
        if self.trace {
            trace!(
                cycle = self.stats.cycles,
                rx_dequeue = eval.outputs.rx_dequeue,
                tx_enqueue = eval.outputs.tx_enqueue,
                clk_en = eval.outputs.exp_clk_en,
                remaining = self.state.cycle.remaining,
                "tick"
            );
        }
        self.stats.record(&eval);
        self.state = eval.next;
        eval.outputs
    }

    /// Asserts the reset line: every stored value returns to its initial state.
    ///
    /// A response still in the EX/RES latch is discarded.
    pub fn reset(&mut self) {
        self.state.ex_res.flush();
        self.state.cycle = CycleControl::new();
        self.stats.reset_events += 1;
    }
}
