//! System construction and top-level `System` type.
//!
//! This module wires the controller to its collaborators. It performs:
//! 1. **Queues:** Creates the receive and transmit FIFOs with the configured depths.
//! 2. **Experiment:** Instantiates the register file, or accepts a caller-supplied experiment.
//! 3. **Clocking:** Samples every input, evaluates the controller, then commits all edges together.

use std::fmt;

use tracing::warn;

use crate::config::Config;
use crate::core::{Controller, ControllerInputs, ControllerOutputs};
use crate::soc::devices::RegisterFile;
use crate::soc::fifo::Fifo;
use crate::soc::traits::{Experiment, ExperimentPort};

/// What happened during one system clock cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickReport {
    /// Index of the cycle just committed, counted from construction.
    pub cycle: u64,
    /// Command word removed from the receive FIFO.
    pub dequeued: Option<u64>,
    /// Response word appended to the transmit FIFO.
    pub enqueued: Option<u64>,
    /// Signals the controller drove during the cycle.
    pub outputs: ControllerOutputs,
}

/// Top-level system instance: controller, host FIFOs, and experiment.
pub struct System {
    /// The command controller.
    pub controller: Controller,
    /// Host-to-controller command queue.
    pub rx: Fifo,
    /// Controller-to-host response queue.
    pub tx: Fifo,
    /// Peripheral under control.
    pub experiment: Box<dyn Experiment>,
    cycle: u64,
}

impl System {
    /// Builds a system around a `RegisterFile` experiment.
    ///
    /// # Arguments
    ///
    /// * `config` - Validated configuration (protocol, FIFO depths, register count).
    ///
    /// # Returns
    ///
    /// A `System` in its reset state with empty FIFOs.
    pub fn new(config: &Config) -> Self {
        Self::with_experiment(config, Box::new(RegisterFile::from_config(config)))
    }

    /// Builds a system around a caller-supplied experiment.
    pub fn with_experiment(config: &Config, experiment: Box<dyn Experiment>) -> Self {
        Self {
            controller: Controller::new(config),
            rx: Fifo::new(config.controller.rx_fifo_depth),
            tx: Fifo::new(config.controller.tx_fifo_depth),
            experiment,
            cycle: 0,
        }
    }

    /// Queues a command word from the host. Returns `false` if the receive FIFO is full.
    pub fn send(&mut self, word: u64) -> bool {
        self.rx.push(word)
    }

    /// Takes the oldest response word waiting for the host.
    pub fn receive(&mut self) -> Option<u64> {
        self.tx.pop()
    }

    /// Cycles committed since construction.
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    /// `true` when no command is queued and no response is in flight.
    pub fn is_quiescent(&self) -> bool {
        self.rx.is_empty() && self.controller.is_idle()
    }

    /// Advances the system by one clock cycle.
    ///
    /// All inputs are sampled before anything changes; the FIFO edges, the
    /// experiment edge, and the controller's own state then commit together.
    pub fn tick(&mut self) -> TickReport {
        let inputs = ControllerInputs {
            rx_head: self.rx.head(),
            tx_full: self.tx.is_full(),
            tx_almost_full: self.tx.is_almost_full(),
            exp_read_data: self.experiment.read_data(),
        };
        let outputs = self.controller.tick(&inputs);

        let dequeued = if outputs.rx_dequeue {
            self.rx.pop()
        } else {
            None
        };

        let enqueued = if !outputs.tx_enqueue {
            None
        } else if self.tx.push(outputs.tx_data) {
            Some(outputs.tx_data)
        } else {
            warn!(cycle = self.cycle, word = outputs.tx_data, "transmit FIFO rejected response");
            None
        };

        self.experiment.clock(&ExperimentPort {
            addr: outputs.exp_addr,
            data_write: outputs.exp_data_write,
            wen: outputs.exp_wen,
            reset: outputs.exp_reset,
            clk_en: outputs.exp_clk_en,
        });

        let report = TickReport {
            cycle: self.cycle,
            dequeued,
            enqueued,
            outputs,
        };
        self.cycle += 1;
        report
    }

    /// Asserts the controller's reset line.
    ///
    /// The controller returns to its initial state; queued words and the
    /// experiment are left as they are.
    pub fn assert_reset(&mut self) {
        self.controller.reset();
    }
}

impl fmt::Debug for System {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("System")
            .field("controller", &self.controller)
            .field("rx", &self.rx)
            .field("tx", &self.tx)
            .field("experiment", &self.experiment.name())
            .field("cycle", &self.cycle)
            .finish()
    }
}
