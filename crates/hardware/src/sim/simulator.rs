//! Simulator: plays a host script against a `System`.
//!
//! The host side pushes at most one command word per cycle, waiting while the
//! receive FIFO is full, and drains every response as soon as it appears.

use tracing::{debug, info};

use crate::common::error::SimError;
use crate::config::{Config, ProtocolConfig};
use crate::protocol::command::Response;
use crate::sim::script::ScriptItem;
use crate::soc::System;
use crate::stats::ControllerStats;

/// A response word as the host received it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResponseRecord {
    /// Cycle in which the controller enqueued the word.
    pub cycle: u64,
    /// Raw response word.
    pub word: u64,
    /// Decoded response.
    pub response: Response,
}

/// Outcome of a completed run.
#[derive(Clone, Debug)]
pub struct RunReport {
    /// Responses in arrival order.
    pub responses: Vec<ResponseRecord>,
    /// Command words pushed into the receive FIFO.
    pub sent: usize,
    /// Cycles the run took.
    pub cycles: u64,
}

/// Top-level simulator: a system plus the host driving it.
#[derive(Debug)]
pub struct Simulator {
    /// The simulated system.
    pub system: System,
    protocol: ProtocolConfig,
    max_cycles: u64,
}

impl Simulator {
    /// Creates a simulator around a `RegisterFile` system.
    pub fn new(config: &Config) -> Self {
        Self::with_system(System::new(config), config)
    }

    /// Creates a simulator around an existing system.
    pub fn with_system(system: System, config: &Config) -> Self {
        Self {
            system,
            protocol: config.protocol,
            max_cycles: config.general.max_cycles,
        }
    }

    /// Controller statistics accumulated so far.
    pub const fn stats(&self) -> &ControllerStats {
        &self.system.controller.stats
    }

    /// Runs `script` until every sent command is answered and the pipeline is idle.
    ///
    /// State carries over between runs; the cycle limit applies per run.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::CycleLimit`] if the run needs more than
    /// `general.max_cycles` cycles.
    pub fn run(&mut self, script: &[ScriptItem]) -> Result<RunReport, SimError> {
        let mut cursor = 0;
        let mut wait = 0_u64;
        let mut sent = 0;
        let mut responses = Vec::new();
        let mut elapsed = 0_u64;

        loop {
            let script_done = cursor == script.len() && wait == 0;
            if script_done && responses.len() == sent && self.system.is_quiescent() {
                break;
            }
            if elapsed >= self.max_cycles {
                return Err(SimError::CycleLimit {
                    limit: self.max_cycles,
                    sent,
                    answered: responses.len(),
                });
            }

            if wait > 0 {
                wait -= 1;
            } else {
                while let Some(ScriptItem::Idle(0)) = script.get(cursor) {
                    cursor += 1;
                }
                match script.get(cursor) {
                    Some(ScriptItem::Idle(cycles)) => {
                        wait = cycles - 1;
                        cursor += 1;
                    }
                    Some(ScriptItem::Send(command)) => {
                        let word = command.encode(&self.protocol);
                        if self.system.send(word) {
                            debug!(word, "host sent {command:?}");
                            sent += 1;
                            cursor += 1;
                        }
                    }
                    None => {}
                }
            }

            let report = self.system.tick();
            elapsed += 1;

            while let Some(word) = self.system.receive() {
                responses.push(ResponseRecord {
                    cycle: report.cycle,
                    word,
                    response: Response::decode(word, &self.protocol),
                });
            }
        }

        info!(sent, answered = responses.len(), cycles = elapsed, "script finished");
        Ok(RunReport {
            responses,
            sent,
            cycles: elapsed,
        })
    }
}
