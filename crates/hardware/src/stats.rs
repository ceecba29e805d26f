//! Controller statistics collection and reporting.
//!
//! This module tracks what the controller did over a run. It provides:
//! 1. **Throughput:** Cycles, accepted commands, and responses sent.
//! 2. **Command mix:** Counts per opcode, plus rejected and unrecognized commands.
//! 3. **Stalls:** Idle cycles (nothing queued) and backpressure cycles (transmit full).
//! 4. **Clocking:** Cycles with the experiment clock enabled, and reset events.

use std::time::Instant;

use crate::core::controller::Evaluation;
use crate::core::pipeline::signals::StallReason;
use crate::core::pipeline::stages::respond::RespondOutcome;
use crate::protocol::opcodes::Opcode;

/// Controller statistics structure.
#[derive(Clone, Debug)]
pub struct ControllerStats {
    start_time: Instant,
    /// Controller clock cycles committed.
    pub cycles: u64,
    /// Commands dequeued by the EX stage.
    pub commands_accepted: u64,
    /// Responses enqueued by the RESPOND stage.
    pub responses_sent: u64,
    /// Responses discarded because the transmit FIFO was full.
    pub responses_dropped: u64,

    /// Cycles with an empty receive FIFO.
    pub idle_cycles: u64,
    /// Cycles where a queued command waited on transmit space.
    pub stalls_tx_full: u64,

    /// Cycles with the experiment clock enabled.
    pub experiment_cycles: u64,
    /// Times the reset line was asserted.
    pub reset_events: u64,

    /// READ commands accepted.
    pub cmd_read: u64,
    /// WRITE commands accepted.
    pub cmd_write: u64,
    /// RESET commands accepted.
    pub cmd_reset: u64,
    /// STEP commands accepted.
    pub cmd_step: u64,
    /// START commands accepted.
    pub cmd_start: u64,
    /// PAUSE commands accepted.
    pub cmd_pause: u64,
    /// STATUS commands accepted.
    pub cmd_status: u64,
    /// Timing commands answered with a rejection.
    pub cmd_rejected: u64,
    /// Commands with an unrecognized opcode.
    pub cmd_unrecognized: u64,
}

impl Default for ControllerStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            commands_accepted: 0,
            responses_sent: 0,
            responses_dropped: 0,
            idle_cycles: 0,
            stalls_tx_full: 0,
            experiment_cycles: 0,
            reset_events: 0,
            cmd_read: 0,
            cmd_write: 0,
            cmd_reset: 0,
            cmd_step: 0,
            cmd_start: 0,
            cmd_pause: 0,
            cmd_status: 0,
            cmd_rejected: 0,
            cmd_unrecognized: 0,
        }
    }
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"commands"`, `"clocking"`.
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "commands", "clocking"];

impl ControllerStats {
    /// Folds one evaluated cycle into the counters.
    pub fn record(&mut self, eval: &Evaluation) {
        self.cycles += 1;
        if eval.outputs.exp_clk_en {
            self.experiment_cycles += 1;
        }
        match eval.stall {
            Some(StallReason::RxEmpty) => self.idle_cycles += 1,
            Some(StallReason::TxFull) => self.stalls_tx_full += 1,
            None => {}
        }
        match eval.respond {
            RespondOutcome::Enqueue(_) => self.responses_sent += 1,
            RespondOutcome::Dropped(_) => self.responses_dropped += 1,
            RespondOutcome::Idle => {}
        }
        let Some((opcode, result)) = eval.accepted else {
            return;
        };
        self.commands_accepted += 1;
        if result.is_rejection() {
            self.cmd_rejected += 1;
        }
        let counter = match opcode {
            Opcode::Read => &mut self.cmd_read,
            Opcode::Write => &mut self.cmd_write,
            Opcode::Reset => &mut self.cmd_reset,
            Opcode::Step => &mut self.cmd_step,
            Opcode::Start => &mut self.cmd_start,
            Opcode::Pause => &mut self.cmd_pause,
            Opcode::Status => &mut self.cmd_status,
            Opcode::Unrecognized(_) => &mut self.cmd_unrecognized,
        };
        *counter += 1;
    }

    /// Prints only the requested statistics sections to stdout.
    ///
    /// Each element of `sections` should be one of [`STATS_SECTIONS`]. Pass an
    /// empty slice to print all sections (same as `print()`).
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let seconds = self.start_time.elapsed().as_secs_f64();
        let cyc = self.cycles.max(1) as f64;
        let cmds = self.commands_accepted.max(1) as f64;

        if want("summary") {
            let khz = if seconds > 0.0 {
                (self.cycles as f64 / seconds) / 1000.0
            } else {
                0.0
            };
            println!("\n==========================================================");
            println!("EXPERIMENT CONTROLLER STATISTICS");
            println!("==========================================================");
            println!("host_seconds             {seconds:.4} s");
            println!("sim_cycles               {}", self.cycles);
            println!("sim_freq                 {khz:.2} kHz");
            println!("commands_accepted        {}", self.commands_accepted);
            println!("responses_sent           {}", self.responses_sent);
            println!("responses_dropped        {}", self.responses_dropped);
            println!(
                "commands_per_cycle       {:.4}",
                self.commands_accepted as f64 / cyc
            );
            println!(
                "  stalls.rx_empty        {} ({:.2}%)",
                self.idle_cycles,
                (self.idle_cycles as f64 / cyc) * 100.0
            );
            println!(
                "  stalls.tx_full         {} ({:.2}%)",
                self.stalls_tx_full,
                (self.stalls_tx_full as f64 / cyc) * 100.0
            );
            println!("----------------------------------------------------------");
        }
        if want("commands") {
            println!("COMMAND MIX");
            let rows = [
                ("cmd.read", self.cmd_read),
                ("cmd.write", self.cmd_write),
                ("cmd.reset", self.cmd_reset),
                ("cmd.step", self.cmd_step),
                ("cmd.start", self.cmd_start),
                ("cmd.pause", self.cmd_pause),
                ("cmd.status", self.cmd_status),
                ("cmd.unrecognized", self.cmd_unrecognized),
                ("cmd.rejected", self.cmd_rejected),
            ];
            for (name, count) in rows {
                println!(
                    "  {name:<22} {count} ({:.2}%)",
                    (count as f64 / cmds) * 100.0
                );
            }
            println!("----------------------------------------------------------");
        }
        if want("clocking") {
            println!("EXPERIMENT CLOCK");
            println!(
                "  clk_en.cycles          {} ({:.2}%)",
                self.experiment_cycles,
                (self.experiment_cycles as f64 / cyc) * 100.0
            );
            println!("  reset.events           {}", self.reset_events);
        }
        println!("==========================================================");
    }

    /// Prints all statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
