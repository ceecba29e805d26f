//! Register-file experiment.
//!
//! A bank of data-width registers that echoes the last value written to each
//! address. Read-data is registered: it reflects the address presented on the
//! previous edge, after that edge's write (write-first). An optional counter
//! register mirrors the number of enabled experiment clock edges, which makes
//! STEP/START/PAUSE observable through ordinary READ commands.

use crate::config::Config;
use crate::soc::traits::{Experiment, ExperimentPort};

/// Register-file experiment.
#[derive(Clone, Debug)]
pub struct RegisterFile {
    regs: Vec<u64>,
    data_mask: u64,
    read_data: u64,
    clocked_cycles: u64,
    counter_register: Option<usize>,
}

impl RegisterFile {
    /// Creates a zeroed register file.
    ///
    /// # Arguments
    ///
    /// * `registers` - Number of addressable registers.
    /// * `data_mask` - Mask applied to every stored value (the data-field width).
    /// * `counter_register` - Address mirroring the enabled-edge count, if any.
    pub fn new(registers: usize, data_mask: u64, counter_register: Option<u64>) -> Self {
        Self {
            regs: vec![0; registers],
            data_mask,
            read_data: 0,
            clocked_cycles: 0,
            counter_register: counter_register
                .and_then(|r| usize::try_from(r).ok())
                .filter(|&r| r < registers),
        }
    }

    /// Builds the register file described by `config.experiment`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.experiment.registers,
            config.protocol.layout.data.mask(),
            config.experiment.counter_register,
        )
    }

    /// Current value of register `addr`, `None` if out of range.
    pub fn register(&self, addr: u64) -> Option<u64> {
        self.index(addr).map(|i| self.regs[i])
    }

    /// Enabled experiment clock edges since the last reset.
    pub const fn clocked_cycles(&self) -> u64 {
        self.clocked_cycles
    }

    fn index(&self, addr: u64) -> Option<usize> {
        usize::try_from(addr).ok().filter(|&i| i < self.regs.len())
    }
}

impl Experiment for RegisterFile {
    fn name(&self) -> &'static str {
        "REGFILE"
    }

    fn read_data(&self) -> u64 {
        self.read_data
    }

    fn clock(&mut self, port: &ExperimentPort) {
        if port.reset {
            self.regs.fill(0);
            self.clocked_cycles = 0;
            self.read_data = 0;
            return;
        }

        if port.clk_en {
            self.clocked_cycles = self.clocked_cycles.wrapping_add(1);
            if let Some(slot) = self.counter_register {
                self.regs[slot] = self.clocked_cycles & self.data_mask;
            }
        }

        let slot = self.index(port.addr);
        if port.wen
            && let Some(i) = slot
        {
            self.regs[i] = port.data_write & self.data_mask;
        }
        self.read_data = slot.map_or(0, |i| self.regs[i]);
    }

    fn as_register_file(&self) -> Option<&RegisterFile> {
        Some(self)
    }
}
