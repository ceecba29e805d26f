//! Experiment peripheral interface.
//!
//! This module defines the `Experiment` trait implemented by every peripheral the
//! controller can drive. It provides:
//! 1. **Identification:** `name` for logs and reports.
//! 2. **Read path:** `read_data`, the registered output sampled by the RESPOND stage.
//! 3. **Edge:** `clock`, applying address, write, reset, and clock-enable at each controller edge.
//! 4. **Downcasting:** Optional cast to the built-in register file for inspection.

use crate::soc::devices::RegisterFile;

/// Signals presented to the experiment at one controller clock edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExperimentPort {
    /// Register address.
    pub addr: u64,
    /// Data to store when `wen` is set.
    pub data_write: u64,
    /// Write-enable pulse.
    pub wen: bool,
    /// Reset pulse.
    pub reset: bool,
    /// Experiment clock-enable level.
    pub clk_en: bool,
}

/// An addressable peripheral clocked by the controller.
///
/// The register interface (`addr`, `wen`, `reset`, `read_data`) runs on every
/// controller edge. `clk_en` gates only the experiment's own logic.
pub trait Experiment {
    /// Returns a short name for this experiment (e.g., `"REGFILE"`).
    fn name(&self) -> &'static str;

    /// Registered read-data output: the value at the address presented on the last edge.
    fn read_data(&self) -> u64;

    /// Applies one controller clock edge.
    fn clock(&mut self, port: &ExperimentPort);

    /// Returns a reference as `RegisterFile` if this experiment is one; otherwise `None`.
    fn as_register_file(&self) -> Option<&RegisterFile> {
        None
    }
}
