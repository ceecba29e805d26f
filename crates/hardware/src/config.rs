//! Configuration system for the experiment controller.
//!
//! This module defines all configuration structures and enums used to parameterize
//! the controller model. It provides:
//! 1. **Defaults:** Baseline word layout, opcode tables, and FIFO depths.
//! 2. **Structures:** Hierarchical config for the protocol, controller, experiment, and run loop.
//! 3. **Validation:** Structural checks (field overlap, opcode fit) applied on every load.
//!
//! Configuration is supplied as JSON (`Config::from_json_str`, `Config::from_file`) or
//! built with `Config::default()`. Every field is optional in JSON; `{}` is a valid document.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::constants::MAX_WORD_WIDTH;
use crate::common::error::ConfigError;

/// Default configuration constants for the controller.
///
/// These values describe the baseline build when a JSON document leaves a
/// field out.
mod defaults {
    use super::FieldRange;

    /// Command/response word width in bits.
    pub const WORD_WIDTH: u32 = 64;

    /// Opcode field, the top byte of the word.
    pub const OPCODE: FieldRange = FieldRange { high: 63, low: 56 };

    /// Address field (20 bits). As wide as the value field so STATUS can
    /// report any step count in it.
    pub const ADDR: FieldRange = FieldRange { high: 55, low: 36 };

    /// Write/read data field (16 bits).
    pub const DATA: FieldRange = FieldRange { high: 35, low: 20 };

    /// Immediate value field (20 bits), used for step counts and cycle counts.
    pub const VALUE: FieldRange = FieldRange { high: 19, low: 0 };

    /// Command opcode encodings.
    pub const CMD_READ: u64 = 0x00;
    pub const CMD_WRITE: u64 = 0x01;
    pub const CMD_RESET: u64 = 0x02;
    pub const CMD_STEP: u64 = 0x03;
    pub const CMD_START: u64 = 0x04;
    pub const CMD_PAUSE: u64 = 0x05;
    pub const CMD_STATUS: u64 = 0x06;

    /// Response codes for rejected timing commands.
    pub const RES_STEP_REJECTED: u64 = 0x13;
    pub const RES_START_REJECTED: u64 = 0x14;
    pub const RES_PAUSE_REJECTED: u64 = 0x15;

    /// Response code answering an unrecognized command opcode.
    pub const RES_UNRECOGNIZED: u64 = 0xFF;

    /// Receive FIFO depth in words.
    pub const RX_FIFO_DEPTH: usize = 16;

    /// Transmit FIFO depth in words.
    pub const TX_FIFO_DEPTH: usize = 16;

    /// Registers exposed by the default register-file experiment.
    pub const REGISTERS: usize = 256;

    /// Cycle budget of a single simulator run.
    pub const MAX_CYCLES: u64 = 1_000_000;
}

/// Policy applied when a STEP arrives while a previous STEP is still counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum StepPolicy {
    /// Reject the new STEP and leave the running count untouched.
    #[default]
    Ignore,
    /// Replace the remaining count with the new immediate.
    Restart,
    /// Add the new immediate to the remaining count (saturating).
    Extend,
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use expctl_core::config::{Config, StepPolicy};
///
/// let json = r#"{
///     "controller": { "step_policy": "Extend", "tx_fifo_depth": 4 },
///     "protocol": { "commands": { "read": 7, "status": 0 } }
/// }"#;
///
/// let config = Config::from_json_str(json).unwrap();
/// assert_eq!(config.controller.step_policy, StepPolicy::Extend);
/// assert_eq!(config.controller.tx_fifo_depth, 4);
/// assert_eq!(config.protocol.commands.read, 7);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Run-loop settings
    #[serde(default)]
    pub general: GeneralConfig,
    /// Word layout and opcode tables
    #[serde(default)]
    pub protocol: ProtocolConfig,
    /// Controller behaviour and FIFO sizing
    #[serde(default)]
    pub controller: ControllerConfig,
    /// Register-file experiment shape
    #[serde(default)]
    pub experiment: ExperimentConfig,
}

impl Config {
    /// Parses and validates a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed documents and any validation
    /// error reported by [`Config::validate`].
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// errors of [`Config::from_json_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Checks the structural invariants every component relies on.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.protocol.validate()?;
        self.controller.validate()?;
        self.experiment.validate()
    }
}

/// Run-loop settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Emit a trace event for every controller cycle
    #[serde(default)]
    pub trace: bool,

    /// Cycle budget of a single simulator run
    #[serde(default = "GeneralConfig::default_max_cycles")]
    pub max_cycles: u64,
}

impl GeneralConfig {
    /// Returns the default cycle budget.
    fn default_max_cycles() -> u64 {
        defaults::MAX_CYCLES
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            trace: false,
            max_cycles: defaults::MAX_CYCLES,
        }
    }
}

/// Inclusive bit range `[high:low]` of one field within a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FieldRange {
    /// Most significant bit of the field (inclusive).
    pub high: u32,
    /// Least significant bit of the field (inclusive).
    pub low: u32,
}

impl FieldRange {
    /// Creates a range covering bits `high` down to `low`, both inclusive.
    pub const fn new(high: u32, low: u32) -> Self {
        Self { high, low }
    }

    /// Number of bits in the field.
    pub const fn width(&self) -> u32 {
        self.high.saturating_add(1).saturating_sub(self.low)
    }

    /// All-ones mask of the field width, right-aligned.
    pub const fn mask(&self) -> u64 {
        let width = self.width();
        if width >= u64::BITS {
            u64::MAX
        } else {
            (1 << width) - 1
        }
    }

    /// Returns `true` if the two ranges share any bit.
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.low <= other.high && other.low <= self.high
    }
}

/// Placement of the four command/response fields within a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FieldLayout {
    /// Total word width in bits
    #[serde(default = "FieldLayout::default_word_width")]
    pub word_width: u32,
    /// Opcode field
    #[serde(default = "FieldLayout::default_opcode")]
    pub opcode: FieldRange,
    /// Peripheral address field
    #[serde(default = "FieldLayout::default_addr")]
    pub addr: FieldRange,
    /// Write/read data field
    #[serde(default = "FieldLayout::default_data")]
    pub data: FieldRange,
    /// Immediate value field (step count, cycle count)
    #[serde(default = "FieldLayout::default_value")]
    pub value: FieldRange,
}

impl FieldLayout {
    fn default_word_width() -> u32 {
        defaults::WORD_WIDTH
    }

    fn default_opcode() -> FieldRange {
        defaults::OPCODE
    }

    fn default_addr() -> FieldRange {
        defaults::ADDR
    }

    fn default_data() -> FieldRange {
        defaults::DATA
    }

    fn default_value() -> FieldRange {
        defaults::VALUE
    }

    /// Named fields in word order, used by validation and diagnostics.
    pub const fn fields(&self) -> [(&'static str, FieldRange); 4] {
        [
            ("opcode", self.opcode),
            ("addr", self.addr),
            ("data", self.data),
            ("value", self.value),
        ]
    }

    /// Checks that every field is well formed, inside the word, and disjoint,
    /// and that the address field is at least as wide as the value field.
    ///
    /// # Errors
    ///
    /// Returns the first violated layout invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.word_width == 0 || self.word_width > MAX_WORD_WIDTH {
            return Err(ConfigError::WordWidth(self.word_width));
        }
        let fields = self.fields();
        for (field, range) in fields {
            if range.high < range.low {
                return Err(ConfigError::InvalidRange {
                    field,
                    high: range.high,
                    low: range.low,
                });
            }
            if range.high >= self.word_width {
                return Err(ConfigError::FieldOutsideWord {
                    field,
                    high: range.high,
                    word_width: self.word_width,
                });
            }
        }
        for (i, &(first, a)) in fields.iter().enumerate() {
            for &(second, b) in &fields[i + 1..] {
                if a.overlaps(&b) {
                    return Err(ConfigError::Overlap { first, second });
                }
            }
        }
        if self.addr.width() < self.value.width() {
            return Err(ConfigError::AddrNarrowerThanValue {
                addr_width: self.addr.width(),
                value_width: self.value.width(),
            });
        }
        Ok(())
    }
}

impl Default for FieldLayout {
    fn default() -> Self {
        Self {
            word_width: defaults::WORD_WIDTH,
            opcode: defaults::OPCODE,
            addr: defaults::ADDR,
            data: defaults::DATA,
            value: defaults::VALUE,
        }
    }
}

/// Encodings of the seven command opcodes.
///
/// Any opcode bit pattern not listed here is an unrecognized command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CommandOpcodes {
    /// READ(addr)
    pub read: u64,
    /// WRITE(addr, data)
    pub write: u64,
    /// RESET: one-cycle reset pulse to the experiment
    pub reset: u64,
    /// STEP(value): clock the experiment for `value` cycles
    pub step: u64,
    /// START: free-run the experiment clock
    pub start: u64,
    /// PAUSE: stop free-running
    pub pause: u64,
    /// STATUS: report cycle-control state
    pub status: u64,
}

impl CommandOpcodes {
    /// Named codes, used by validation and diagnostics.
    pub const fn entries(&self) -> [(&'static str, u64); 7] {
        [
            ("read", self.read),
            ("write", self.write),
            ("reset", self.reset),
            ("step", self.step),
            ("start", self.start),
            ("pause", self.pause),
            ("status", self.status),
        ]
    }
}

impl Default for CommandOpcodes {
    fn default() -> Self {
        Self {
            read: defaults::CMD_READ,
            write: defaults::CMD_WRITE,
            reset: defaults::CMD_RESET,
            step: defaults::CMD_STEP,
            start: defaults::CMD_START,
            pause: defaults::CMD_PAUSE,
            status: defaults::CMD_STATUS,
        }
    }
}

/// Encodings of the response opcodes placed in the reply word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResponseOpcodes {
    /// READ answered, data field carries the register value
    pub read: u64,
    /// WRITE performed
    pub write: u64,
    /// RESET pulse issued
    pub reset: u64,
    /// STEP armed, value field carries the cycle count
    pub step: u64,
    /// START accepted, experiment now free-running
    pub start: u64,
    /// PAUSE accepted, experiment clock stopped
    pub pause: u64,
    /// STATUS report
    pub status: u64,
    /// STEP refused (free-running, or a count is already running)
    pub step_rejected: u64,
    /// START refused (already free-running)
    pub start_rejected: u64,
    /// PAUSE refused (not free-running)
    pub pause_rejected: u64,
    /// Command opcode not recognised; data field echoes it
    pub unrecognized: u64,
}

impl ResponseOpcodes {
    /// Named codes, used by validation and diagnostics.
    pub const fn entries(&self) -> [(&'static str, u64); 11] {
        [
            ("read", self.read),
            ("write", self.write),
            ("reset", self.reset),
            ("step", self.step),
            ("start", self.start),
            ("pause", self.pause),
            ("status", self.status),
            ("step_rejected", self.step_rejected),
            ("start_rejected", self.start_rejected),
            ("pause_rejected", self.pause_rejected),
            ("unrecognized", self.unrecognized),
        ]
    }
}

impl Default for ResponseOpcodes {
    fn default() -> Self {
        Self {
            read: defaults::CMD_READ,
            write: defaults::CMD_WRITE,
            reset: defaults::CMD_RESET,
            step: defaults::CMD_STEP,
            start: defaults::CMD_START,
            pause: defaults::CMD_PAUSE,
            status: defaults::CMD_STATUS,
            step_rejected: defaults::RES_STEP_REJECTED,
            start_rejected: defaults::RES_START_REJECTED,
            pause_rejected: defaults::RES_PAUSE_REJECTED,
            unrecognized: defaults::RES_UNRECOGNIZED,
        }
    }
}

/// Word layout plus both opcode tables: everything needed to encode or decode a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct ProtocolConfig {
    /// Field placement
    #[serde(default)]
    pub layout: FieldLayout,
    /// Command opcode encodings
    #[serde(default)]
    pub commands: CommandOpcodes,
    /// Response opcode encodings
    #[serde(default)]
    pub responses: ResponseOpcodes,
}

impl ProtocolConfig {
    /// Validates the layout and both opcode tables against it.
    ///
    /// # Errors
    ///
    /// Returns the first layout error, oversized code, or duplicated code.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout.validate()?;
        let width = self.layout.opcode.width();
        let mask = self.layout.opcode.mask();
        check_table("command", &self.commands.entries(), width, mask)?;
        check_table("response", &self.responses.entries(), width, mask)
    }
}

/// Checks one opcode table for codes that overflow the field or collide.
fn check_table(
    table: &'static str,
    entries: &[(&'static str, u64)],
    width: u32,
    mask: u64,
) -> Result<(), ConfigError> {
    for (i, &(name, code)) in entries.iter().enumerate() {
        if code & !mask != 0 {
            return Err(ConfigError::OpcodeTooWide {
                table,
                name,
                code,
                width,
            });
        }
        if let Some(&(first, _)) = entries[..i].iter().find(|(_, c)| *c == code) {
            return Err(ConfigError::DuplicateOpcode {
                table,
                first,
                second: name,
                code,
            });
        }
    }
    Ok(())
}

/// Controller behaviour and FIFO sizing.
#[derive(Debug, Clone, Deserialize)]
pub struct ControllerConfig {
    /// What a STEP does while another STEP is still counting
    #[serde(default)]
    pub step_policy: StepPolicy,

    /// Receive FIFO depth in words
    #[serde(default = "ControllerConfig::default_rx_depth")]
    pub rx_fifo_depth: usize,

    /// Transmit FIFO depth in words
    #[serde(default = "ControllerConfig::default_tx_depth")]
    pub tx_fifo_depth: usize,
}

impl ControllerConfig {
    fn default_rx_depth() -> usize {
        defaults::RX_FIFO_DEPTH
    }

    fn default_tx_depth() -> usize {
        defaults::TX_FIFO_DEPTH
    }

    /// Rejects FIFOs without storage.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroDepth`] naming the empty FIFO.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rx_fifo_depth == 0 {
            return Err(ConfigError::ZeroDepth("rx"));
        }
        if self.tx_fifo_depth == 0 {
            return Err(ConfigError::ZeroDepth("tx"));
        }
        Ok(())
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            step_policy: StepPolicy::default(),
            rx_fifo_depth: defaults::RX_FIFO_DEPTH,
            tx_fifo_depth: defaults::TX_FIFO_DEPTH,
        }
    }
}

/// Shape of the register-file experiment used by the simulator.
#[derive(Debug, Clone, Deserialize)]
pub struct ExperimentConfig {
    /// Number of addressable registers
    #[serde(default = "ExperimentConfig::default_registers")]
    pub registers: usize,

    /// Register that mirrors the count of enabled experiment clock edges
    #[serde(default)]
    pub counter_register: Option<u64>,
}

impl ExperimentConfig {
    fn default_registers() -> usize {
        defaults::REGISTERS
    }

    /// Checks the register file is non-empty and holds the counter register.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoRegisters`] or [`ConfigError::CounterOutOfRange`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.registers == 0 {
            return Err(ConfigError::NoRegisters);
        }
        match self.counter_register {
            Some(register) if usize::try_from(register).map_or(true, |r| r >= self.registers) => {
                Err(ConfigError::CounterOutOfRange {
                    register,
                    registers: self.registers,
                })
            }
            _ => Ok(()),
        }
    }
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            registers: defaults::REGISTERS,
            counter_register: None,
        }
    }
}
