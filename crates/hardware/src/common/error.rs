//! Error definitions.
//!
//! The controller itself is a set of total functions and never fails. Errors only
//! arise on the surfaces around it:
//! 1. **Configuration:** Loading and validating a [`Config`](crate::config::Config).
//! 2. **Scripts:** Parsing host-side command scripts.
//! 3. **Simulation:** Running a script through a [`System`](crate::soc::System).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A field range whose high bit lies below its low bit.
    #[error("field `{field}` has high bit {high} below low bit {low}")]
    InvalidRange {
        /// Name of the offending field.
        field: &'static str,
        /// Inclusive high bit index.
        high: u32,
        /// Inclusive low bit index.
        low: u32,
    },

    /// A field range that reaches past the configured word width.
    #[error("field `{field}` ends at bit {high}, outside a {word_width}-bit word")]
    FieldOutsideWord {
        /// Name of the offending field.
        field: &'static str,
        /// Inclusive high bit index.
        high: u32,
        /// Configured word width in bits.
        word_width: u32,
    },

    /// A word width of zero or wider than the model supports.
    #[error("word width {0} is outside 1..=64 bits")]
    WordWidth(u32),

    /// Two fields share at least one bit.
    #[error("fields `{first}` and `{second}` overlap")]
    Overlap {
        /// First field of the overlapping pair.
        first: &'static str,
        /// Second field of the overlapping pair.
        second: &'static str,
    },

    /// STATUS reports the remaining step count in the address field, so it
    /// must hold any count the value field can carry.
    #[error("address field ({addr_width} bits) is narrower than the value field ({value_width} bits)")]
    AddrNarrowerThanValue {
        /// Width of the address field in bits.
        addr_width: u32,
        /// Width of the value field in bits.
        value_width: u32,
    },

    /// An opcode encoding that does not fit the opcode field.
    #[error("{table} opcode `{name}` = {code:#x} does not fit a {width}-bit opcode field")]
    OpcodeTooWide {
        /// Which table the code belongs to (`command` or `response`).
        table: &'static str,
        /// Opcode name within the table.
        name: &'static str,
        /// The configured code.
        code: u64,
        /// Width of the opcode field in bits.
        width: u32,
    },

    /// Two opcodes in the same table share an encoding.
    #[error("{table} opcodes `{first}` and `{second}` share code {code:#x}")]
    DuplicateOpcode {
        /// Which table the codes belong to.
        table: &'static str,
        /// First opcode name.
        first: &'static str,
        /// Second opcode name.
        second: &'static str,
        /// The shared code.
        code: u64,
    },

    /// A FIFO configured with no storage.
    #[error("{0} FIFO depth must be at least 1")]
    ZeroDepth(&'static str),

    /// An experiment with no registers.
    #[error("experiment must expose at least one register")]
    NoRegisters,

    /// The counter register lies outside the register file.
    #[error("counter register {register} is outside a {registers}-register experiment")]
    CounterOutOfRange {
        /// Configured counter register address.
        register: u64,
        /// Number of registers in the experiment.
        registers: usize,
    },

    /// Malformed JSON or a type mismatch in the configuration document.
    #[error("invalid configuration document: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("cannot read configuration file {path}: {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Errors raised while parsing a host command script.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    /// The first token of a line is not a known command.
    #[error("line {line}: unknown command `{command}`")]
    UnknownCommand {
        /// One-based line number.
        line: usize,
        /// The unrecognised token.
        command: String,
    },

    /// A command was given the wrong number of operands.
    #[error("line {line}: `{command}` takes {expected} operand(s), found {found}")]
    OperandCount {
        /// One-based line number.
        line: usize,
        /// Command mnemonic.
        command: &'static str,
        /// Operands the command takes.
        expected: usize,
        /// Operands actually present.
        found: usize,
    },

    /// An operand that is not a decimal or `0x` hexadecimal number.
    #[error("line {line}: `{token}` is not a number")]
    BadNumber {
        /// One-based line number.
        line: usize,
        /// The offending token.
        token: String,
    },
}

/// Errors raised by a [`Simulator`](crate::sim::Simulator) run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimError {
    /// The run hit the cycle limit before every command was answered.
    #[error("cycle limit {limit} reached with {sent} command(s) sent and {answered} answered")]
    CycleLimit {
        /// The configured limit.
        limit: u64,
        /// Words pushed into the receive FIFO.
        sent: usize,
        /// Responses drained from the transmit FIFO.
        answered: usize,
    },
}
