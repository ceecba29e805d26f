//! Decoded commands and host-side word helpers.
//!
//! [`DecodedCommand`] is what the EX stage sees each cycle. [`Command`] and
//! [`Response`] are the host's view of the link: building command words and
//! reading response words with the same layout and opcode tables.

use std::fmt;

use crate::common::constants::{STATUS_FLAG_AUTONOMOUS, STATUS_FLAG_STEPPING};
use crate::config::ProtocolConfig;
use crate::protocol::codec::{WordFields, pack, unpack};
use crate::protocol::opcodes::{Opcode, ResponseKind};

/// The fields of the command at the head of the receive FIFO.
///
/// Recomputed every cycle; never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedCommand {
    /// Command opcode.
    pub opcode: Opcode,
    /// Peripheral address.
    pub addr: u64,
    /// Data to write.
    pub data: u64,
    /// Immediate value (step count).
    pub value: u64,
}

/// Decodes a command word. Total: unknown opcodes decode to [`Opcode::Unrecognized`].
pub const fn decode(word: u64, protocol: &ProtocolConfig) -> DecodedCommand {
    let fields = unpack(word, &protocol.layout);
    DecodedCommand {
        opcode: protocol.commands.decode(fields.opcode),
        addr: fields.addr,
        data: fields.data,
        value: fields.value,
    }
}

/// A command as the host issues it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Read register `addr`.
    Read {
        /// Register address.
        addr: u64,
    },
    /// Write `data` to register `addr`.
    Write {
        /// Register address.
        addr: u64,
        /// Value to store.
        data: u64,
    },
    /// Reset the experiment.
    Reset,
    /// Clock the experiment for `cycles` cycles.
    Step {
        /// Number of experiment clock cycles.
        cycles: u64,
    },
    /// Free-run the experiment clock.
    Start,
    /// Stop free-running.
    Pause,
    /// Query cycle-control state.
    Status,
    /// A pre-assembled word, sent as is.
    Raw(u64),
}

impl Command {
    /// Assembles the command word. Operands wider than their field are truncated.
    pub const fn encode(&self, protocol: &ProtocolConfig) -> u64 {
        let ops = &protocol.commands;
        let fields = match *self {
            Self::Read { addr } => WordFields {
                opcode: ops.encode(Opcode::Read),
                addr,
                data: 0,
                value: 0,
            },
            Self::Write { addr, data } => WordFields {
                opcode: ops.encode(Opcode::Write),
                addr,
                data,
                value: 0,
            },
            Self::Reset => bare(ops.encode(Opcode::Reset)),
            Self::Step { cycles } => WordFields {
                opcode: ops.encode(Opcode::Step),
                addr: 0,
                data: 0,
                value: cycles,
            },
            Self::Start => bare(ops.encode(Opcode::Start)),
            Self::Pause => bare(ops.encode(Opcode::Pause)),
            Self::Status => bare(ops.encode(Opcode::Status)),
            Self::Raw(word) => return word,
        };
        pack(&fields, &protocol.layout)
    }
}

const fn bare(opcode: u64) -> WordFields {
    WordFields {
        opcode,
        addr: 0,
        data: 0,
        value: 0,
    }
}

/// A response word as the host reads it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Response {
    /// Raw response opcode bits.
    pub opcode: u64,
    /// Classified result, `None` if the opcode matches no configured response.
    pub kind: Option<ResponseKind>,
    /// Address field.
    pub addr: u64,
    /// Data field.
    pub data: u64,
    /// Value field.
    pub value: u64,
}

impl Response {
    /// Splits and classifies a response word.
    pub const fn decode(word: u64, protocol: &ProtocolConfig) -> Self {
        let fields = unpack(word, &protocol.layout);
        Self {
            opcode: fields.opcode,
            kind: protocol.responses.classify(fields.opcode, fields.data),
            addr: fields.addr,
            data: fields.data,
            value: fields.value,
        }
    }

    /// STATUS responses: the experiment clock is free-running.
    pub const fn autonomous(&self) -> bool {
        self.data & STATUS_FLAG_AUTONOMOUS != 0
    }

    /// STATUS responses: a counted STEP is in progress.
    pub const fn stepping(&self) -> bool {
        self.data & STATUS_FLAG_STEPPING != 0
    }

    /// STATUS responses: steps left in the current count.
    pub const fn remaining_steps(&self) -> u64 {
        self.addr
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            Some(kind) => write!(f, "{:<16}", kind.to_string())?,
            None => write!(f, "{:<16}", format!("?{:#x}", self.opcode))?,
        }
        write!(
            f,
            " addr={:#06x} data={:#06x} value={}",
            self.addr, self.data, self.value
        )
    }
}
