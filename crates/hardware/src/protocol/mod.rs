//! Command/response word protocol.
//!
//! This module covers everything that touches the bits of a link word:
//! 1. **Codec:** Splitting and assembling the opcode, address, data, and value fields.
//! 2. **Opcodes:** Command and response opcode enums and their configurable encodings.
//! 3. **Commands:** The per-cycle decoded command and host-side command/response helpers.

/// Decoded commands, host command builder, and response reader.
pub mod command;

/// Field extraction and insertion over inclusive bit ranges.
pub mod codec;

/// Command and response opcode enums.
pub mod opcodes;

pub use codec::{WordFields, pack, unpack};
pub use command::{Command, DecodedCommand, Response, decode};
pub use opcodes::{Opcode, ResponseKind};
