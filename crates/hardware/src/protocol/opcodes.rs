//! Command and response opcodes.
//!
//! Opcode numbering is configuration: [`CommandOpcodes`] and [`ResponseOpcodes`]
//! map between raw field bits and the enums below.

use std::fmt;

use crate::config::{CommandOpcodes, ResponseOpcodes};

/// A decoded command opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// Read one experiment register.
    Read,
    /// Write one experiment register.
    Write,
    /// Pulse the experiment reset line.
    Reset,
    /// Clock the experiment for an immediate number of cycles.
    Step,
    /// Free-run the experiment clock.
    Start,
    /// Stop free-running.
    Pause,
    /// Report cycle-control state.
    Status,
    /// Bits that match no configured command. Accepted and answered, never executed.
    Unrecognized(u64),
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "READ"),
            Self::Write => write!(f, "WRITE"),
            Self::Reset => write!(f, "RESET"),
            Self::Step => write!(f, "STEP"),
            Self::Start => write!(f, "START"),
            Self::Pause => write!(f, "PAUSE"),
            Self::Status => write!(f, "STATUS"),
            Self::Unrecognized(raw) => write!(f, "UNRECOGNIZED({raw:#x})"),
        }
    }
}

impl CommandOpcodes {
    /// Maps raw opcode bits to a command.
    pub const fn decode(&self, raw: u64) -> Opcode {
        match raw {
            r if r == self.read => Opcode::Read,
            r if r == self.write => Opcode::Write,
            r if r == self.reset => Opcode::Reset,
            r if r == self.step => Opcode::Step,
            r if r == self.start => Opcode::Start,
            r if r == self.pause => Opcode::Pause,
            r if r == self.status => Opcode::Status,
            r => Opcode::Unrecognized(r),
        }
    }

    /// Maps a command to its raw opcode bits.
    pub const fn encode(&self, opcode: Opcode) -> u64 {
        match opcode {
            Opcode::Read => self.read,
            Opcode::Write => self.write,
            Opcode::Reset => self.reset,
            Opcode::Step => self.step,
            Opcode::Start => self.start,
            Opcode::Pause => self.pause,
            Opcode::Status => self.status,
            Opcode::Unrecognized(raw) => raw,
        }
    }
}

/// The result the controller reports for one accepted command.
///
/// Carried in the EX/RES pipeline register and encoded into the response
/// opcode field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResponseKind {
    /// READ answered.
    Read,
    /// WRITE performed.
    Write,
    /// Experiment reset pulsed.
    Reset,
    /// STEP armed.
    Step,
    /// Free-running started.
    Start,
    /// Free-running stopped.
    Pause,
    /// Status report.
    Status,
    /// STEP refused.
    StepRejected,
    /// START refused.
    StartRejected,
    /// PAUSE refused.
    PauseRejected,
    /// Unknown command.
    ///
    /// Answered with the configured `unrecognized` response code. The opcode
    /// field cannot carry the echo, so the command's raw opcode bits travel in
    /// the data field and the address field is zero.
    Unrecognized {
        /// Raw opcode bits of the command being answered.
        opcode: u64,
    },
}

impl ResponseKind {
    /// Returns `true` for the rejected timing commands.
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::StepRejected | Self::StartRejected | Self::PauseRejected
        )
    }
}

impl fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "READ"),
            Self::Write => write!(f, "WRITE"),
            Self::Reset => write!(f, "RESET"),
            Self::Step => write!(f, "STEP"),
            Self::Start => write!(f, "START"),
            Self::Pause => write!(f, "PAUSE"),
            Self::Status => write!(f, "STATUS"),
            Self::StepRejected => write!(f, "STEP-REJECTED"),
            Self::StartRejected => write!(f, "START-REJECTED"),
            Self::PauseRejected => write!(f, "PAUSE-REJECTED"),
            Self::Unrecognized { opcode } => write!(f, "UNRECOGNIZED({opcode:#x})"),
        }
    }
}

impl ResponseOpcodes {
    /// Response opcode bits for a result.
    pub const fn code(&self, kind: ResponseKind) -> u64 {
        match kind {
            ResponseKind::Read => self.read,
            ResponseKind::Write => self.write,
            ResponseKind::Reset => self.reset,
            ResponseKind::Step => self.step,
            ResponseKind::Start => self.start,
            ResponseKind::Pause => self.pause,
            ResponseKind::Status => self.status,
            ResponseKind::StepRejected => self.step_rejected,
            ResponseKind::StartRejected => self.start_rejected,
            ResponseKind::PauseRejected => self.pause_rejected,
            ResponseKind::Unrecognized { .. } => self.unrecognized,
        }
    }

    /// Classifies response opcode bits, host side.
    ///
    /// `data` is the response data field; an unrecognized-command response
    /// carries the echoed opcode there.
    pub const fn classify(&self, raw: u64, data: u64) -> Option<ResponseKind> {
        match raw {
            r if r == self.read => Some(ResponseKind::Read),
            r if r == self.write => Some(ResponseKind::Write),
            r if r == self.reset => Some(ResponseKind::Reset),
            r if r == self.step => Some(ResponseKind::Step),
            r if r == self.start => Some(ResponseKind::Start),
            r if r == self.pause => Some(ResponseKind::Pause),
            r if r == self.status => Some(ResponseKind::Status),
            r if r == self.step_rejected => Some(ResponseKind::StepRejected),
            r if r == self.start_rejected => Some(ResponseKind::StartRejected),
            r if r == self.pause_rejected => Some(ResponseKind::PauseRejected),
            r if r == self.unrecognized => Some(ResponseKind::Unrecognized { opcode: data }),
            _ => None,
        }
    }
}
