//! Host command scripts.
//!
//! A script lists what the host sends, one item per line:
//!
//! ```text
//! # comments run to end of line
//! write 0x10 0xBEEF
//! read 0x10
//! step 5
//! idle 8
//! status
//! raw 0xFF00000000000000
//! ```
//!
//! Numbers are decimal or `0x`-prefixed hexadecimal; `_` separators are allowed.

use crate::common::error::ScriptError;
use crate::protocol::command::Command;

/// One line of a script.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScriptItem {
    /// Push a command word into the receive FIFO.
    Send(Command),
    /// Send nothing for this many cycles.
    Idle(u64),
}

/// Parses a script. Blank and comment-only lines are skipped.
///
/// # Errors
///
/// Returns the first [`ScriptError`] found, tagged with its one-based line number.
pub fn parse_script(text: &str) -> Result<Vec<ScriptItem>, ScriptError> {
    let mut items = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let body = raw.split_once('#').map_or(raw, |(code, _)| code);
        let mut tokens = body.split_whitespace();
        let Some(mnemonic) = tokens.next() else {
            continue;
        };
        let operands: Vec<&str> = tokens.collect();
        items.push(parse_line(line, mnemonic, &operands)?);
    }
    Ok(items)
}

fn parse_line(line: usize, mnemonic: &str, operands: &[&str]) -> Result<ScriptItem, ScriptError> {
    let lower = mnemonic.to_ascii_lowercase();
    let (name, expected): (&'static str, usize) = match lower.as_str() {
        "read" => ("read", 1),
        "write" => ("write", 2),
        "reset" => ("reset", 0),
        "step" => ("step", 1),
        "start" => ("start", 0),
        "pause" => ("pause", 0),
        "status" => ("status", 0),
        "raw" => ("raw", 1),
        "idle" => ("idle", 1),
        _ => {
            return Err(ScriptError::UnknownCommand {
                line,
                command: mnemonic.to_string(),
            });
        }
    };
    if operands.len() != expected {
        return Err(ScriptError::OperandCount {
            line,
            command: name,
            expected,
            found: operands.len(),
        });
    }

    let arg = |i: usize| parse_number(line, operands[i]);
    let item = match name {
        "read" => ScriptItem::Send(Command::Read { addr: arg(0)? }),
        "write" => ScriptItem::Send(Command::Write {
            addr: arg(0)?,
            data: arg(1)?,
        }),
        "reset" => ScriptItem::Send(Command::Reset),
        "step" => ScriptItem::Send(Command::Step { cycles: arg(0)? }),
        "start" => ScriptItem::Send(Command::Start),
        "pause" => ScriptItem::Send(Command::Pause),
        "status" => ScriptItem::Send(Command::Status),
        "raw" => ScriptItem::Send(Command::Raw(arg(0)?)),
        _ => ScriptItem::Idle(arg(0)?),
    };
    Ok(item)
}

fn parse_number(line: usize, token: &str) -> Result<u64, ScriptError> {
    let cleaned = token.replace('_', "");
    let parsed = match cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => cleaned.parse::<u64>(),
    };
    parsed.map_err(|_| ScriptError::BadNumber {
        line,
        token: token.to_string(),
    })
}
