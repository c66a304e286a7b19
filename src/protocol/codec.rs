//! Protocol codec
//!
//! Encoding and decoding functions for the line protocol.
//!
//! ## Line Format
//! ```text
//! COMMAND param_1 param_2 ... param_n
//!         └──────┬──────┘     └──┬──┘
//!          single tokens    rest of line, may contain spaces
//! ```
//!
//! - Fields are separated by exactly one space
//! - Empty parameters keep their separators (`SETCREDS S  P`)
//! - An empty last parameter is dropped with its separator (`SETSTATE Key`)

use crate::error::{AnnexError, Result};
use super::{Credentials, Message};

/// Field separator
pub const SEPARATOR: char = ' ';

/// Reply keyword carrying a single value
pub const VALUE: &str = "VALUE";

/// Reply keyword carrying a user/password pair
pub const CREDS: &str = "CREDS";

// =============================================================================
// Encoding
// =============================================================================

/// Encode a command and its parameters into one protocol line
///
/// Fails with `InvalidParameter` if a non-last parameter contains a space,
/// or if the command or any parameter contains a line break.
pub fn encode<S: AsRef<str>>(command: &str, params: &[S]) -> Result<String> {
    if command.is_empty() || command.contains(SEPARATOR) {
        return Err(AnnexError::InvalidParameter(format!(
            "command name {:?} must be a single non-empty token",
            command
        )));
    }
    check_no_line_break(command)?;

    let mut line = String::with_capacity(
        command.len() + params.iter().map(|p| p.as_ref().len() + 1).sum::<usize>(),
    );
    line.push_str(command);

    let last = params.len().saturating_sub(1);
    for (index, param) in params.iter().enumerate() {
        let param = param.as_ref();
        check_no_line_break(param)?;

        if index < last && param.contains(SEPARATOR) {
            return Err(AnnexError::InvalidParameter(format!(
                "{}: parameter {} ({:?}) contains a space but is not the last parameter",
                command,
                index + 1,
                param
            )));
        }

        if index == last && param.is_empty() {
            break;
        }

        line.push(SEPARATOR);
        line.push_str(param);
    }

    Ok(line)
}

/// Encode a `Message`
pub fn encode_message(message: &Message) -> Result<String> {
    encode(&message.command, &message.params)
}

fn check_no_line_break(text: &str) -> Result<()> {
    if text.contains(['\n', '\r']) {
        return Err(AnnexError::InvalidParameter(format!(
            "{:?} contains a line break",
            text
        )));
    }
    Ok(())
}

// =============================================================================
// Decoding
// =============================================================================

/// Split a line into its command name and the text after the first separator
pub fn split_command(line: &str) -> (&str, Option<&str>) {
    match line.split_once(SEPARATOR) {
        Some((command, rest)) => (command, Some(rest)),
        None => (line, None),
    }
}

/// Decode a line into a command and exactly `arity` parameters
///
/// The last parameter takes the rest of the line verbatim. Missing trailing
/// parameters decode as empty strings; text beyond a zero-arity command is
/// ignored.
pub fn decode(line: &str, arity: usize) -> Message {
    let (command, rest) = split_command(line);

    let mut params: Vec<String> = match (arity, rest) {
        (0, _) | (_, None) => Vec::with_capacity(arity),
        (_, Some(rest)) => rest.splitn(arity, SEPARATOR).map(str::to_string).collect(),
    };
    params.resize(arity, String::new());

    Message {
        command: command.to_string(),
        params,
    }
}

/// Decode a `VALUE <text>` reply
///
/// A bare `VALUE` yields the empty string.
pub fn decode_value(line: &str) -> Result<String> {
    match split_command(line) {
        (VALUE, rest) => Ok(rest.unwrap_or("").to_string()),
        _ => Err(AnnexError::ProtocolViolation(line.to_string())),
    }
}

/// Decode a `CREDS <user> <password>` reply
///
/// The password takes the rest of the line. Either side may be empty.
pub fn decode_creds(line: &str) -> Result<Credentials> {
    let message = decode(line, 2);
    if message.command != CREDS {
        return Err(AnnexError::ProtocolViolation(line.to_string()));
    }

    let mut params = message.params.into_iter();
    Ok(Credentials {
        user: params.next().unwrap_or_default(),
        password: params.next().unwrap_or_default(),
    })
}

/// Decode one line of a `VALUE` list
///
/// Returns `None` for the empty-valued terminator.
pub fn decode_list_item(line: &str) -> Result<Option<String>> {
    let value = decode_value(line)?;
    if value.is_empty() {
        Ok(None)
    } else {
        Ok(Some(value))
    }
}

/// Decode a complete `VALUE` list, stopping at (and consuming) the terminator
///
/// Lines after the terminator are left untouched in the iterator. Running out
/// of lines before the terminator is `EndOfStream`.
pub fn decode_value_list<I, S>(lines: &mut I) -> Result<Vec<String>>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    let mut values = Vec::new();
    for line in lines {
        match decode_list_item(line.as_ref())? {
            Some(value) => values.push(value),
            None => return Ok(values),
        }
    }
    Err(AnnexError::EndOfStream)
}
