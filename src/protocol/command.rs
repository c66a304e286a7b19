//! Command definitions
//!
//! The protocol line type and the fixed arities of commands the host sends.

use std::fmt;
use std::str::FromStr;

use crate::error::AnnexError;

/// One protocol line: a command name followed by its parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Command name, first token of the line
    pub command: String,

    /// Ordered parameters. Only the last may contain spaces.
    pub params: Vec<String>,
}

impl Message {
    /// Build a message from a command name and parameters
    pub fn new<S: Into<String>>(command: impl Into<String>, params: impl IntoIterator<Item = S>) -> Self {
        Self {
            command: command.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    /// A message with no parameters
    pub fn bare(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            params: Vec::new(),
        }
    }

    /// Parameter at `index`, or `""` if absent
    pub fn param(&self, index: usize) -> &str {
        self.params.get(index).map(String::as_str).unwrap_or("")
    }
}

// =============================================================================
// Inbound Commands
// =============================================================================

/// Commands the host sends, with the number of parameters each carries.
///
/// The last parameter of each command takes the rest of the line verbatim.
pub const INBOUND_COMMANDS: &[(&str, usize)] = &[
    ("INITREMOTE", 0),
    ("EXTENSIONS", 1),
    ("PREPARE", 0),
    ("TRANSFER", 3),
    ("CHECKPRESENT", 1),
    ("REMOVE", 1),
    ("GETCOST", 0),
    ("GETAVAILABILITY", 0),
    ("CLAIMURL", 1),
    ("CHECKURL", 1),
    ("WHEREIS", 1),
    ("LISTCONFIGS", 0),
    ("GETINFO", 0),
    ("EXPORTSUPPORTED", 0),
    ("EXPORT", 1),
    ("TRANSFEREXPORT", 3),
    ("CHECKPRESENTEXPORT", 1),
    ("REMOVEEXPORT", 1),
    ("REMOVEEXPORTDIRECTORY", 1),
    ("RENAMEEXPORT", 2),
    ("ERROR", 1),
];

/// Number of parameters an inbound command carries, if the command is known
pub fn inbound_arity(command: &str) -> Option<usize> {
    INBOUND_COMMANDS
        .iter()
        .find(|(name, _)| *name == command)
        .map(|(_, arity)| *arity)
}

// =============================================================================
// Transfer Direction
// =============================================================================

/// Direction of a `TRANSFER` / `TRANSFEREXPORT`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Copy content from the local repository into the remote
    Store,

    /// Copy content from the remote into the local repository
    Retrieve,
}

impl Direction {
    /// Wire token
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Store => "STORE",
            Direction::Retrieve => "RETRIEVE",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = AnnexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STORE" => Ok(Direction::Store),
            "RETRIEVE" => Ok(Direction::Retrieve),
            other => Err(AnnexError::ProtocolViolation(format!(
                "unknown transfer direction {}",
                other
            ))),
        }
    }
}
