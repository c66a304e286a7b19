//! Response definitions
//!
//! Replies in both directions: what the host answers to our queries, and
//! what we answer to the host's commands.

use std::fmt;

use super::{Direction, Message};

// =============================================================================
// Host Replies
// =============================================================================

/// A user/password pair from `CREDS`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

/// Reply shape a query expects. The wire alone does not say which applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyShape {
    /// One `VALUE` line
    Value,

    /// `VALUE` lines ending with an empty `VALUE`
    ValueList,

    /// One `CREDS` line
    Creds,

    /// No reply at all
    None,
}

/// A decoded reply from the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostReply {
    Value(String),
    ValueList(Vec<String>),
    Creds(Credentials),
    Ack,
    Error(String),
}

// =============================================================================
// Replies To Host Commands
// =============================================================================

/// Whether the remote's content is reachable from everywhere or only locally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Global,
    Local,
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Availability::Global => f.write_str("GLOBAL"),
            Availability::Local => f.write_str("LOCAL"),
        }
    }
}

/// One downloadable item behind a URL, for `CHECKURL-MULTI`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlContents {
    pub url: String,

    /// Size in bytes, sent as `UNKNOWN` when absent
    pub size: Option<u64>,

    pub filename: String,
}

/// A setting listed in reply to `LISTCONFIGS`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigField {
    pub name: String,
    pub description: String,
}

impl ConfigField {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// A field/value pair listed in reply to `GETINFO`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoField {
    pub field: String,
    pub value: String,
}

impl InfoField {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// A reply the dispatcher writes back for a host command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    // -------------------------------------------------------------------------
    // Setup
    // -------------------------------------------------------------------------
    InitRemoteSuccess,
    InitRemoteFailure(String),
    Extensions(Vec<String>),
    PrepareSuccess,
    PrepareFailure(String),

    // -------------------------------------------------------------------------
    // Key Operations
    // -------------------------------------------------------------------------
    TransferSuccess { direction: Direction, key: String },
    TransferFailure { direction: Direction, key: String, message: String },
    CheckPresentSuccess(String),
    CheckPresentFailure(String),
    CheckPresentUnknown { key: String, message: String },
    RemoveSuccess(String),
    RemoveFailure { key: String, message: String },

    // -------------------------------------------------------------------------
    // Remote Properties
    // -------------------------------------------------------------------------
    Cost(u32),
    Availability(Availability),
    ClaimUrlSuccess,
    ClaimUrlFailure,
    CheckUrlContents { size: Option<u64>, filename: Option<String> },
    CheckUrlMulti(Vec<UrlContents>),
    CheckUrlFailure(String),
    WhereisSuccess(String),
    WhereisFailure,
    Configs(Vec<ConfigField>),
    Info(Vec<InfoField>),

    // -------------------------------------------------------------------------
    // Export
    //
    // CHECKPRESENTEXPORT and REMOVEEXPORT are answered with the CHECKPRESENT
    // and REMOVE replies above.
    // -------------------------------------------------------------------------
    ExportSupportedSuccess,
    ExportSupportedFailure,
    RemoveExportDirectorySuccess,
    RemoveExportDirectoryFailure,
    RenameExportSuccess(String),
    RenameExportFailure(String),

    // -------------------------------------------------------------------------
    // Generic
    // -------------------------------------------------------------------------
    UnsupportedRequest,
    Error(String),
}

fn size_token(size: Option<u64>) -> String {
    size.map(|s| s.to_string()).unwrap_or_else(|| "UNKNOWN".to_string())
}

impl Reply {
    /// The protocol lines making up this reply, in order
    pub fn messages(&self) -> Vec<Message> {
        let one = |command: &str, params: Vec<String>| vec![Message::new(command, params)];
        let bare = |command: &str| vec![Message::bare(command)];

        match self {
            Reply::InitRemoteSuccess => bare("INITREMOTE-SUCCESS"),
            Reply::InitRemoteFailure(msg) => one("INITREMOTE-FAILURE", vec![msg.clone()]),
            Reply::Extensions(exts) => one("EXTENSIONS", vec![exts.join(" ")]),
            Reply::PrepareSuccess => bare("PREPARE-SUCCESS"),
            Reply::PrepareFailure(msg) => one("PREPARE-FAILURE", vec![msg.clone()]),

            Reply::TransferSuccess { direction, key } => one(
                "TRANSFER-SUCCESS",
                vec![direction.to_string(), key.clone()],
            ),
            Reply::TransferFailure { direction, key, message } => one(
                "TRANSFER-FAILURE",
                vec![direction.to_string(), key.clone(), message.clone()],
            ),
            Reply::CheckPresentSuccess(key) => one("CHECKPRESENT-SUCCESS", vec![key.clone()]),
            Reply::CheckPresentFailure(key) => one("CHECKPRESENT-FAILURE", vec![key.clone()]),
            Reply::CheckPresentUnknown { key, message } => {
                one("CHECKPRESENT-UNKNOWN", vec![key.clone(), message.clone()])
            }
            Reply::RemoveSuccess(key) => one("REMOVE-SUCCESS", vec![key.clone()]),
            Reply::RemoveFailure { key, message } => {
                one("REMOVE-FAILURE", vec![key.clone(), message.clone()])
            }

            Reply::Cost(cost) => one("COST", vec![cost.to_string()]),
            Reply::Availability(availability) => {
                one("AVAILABILITY", vec![availability.to_string()])
            }
            Reply::ClaimUrlSuccess => bare("CLAIMURL-SUCCESS"),
            Reply::ClaimUrlFailure => bare("CLAIMURL-FAILURE"),
            Reply::CheckUrlContents { size, filename } => one(
                "CHECKURL-CONTENTS",
                vec![size_token(*size), filename.clone().unwrap_or_default()],
            ),
            Reply::CheckUrlMulti(items) => one(
                "CHECKURL-MULTI",
                items
                    .iter()
                    .flat_map(|item| {
                        [item.url.clone(), size_token(item.size), item.filename.clone()]
                    })
                    .collect(),
            ),
            Reply::CheckUrlFailure(msg) => one("CHECKURL-FAILURE", vec![msg.clone()]),
            Reply::WhereisSuccess(text) => one("WHEREIS-SUCCESS", vec![text.clone()]),
            Reply::WhereisFailure => bare("WHEREIS-FAILURE"),
            Reply::Configs(fields) => fields
                .iter()
                .map(|f| Message::new("CONFIG", [f.name.clone(), f.description.clone()]))
                .chain(std::iter::once(Message::bare("CONFIGEND")))
                .collect(),
            Reply::Info(fields) => fields
                .iter()
                .flat_map(|f| {
                    [
                        Message::new("INFOFIELD", [f.field.clone()]),
                        Message::new("INFOVALUE", [f.value.clone()]),
                    ]
                })
                .chain(std::iter::once(Message::bare("INFOEND")))
                .collect(),

            Reply::ExportSupportedSuccess => bare("EXPORTSUPPORTED-SUCCESS"),
            Reply::ExportSupportedFailure => bare("EXPORTSUPPORTED-FAILURE"),
            Reply::RemoveExportDirectorySuccess => bare("REMOVEEXPORTDIRECTORY-SUCCESS"),
            Reply::RemoveExportDirectoryFailure => bare("REMOVEEXPORTDIRECTORY-FAILURE"),
            Reply::RenameExportSuccess(key) => one("RENAMEEXPORT-SUCCESS", vec![key.clone()]),
            Reply::RenameExportFailure(key) => one("RENAMEEXPORT-FAILURE", vec![key.clone()]),

            Reply::UnsupportedRequest => bare("UNSUPPORTED-REQUEST"),
            Reply::Error(msg) => one("ERROR", vec![msg.clone()]),
        }
    }
}
