//! Listener Module
//!
//! Reads commands from the host, routes them to the `SpecialRemote` and writes
//! back the replies.
//!
//! ## State Machine
//! ```text
//!   Idle ──VERSION 1──▶ AwaitingCommand ──line──▶ Dispatching
//!                             ▲                       │
//!                             └───────reply───────────┘
//!                             │
//!                 end of stream / ERROR / IO failure
//!                             ▼
//!                           Closed
//! ```
//!
//! Handlers run on the listener's thread and may issue host queries through
//! the session's `Annex`; the loop simply waits until the handler returns.

use std::collections::HashMap;

use crate::annex::Annex;
use crate::config::Config;
use crate::error::{AnnexError, Result};
use crate::protocol::{
    decode, encode_message, split_command, Direction, Message, Reply, INBOUND_COMMANDS,
};
use crate::remote::{CheckUrl, SpecialRemote};

/// Handler for one inbound command. `Ok(None)` sends no reply.
pub type Handler<S> = fn(&mut S, &mut Session, &Message) -> Result<Option<Reply>>;

// =============================================================================
// Session
// =============================================================================

/// Per-session state handed to handlers alongside the remote
pub struct Session {
    /// Host connection
    pub annex: Annex,

    /// Session configuration
    config: Config,

    /// Name from the last `EXPORT`, consumed by the next export command
    export_name: Option<String>,
}

impl Session {
    pub fn new(annex: Annex, config: Config) -> Self {
        Self {
            annex,
            config,
            export_name: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Export name waiting to be used, if any
    pub fn export_name(&self) -> Option<&str> {
        self.export_name.as_deref()
    }

    fn take_export_name(&mut self, command: &str) -> Result<String> {
        self.export_name.take().ok_or_else(|| {
            AnnexError::ProtocolViolation(format!("{} without a preceding EXPORT", command))
        })
    }
}

// =============================================================================
// Command Table
// =============================================================================

/// A known inbound command
pub struct CommandSpec<S> {
    pub name: &'static str,

    /// Parameters the command carries
    pub arity: usize,

    pub handler: Handler<S>,
}

/// Mapping from command name to handler, fixed once built
pub struct CommandTable<S> {
    commands: HashMap<&'static str, CommandSpec<S>>,
}

impl<S: SpecialRemote> CommandTable<S> {
    /// Table covering every command of the protocol
    pub fn standard() -> Self {
        let commands = INBOUND_COMMANDS
            .iter()
            .filter_map(|&(name, arity)| {
                handler_for::<S>(name).map(|handler| {
                    (
                        name,
                        CommandSpec {
                            name,
                            arity,
                            handler,
                        },
                    )
                })
            })
            .collect();

        Self { commands }
    }

    /// Look up a command by name
    pub fn get(&self, name: &str) -> Option<&CommandSpec<S>> {
        self.commands.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

fn handler_for<S: SpecialRemote>(name: &str) -> Option<Handler<S>> {
    let handler: Handler<S> = match name {
        "INITREMOTE" => handle_init_remote::<S>,
        "EXTENSIONS" => handle_extensions::<S>,
        "PREPARE" => handle_prepare::<S>,
        "TRANSFER" => handle_transfer::<S>,
        "CHECKPRESENT" => handle_check_present::<S>,
        "REMOVE" => handle_remove::<S>,
        "GETCOST" => handle_get_cost::<S>,
        "GETAVAILABILITY" => handle_get_availability::<S>,
        "CLAIMURL" => handle_claim_url::<S>,
        "CHECKURL" => handle_check_url::<S>,
        "WHEREIS" => handle_whereis::<S>,
        "LISTCONFIGS" => handle_list_configs::<S>,
        "GETINFO" => handle_get_info::<S>,
        "EXPORTSUPPORTED" => handle_export_supported::<S>,
        "EXPORT" => handle_export::<S>,
        "TRANSFEREXPORT" => handle_transfer_export::<S>,
        "CHECKPRESENTEXPORT" => handle_check_present_export::<S>,
        "REMOVEEXPORT" => handle_remove_export::<S>,
        "REMOVEEXPORTDIRECTORY" => handle_remove_export_directory::<S>,
        "RENAMEEXPORT" => handle_rename_export::<S>,
        "ERROR" => handle_host_error::<S>,
        _ => return None,
    };
    Some(handler)
}

// =============================================================================
// Listener
// =============================================================================

/// Lifecycle of a listen session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerState {
    Idle,
    AwaitingCommand,
    Dispatching,
    Closed,
}

/// Drives a `SpecialRemote` from the host's commands
pub struct Listener<S> {
    remote: S,
    session: Session,
    table: CommandTable<S>,
    state: ListenerState,
}

impl<S: SpecialRemote> Listener<S> {
    /// Create a listener with the standard command table
    pub fn new(remote: S, annex: Annex, config: Config) -> Self {
        Self {
            remote,
            session: Session::new(annex, config),
            table: CommandTable::standard(),
            state: ListenerState::Idle,
        }
    }

    /// Create a listener talking over stdin/stdout
    pub fn stdio(remote: S, config: Config) -> Self {
        Self::new(remote, Annex::stdio(), config)
    }

    pub fn state(&self) -> ListenerState {
        self.state
    }

    pub fn remote(&self) -> &S {
        &self.remote
    }

    pub fn remote_mut(&mut self) -> &mut S {
        &mut self.remote
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn table(&self) -> &CommandTable<S> {
        &self.table
    }

    /// Consume the listener and return the remote
    pub fn into_remote(self) -> S {
        self.remote
    }

    /// Announce the protocol version and serve commands until the session ends
    ///
    /// Returns `Ok(())` when the host closes the input between commands.
    /// Returns `Err` on a transport failure, on end of stream in the middle of
    /// a command, or with `AnnexError::Host` when the host sends `ERROR`.
    pub fn listen(&mut self) -> Result<()> {
        let result = self.run();
        self.state = ListenerState::Closed;
        result
    }

    fn run(&mut self) -> Result<()> {
        let version = self.session.config.protocol_version;
        self.session.annex.announce_version(version)?;

        loop {
            self.state = ListenerState::AwaitingCommand;
            let line = match self.session.annex.read_line() {
                Ok(line) => line,
                Err(AnnexError::EndOfStream) => {
                    tracing::debug!("Host closed the session");
                    return Ok(());
                }
                Err(e) => return Err(e),
            };

            self.state = ListenerState::Dispatching;
            self.dispatch(&line)?;
        }
    }

    /// Handle one command line and write its reply
    ///
    /// Only errors that end the session are returned; everything else is
    /// reported to the host.
    pub fn dispatch(&mut self, line: &str) -> Result<()> {
        let (name, _) = split_command(line);
        let Some(spec) = self.table.get(name) else {
            tracing::debug!("Unsupported command: {:?}", line);
            return self.respond(Reply::UnsupportedRequest);
        };

        let message = decode(line, spec.arity);
        let handler = spec.handler;
        tracing::debug!("Dispatching {}", message.command);

        match handler(&mut self.remote, &mut self.session, &message) {
            Ok(Some(reply)) => self.respond(reply),
            Ok(None) => Ok(()),
            Err(e) if e.is_fatal() => {
                tracing::warn!("Session ended while handling {}: {}", message.command, e);
                Err(e)
            }
            Err(AnnexError::Host(msg)) => {
                tracing::warn!("Host reported an error: {}", msg);
                Err(AnnexError::Host(msg))
            }
            Err(AnnexError::UnsupportedCommand(cmd)) => {
                tracing::debug!("Remote does not implement {}", cmd);
                self.respond(Reply::UnsupportedRequest)
            }
            Err(e) => {
                tracing::warn!("{} failed: {}", message.command, e);
                self.respond(Reply::Error(e.reply_message()))
            }
        }
    }

    /// Write a reply; a reply that cannot be encoded becomes `ERROR`
    fn respond(&mut self, reply: Reply) -> Result<()> {
        let lines = reply
            .messages()
            .iter()
            .map(encode_message)
            .collect::<Result<Vec<_>>>();

        match lines {
            Ok(lines) => {
                for line in &lines {
                    self.session.annex.write_line(line)?;
                }
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Reply could not be encoded: {}", e);
                self.session.annex.error(&e.reply_message())
            }
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Map a handler result to its success reply, or `Remote` failures to the
/// failure reply. Other errors pass through.
fn answer<T>(
    result: Result<T>,
    success: impl FnOnce(T) -> Reply,
    failure: impl FnOnce(String) -> Reply,
) -> Result<Option<Reply>> {
    match result {
        Ok(value) => Ok(Some(success(value))),
        Err(AnnexError::Remote(message)) => Ok(Some(failure(message))),
        Err(e) => Err(e),
    }
}

fn handle_init_remote<S: SpecialRemote>(
    remote: &mut S,
    session: &mut Session,
    _message: &Message,
) -> Result<Option<Reply>> {
    answer(
        remote.init_remote(&mut session.annex),
        |_| Reply::InitRemoteSuccess,
        Reply::InitRemoteFailure,
    )
}

fn handle_extensions<S: SpecialRemote>(
    _remote: &mut S,
    session: &mut Session,
    message: &Message,
) -> Result<Option<Reply>> {
    session
        .annex
        .negotiate_extensions(message.param(0), &session.config.extensions);
    Ok(Some(Reply::Extensions(session.config.extensions.clone())))
}

fn handle_prepare<S: SpecialRemote>(
    remote: &mut S,
    session: &mut Session,
    _message: &Message,
) -> Result<Option<Reply>> {
    answer(
        remote.prepare(&mut session.annex),
        |_| Reply::PrepareSuccess,
        Reply::PrepareFailure,
    )
}

fn handle_transfer<S: SpecialRemote>(
    remote: &mut S,
    session: &mut Session,
    message: &Message,
) -> Result<Option<Reply>> {
    let direction: Direction = message.param(0).parse()?;
    let key = message.param(1);
    let file = message.param(2);

    let result = match direction {
        Direction::Store => remote.transfer_store(&mut session.annex, key, file),
        Direction::Retrieve => remote.transfer_retrieve(&mut session.annex, key, file),
    };

    answer(
        result,
        |_| Reply::TransferSuccess {
            direction,
            key: key.to_string(),
        },
        |message| Reply::TransferFailure {
            direction,
            key: key.to_string(),
            message,
        },
    )
}

fn handle_check_present<S: SpecialRemote>(
    remote: &mut S,
    session: &mut Session,
    message: &Message,
) -> Result<Option<Reply>> {
    let key = message.param(0);
    answer(
        remote.check_present(&mut session.annex, key),
        |present| {
            if present {
                Reply::CheckPresentSuccess(key.to_string())
            } else {
                Reply::CheckPresentFailure(key.to_string())
            }
        },
        |message| Reply::CheckPresentUnknown {
            key: key.to_string(),
            message,
        },
    )
}

fn handle_remove<S: SpecialRemote>(
    remote: &mut S,
    session: &mut Session,
    message: &Message,
) -> Result<Option<Reply>> {
    let key = message.param(0);
    answer(
        remote.remove(&mut session.annex, key),
        |_| Reply::RemoveSuccess(key.to_string()),
        |message| Reply::RemoveFailure {
            key: key.to_string(),
            message,
        },
    )
}

fn handle_get_cost<S: SpecialRemote>(
    remote: &mut S,
    session: &mut Session,
    _message: &Message,
) -> Result<Option<Reply>> {
    answer(remote.cost(&mut session.annex), Reply::Cost, Reply::Error)
}

fn handle_get_availability<S: SpecialRemote>(
    remote: &mut S,
    session: &mut Session,
    _message: &Message,
) -> Result<Option<Reply>> {
    answer(
        remote.availability(&mut session.annex),
        Reply::Availability,
        Reply::Error,
    )
}

fn handle_claim_url<S: SpecialRemote>(
    remote: &mut S,
    session: &mut Session,
    message: &Message,
) -> Result<Option<Reply>> {
    answer(
        remote.claim_url(&mut session.annex, message.param(0)),
        |claimed| {
            if claimed {
                Reply::ClaimUrlSuccess
            } else {
                Reply::ClaimUrlFailure
            }
        },
        |_| Reply::ClaimUrlFailure,
    )
}

fn handle_check_url<S: SpecialRemote>(
    remote: &mut S,
    session: &mut Session,
    message: &Message,
) -> Result<Option<Reply>> {
    answer(
        remote.check_url(&mut session.annex, message.param(0)),
        |check| match check {
            CheckUrl::Contents { size, filename } => Reply::CheckUrlContents { size, filename },
            CheckUrl::Multi(items) => Reply::CheckUrlMulti(items),
        },
        Reply::CheckUrlFailure,
    )
}

fn handle_whereis<S: SpecialRemote>(
    remote: &mut S,
    session: &mut Session,
    message: &Message,
) -> Result<Option<Reply>> {
    answer(
        remote.whereis(&mut session.annex, message.param(0)),
        |location| location.map_or(Reply::WhereisFailure, Reply::WhereisSuccess),
        |_| Reply::WhereisFailure,
    )
}

fn handle_list_configs<S: SpecialRemote>(
    remote: &mut S,
    session: &mut Session,
    _message: &Message,
) -> Result<Option<Reply>> {
    answer(
        remote.list_configs(&mut session.annex),
        Reply::Configs,
        Reply::Error,
    )
}

fn handle_get_info<S: SpecialRemote>(
    remote: &mut S,
    session: &mut Session,
    _message: &Message,
) -> Result<Option<Reply>> {
    answer(remote.info(&mut session.annex), Reply::Info, Reply::Error)
}

fn handle_export_supported<S: SpecialRemote>(
    remote: &mut S,
    session: &mut Session,
    _message: &Message,
) -> Result<Option<Reply>> {
    answer(
        remote.export_supported(&mut session.annex),
        |supported| {
            if supported {
                Reply::ExportSupportedSuccess
            } else {
                Reply::ExportSupportedFailure
            }
        },
        |_| Reply::ExportSupportedFailure,
    )
}

fn handle_export<S: SpecialRemote>(
    _remote: &mut S,
    session: &mut Session,
    message: &Message,
) -> Result<Option<Reply>> {
    session.export_name = Some(message.param(0).to_string());
    Ok(None)
}

fn handle_transfer_export<S: SpecialRemote>(
    remote: &mut S,
    session: &mut Session,
    message: &Message,
) -> Result<Option<Reply>> {
    let name = session.take_export_name(&message.command)?;
    let direction: Direction = message.param(0).parse()?;
    let key = message.param(1);
    let file = message.param(2);

    let result = match direction {
        Direction::Store => remote.transfer_export_store(&mut session.annex, key, file, &name),
        Direction::Retrieve => {
            remote.transfer_export_retrieve(&mut session.annex, key, file, &name)
        }
    };

    answer(
        result,
        |_| Reply::TransferSuccess {
            direction,
            key: key.to_string(),
        },
        |message| Reply::TransferFailure {
            direction,
            key: key.to_string(),
            message,
        },
    )
}

fn handle_check_present_export<S: SpecialRemote>(
    remote: &mut S,
    session: &mut Session,
    message: &Message,
) -> Result<Option<Reply>> {
    let name = session.take_export_name(&message.command)?;
    let key = message.param(0);
    answer(
        remote.check_present_export(&mut session.annex, key, &name),
        |present| {
            if present {
                Reply::CheckPresentSuccess(key.to_string())
            } else {
                Reply::CheckPresentFailure(key.to_string())
            }
        },
        |message| Reply::CheckPresentUnknown {
            key: key.to_string(),
            message,
        },
    )
}

fn handle_remove_export<S: SpecialRemote>(
    remote: &mut S,
    session: &mut Session,
    message: &Message,
) -> Result<Option<Reply>> {
    let name = session.take_export_name(&message.command)?;
    let key = message.param(0);
    answer(
        remote.remove_export(&mut session.annex, key, &name),
        |_| Reply::RemoveSuccess(key.to_string()),
        |message| Reply::RemoveFailure {
            key: key.to_string(),
            message,
        },
    )
}

fn handle_remove_export_directory<S: SpecialRemote>(
    remote: &mut S,
    session: &mut Session,
    message: &Message,
) -> Result<Option<Reply>> {
    answer(
        remote.remove_export_directory(&mut session.annex, message.param(0)),
        |_| Reply::RemoveExportDirectorySuccess,
        |_| Reply::RemoveExportDirectoryFailure,
    )
}

fn handle_rename_export<S: SpecialRemote>(
    remote: &mut S,
    session: &mut Session,
    message: &Message,
) -> Result<Option<Reply>> {
    let name = session.take_export_name(&message.command)?;
    let key = message.param(0);
    answer(
        remote.rename_export(&mut session.annex, key, &name, message.param(1)),
        |_| Reply::RenameExportSuccess(key.to_string()),
        |_| Reply::RenameExportFailure(key.to_string()),
    )
}

fn handle_host_error<S: SpecialRemote>(
    _remote: &mut S,
    _session: &mut Session,
    message: &Message,
) -> Result<Option<Reply>> {
    Err(AnnexError::Host(message.param(0).to_string()))
}
