//! Annex Module
//!
//! The request/reply side of the protocol: queries and notifications the
//! remote sends to the host.
//!
//! ## Exchange Model
//! - Strictly half-duplex: one request is answered before the next is sent
//! - No request identifiers; ordering alone correlates replies
//! - The reply shape is chosen by the request, not read off the wire
//!
//! Handlers running inside the listen loop receive `&mut Annex` and may issue
//! these requests while the host waits for their reply.

use std::io::{self, BufRead, BufReader, Write};
use std::iter;

use crate::channel::LineChannel;
use crate::error::{AnnexError, Result};
use crate::protocol::{
    decode_creds, decode_value, decode_value_list, encode, encode_message, split_command,
    Credentials, HostReply, Message, ReplyShape,
};

/// Boxed input stream
pub type Input = Box<dyn BufRead>;

/// Boxed output stream
pub type Output = Box<dyn Write>;

/// A protocol session with the host
pub struct Annex {
    /// Transport shared by queries and the listen loop
    channel: LineChannel<Input, Output>,

    /// Extensions the host announced with `EXTENSIONS`
    host_extensions: Vec<String>,

    /// Extensions announced by both sides
    extensions: Vec<String>,
}

impl Annex {
    /// Create a session over arbitrary streams
    pub fn new<R, W>(reader: R, writer: W) -> Self
    where
        R: BufRead + 'static,
        W: Write + 'static,
    {
        Self {
            channel: LineChannel::new(Box::new(reader), Box::new(writer)),
            host_extensions: Vec::new(),
            extensions: Vec::new(),
        }
    }

    /// Create a session over the process's stdin and stdout
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }

    // =========================================================================
    // Raw Access
    // =========================================================================

    /// Encode and send one line without waiting for a reply
    pub fn send<S: AsRef<str>>(&mut self, command: &str, params: &[S]) -> Result<()> {
        let line = encode(command, params)?;
        self.channel.write_line(&line)
    }

    /// Send a prepared message
    pub fn send_message(&mut self, message: &Message) -> Result<()> {
        let line = encode_message(message)?;
        self.channel.write_line(&line)
    }

    /// Write an already encoded line
    pub(crate) fn write_line(&mut self, line: &str) -> Result<()> {
        self.channel.write_line(line)
    }

    /// Read the next raw line from the host
    pub fn read_line(&mut self) -> Result<String> {
        self.channel.read_line()
    }

    /// Send a request and read back a reply of the given shape
    ///
    /// An `ERROR` line from the host is returned as `HostReply::Error`; any
    /// other mismatch is a `ProtocolViolation`.
    pub fn request<S: AsRef<str>>(
        &mut self,
        command: &str,
        params: &[S],
        shape: ReplyShape,
    ) -> Result<HostReply> {
        self.send(command, params)?;
        self.read_reply(shape)
    }

    fn read_reply(&mut self, shape: ReplyShape) -> Result<HostReply> {
        if shape == ReplyShape::None {
            return Ok(HostReply::Ack);
        }

        let line = self.read_line()?;
        if let ("ERROR", rest) = split_command(&line) {
            return Ok(HostReply::Error(rest.unwrap_or("").to_string()));
        }

        match shape {
            ReplyShape::Value => decode_value(&line).map(HostReply::Value),
            ReplyShape::Creds => decode_creds(&line).map(HostReply::Creds),
            ReplyShape::ValueList => self.read_value_list(line).map(HostReply::ValueList),
            ReplyShape::None => Ok(HostReply::Ack),
        }
    }

    /// Read the rest of a `VALUE` list whose first line is already in hand
    fn read_value_list(&mut self, first: String) -> Result<Vec<String>> {
        let mut failure = None;
        let values = {
            let mut lines = iter::once(Ok(first))
                .chain(iter::from_fn(|| Some(self.read_line())))
                .map_while(|line| line.map_err(|e| failure = Some(e)).ok());
            decode_value_list(&mut lines)
        };

        match failure {
            Some(e) => Err(e),
            None => values,
        }
    }

    /// Typed request: a host `ERROR` reply is a `ProtocolViolation`
    fn ask<S: AsRef<str>>(
        &mut self,
        command: &str,
        params: &[S],
        shape: ReplyShape,
    ) -> Result<HostReply> {
        match self.request(command, params, shape)? {
            HostReply::Error(message) => Err(AnnexError::ProtocolViolation(format!(
                "{} answered with ERROR {}",
                command, message
            ))),
            reply => Ok(reply),
        }
    }

    fn ask_value<S: AsRef<str>>(&mut self, command: &str, params: &[S]) -> Result<String> {
        match self.ask(command, params, ReplyShape::Value)? {
            HostReply::Value(value) => Ok(value),
            other => Err(unexpected_reply(command, &other)),
        }
    }

    fn ask_values<S: AsRef<str>>(&mut self, command: &str, params: &[S]) -> Result<Vec<String>> {
        match self.ask(command, params, ReplyShape::ValueList)? {
            HostReply::ValueList(values) => Ok(values),
            other => Err(unexpected_reply(command, &other)),
        }
    }

    // =========================================================================
    // Session Management
    // =========================================================================

    /// Send the `VERSION` line that opens every session
    pub(crate) fn announce_version(&mut self, version: u32) -> Result<()> {
        self.send("VERSION", &[version.to_string()])
    }

    /// Record the host's `EXTENSIONS` list and keep the ones `ours` also
    /// announces
    pub(crate) fn negotiate_extensions(&mut self, announced: &str, ours: &[String]) {
        self.host_extensions = announced
            .split(' ')
            .filter(|ext| !ext.is_empty())
            .map(str::to_string)
            .collect();
        self.extensions = self
            .host_extensions
            .iter()
            .filter(|ext| ours.contains(ext))
            .cloned()
            .collect();
    }

    /// Extensions the host announced
    pub fn host_extensions(&self) -> &[String] {
        &self.host_extensions
    }

    /// Whether the host announced the given extension
    pub fn has_host_extension(&self, name: &str) -> bool {
        self.host_extensions.iter().any(|ext| ext == name)
    }

    /// Extensions both sides announced
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Whether both sides announced the given extension
    pub fn has_extension(&self, name: &str) -> bool {
        self.extensions.iter().any(|ext| ext == name)
    }

    // =========================================================================
    // Notifications (no reply)
    // =========================================================================

    /// Report how many bytes of the current transfer are done
    pub fn progress(&mut self, bytes: u64) -> Result<()> {
        self.send("PROGRESS", &[bytes.to_string()])
    }

    /// Send a debug message to the host's debug log
    pub fn debug(&mut self, message: &str) -> Result<()> {
        self.send("DEBUG", &[message])
    }

    /// Show a message to the user. Both sides must have announced `INFO`.
    pub fn info(&mut self, message: &str) -> Result<()> {
        if !self.has_extension("INFO") {
            return Err(AnnexError::ExtensionUnavailable("INFO".to_string()));
        }
        self.send("INFO", &[message])
    }

    /// Report a general error to the host
    pub fn error(&mut self, message: &str) -> Result<()> {
        self.send("ERROR", &[message])
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Store a setting in the remote's configuration
    pub fn set_config(&mut self, setting: &str, value: &str) -> Result<()> {
        self.send("SETCONFIG", &[setting, value])
    }

    /// Read a setting from the remote's configuration
    pub fn get_config(&mut self, setting: &str) -> Result<String> {
        self.ask_value("GETCONFIG", &[setting])
    }

    /// Store credentials for `setting`
    pub fn set_creds(&mut self, setting: &str, user: &str, password: &str) -> Result<()> {
        self.send("SETCREDS", &[setting, user, password])
    }

    /// Read credentials for `setting`
    pub fn get_creds(&mut self, setting: &str) -> Result<Credentials> {
        match self.ask("GETCREDS", &[setting], ReplyShape::Creds)? {
            HostReply::Creds(creds) => Ok(creds),
            other => Err(unexpected_reply("GETCREDS", &other)),
        }
    }

    // =========================================================================
    // Repository Queries
    // =========================================================================

    /// Hash directory for a key, e.g. `aB/Cd`
    pub fn dirhash(&mut self, key: &str) -> Result<String> {
        self.ask_value("DIRHASH", &[key])
    }

    /// Lower-case hash directory for a key, e.g. `abc/def`
    pub fn dirhash_lower(&mut self, key: &str) -> Result<String> {
        self.ask_value("DIRHASH-LOWER", &[key])
    }

    /// UUID of the remote
    pub fn get_uuid(&mut self) -> Result<String> {
        self.ask_value::<&str>("GETUUID", &[])
    }

    /// Path of the git directory of the repository
    pub fn get_git_dir(&mut self) -> Result<String> {
        self.ask_value::<&str>("GETGITDIR", &[])
    }

    /// Set the preferred content expression of the remote
    pub fn set_wanted(&mut self, expression: &str) -> Result<()> {
        self.send("SETWANTED", &[expression])
    }

    /// Preferred content expression of the remote
    pub fn get_wanted(&mut self) -> Result<String> {
        self.ask_value::<&str>("GETWANTED", &[])
    }

    // =========================================================================
    // Per-Key State
    // =========================================================================

    /// Store remote-specific state for a key. An empty value clears it.
    pub fn set_state(&mut self, key: &str, value: &str) -> Result<()> {
        self.send("SETSTATE", &[key, value])
    }

    /// Read state stored for a key; empty if none
    pub fn get_state(&mut self, key: &str) -> Result<String> {
        self.ask_value("GETSTATE", &[key])
    }

    /// Record that a key can be downloaded from a URL
    pub fn set_url_present(&mut self, key: &str, url: &str) -> Result<()> {
        self.send("SETURLPRESENT", &[key, url])
    }

    /// Record that a key can no longer be downloaded from a URL
    pub fn set_url_missing(&mut self, key: &str, url: &str) -> Result<()> {
        self.send("SETURLMISSING", &[key, url])
    }

    /// Record that a key is present at a URI
    pub fn set_uri_present(&mut self, key: &str, uri: &str) -> Result<()> {
        self.send("SETURIPRESENT", &[key, uri])
    }

    /// Record that a key is no longer present at a URI
    pub fn set_uri_missing(&mut self, key: &str, uri: &str) -> Result<()> {
        self.send("SETURIMISSING", &[key, uri])
    }

    /// URLs recorded for a key, filtered by prefix, in the host's order
    pub fn get_urls(&mut self, key: &str, prefix: &str) -> Result<Vec<String>> {
        self.ask_values("GETURLS", &[key, prefix])
    }
}

fn unexpected_reply(command: &str, reply: &HostReply) -> AnnexError {
    AnnexError::ProtocolViolation(format!("unexpected reply to {}: {:?}", command, reply))
}
