//! # annex-remote
//!
//! Protocol engine for git-annex external special remotes:
//! - Newline-framed transport over stdin/stdout
//! - Line codec with last-parameter space preservation
//! - Typed host queries (`GETCONFIG`, `GETCREDS`, `GETURLS`, ...)
//! - Command dispatch from the host to a `SpecialRemote` implementation
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  git-annex (host process)                   │
//! └──────────────┬──────────────────────────────▲───────────────┘
//!          stdin │                              │ stdout
//! ┌──────────────▼──────────────────────────────┴───────────────┐
//! │                       Line Channel                          │
//! └──────────────┬──────────────────────────────▲───────────────┘
//!                │                              │
//! ┌──────────────▼──────────────┐   ┌───────────┴───────────────┐
//! │    Listener (dispatch)      │──▶│   Annex (request/reply)   │
//! │  Command Table → handlers   │   │  queries, notifications   │
//! └──────────────┬──────────────┘   └───────────▲───────────────┘
//!                │                              │ nested queries
//!                ▼                              │
//!        ┌───────────────────────────────────────┴┐
//!        │        SpecialRemote (storage)         │
//!        └────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use annex_remote::{Config, Listener};
//!
//! let mut listener = Listener::stdio(MyRemote::default(), Config::default());
//! listener.listen()?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;
pub mod logging;

pub mod channel;
pub mod protocol;
pub mod annex;
pub mod remote;
pub mod listener;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{AnnexError, Result};
pub use config::Config;
pub use annex::Annex;
pub use remote::{CheckUrl, SpecialRemote};
pub use listener::{Listener, ListenerState};
pub use protocol::{Credentials, Direction};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of annex-remote
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Protocol version announced at session start
pub const PROTOCOL_VERSION: u32 = 1;
