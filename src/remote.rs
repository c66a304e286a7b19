//! Special remote handler interface
//!
//! A storage backend implements `SpecialRemote`; the listener calls into it
//! for each command the host sends. Every method gets the live `Annex`
//! session so it can query the host before answering.
//!
//! ## Failure Reporting
//! - `Err(AnnexError::Remote(msg))` - the operation failed; the host gets the
//!   command's `-FAILURE` reply carrying `msg`
//! - `Err(AnnexError::UnsupportedCommand(_))` - answered `UNSUPPORTED-REQUEST`
//! - any other error - answered `ERROR <msg>`, or ends the session if fatal

use crate::annex::Annex;
use crate::error::{AnnexError, Result};

pub use crate::protocol::{Availability, ConfigField, Direction, InfoField, UrlContents};

/// Answer to `CHECKURL`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckUrl {
    /// The URL holds a single item
    Contents {
        size: Option<u64>,
        filename: Option<String>,
    },

    /// The URL holds several items
    Multi(Vec<UrlContents>),
}

fn unsupported<T>(command: &str) -> Result<T> {
    Err(AnnexError::UnsupportedCommand(command.to_string()))
}

/// Storage-specific behavior behind the protocol
#[allow(unused_variables)]
pub trait SpecialRemote {
    // -------------------------------------------------------------------------
    // Required
    // -------------------------------------------------------------------------

    /// One-time setup when the remote is created with `git annex initremote`
    fn init_remote(&mut self, annex: &mut Annex) -> Result<()>;

    /// Called before any transfer; read configuration here
    fn prepare(&mut self, annex: &mut Annex) -> Result<()>;

    /// Store the content of `file` under `key`
    fn transfer_store(&mut self, annex: &mut Annex, key: &str, file: &str) -> Result<()>;

    /// Retrieve the content of `key` into `file`
    fn transfer_retrieve(&mut self, annex: &mut Annex, key: &str, file: &str) -> Result<()>;

    /// Whether `key` is present. `Err(Remote)` means presence is unknown.
    fn check_present(&mut self, annex: &mut Annex, key: &str) -> Result<bool>;

    /// Remove `key`. Removing absent content succeeds.
    fn remove(&mut self, annex: &mut Annex, key: &str) -> Result<()>;

    // -------------------------------------------------------------------------
    // Optional
    // -------------------------------------------------------------------------

    fn cost(&mut self, annex: &mut Annex) -> Result<u32> {
        unsupported("GETCOST")
    }

    fn availability(&mut self, annex: &mut Annex) -> Result<Availability> {
        unsupported("GETAVAILABILITY")
    }

    /// Whether this remote handles downloads from `url`
    fn claim_url(&mut self, annex: &mut Annex, url: &str) -> Result<bool> {
        unsupported("CLAIMURL")
    }

    fn check_url(&mut self, annex: &mut Annex, url: &str) -> Result<CheckUrl> {
        unsupported("CHECKURL")
    }

    /// Extra location text for `git annex whereis`
    fn whereis(&mut self, annex: &mut Annex, key: &str) -> Result<Option<String>> {
        unsupported("WHEREIS")
    }

    fn list_configs(&mut self, annex: &mut Annex) -> Result<Vec<ConfigField>> {
        unsupported("LISTCONFIGS")
    }

    fn info(&mut self, annex: &mut Annex) -> Result<Vec<InfoField>> {
        unsupported("GETINFO")
    }

    // -------------------------------------------------------------------------
    // Export (optional)
    // -------------------------------------------------------------------------

    fn export_supported(&mut self, annex: &mut Annex) -> Result<bool> {
        Ok(false)
    }

    fn transfer_export_store(
        &mut self,
        annex: &mut Annex,
        key: &str,
        file: &str,
        name: &str,
    ) -> Result<()> {
        unsupported("TRANSFEREXPORT")
    }

    fn transfer_export_retrieve(
        &mut self,
        annex: &mut Annex,
        key: &str,
        file: &str,
        name: &str,
    ) -> Result<()> {
        unsupported("TRANSFEREXPORT")
    }

    fn check_present_export(&mut self, annex: &mut Annex, key: &str, name: &str) -> Result<bool> {
        unsupported("CHECKPRESENTEXPORT")
    }

    fn remove_export(&mut self, annex: &mut Annex, key: &str, name: &str) -> Result<()> {
        unsupported("REMOVEEXPORT")
    }

    fn remove_export_directory(&mut self, annex: &mut Annex, directory: &str) -> Result<()> {
        unsupported("REMOVEEXPORTDIRECTORY")
    }

    fn rename_export(
        &mut self,
        annex: &mut Annex,
        key: &str,
        name: &str,
        new_name: &str,
    ) -> Result<()> {
        unsupported("RENAMEEXPORT")
    }
}
