//! Channel Module
//!
//! Newline-framed text transport over a pair of byte streams.
//!
//! ## Framing
//! - One frame per line, terminated by a single `\n`
//! - No length prefixes, no escaping
//! - Every write is flushed before returning
//! - A closed input stream surfaces as `AnnexError::EndOfStream`

mod line;

pub use line::LineChannel;
