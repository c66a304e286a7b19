//! Line Channel
//!
//! Reads and writes protocol frames over an input and an output stream.

use std::io::{BufRead, Write};

use crate::error::{AnnexError, Result};

/// Protocol line terminator
pub const LINE_TERMINATOR: char = '\n';

/// Blocking line-oriented transport
pub struct LineChannel<R, W> {
    /// Input stream (buffered, so lines can be split off)
    reader: R,

    /// Output stream
    writer: W,

    /// Reused read buffer
    buf: String,
}

impl<R: BufRead, W: Write> LineChannel<R, W> {
    /// Create a channel over the given streams
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            buf: String::new(),
        }
    }

    /// Write one frame and flush it so the peer sees it immediately
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        tracing::trace!("-> {}", line);
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(&[LINE_TERMINATOR as u8])?;
        self.writer.flush()?;
        Ok(())
    }

    /// Block until a full frame arrives and return it without the terminator
    ///
    /// A final frame that ends at end of input without a terminator is still
    /// returned; only a read that yields no data at all is `EndOfStream`.
    pub fn read_line(&mut self) -> Result<String> {
        self.buf.clear();
        let read = self.reader.read_line(&mut self.buf)?;
        if read == 0 {
            tracing::trace!("<- end of stream");
            return Err(AnnexError::EndOfStream);
        }

        if self.buf.ends_with(LINE_TERMINATOR) {
            self.buf.pop();
        }

        tracing::trace!("<- {}", self.buf);
        Ok(std::mem::take(&mut self.buf))
    }

    /// Borrow the output stream
    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Consume the channel and return both streams
    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }
}
