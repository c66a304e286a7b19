//! Channel Tests
//!
//! Tests for newline framing over in-memory streams.

use std::io::{self, BufRead, Cursor, Read, Write};

use annex_remote::channel::LineChannel;
use annex_remote::AnnexError;

/// Writer that records how many times it was flushed
#[derive(Default)]
struct CountingWriter {
    data: Vec<u8>,
    flushes: usize,
}

impl Write for CountingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }
}

/// Reader that fails every read
struct BrokenReader;

impl Read for BrokenReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
    }
}

impl BufRead for BrokenReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
    }

    fn consume(&mut self, _amt: usize) {}
}

fn channel(input: &str) -> LineChannel<Cursor<Vec<u8>>, CountingWriter> {
    LineChannel::new(Cursor::new(input.as_bytes().to_vec()), CountingWriter::default())
}

// =============================================================================
// Write Tests
// =============================================================================

#[test]
fn test_write_line_appends_terminator() {
    let mut ch = channel("");
    ch.write_line("VERSION 1").unwrap();
    ch.write_line("PREPARE-SUCCESS").unwrap();

    let (_, writer) = ch.into_inner();
    assert_eq!(writer.data, b"VERSION 1\nPREPARE-SUCCESS\n");
}

#[test]
fn test_write_line_flushes_every_frame() {
    let mut ch = channel("");
    ch.write_line("DEBUG one").unwrap();
    ch.write_line("DEBUG two").unwrap();

    assert_eq!(ch.writer().flushes, 2);
}

// =============================================================================
// Read Tests
// =============================================================================

#[test]
fn test_read_line_strips_terminator() {
    let mut ch = channel("PREPARE\nCHECKPRESENT Key\n");
    assert_eq!(ch.read_line().unwrap(), "PREPARE");
    assert_eq!(ch.read_line().unwrap(), "CHECKPRESENT Key");
}

#[test]
fn test_read_line_keeps_inner_spaces() {
    let mut ch = channel("VALUE  two  spaces \n");
    assert_eq!(ch.read_line().unwrap(), "VALUE  two  spaces ");
}

#[test]
fn test_read_line_returns_unterminated_final_line() {
    let mut ch = channel("VALUE a\nVALUE");
    assert_eq!(ch.read_line().unwrap(), "VALUE a");
    assert_eq!(ch.read_line().unwrap(), "VALUE");
}

#[test]
fn test_read_empty_line() {
    let mut ch = channel("\nPREPARE\n");
    assert_eq!(ch.read_line().unwrap(), "");
    assert_eq!(ch.read_line().unwrap(), "PREPARE");
}

#[test]
fn test_read_line_end_of_stream() {
    let mut ch = channel("PREPARE\n");
    ch.read_line().unwrap();

    assert!(matches!(ch.read_line(), Err(AnnexError::EndOfStream)));
    // Closure is terminal
    assert!(matches!(ch.read_line(), Err(AnnexError::EndOfStream)));
}

#[test]
fn test_read_line_io_error_is_fatal() {
    let mut ch = LineChannel::new(BrokenReader, Vec::new());
    let err = ch.read_line().unwrap_err();

    assert!(matches!(err, AnnexError::Io(_)));
    assert!(err.is_fatal());
}

#[test]
fn test_read_line_rejects_invalid_utf8() {
    let mut ch = LineChannel::new(Cursor::new(vec![0xff, 0xfe, b'\n']), Vec::new());
    assert!(matches!(ch.read_line(), Err(AnnexError::Io(_))));
}
