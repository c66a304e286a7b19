//! Shared test helpers

#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Cursor, Write};
use std::rc::Rc;

use annex_remote::Annex;

/// Output sink the test can read back after handing a clone to a session
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).unwrap()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// An `Annex` reading `input` and writing into the returned buffer
pub fn annex_with_input(input: &str) -> (Annex, SharedBuffer) {
    let output = SharedBuffer::default();
    let annex = Annex::new(Cursor::new(input.to_string()), output.clone());
    (annex, output)
}
