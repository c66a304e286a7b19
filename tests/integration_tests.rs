//! Integration tests for annex-remote
//!
//! Drive the `git-annex-remote-null` binary over real pipes the way
//! git-annex does.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

// =============================================================================
// Helper Functions
// =============================================================================

struct Host {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl Host {
    fn spawn() -> Self {
        let mut child = Command::new(env!("CARGO_BIN_EXE_git-annex-remote-null"))
            .env_remove("RUST_LOG")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .unwrap();

        let stdin = child.stdin.take().unwrap();
        let stdout = BufReader::new(child.stdout.take().unwrap());
        Self {
            child,
            stdin,
            stdout,
        }
    }

    fn send(&mut self, line: &str) {
        writeln!(self.stdin, "{}", line).unwrap();
        self.stdin.flush().unwrap();
    }

    fn recv(&mut self) -> String {
        let mut line = String::new();
        self.stdout.read_line(&mut line).unwrap();
        line.trim_end_matches('\n').to_string()
    }

    /// Close the host side of stdin and wait for the remote to exit
    fn finish(mut self) -> std::process::ExitStatus {
        drop(self.stdin);
        self.child.wait().unwrap()
    }
}

// =============================================================================
// Session Tests
// =============================================================================

#[test]
fn test_null_remote_session() {
    let mut host = Host::spawn();

    assert_eq!(host.recv(), "VERSION 1");

    host.send("EXTENSIONS INFO ASYNC");
    assert_eq!(host.recv(), "EXTENSIONS INFO");

    host.send("INITREMOTE");
    assert_eq!(host.recv(), "INITREMOTE-SUCCESS");

    host.send("PREPARE");
    assert_eq!(host.recv(), "DEBUG null remote ready");
    assert_eq!(host.recv(), "PREPARE-SUCCESS");

    host.send("CHECKPRESENT SHA256E-s3--abc");
    assert_eq!(host.recv(), "CHECKPRESENT-FAILURE SHA256E-s3--abc");

    host.send("TRANSFER STORE SHA256E-s3--abc /tmp/some file");
    assert_eq!(
        host.recv(),
        "TRANSFER-FAILURE STORE SHA256E-s3--abc null remote cannot store content"
    );

    host.send("TRANSFER RETRIEVE SHA256E-s3--abc /tmp/out");
    assert_eq!(
        host.recv(),
        "TRANSFER-FAILURE RETRIEVE SHA256E-s3--abc SHA256E-s3--abc is not stored in the null remote"
    );

    host.send("REMOVE SHA256E-s3--abc");
    assert_eq!(host.recv(), "REMOVE-SUCCESS SHA256E-s3--abc");

    host.send("GETAVAILABILITY");
    assert_eq!(host.recv(), "AVAILABILITY LOCAL");

    host.send("GETCOST");
    assert_eq!(host.recv(), "UNSUPPORTED-REQUEST");

    host.send("GETINFO");
    assert_eq!(host.recv(), "INFOFIELD storage");
    assert_eq!(host.recv(), "INFOVALUE none");
    assert_eq!(host.recv(), "INFOFIELD keys checked");
    assert_eq!(host.recv(), "INFOVALUE 1");
    assert_eq!(host.recv(), "INFOEND");

    let status = host.finish();
    assert!(status.success());
}

#[test]
fn test_null_remote_unknown_command() {
    let mut host = Host::spawn();
    assert_eq!(host.recv(), "VERSION 1");

    host.send("SOMETHING-NEW with params");
    assert_eq!(host.recv(), "UNSUPPORTED-REQUEST");

    host.send("EXPORTSUPPORTED");
    assert_eq!(host.recv(), "EXPORTSUPPORTED-FAILURE");

    assert!(host.finish().success());
}

#[test]
fn test_null_remote_host_error_exits_nonzero() {
    let mut host = Host::spawn();
    assert_eq!(host.recv(), "VERSION 1");

    host.send("ERROR git-annex is shutting down");

    let status = host.finish();
    assert!(!status.success());
}
