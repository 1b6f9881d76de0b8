//! Answer channels
//!
//! The review loop asks an `AnswerChannel` for the next reply and blocks
//! until it has one. `FifoChannel` reads replies from a named pipe that the
//! front-end writes one token into per prompt; `InProcessChannel` takes
//! them from a std mpsc channel.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::flashcards::Outcome;

/// Largest reply read from the pipe in one go
const REPLY_BUF_SIZE: usize = 8192;

/// A single reply from the reviewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Pass,
    Fail,
    Quit,
    /// Anything else; accepted but ignored
    Other(String),
    /// The channel is gone and no more replies will come
    Closed,
}

impl Reply {
    /// Interpret a raw reply body. A trailing newline is ignored.
    pub fn parse(body: &str) -> Self {
        let body = body.strip_suffix('\n').unwrap_or(body);
        let body = body.strip_suffix('\r').unwrap_or(body);

        match body {
            "pass" => Reply::Pass,
            "fail" => Reply::Fail,
            "quit" => Reply::Quit,
            other => Reply::Other(other.to_string()),
        }
    }

    /// The grading outcome this reply carries, if any
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            Reply::Pass => Some(Outcome::Pass),
            Reply::Fail => Some(Outcome::Fail),
            _ => None,
        }
    }
}

/// Source of graded replies for a review session
pub trait AnswerChannel {
    /// Block until the next reply arrives, or return `Reply::Closed`
    fn receive_next(&mut self) -> Reply;
}

/// Named pipe reopened for every reply
#[derive(Debug)]
pub struct FifoChannel {
    path: PathBuf,
    /// Pause before each reopen so the writer has released the pipe
    reopen_delay: Duration,
    opened: bool,
}

impl FifoChannel {
    pub fn new(path: impl Into<PathBuf>, reopen_delay: Duration) -> Self {
        Self {
            path: path.into(),
            reopen_delay,
            opened: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AnswerChannel for FifoChannel {
    fn receive_next(&mut self) -> Reply {
        if self.opened && !self.reopen_delay.is_zero() {
            thread::sleep(self.reopen_delay);
        }
        self.opened = true;

        // Blocks until a writer opens the other end
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) => {
                log::info!("Answer pipe {} unavailable: {}", self.path.display(), e);
                return Reply::Closed;
            }
        };

        let mut buf = [0u8; REPLY_BUF_SIZE];
        match file.read(&mut buf) {
            Ok(n) => Reply::parse(&String::from_utf8_lossy(&buf[..n])),
            Err(e) => {
                log::warn!("Failed to read answer pipe {}: {}", self.path.display(), e);
                Reply::Closed
            }
        }
    }
}

/// Replies delivered over an in-process channel. Dropping every sender
/// closes it.
#[derive(Debug)]
pub struct InProcessChannel {
    receiver: mpsc::Receiver<String>,
}

impl InProcessChannel {
    pub fn new(receiver: mpsc::Receiver<String>) -> Self {
        Self { receiver }
    }

    /// Create a connected sender and channel
    pub fn pair() -> (mpsc::Sender<String>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, Self::new(rx))
    }
}

impl AnswerChannel for InProcessChannel {
    fn receive_next(&mut self) -> Reply {
        match self.receiver.recv() {
            Ok(body) => Reply::parse(&body),
            Err(_) => Reply::Closed,
        }
    }
}
