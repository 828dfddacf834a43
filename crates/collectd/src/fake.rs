//! Scripted in-memory transport for tests.
//!
//! Plays back a fixed sequence of daemon lines regardless of which command
//! was written, and records every write. Once the script runs out, reads
//! block forever, which is how a daemon that announced more lines than it
//! sent looks from the client side.

use std::collections::VecDeque;

use async_trait::async_trait;

use crate::transport::{LineTransport, TransportError};

enum Scripted {
    Line(String),
    Eof,
}

pub struct ScriptedTransport {
    endpoint: String,
    script: VecDeque<Scripted>,
    writes: Vec<String>,
    open: bool,
    refuse: bool,
    opens: usize,
    closes: usize,
}

impl ScriptedTransport {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            endpoint: "scripted".to_string(),
            script: lines.iter().map(|l| Scripted::Line(l.to_string())).collect(),
            writes: Vec::new(),
            open: false,
            refuse: false,
            opens: 0,
            closes: 0,
        }
    }

    /// A transport whose `open` always fails with "connection refused".
    pub fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::new(&[])
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// After the scripted lines, report the peer closing the stream.
    pub fn then_eof(mut self) -> Self {
        self.script.push_back(Scripted::Eof);
        self
    }

    /// Commands written so far, without line terminators.
    pub fn writes(&self) -> &[String] {
        &self.writes
    }

    /// Scripted entries not yet read.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    /// Successful `open` calls.
    pub fn opens(&self) -> usize {
        self.opens
    }

    /// `close` calls that actually closed an open connection.
    pub fn closes(&self) -> usize {
        self.closes
    }
}

#[async_trait]
impl LineTransport for ScriptedTransport {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn is_open(&self) -> bool {
        self.open
    }

    async fn open(&mut self) -> Result<(), TransportError> {
        if self.refuse {
            return Err(TransportError::Connect(std::io::Error::from(
                std::io::ErrorKind::ConnectionRefused,
            )));
        }
        self.close().await;
        self.open = true;
        self.opens += 1;
        Ok(())
    }

    async fn close(&mut self) {
        if self.open {
            self.open = false;
            self.closes += 1;
        }
    }

    async fn read_line(&mut self) -> Result<String, TransportError> {
        if !self.open {
            return Err(TransportError::NotOpen);
        }
        match self.script.pop_front() {
            Some(Scripted::Line(line)) => Ok(line),
            Some(Scripted::Eof) => Err(TransportError::Closed),
            None => std::future::pending().await,
        }
    }

    async fn write_line(&mut self, line: &str) -> Result<(), TransportError> {
        if !self.open {
            return Err(TransportError::NotOpen);
        }
        self.writes.push(line.trim_end_matches('\n').to_string());
        Ok(())
    }
}
