//! Line-oriented byte-stream transport to the daemon.
//!
//! [`LineTransport`] is the seam the protocol client talks through.
//! [`UnixSocketTransport`] is the production implementation; tests use
//! [`ScriptedTransport`](crate::fake::ScriptedTransport).

use std::future::Future;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;

use crate::deadline::Deadline;

/// A connection that exchanges `\n`-terminated text lines.
///
/// `close` is idempotent and safe on a never-opened transport.
#[async_trait]
pub trait LineTransport: Send {
    /// Human-readable endpoint, used in operator messages.
    fn endpoint(&self) -> &str;

    fn is_open(&self) -> bool;

    async fn open(&mut self) -> Result<(), TransportError>;

    async fn close(&mut self);

    /// Read one line, without its terminator.
    async fn read_line(&mut self) -> Result<String, TransportError>;

    /// Write one command line; a trailing `\n` is added if missing.
    async fn write_line(&mut self, line: &str) -> Result<(), TransportError>;
}

/// Transport over a Unix domain stream socket.
///
/// When a [`Deadline`] is attached, every connect, read and write is bounded
/// by it, and fails immediately once the deadline has passed.
pub struct UnixSocketTransport {
    path: PathBuf,
    endpoint: String,
    deadline: Option<Deadline>,
    stream: Option<BufReader<UnixStream>>,
}

impl UnixSocketTransport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let endpoint = path.display().to_string();
        Self {
            path,
            endpoint,
            deadline: None,
            stream: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

async fn bounded<T, F>(deadline: Option<Deadline>, operation: F) -> Result<T, TransportError>
where
    F: Future<Output = Result<T, TransportError>>,
{
    match deadline {
        Some(deadline) => deadline.guard(operation).await,
        None => operation.await,
    }
}

#[async_trait]
impl LineTransport for UnixSocketTransport {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    async fn open(&mut self) -> Result<(), TransportError> {
        self.close().await;

        let path = &self.path;
        let stream = bounded(self.deadline, async {
            UnixStream::connect(path)
                .await
                .map_err(TransportError::Connect)
        })
        .await?;

        tracing::debug!(endpoint = %self.endpoint, "Connected to daemon socket");
        self.stream = Some(BufReader::new(stream));
        Ok(())
    }

    async fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            // Fails harmlessly if the peer already hung up.
            let _ = stream.get_mut().shutdown().await;
            tracing::debug!(endpoint = %self.endpoint, "Closed daemon socket");
        }
    }

    async fn read_line(&mut self) -> Result<String, TransportError> {
        let deadline = self.deadline;
        let stream = self.stream.as_mut().ok_or(TransportError::NotOpen)?;

        let mut line = String::new();
        let read = bounded(deadline, async {
            stream.read_line(&mut line).await.map_err(TransportError::Io)
        })
        .await?;

        if read == 0 {
            return Err(TransportError::Closed);
        }
        let len = line.trim_end_matches(&['\r', '\n'][..]).len();
        line.truncate(len);
        Ok(line)
    }

    async fn write_line(&mut self, line: &str) -> Result<(), TransportError> {
        let deadline = self.deadline;
        let stream = self.stream.as_mut().ok_or(TransportError::NotOpen)?;

        let mut payload = line.to_owned();
        if !payload.ends_with('\n') {
            payload.push('\n');
        }

        bounded(deadline, async {
            let socket = stream.get_mut();
            socket
                .write_all(payload.as_bytes())
                .await
                .map_err(TransportError::Io)?;
            socket.flush().await.map_err(TransportError::Io)
        })
        .await
    }
}

/// Errors raised by a [`LineTransport`].
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Could not reach the endpoint.
    #[error("{0}")]
    Connect(std::io::Error),

    /// Read or write failed on an established connection.
    #[error("I/O error: {0}")]
    Io(std::io::Error),

    /// The peer closed the stream while a response was expected.
    #[error("Connection closed by peer")]
    Closed,

    #[error("Connection is not open")]
    NotOpen,

    #[error("Deadline exceeded")]
    DeadlineExceeded,
}
