//! Protocol client for the `unixsock` plugin.
//!
//! [`CollectdClient`] owns one [`LineTransport`] for the duration of a
//! check and issues strictly sequential request/response exchanges: every
//! command is followed by reading its complete response before the next
//! command is written.

use sockprobe_core::value_record::ValueRecord;

use crate::protocol::{self, ListEntry};
use crate::transport::{LineTransport, TransportError};

/// Result of one `GETVAL` exchange.
#[derive(Debug, Clone, PartialEq)]
pub enum GetResponse {
    Found(ValueRecord),
    /// The daemon answered "No such value".
    Absent,
}

impl GetResponse {
    /// The fetched record, or `None` if the daemon had no such value.
    pub fn into_record(self) -> Option<ValueRecord> {
        match self {
            GetResponse::Found(record) => Some(record),
            GetResponse::Absent => None,
        }
    }
}

pub struct CollectdClient<T> {
    transport: T,
}

impl<T: LineTransport> CollectdClient<T> {
    /// Wrap a transport. Nothing is opened until [`connect`](Self::connect).
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Human-readable address of the daemon, used in error messages.
    pub fn endpoint(&self) -> &str {
        self.transport.endpoint()
    }

    /// Borrow the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Consume the client and return its transport.
    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Open the connection to the daemon.
    pub async fn connect(&mut self) -> Result<(), ClientError> {
        self.transport.open().await?;
        Ok(())
    }

    /// Close and reopen the connection, starting a fresh exchange.
    pub async fn reconnect(&mut self) -> Result<(), ClientError> {
        tracing::debug!(endpoint = %self.transport.endpoint(), "Reconnecting to daemon");
        self.transport.close().await;
        self.transport.open().await?;
        Ok(())
    }

    /// Safe to call any number of times.
    pub async fn close(&mut self) {
        self.transport.close().await;
    }

    /// Issue `LISTVAL` and return the full catalog in daemon order.
    pub async fn list_values(&mut self) -> Result<Vec<ListEntry>, ClientError> {
        self.send(protocol::LIST_COMMAND).await?;
        let status = self.transport.read_line().await?;
        let count = protocol::parse_count_line(&status)?;

        // The count is whatever the daemon claims; only the lines decide.
        let mut entries = Vec::new();
        for _ in 0..count {
            let line = self.transport.read_line().await?;
            entries.push(protocol::parse_list_entry(&line)?);
        }

        tracing::debug!(count, "Read metric catalog");
        Ok(entries)
    }

    /// Issue `GETVAL <metric_id>` and parse the returned values.
    pub async fn get_value(&mut self, metric_id: &str) -> Result<GetResponse, ClientError> {
        self.send(&protocol::get_command(metric_id)).await?;
        let status = self.transport.read_line().await?;
        if protocol::is_no_such_value(&status) {
            tracing::debug!(metric_id, "Daemon has no such value");
            return Ok(GetResponse::Absent);
        }
        let count = protocol::parse_count_line(&status)?;

        let mut record = ValueRecord::new();
        for _ in 0..count {
            let line = self.transport.read_line().await?;
            let (field, value) = protocol::parse_value_line(&line)?;
            record.insert(field, value);
        }

        tracing::debug!(metric_id, fields = record.len(), "Read metric values");
        Ok(GetResponse::Found(record))
    }

    async fn send(&mut self, command: &str) -> Result<(), ClientError> {
        tracing::debug!(command, "Sending command");
        self.transport.write_line(command).await?;
        Ok(())
    }
}

/// Errors that can occur while talking to the daemon.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The daemon sent a line that does not fit the protocol.
    #[error("Malformed response line {line:?}: {reason}")]
    Malformed { line: String, reason: &'static str },

    /// The daemon answered with a negative status line.
    #[error("Daemon error: {0}")]
    Daemon(String),

    /// `LISTVAL` returned no entries, so the hostname cannot be learned.
    #[error("Daemon returned an empty value list")]
    EmptyCatalog,
}

impl ClientError {
    pub fn malformed(line: &str, reason: &'static str) -> Self {
        Self::Malformed {
            line: line.to_string(),
            reason,
        }
    }

    /// Whether the failure is the transport running out of time.
    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(self, ClientError::Transport(TransportError::DeadlineExceeded))
    }
}
