use sockprobe_collectd::client::ClientError;
use sockprobe_core::config::CheckConfig;
use sockprobe_core::outcome::Outcome;

/// Failures that end a check run before evaluation.
///
/// Every variant maps to a CRITICAL outcome, see [`CheckError::into_outcome`].
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// The socket could not be opened.
    #[error("Tried to access UNIX domain socket ({endpoint}) but failed: {source}")]
    Connect {
        endpoint: String,
        source: ClientError,
    },

    /// An exchange on the open socket failed.
    #[error("An error occurred while trying to use the socket ({endpoint}) : {source}")]
    Socket {
        endpoint: String,
        source: ClientError,
    },

    /// The run deadline passed.
    #[error("Timed out")]
    TimedOut,
}

impl CheckError {
    pub fn connect(endpoint: &str, source: ClientError) -> Self {
        if source.is_deadline_exceeded() {
            return Self::TimedOut;
        }
        Self::Connect {
            endpoint: endpoint.to_string(),
            source,
        }
    }

    pub fn socket(endpoint: &str, source: ClientError) -> Self {
        if source.is_deadline_exceeded() {
            return Self::TimedOut;
        }
        Self::Socket {
            endpoint: endpoint.to_string(),
            source,
        }
    }

    pub fn into_outcome(self, config: &CheckConfig) -> Outcome {
        match self {
            CheckError::TimedOut => Outcome::critical(format!("{} timed out", config.label())),
            other => Outcome::critical(other.to_string()),
        }
    }
}
