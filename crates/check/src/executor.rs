//! Deadline-bounded check execution.
//!
//! [`run_check`] connects, resolves the target, fetches values, closes the
//! connection and evaluates, all inside one deadline. If the deadline
//! passes at any point, whatever was in flight is abandoned, the
//! connection is closed and the outcome is a fixed CRITICAL "timed out".
//! [`check_isolated`] additionally turns a panicking check into a CRITICAL
//! outcome, so the caller always has a result to report.

use std::future::Future;

use sockprobe_collectd::aggregator::max_across;
use sockprobe_collectd::client::{ClientError, CollectdClient};
use sockprobe_collectd::deadline::Deadline;
use sockprobe_collectd::resolver::{resolve, Resolution};
use sockprobe_collectd::transport::{LineTransport, UnixSocketTransport};
use sockprobe_core::config::CheckConfig;
use sockprobe_core::evaluator::evaluate;
use sockprobe_core::outcome::{Outcome, Status};
use sockprobe_core::selection::Selected;

use crate::error::CheckError;

/// Run [`check_unix_socket`] on its own task.
pub async fn check_isolated(config: &CheckConfig) -> Outcome {
    let owned = config.clone();
    isolate(config, async move { check_unix_socket(&owned).await }).await
}

async fn isolate<F>(config: &CheckConfig, check: F) -> Outcome
where
    F: Future<Output = Outcome> + Send + 'static,
{
    match tokio::spawn(check).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(error = %e, "Check task did not complete");
            Outcome::critical(format!(
                "Unexpected exception when trying to read {} ({e})",
                config.socket_path().display()
            ))
        }
    }
}

/// Run the check against the configured Unix socket.
pub async fn check_unix_socket(config: &CheckConfig) -> Outcome {
    let deadline = Deadline::after(config.timeout());
    let transport = UnixSocketTransport::new(config.socket_path()).with_deadline(deadline);
    let mut client = CollectdClient::new(transport);
    run_check(&mut client, config, deadline).await
}

/// Run the check over `client` within `deadline`.
///
/// The connection is closed on every exit path.
pub async fn run_check<T: LineTransport>(
    client: &mut CollectdClient<T>,
    config: &CheckConfig,
    deadline: Deadline,
) -> Outcome {
    let result = match tokio::time::timeout_at(deadline.instant(), query(client, config)).await {
        Ok(result) => result,
        Err(_) => Err(CheckError::TimedOut),
    };
    client.close().await;

    let outcome = match result {
        Ok(selected) => evaluate(selected.as_ref(), config),
        Err(CheckError::TimedOut) => {
            tracing::warn!(target_metric = config.label(), "Check deadline exceeded");
            CheckError::TimedOut.into_outcome(config)
        }
        Err(e) => {
            tracing::error!(endpoint = %client.endpoint(), error = %e, "Check failed");
            e.into_outcome(config)
        }
    };

    match outcome.status {
        Status::Ok => tracing::info!(message = %outcome.message, "Check passed"),
        Status::Warning | Status::Critical => {
            tracing::info!(status = %outcome.status, message = %outcome.message, "Check raised")
        }
    }
    outcome
}

async fn query<T: LineTransport>(
    client: &mut CollectdClient<T>,
    config: &CheckConfig,
) -> Result<Option<Selected>, CheckError> {
    let endpoint = client.endpoint().to_string();

    client
        .connect()
        .await
        .map_err(|e| CheckError::connect(&endpoint, e))?;

    let selected = fetch(client, config)
        .await
        .map_err(|e| CheckError::socket(&endpoint, e))?;

    client.close().await;
    Ok(selected)
}

async fn fetch<T: LineTransport>(
    client: &mut CollectdClient<T>,
    config: &CheckConfig,
) -> Result<Option<Selected>, ClientError> {
    match resolve(client, config.target()).await? {
        Resolution::Exact(metric_id) => {
            let record = client.get_value(&metric_id).await?.into_record();
            Ok(record.map(|record| Selected::new(metric_id, record)))
        }
        Resolution::Candidates(candidates) => {
            max_across(client, &candidates, config.field_name()).await
        }
    }
}
