//! Resolve the configured target into fully qualified metric identifiers.
//!
//! Both modes read the `LISTVAL` catalog and then reconnect, because the
//! daemon needs a fresh exchange before the `GETVAL`s that follow.

use sockprobe_core::config::Target;
use sockprobe_core::metric_id::{hostname_of, qualify};
use sockprobe_core::pattern::MetricPattern;

use crate::client::{ClientError, CollectdClient};
use crate::transport::LineTransport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// One identifier built from the daemon's hostname and the metric path.
    Exact(String),
    /// Catalog identifiers matching the pattern, in catalog order.
    Candidates(Vec<String>),
}

pub async fn resolve<T: LineTransport>(
    client: &mut CollectdClient<T>,
    target: &Target,
) -> Result<Resolution, ClientError> {
    match target {
        Target::Metric(path) => resolve_exact(client, path).await.map(Resolution::Exact),
        Target::Pattern(pattern) => resolve_pattern(client, pattern)
            .await
            .map(Resolution::Candidates),
    }
}

/// Learn the hostname from the first catalog entry and qualify `path` with it.
///
/// `path` must already be normalized to a leading `/`.
pub async fn resolve_exact<T: LineTransport>(
    client: &mut CollectdClient<T>,
    path: &str,
) -> Result<String, ClientError> {
    let catalog = client.list_values().await?;
    let first = catalog.first().ok_or(ClientError::EmptyCatalog)?;
    let metric_id = qualify(hostname_of(&first.identifier), path);

    client.reconnect().await?;

    tracing::info!(metric_id = %metric_id, "Resolved metric identifier");
    Ok(metric_id)
}

/// Every catalog identifier containing a match for `pattern`.
pub async fn resolve_pattern<T: LineTransport>(
    client: &mut CollectdClient<T>,
    pattern: &MetricPattern,
) -> Result<Vec<String>, ClientError> {
    let catalog = client.list_values().await?;
    let catalog_size = catalog.len();
    let candidates: Vec<String> = catalog
        .into_iter()
        .map(|entry| entry.identifier)
        .filter(|identifier| pattern.is_match(identifier))
        .collect();

    client.reconnect().await?;

    tracing::info!(
        pattern = %pattern,
        catalog_size,
        matches = candidates.len(),
        "Resolved metric pattern",
    );
    Ok(candidates)
}
