//! Max-value aggregation across pattern candidates.

use sockprobe_core::selection::{MaxTracker, Offer, Selected};

use crate::client::{ClientError, CollectdClient};
use crate::transport::LineTransport;

/// Fetch every candidate in order and keep the one with the greatest
/// `field` value.
///
/// Candidates the daemon has no value for, or whose record lacks a usable
/// `field`, are skipped. Returns `None` if no candidate was usable.
pub async fn max_across<T: LineTransport>(
    client: &mut CollectdClient<T>,
    candidates: &[String],
    field: &str,
) -> Result<Option<Selected>, ClientError> {
    let mut tracker = MaxTracker::new(field);

    for metric_id in candidates {
        let record = client.get_value(metric_id).await?.into_record();
        match tracker.offer(metric_id, record) {
            Offer::Leader(value) => {
                tracing::debug!(metric_id = %metric_id, field, value, "New maximum");
            }
            Offer::Behind(value) => {
                tracing::debug!(metric_id = %metric_id, field, value, "Below current maximum");
            }
            Offer::Unusable => {
                tracing::warn!(metric_id = %metric_id, field, "Skipping candidate without a usable value");
            }
        }
    }

    Ok(tracker.finish())
}
