//! Client for collectd's `unixsock` plugin.
//!
//! Provides the line transport over a Unix stream socket, parsing of the
//! `LISTVAL` / `GETVAL` responses, metric resolution against the daemon's
//! catalog, and max-value aggregation for pattern checks.

pub mod aggregator;
pub mod client;
pub mod deadline;
pub mod fake;
pub mod protocol;
pub mod resolver;
pub mod transport;
