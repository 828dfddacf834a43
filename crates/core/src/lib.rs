//! Domain types for the collectd socket probe.
//!
//! Pure, synchronous building blocks: check configuration and its
//! validation, metric identifier helpers, pattern compilation, parsed
//! value records, max-value selection, and threshold evaluation.
//! Anything that touches the socket lives in `sockprobe-collectd`.

pub mod config;
pub mod error;
pub mod evaluator;
pub mod metric_id;
pub mod outcome;
pub mod pattern;
pub mod selection;
pub mod value_record;
