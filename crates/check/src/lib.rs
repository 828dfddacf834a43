//! `sockprobe-check` library crate.
//!
//! The executor runs one deadline-bounded check against the collectd
//! socket and always produces exactly one [`Outcome`]. The binary entry
//! point lives in `main.rs`.
//!
//! [`Outcome`]: sockprobe_core::outcome::Outcome

pub mod error;
pub mod executor;
pub mod report;
