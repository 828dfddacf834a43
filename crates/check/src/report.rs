//! Rendering of an [`Outcome`] for the calling scheduler.

use sockprobe_core::outcome::{Outcome, Status};

pub const CHECK_NAME: &str = "SockProbe";

/// Conventional monitoring-plugin exit code for a status.
pub fn exit_code(status: Status) -> i32 {
    match status {
        Status::Ok => 0,
        Status::Warning => 1,
        Status::Critical => 2,
    }
}

/// Single output line, e.g. `SockProbe OK: host/load/load is within threshold`.
pub fn render(outcome: &Outcome) -> String {
    format!("{CHECK_NAME} {}: {}", outcome.status, outcome.message)
}
