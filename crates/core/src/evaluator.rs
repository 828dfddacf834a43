//! Threshold evaluation.
//!
//! [`evaluate`] is a pure function of the selected record and the check
//! configuration. Rules are applied in a fixed priority order: absent
//! record, missing field, critical, warning, ok.

use crate::config::{CheckConfig, Target, Thresholds};
use crate::outcome::Outcome;
use crate::selection::Selected;

/// Classify the selected metric against the configured thresholds.
///
/// `selected` is `None` when the daemon has no value for the metric (or,
/// in pattern mode, when no candidate produced a usable value). A record
/// with no fields at all is treated the same way.
pub fn evaluate(selected: Option<&Selected>, config: &CheckConfig) -> Outcome {
    let Some(selected) = selected.filter(|s| !s.record.is_empty()) else {
        return Outcome::critical(format!(
            "The metric {} does not exist in this host.",
            config.label()
        ));
    };

    let field = config.field_name();
    let Some(value) = selected.record.usable(field) else {
        return Outcome::critical(format!("Metric value {field} not found in the list"));
    };

    let Thresholds { warning, critical } = config.thresholds();
    let metric_id = selected.metric_id.as_str();

    if value > critical {
        return Outcome::critical(format!(
            "{metric_id}[{field}] = {value:.2} is over the critical limit ({critical:.2})"
        ));
    }
    if value > warning {
        return Outcome::warning(format!(
            "{metric_id}[{field}] = {value:.2} is over the warning limit ({warning:.2})"
        ));
    }

    match config.target() {
        Target::Metric(_) => Outcome::ok(format!("{metric_id} is within threshold")),
        Target::Pattern(pattern) => {
            Outcome::ok(format!("Everything matching {pattern} is within threshold"))
        }
    }
}
