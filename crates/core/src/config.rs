//! Check configuration.
//!
//! [`RawCheckConfig`] holds input exactly as the outer adapter received it.
//! [`RawCheckConfig::validate`] turns it into an immutable [`CheckConfig`]
//! that the rest of the probe only ever reads.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::CoreError;
use crate::metric_id::normalize_path;
use crate::pattern::MetricPattern;

/// collectd's default `unixsock` plugin socket.
pub const DEFAULT_SOCKET_PATH: &str = "/var/run/collectd-unixsock";

/// Field read from the value record unless told otherwise.
pub const DEFAULT_FIELD_NAME: &str = "value";

pub const DEFAULT_TIMEOUT_SECS: &str = "20";

/// Warning/critical limits. A value strictly above a limit trips it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub warning: f64,
    pub critical: f64,
}

/// What to look up: one metric path, or every catalog entry matching a pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// Normalized metric path, e.g. `/cpu-0/cpu-user`.
    Metric(String),
    Pattern(MetricPattern),
}

/// Validated check configuration. Built only by [`RawCheckConfig::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct CheckConfig {
    socket_path: PathBuf,
    target: Target,
    thresholds: Thresholds,
    field_name: String,
    timeout: Duration,
}

impl CheckConfig {
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Field read from each value record.
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Budget for the whole check, connect to close.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Normalized metric path or pattern, as used in operator messages.
    pub fn label(&self) -> &str {
        match &self.target {
            Target::Metric(path) => path,
            Target::Pattern(pattern) => pattern.as_str(),
        }
    }
}

/// Unvalidated check input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCheckConfig {
    pub socket: Option<String>,
    pub metric: Option<String>,
    pub pattern: Option<String>,
    pub warning: Option<String>,
    pub critical: Option<String>,
    pub field_name: Option<String>,
    pub timeout: Option<String>,
}

impl Default for RawCheckConfig {
    fn default() -> Self {
        Self {
            socket: Some(DEFAULT_SOCKET_PATH.to_string()),
            metric: None,
            pattern: None,
            warning: None,
            critical: None,
            field_name: Some(DEFAULT_FIELD_NAME.to_string()),
            timeout: Some(DEFAULT_TIMEOUT_SECS.to_string()),
        }
    }
}

impl RawCheckConfig {
    /// Load check input from environment variables, applying defaults.
    ///
    /// | Env Var                  | Default                      |
    /// |--------------------------|------------------------------|
    /// | `SOCKPROBE_SOCKET`       | `/var/run/collectd-unixsock` |
    /// | `SOCKPROBE_METRIC`       | --                           |
    /// | `SOCKPROBE_PATTERN`      | --                           |
    /// | `SOCKPROBE_WARNING`      | --                           |
    /// | `SOCKPROBE_CRITICAL`     | --                           |
    /// | `SOCKPROBE_FIELD`        | `value`                      |
    /// | `SOCKPROBE_TIMEOUT_SECS` | `20`                         |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            socket: lookup("SOCKPROBE_SOCKET").or(defaults.socket),
            metric: lookup("SOCKPROBE_METRIC"),
            pattern: lookup("SOCKPROBE_PATTERN"),
            warning: lookup("SOCKPROBE_WARNING"),
            critical: lookup("SOCKPROBE_CRITICAL"),
            field_name: lookup("SOCKPROBE_FIELD").or(defaults.field_name),
            timeout: lookup("SOCKPROBE_TIMEOUT_SECS").or(defaults.timeout),
        }
    }

    /// Validate and normalize.
    ///
    /// Rules are applied in a fixed order and the first failure wins.
    pub fn validate(&self) -> Result<CheckConfig, CoreError> {
        let requested = match (non_empty(&self.metric), non_empty(&self.pattern)) {
            (None, None) => {
                return Err(CoreError::validation("Metric and regexp can't be both empty"))
            }
            (Some(metric), None) => Requested::Metric(metric),
            (None, Some(pattern)) => Requested::Pattern(pattern),
            // Reported after the value checks.
            (Some(_), Some(_)) => Requested::Both,
        };
        let socket = non_empty(&self.socket)
            .ok_or_else(|| CoreError::validation("The socket can't be empty"))?;
        let critical = required(&self.critical, "Critical")?;
        let warning = required(&self.warning, "Warning")?;
        let field_name = non_empty(&self.field_name)
            .ok_or_else(|| CoreError::validation("Data name can't be empty"))?;
        let timeout = required(&self.timeout, "Timeout")?;

        let critical = parse_non_negative(critical, "Critical")?;
        let warning = parse_non_negative(warning, "Warning")?;
        let timeout = parse_timeout(timeout)?;

        let target = match requested {
            Requested::Both => {
                return Err(CoreError::validation(
                    "Only one of the options, metric or regexp, can be provided",
                ))
            }
            Requested::Metric(metric) => Target::Metric(normalize_path(metric)),
            Requested::Pattern(pattern) => Target::Pattern(
                MetricPattern::compile(pattern)
                    .map_err(|e| CoreError::validation(format!("Regexp is not valid: {e}")))?,
            ),
        };

        Ok(CheckConfig {
            socket_path: PathBuf::from(socket),
            target,
            thresholds: Thresholds { warning, critical },
            field_name: field_name.to_string(),
            timeout,
        })
    }
}

enum Requested<'a> {
    Metric(&'a str),
    Pattern(&'a str),
    Both,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, CoreError> {
    non_empty(value).ok_or_else(|| CoreError::validation(format!("{name} can't be empty")))
}

fn parse_number(value: &str, name: &str) -> Result<f64, CoreError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CoreError::validation(format!("{name} has to be a number")))
}

fn parse_non_negative(value: &str, name: &str) -> Result<f64, CoreError> {
    let number = parse_number(value, name)?;
    if number < 0.0 {
        return Err(CoreError::validation(format!(
            "{name} has to be a positive number"
        )));
    }
    Ok(number)
}

fn parse_timeout(value: &str) -> Result<Duration, CoreError> {
    let secs = parse_number(value, "Timeout")?;
    if secs <= 0.0 {
        return Err(CoreError::validation("Timeout has to be a positive number"));
    }
    Duration::try_from_secs_f64(secs)
        .map_err(|_| CoreError::validation("Timeout is too large"))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn raw_metric(metric: &str) -> RawCheckConfig {
        RawCheckConfig {
            metric: Some(metric.to_string()),
            warning: Some("3".into()),
            critical: Some("5".into()),
            timeout: Some("2".into()),
            ..Default::default()
        }
    }

    fn message(raw: &RawCheckConfig) -> String {
        match raw.validate() {
            Err(CoreError::Validation(msg)) => msg,
            Ok(config) => panic!("expected validation failure, got {config:?}"),
        }
    }

    #[test]
    fn valid_metric_config_is_normalized() {
        let config = raw_metric("cpu-0/cpu-user").validate().unwrap();
        assert_eq!(config.target(), &Target::Metric("/cpu-0/cpu-user".into()));
        assert_eq!(config.label(), "/cpu-0/cpu-user");
        assert_eq!(config.socket_path(), Path::new(DEFAULT_SOCKET_PATH));
        assert_eq!(config.field_name(), "value");
        assert_eq!(config.thresholds(), Thresholds { warning: 3.0, critical: 5.0 });
        assert_eq!(config.timeout(), Duration::from_secs(2));
    }

    #[test]
    fn valid_pattern_config() {
        let raw = RawCheckConfig {
            metric: None,
            pattern: Some("cpu*/usage".into()),
            ..raw_metric("")
        };
        let config = raw.validate().unwrap();
        assert_matches!(config.target(), Target::Pattern(p) if p.as_str() == "/cpu*/usage");
    }

    #[test]
    fn fractional_timeout_is_accepted() {
        let raw = RawCheckConfig {
            timeout: Some("0.25".into()),
            ..raw_metric("/id/id")
        };
        assert_eq!(raw.validate().unwrap().timeout(), Duration::from_millis(250));
    }

    #[test]
    fn empty_metric_and_pattern_rejected() {
        let raw = RawCheckConfig {
            metric: Some("".into()),
            ..raw_metric("")
        };
        assert_eq!(message(&raw), "Metric and regexp can't be both empty");
    }

    #[test]
    fn missing_values_rejected() {
        let cases = [
            (RawCheckConfig { socket: None, ..raw_metric("/id") }, "The socket can't be empty"),
            (RawCheckConfig { critical: None, ..raw_metric("/id") }, "Critical can't be empty"),
            (RawCheckConfig { warning: None, ..raw_metric("/id") }, "Warning can't be empty"),
            (RawCheckConfig { field_name: None, ..raw_metric("/id") }, "Data name can't be empty"),
            (RawCheckConfig { timeout: None, ..raw_metric("/id") }, "Timeout can't be empty"),
        ];
        for (raw, expected) in cases {
            assert_eq!(message(&raw), expected);
        }
    }

    #[test]
    fn non_numeric_values_rejected() {
        let cases = [
            (RawCheckConfig { critical: Some("invalid".into()), ..raw_metric("/id") }, "Critical has to be a number"),
            (RawCheckConfig { warning: Some("invalid".into()), ..raw_metric("/id") }, "Warning has to be a number"),
            (RawCheckConfig { timeout: Some("invalid".into()), ..raw_metric("/id") }, "Timeout has to be a number"),
            (RawCheckConfig { critical: Some("inf".into()), ..raw_metric("/id") }, "Critical has to be a number"),
        ];
        for (raw, expected) in cases {
            assert_eq!(message(&raw), expected);
        }
    }

    #[test]
    fn negative_values_rejected() {
        let cases = [
            (RawCheckConfig { critical: Some("-0.5".into()), ..raw_metric("/id") }, "Critical has to be a positive number"),
            (RawCheckConfig { warning: Some("-3".into()), ..raw_metric("/id") }, "Warning has to be a positive number"),
            (RawCheckConfig { timeout: Some("-8.0".into()), ..raw_metric("/id") }, "Timeout has to be a positive number"),
            (RawCheckConfig { timeout: Some("0".into()), ..raw_metric("/id") }, "Timeout has to be a positive number"),
        ];
        for (raw, expected) in cases {
            assert_eq!(message(&raw), expected);
        }
    }

    #[test]
    fn zero_thresholds_allowed() {
        let raw = RawCheckConfig {
            warning: Some("0".into()),
            critical: Some("0".into()),
            ..raw_metric("/id")
        };
        assert!(raw.validate().is_ok());
    }

    #[test]
    fn metric_and_pattern_together_rejected() {
        let raw = RawCheckConfig {
            pattern: Some("/cpu*/usage".into()),
            ..raw_metric("/id/id")
        };
        assert_eq!(
            message(&raw),
            "Only one of the options, metric or regexp, can be provided"
        );
    }

    #[test]
    fn broken_pattern_rejected() {
        let raw = RawCheckConfig {
            metric: None,
            pattern: Some("/cpu(".into()),
            ..raw_metric("")
        };
        assert!(message(&raw).starts_with("Regexp is not valid: "));
    }

    #[test]
    fn lookup_applies_defaults() {
        let raw = RawCheckConfig::from_lookup(|key| match key {
            "SOCKPROBE_METRIC" => Some("load/load".into()),
            "SOCKPROBE_WARNING" => Some("1".into()),
            "SOCKPROBE_CRITICAL" => Some("2".into()),
            _ => None,
        });
        assert_eq!(raw.socket.as_deref(), Some(DEFAULT_SOCKET_PATH));
        assert_eq!(raw.field_name.as_deref(), Some("value"));
        assert_eq!(raw.timeout.as_deref(), Some("20"));
        let config = raw.validate().unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(20));
        assert_eq!(config.label(), "/load/load");
    }
}
