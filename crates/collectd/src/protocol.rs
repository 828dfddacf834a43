//! Framing and line parsing for the `unixsock` text protocol.
//!
//! Every response starts with a status line `"<N> <text>"`. A non-negative
//! `N` is the exact number of lines that follow; a negative `N` is an error
//! reported by the daemon. `GETVAL` has one extra shape: the literal
//! [`NO_SUCH_VALUE`] line, sent instead of a status line when the
//! identifier is unknown.

use crate::client::ClientError;

pub const LIST_COMMAND: &str = "LISTVAL";

/// Response to `GETVAL` for an identifier the daemon does not know.
pub const NO_SUCH_VALUE: &str = "ERROR: Server error: No such value.";

pub fn get_command(metric_id: &str) -> String {
    format!("GETVAL {metric_id}")
}

/// One `LISTVAL` entry. The line is `"<timestamp> <identifier>"`; only the
/// identifier is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub identifier: String,
}

pub fn is_no_such_value(line: &str) -> bool {
    line.trim() == NO_SUCH_VALUE
}

/// Parse a status line into the number of lines that follow it.
pub fn parse_count_line(line: &str) -> Result<usize, ClientError> {
    let trimmed = line.trim();
    let (token, rest) = trimmed.split_once(char::is_whitespace).unwrap_or((trimmed, ""));

    let count: i64 = token
        .parse()
        .map_err(|_| ClientError::malformed(line, "expected a leading line count"))?;

    if count < 0 {
        let reason = rest.trim();
        return Err(ClientError::Daemon(if reason.is_empty() {
            trimmed.to_string()
        } else {
            reason.to_string()
        }));
    }
    usize::try_from(count).map_err(|_| ClientError::malformed(line, "line count out of range"))
}

pub fn parse_list_entry(line: &str) -> Result<ListEntry, ClientError> {
    let identifier = line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| ClientError::malformed(line, "expected \"<timestamp> <identifier>\""))?;

    Ok(ListEntry {
        identifier: identifier.to_string(),
    })
}

/// Parse a `"<field>=<number>"` line from a `GETVAL` response.
pub fn parse_value_line(line: &str) -> Result<(String, f64), ClientError> {
    let (field, value) = line
        .trim()
        .split_once('=')
        .ok_or_else(|| ClientError::malformed(line, "expected \"<field>=<value>\""))?;

    let field = field.trim();
    if field.is_empty() {
        return Err(ClientError::malformed(line, "empty field name"));
    }
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|_| ClientError::malformed(line, "value is not a number"))?;

    Ok((field.to_string(), value))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn count_line_leading_integer() {
        assert_eq!(parse_count_line("3 Values found").unwrap(), 3);
        assert_eq!(parse_count_line("1 Value found\n").unwrap(), 1);
        assert_eq!(parse_count_line("0 Values found").unwrap(), 0);
        assert_eq!(parse_count_line("12").unwrap(), 12);
    }

    #[test]
    fn count_line_negative_is_daemon_error() {
        assert_matches!(
            parse_count_line("-1 Unknown command: FOO"),
            Err(ClientError::Daemon(msg)) if msg == "Unknown command: FOO"
        );
        assert_matches!(parse_count_line("-1"), Err(ClientError::Daemon(msg)) if msg == "-1");
    }

    #[test]
    fn count_line_garbage_is_malformed() {
        assert_matches!(parse_count_line("Values found"), Err(ClientError::Malformed { .. }));
        assert_matches!(parse_count_line(""), Err(ClientError::Malformed { .. }));
        assert_matches!(parse_count_line(NO_SUCH_VALUE), Err(ClientError::Malformed { .. }));
    }

    #[test]
    fn list_entry_keeps_identifier_token() {
        let entry = parse_list_entry("1700000000.123 web-01/cpu-0/cpu-user").unwrap();
        assert_eq!(entry.identifier, "web-01/cpu-0/cpu-user");
    }

    #[test]
    fn list_entry_timestamp_is_not_interpreted() {
        assert_eq!(parse_list_entry("soon h/id").unwrap().identifier, "h/id");
        assert_eq!(parse_list_entry("  1.5   h/id  trailing").unwrap().identifier, "h/id");
    }

    #[test]
    fn list_entry_needs_two_tokens() {
        assert_matches!(parse_list_entry("094023"), Err(ClientError::Malformed { .. }));
        assert_matches!(parse_list_entry(""), Err(ClientError::Malformed { .. }));
    }

    #[test]
    fn value_line_parses_field_and_number() {
        assert_eq!(parse_value_line("value=2").unwrap(), ("value".to_string(), 2.0));
        assert_eq!(
            parse_value_line("shortterm=1.500000e-01").unwrap(),
            ("shortterm".to_string(), 0.15)
        );
    }

    #[test]
    fn value_line_accepts_nan() {
        let (field, value) = parse_value_line("value=nan").unwrap();
        assert_eq!(field, "value");
        assert!(value.is_nan());
    }

    #[test]
    fn value_line_rejects_garbage() {
        assert_matches!(parse_value_line("value"), Err(ClientError::Malformed { .. }));
        assert_matches!(parse_value_line("=3"), Err(ClientError::Malformed { .. }));
        assert_matches!(parse_value_line("value=lots"), Err(ClientError::Malformed { .. }));
    }

    #[test]
    fn no_such_value_is_recognised_with_trailing_whitespace() {
        assert!(is_no_such_value("ERROR: Server error: No such value.\r\n"));
        assert!(!is_no_such_value("1 Value found"));
    }

    #[test]
    fn get_command_interpolates_identifier() {
        assert_eq!(get_command("h/load/load"), "GETVAL h/load/load");
    }
}
