//! Max-value selection across pattern-matched candidates.

use crate::value_record::ValueRecord;

/// A metric identifier together with the record fetched for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Selected {
    pub metric_id: String,
    pub record: ValueRecord,
}

impl Selected {
    /// Pair a fully qualified identifier with its record.
    pub fn new(metric_id: impl Into<String>, record: ValueRecord) -> Self {
        Self {
            metric_id: metric_id.into(),
            record,
        }
    }
}

/// What happened to a candidate offered to a [`MaxTracker`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Offer {
    /// The candidate holds the greatest value seen so far.
    Leader(f64),
    /// The candidate was compared and lost (or tied with an earlier one).
    Behind(f64),
    /// No record, or the record lacks a usable value for the field.
    Unusable,
}

/// Tracks the candidate with the strictly greatest value for one field.
///
/// Ties keep the earliest candidate. Candidates without a usable value are
/// skipped instead of aborting the whole selection.
#[derive(Debug)]
pub struct MaxTracker<'f> {
    field: &'f str,
    best: Option<(f64, Selected)>,
}

impl<'f> MaxTracker<'f> {
    pub fn new(field: &'f str) -> Self {
        Self { field, best: None }
    }

    pub fn offer(&mut self, metric_id: &str, record: Option<ValueRecord>) -> Offer {
        let Some(record) = record else {
            return Offer::Unusable;
        };
        let Some(value) = record.usable(self.field) else {
            return Offer::Unusable;
        };

        match &self.best {
            Some((best, _)) if value <= *best => Offer::Behind(value),
            _ => {
                self.best = Some((value, Selected::new(metric_id, record)));
                Offer::Leader(value)
            }
        }
    }

    pub fn finish(self) -> Option<Selected> {
        self.best.map(|(_, selected)| selected)
    }
}
