//! Parsed `GETVAL` payloads.

/// Field name to numeric value, in the order the daemon reported them.
///
/// An empty record means the daemon knows nothing about the metric and is
/// treated the same as an absent one. A record that exists but lacks the
/// requested field is a different failure, see [`ValueRecord::usable`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueRecord {
    fields: Vec<(String, f64)>,
}

impl ValueRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `field`.
    pub fn insert(&mut self, field: impl Into<String>, value: f64) {
        let field = field.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((field, value)),
        }
    }

    pub fn get(&self, field: &str) -> Option<f64> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| *value)
    }

    /// The value of `field` if it can be compared against a threshold.
    ///
    /// collectd reports `nan` for values it has no data for yet; those count
    /// as empty.
    pub fn usable(&self, field: &str) -> Option<f64> {
        self.get(field).filter(|value| !value.is_nan())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for ValueRecord {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (field, value) in iter {
            record.insert(field, value);
        }
        record
    }
}
