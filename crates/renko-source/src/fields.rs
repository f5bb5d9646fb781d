//! Field presence tracking.

use renko_types::{RenkoError, Result};
use std::collections::BTreeSet;

/// Names of the fields a source exposes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet(BTreeSet<String>);

impl FieldSet {
    /// Timestamp field name.
    pub const TIMESTAMP: &'static str = "timestamp";
    /// Price field name.
    pub const PRICE: &'static str = "price";
    /// Size field name.
    pub const SIZE: &'static str = "size";

    /// Creates a field set from names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    /// Adds a field name.
    pub fn insert(&mut self, name: impl Into<String>) {
        self.0.insert(name.into());
    }

    /// Returns true if the field is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Returns true if the optional size field is present.
    #[must_use]
    pub fn has_size(&self) -> bool {
        self.contains(Self::SIZE)
    }

    /// Iterates over field names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Checks that the timestamp and price fields are present.
    ///
    /// Names are matched exactly; `time` or `close` do not stand in.
    ///
    /// # Errors
    ///
    /// Returns [`RenkoError::MissingRequiredField`] naming the first absent
    /// field.
    pub fn require_core(&self, origin: &str) -> Result<()> {
        for field in [Self::TIMESTAMP, Self::PRICE] {
            if !self.contains(field) {
                return Err(RenkoError::missing_field(field, origin));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_core() {
        assert!(FieldSet::new(["timestamp", "price"]).require_core("t").is_ok());
        assert!(FieldSet::new(["size", "price", "timestamp"]).has_size());

        let err = FieldSet::new(["time", "price"]).require_core("ticks.csv").unwrap_err();
        match err {
            RenkoError::MissingRequiredField { field, origin } => {
                assert_eq!(field, "timestamp");
                assert_eq!(origin, "ticks.csv");
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(matches!(
            FieldSet::new(["timestamp", "close"]).require_core("t"),
            Err(RenkoError::MissingRequiredField { .. })
        ));
    }
}
