//! Shared machinery for validating HTML form input.
//!
//! Form fields arrive as strings. Each feature module parses its raw form
//! struct into typed values, collecting every problem into a [FieldErrors] so
//! that one bad field never hides another.

use std::collections::BTreeMap;

/// Validation messages collected per form field.
///
/// Messages are kept in insertion order for each field, and fields are
/// ordered by name so that rendering is deterministic.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FieldErrors {
    errors: BTreeMap<&'static str, Vec<String>>,
}

impl FieldErrors {
    /// Record a validation message against `field`.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.entry(field).or_default().push(message.into());
    }

    /// Whether any field has a recorded message.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// The messages recorded against `field`, in the order they were added.
    pub fn get(&self, field: &str) -> &[String] {
        self.errors
            .get(field)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Iterate over all fields that have at least one message.
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.errors.keys().copied()
    }
}

#[cfg(test)]
mod field_errors_tests {
    use super::FieldErrors;

    #[test]
    fn new_errors_are_empty() {
        let errors = FieldErrors::default();

        assert!(errors.is_empty());
        assert_eq!(errors.get("name"), &[] as &[String]);
    }

    #[test]
    fn add_records_messages_in_order() {
        let mut errors = FieldErrors::default();

        errors.add("amount", "Amount must be a number");
        errors.add("amount", "Amount must be greater than 0");

        assert!(!errors.is_empty());
        assert_eq!(
            errors.get("amount"),
            &[
                "Amount must be a number".to_owned(),
                "Amount must be greater than 0".to_owned()
            ]
        );
    }

    #[test]
    fn messages_are_kept_per_field() {
        let mut errors = FieldErrors::default();

        errors.add("name", "Name is required");
        errors.add("period", "Period must be monthly, weekly, or yearly");

        assert_eq!(errors.get("name"), &["Name is required".to_owned()]);
        assert_eq!(
            errors.get("period"),
            &["Period must be monthly, weekly, or yearly".to_owned()]
        );
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["name", "period"]);
    }
}
