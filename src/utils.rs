//! Utility types shared across the crate.

use std::fmt::Debug;
use std::fmt::Formatter;

/// Hides a sensitive value from `Debug` output while still showing whether
/// it is present.
pub(crate) struct Redact<'a>(Option<&'a str>);

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact(Some(value))
    }
}

impl<'a> From<&'a Option<String>> for Redact<'a> {
    fn from(value: &'a Option<String>) -> Self {
        Redact(value.as_deref())
    }
}

impl Debug for Redact<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            None => f.write_str("None"),
            Some("") => f.write_str("EMPTY"),
            Some(_) => f.write_str("***"),
        }
    }
}
