// src/prose.rs

//! Optional validation of free-text fields
//!
//! `Description` is usually reStructuredText. Checking it is left to a
//! caller-supplied [`ProseValidator`]; without one, [`Metadata::check`]
//! simply reports no prose findings.
//!
//! [`Metadata::check`]: crate::metadata::Metadata::check

use std::fmt;

/// Severity of a prose finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
    Severe,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Severe => "severe",
        };
        f.write_str(label)
    }
}

/// Checks free text and reports findings; never fails
pub trait ProseValidator {
    fn validate(&self, text: &str) -> Vec<(Severity, String)>;
}

impl<F> ProseValidator for F
where
    F: Fn(&str) -> Vec<(Severity, String)>,
{
    fn validate(&self, text: &str) -> Vec<(Severity, String)> {
        self(text)
    }
}
