// src/metadata/value.rs

//! Stored field values and the coercions applied when a field is set

use serde::Serialize;

use crate::schema::{FieldCategory, UNKNOWN};

/// Continuation prefix used to fold multi-line `Description` values
pub const DESCRIPTION_CONTINUATION: &str = "\n       |";

/// Value of a metadata field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// Default returned for unset fields of `category`
    pub fn default_for(category: FieldCategory) -> Self {
        if category.is_list() {
            Self::List(Vec::new())
        } else {
            Self::Text(UNKNOWN.to_string())
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            Self::Text(_) => None,
        }
    }

    /// Scalars become a single line; lists are comma-joined
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::List(items) => items.join(","),
        }
    }

    /// Lists as-is; a scalar becomes a one-element list
    pub fn into_list(self) -> Vec<String> {
        match self {
            Self::List(items) => items,
            Self::Text(text) => vec![text],
        }
    }

    /// Coerce a raw value into the shape `category` stores
    pub(crate) fn coerce(self, category: FieldCategory) -> Self {
        match (category, self) {
            (FieldCategory::ScalarText | FieldCategory::FreeText, Self::List(items)) => {
                Self::Text(items.join(","))
            }
            (FieldCategory::ScalarText | FieldCategory::FreeText, text) => text,
            (_, Self::List(items)) => Self::List(items),
            (FieldCategory::PredicateList, Self::Text(text)) => {
                Self::List(split_top_level_commas(&text))
            }
            (FieldCategory::PairList, Self::Text(text)) => {
                let text = text.trim();
                if text.is_empty() {
                    Self::List(Vec::new())
                } else {
                    Self::List(vec![text.to_string()])
                }
            }
            (_, Self::Text(text)) => Self::List(split_commas(&text)),
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<&String> for FieldValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(value: Vec<&str>) -> Self {
        Self::List(value.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for FieldValue {
    fn from(value: &[&str]) -> Self {
        Self::List(value.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for FieldValue {
    fn from(value: [&str; N]) -> Self {
        Self::List(value.iter().map(|s| s.to_string()).collect())
    }
}

/// Split on commas, trimming items and dropping empty ones
fn split_commas(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split on commas outside parentheses, so `foo (>=1.0, <2.0)` stays whole
fn split_top_level_commas(text: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                items.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    items.push(&text[start..]);

    items
        .into_iter()
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split `value; marker` at the first `;`
///
/// Values without a marker are returned untouched.
pub fn split_marker(value: &str) -> (&str, Option<&str>) {
    match value.split_once(';') {
        Some((value, marker)) => (value.trim(), Some(marker.trim())),
        None => (value, None),
    }
}

/// Fold embedded newlines for a line-oriented header
pub fn fold_description(text: &str) -> String {
    text.replace('\n', DESCRIPTION_CONTINUATION)
}

/// Inverse of [`fold_description`]
pub fn unfold_description(text: &str) -> String {
    text.replace(DESCRIPTION_CONTINUATION, "\n")
}
