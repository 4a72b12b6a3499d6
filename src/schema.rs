// src/schema.rs

//! Field schema for the three PKG-INFO metadata versions
//!
//! The schema is a set of static lookup tables:
//!
//! - which fields each metadata version (1.0, 1.1, 1.2) knows about, in
//!   the order they are written
//! - which fields imply a minimum version by their mere presence
//!   ("marker fields")
//! - how each field stores its value (its [`FieldCategory`])
//! - how attribute-style names (`author_email`) map to canonical names
//!   (`Author-email`)
//!
//! A record's version is inferred from the fields it holds (see
//! [`infer_version`]). Markers decide it when present. Otherwise the lowest
//! version listing every field wins, so a record with `Classifier` but no
//! marker is 1.1 even though `Classifier` is also a 1.2 field.
//!
//! Unknown field names are not rejected: they canonicalize to themselves so
//! that fields from newer metadata versions can be carried around.

use std::borrow::{Borrow, Cow};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::error::Error;

/// Value returned for scalar fields that are not set
pub const UNKNOWN: &str = "UNKNOWN";

/// Name of the header carrying the metadata version
pub const METADATA_VERSION: &str = "Metadata-Version";

const FIELDS_1_0: &[&str] = &[
    "Metadata-Version",
    "Name",
    "Version",
    "Platform",
    "Summary",
    "Description",
    "Keywords",
    "Home-page",
    "Author",
    "Author-email",
    "License",
];

const FIELDS_1_1: &[&str] = &[
    "Metadata-Version",
    "Name",
    "Version",
    "Platform",
    "Supported-Platform",
    "Summary",
    "Description",
    "Keywords",
    "Home-page",
    "Author",
    "Author-email",
    "License",
    "Classifier",
    "Download-URL",
    "Obsoletes",
    "Provides",
    "Requires",
];

const FIELDS_1_2: &[&str] = &[
    "Metadata-Version",
    "Name",
    "Version",
    "Platform",
    "Supported-Platform",
    "Summary",
    "Description",
    "Keywords",
    "Home-page",
    "Author",
    "Author-email",
    "Maintainer",
    "Maintainer-email",
    "License",
    "Classifier",
    "Download-URL",
    "Obsoletes-Dist",
    "Project-URL",
    "Provides-Dist",
    "Requires-Dist",
    "Requires-Python",
    "Requires-External",
];

const MARKERS_1_1: &[&str] = &["Obsoletes", "Provides", "Requires"];

const MARKERS_1_2: &[&str] = &[
    "Provides-Dist",
    "Requires-Dist",
    "Requires-Python",
    "Obsoletes-Dist",
    "Requires-External",
    "Maintainer",
    "Maintainer-email",
    "Project-URL",
];

/// Fields known to 1.1 but dropped in 1.2
const FIELDS_1_1_ONLY: &[&str] = &["Obsoletes", "Provides", "Requires"];

/// snake_case attribute name -> canonical field name
const ATTRIBUTE_ALIASES: &[(&str, &str)] = &[
    ("metadata_version", "Metadata-Version"),
    ("name", "Name"),
    ("version", "Version"),
    ("platform", "Platform"),
    ("supported_platform", "Supported-Platform"),
    ("summary", "Summary"),
    ("description", "Description"),
    ("keywords", "Keywords"),
    ("home_page", "Home-page"),
    ("author", "Author"),
    ("author_email", "Author-email"),
    ("maintainer", "Maintainer"),
    ("maintainer_email", "Maintainer-email"),
    ("license", "License"),
    ("classifier", "Classifier"),
    ("download_url", "Download-URL"),
    ("obsoletes_dist", "Obsoletes-Dist"),
    ("provides_dist", "Provides-Dist"),
    ("requires_dist", "Requires-Dist"),
    ("requires_python", "Requires-Python"),
    ("requires_external", "Requires-External"),
    ("requires", "Requires"),
    ("provides", "Provides"),
    ("obsoletes", "Obsoletes"),
    ("project_url", "Project-URL"),
];

/// A supported PKG-INFO metadata version
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetadataVersion {
    /// PEP 241
    #[default]
    V1_0,
    /// PEP 314
    V1_1,
    /// PEP 345
    V1_2,
}

impl MetadataVersion {
    /// All versions, oldest first
    pub const ALL: [MetadataVersion; 3] = [Self::V1_0, Self::V1_1, Self::V1_2];

    /// Parse a `Metadata-Version` value
    pub fn parse(s: &str) -> crate::Result<Self> {
        match s.trim() {
            "1.0" => Ok(Self::V1_0),
            "1.1" => Ok(Self::V1_1),
            "1.2" => Ok(Self::V1_2),
            other => Err(Error::UnrecognizedVersion(other.to_string())),
        }
    }

    /// The version as written in the `Metadata-Version` header
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V1_0 => "1.0",
            Self::V1_1 => "1.1",
            Self::V1_2 => "1.2",
        }
    }

    /// Fields of this version in write order
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            Self::V1_0 => FIELDS_1_0,
            Self::V1_1 => FIELDS_1_1,
            Self::V1_2 => FIELDS_1_2,
        }
    }

    /// Fields whose presence implies at least this version
    pub fn markers(&self) -> &'static [&'static str] {
        match self {
            Self::V1_0 => &[],
            Self::V1_1 => MARKERS_1_1,
            Self::V1_2 => MARKERS_1_2,
        }
    }

    /// Whether this version's field list contains `field`
    pub fn contains(&self, field: &str) -> bool {
        self.fields().contains(&field)
    }
}

impl fmt::Display for MetadataVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetadataVersion {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Fields of `version` in write order
pub fn fields_for(version: MetadataVersion) -> &'static [&'static str] {
    version.fields()
}

/// How a field stores and encodes its value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldCategory {
    /// One string; may carry a `; marker` suffix
    ScalarText,
    /// One string of free prose, never marker-filtered
    FreeText,
    /// Ordered strings, one header line each
    ScalarList,
    /// Ordered strings written as a single comma-joined line
    ElementList,
    /// Ordered version predicates, one header line each
    PredicateList,
    /// Ordered `label, url` pairs, one header line each
    PairList,
}

impl FieldCategory {
    /// Whether values of this category are sequences
    pub fn is_list(&self) -> bool {
        !matches!(self, Self::ScalarText | Self::FreeText)
    }

    /// Whether stored values may carry an environment marker suffix
    pub fn is_marker_filtered(&self) -> bool {
        !matches!(self, Self::FreeText)
    }
}

/// Category of a canonical field name; unknown fields are plain text
pub fn category(field: &str) -> FieldCategory {
    match field {
        "Summary" | "Description" | "Author" | "Maintainer" => FieldCategory::FreeText,
        "Keywords" => FieldCategory::ElementList,
        "Requires-Dist" | "Provides-Dist" | "Obsoletes-Dist" => FieldCategory::PredicateList,
        "Project-URL" => FieldCategory::PairList,
        "Platform" | "Supported-Platform" | "Classifier" | "Requires" | "Provides"
        | "Obsoletes" | "Requires-External" => FieldCategory::ScalarList,
        _ => FieldCategory::ScalarText,
    }
}

/// Minimum version implied by the presence of `field`, if any
pub fn implies_version(field: &str) -> Option<MetadataVersion> {
    if MARKERS_1_2.contains(&field) {
        Some(MetadataVersion::V1_2)
    } else if MARKERS_1_1.contains(&field) {
        Some(MetadataVersion::V1_1)
    } else {
        None
    }
}

/// Whether `field` is a canonical name known to any metadata version
pub fn is_known_field(field: &str) -> bool {
    FIELDS_1_2.contains(&field) || FIELDS_1_1_ONLY.contains(&field)
}

/// Canonical name of a field
///
/// Borrowed for schema fields, owned for unknown names which are kept
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldName(Cow<'static, str>);

impl FieldName {
    /// Map an attribute-style or canonical name to its canonical form
    ///
    /// - `"Author-email"` → `"Author-email"`
    /// - `"author_email"` → `"Author-email"`
    /// - `"HOME-PAGE"` → `"Home-page"`
    /// - `"X-Custom"` → `"X-Custom"` (unknown, kept as is)
    pub fn canonicalize(name: &str) -> Self {
        if let Some(known) = FIELDS_1_2
            .iter()
            .chain(FIELDS_1_1_ONLY)
            .find(|field| **field == name)
        {
            return Self(Cow::Borrowed(*known));
        }

        let attribute = name.trim().replace('-', "_").to_ascii_lowercase();
        match ATTRIBUTE_ALIASES
            .iter()
            .find(|(alias, _)| *alias == attribute)
        {
            Some((_, canonical)) => Self(Cow::Borrowed(*canonical)),
            None => Self(Cow::Owned(name.to_string())),
        }
    }

    /// The canonical name
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Storage category of this field
    pub fn category(&self) -> FieldCategory {
        category(self.as_str())
    }

    /// Minimum version implied by this field, if any
    pub fn implies_version(&self) -> Option<MetadataVersion> {
        implies_version(self.as_str())
    }

    /// Whether the schema knows this field
    pub fn is_known(&self) -> bool {
        is_known_field(self.as_str())
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for FieldName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for FieldName {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<str> for FieldName {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for FieldName {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Why a set of fields fits no single metadata version
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TierConflict {
    /// Marker fields of 1.1 and 1.2 are both present
    #[error("'{older}' requires metadata 1.1 but '{newer}' requires 1.2")]
    MixedMarkers { older: String, newer: String },
}

/// Infer the minimal metadata version able to hold `fields`
///
/// A 1.2 marker selects 1.2 and a 1.1 marker selects 1.1; the two together
/// are a conflict. Without markers the result is the lowest version listing
/// every field present, so `Classifier` alone gives 1.1. Every known field
/// that is not a marker is listed by 1.2, which makes markers the only
/// source of conflict.
///
/// Fields unknown to the schema do not constrain the version.
pub fn infer_version<'a, I>(fields: I) -> std::result::Result<MetadataVersion, TierConflict>
where
    I: IntoIterator<Item = &'a str>,
{
    let known: Vec<&str> = fields
        .into_iter()
        .filter(|field| is_known_field(field))
        .collect();

    let marker_1_1 = known.iter().find(|field| MARKERS_1_1.contains(*field));
    let marker_1_2 = known.iter().find(|field| MARKERS_1_2.contains(*field));

    match (marker_1_1, marker_1_2) {
        (Some(older), Some(newer)) => Err(TierConflict::MixedMarkers {
            older: older.to_string(),
            newer: newer.to_string(),
        }),
        (_, Some(_)) => Ok(MetadataVersion::V1_2),
        (Some(_), None) => Ok(MetadataVersion::V1_1),
        (None, None) => Ok(MetadataVersion::ALL
            .into_iter()
            .find(|version| known.iter().all(|field| version.contains(field)))
            .unwrap_or(MetadataVersion::V1_2)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parse() {
        assert_eq!(MetadataVersion::parse("1.0").unwrap(), MetadataVersion::V1_0);
        assert_eq!(MetadataVersion::parse(" 1.2 ").unwrap(), MetadataVersion::V1_2);
        assert!(matches!(
            MetadataVersion::parse("2.1"),
            Err(Error::UnrecognizedVersion(v)) if v == "2.1"
        ));
    }

    #[test]
    fn test_later_versions_keep_base_fields() {
        for field in FIELDS_1_0 {
            assert!(MetadataVersion::V1_1.contains(field), "{field} missing from 1.1");
            assert!(MetadataVersion::V1_2.contains(field), "{field} missing from 1.2");
        }
    }

    #[test]
    fn test_canonicalize_aliases() {
        assert_eq!(FieldName::canonicalize("author_email"), "Author-email");
        assert_eq!(FieldName::canonicalize("home-page"), "Home-page");
        assert_eq!(FieldName::canonicalize("HOME_PAGE"), "Home-page");
        assert_eq!(FieldName::canonicalize("project_url"), "Project-URL");
        assert_eq!(FieldName::canonicalize("Requires-Dist"), "Requires-Dist");
    }

    #[test]
    fn test_canonicalize_unknown_is_identity() {
        let name = FieldName::canonicalize("X-Frobnicate");
        assert_eq!(name, "X-Frobnicate");
        assert!(!name.is_known());
        assert_eq!(name.category(), FieldCategory::ScalarText);
    }

    #[test]
    fn test_categories() {
        assert_eq!(category("Keywords"), FieldCategory::ElementList);
        assert_eq!(category("Requires-Dist"), FieldCategory::PredicateList);
        assert_eq!(category("Classifier"), FieldCategory::ScalarList);
        assert_eq!(category("Description"), FieldCategory::FreeText);
        assert_eq!(category("Name"), FieldCategory::ScalarText);
        assert_eq!(category("Project-URL"), FieldCategory::PairList);
        assert!(FieldCategory::PredicateList.is_list());
        assert!(!FieldCategory::FreeText.is_marker_filtered());
    }

    #[test]
    fn test_implies_version() {
        assert_eq!(implies_version("Requires-Dist"), Some(MetadataVersion::V1_2));
        assert_eq!(implies_version("Requires"), Some(MetadataVersion::V1_1));
        assert_eq!(implies_version("Name"), None);
    }

    #[test]
    fn test_infer_version_defaults_to_1_0() {
        assert_eq!(infer_version([]), Ok(MetadataVersion::V1_0));
        assert_eq!(infer_version(["Name", "Version"]), Ok(MetadataVersion::V1_0));
    }

    #[test]
    fn test_infer_version_from_markers() {
        assert_eq!(
            infer_version(["Name", "Requires"]),
            Ok(MetadataVersion::V1_1)
        );
        assert_eq!(
            infer_version(["Name", "Requires-Dist"]),
            Ok(MetadataVersion::V1_2)
        );
    }

    #[test]
    fn test_infer_version_lowest_possible_without_markers() {
        // Classifier exists in 1.1 and 1.2 but not 1.0
        assert_eq!(
            infer_version(["Name", "Classifier"]),
            Ok(MetadataVersion::V1_1)
        );
    }

    #[test]
    fn test_infer_version_conflict() {
        assert!(matches!(
            infer_version(["Requires", "Requires-Dist"]),
            Err(TierConflict::MixedMarkers { .. })
        ));
    }

    #[test]
    fn test_version_specific_fields_are_markers() {
        let known = MetadataVersion::ALL.into_iter().flat_map(|v| v.fields().iter());
        for field in known {
            if !MARKERS_1_1.contains(field) {
                assert!(MetadataVersion::V1_2.contains(field), "{field} missing from 1.2");
            }
            if !MARKERS_1_2.contains(field) {
                assert!(MetadataVersion::V1_1.contains(field), "{field} missing from 1.1");
            }
        }
    }

    #[test]
    fn test_infer_version_markers_accept_every_other_field() {
        let all_1_2: Vec<&str> = FIELDS_1_2.to_vec();
        assert_eq!(infer_version(all_1_2), Ok(MetadataVersion::V1_2));

        let all_1_1: Vec<&str> = FIELDS_1_1.to_vec();
        assert_eq!(infer_version(all_1_1), Ok(MetadataVersion::V1_1));
    }

    #[test]
    fn test_infer_version_ignores_unknown_fields() {
        assert_eq!(
            infer_version(["Name", "X-Custom"]),
            Ok(MetadataVersion::V1_0)
        );
    }
}
