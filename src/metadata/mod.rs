// src/metadata/mod.rs

//! The metadata record
//!
//! [`Metadata`] holds the fields of one distribution, keyed by canonical
//! field name. Every mutation re-infers the smallest metadata version able to
//! hold the fields present, and a mutation that would mix fields from
//! incompatible versions is rejected with the record left untouched.
//!
//! Values may carry an environment marker after a `;`:
//!
//! ```text
//! Requires-Dist: pywin32 (>1.0); sys.platform == 'win32'
//! ```
//!
//! When the record is platform dependent, [`Metadata::get`] evaluates those
//! markers and hides values whose marker is false. Otherwise values are
//! returned verbatim, marker included.
//!
//! # Example
//!
//! ```
//! use pkgmeta::{Metadata, MetadataVersion};
//!
//! let mut metadata = Metadata::new();
//! metadata.set("name", "demo").unwrap();
//! metadata.set("keywords", "cli,metadata").unwrap();
//! assert_eq!(metadata.version(), MetadataVersion::V1_0);
//!
//! metadata.set("Requires-Dist", vec!["requests (>=2.0)"]).unwrap();
//! assert_eq!(metadata.version(), MetadataVersion::V1_2);
//! assert_eq!(metadata.get_list("Keywords"), vec!["cli", "metadata"]);
//! ```

mod value;

pub use value::{
    fold_description, split_marker, unfold_description, FieldValue, DESCRIPTION_CONTINUATION,
};

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::marker::{self, ExecutionContext};
use crate::predicate::{is_valid_version, is_valid_versions, PredicateValidator, VersionPredicateSyntax};
use crate::prose::ProseValidator;
use crate::schema::{
    infer_version, FieldCategory, FieldName, MetadataVersion, METADATA_VERSION, UNKNOWN,
};

/// Fields reported by [`Metadata::check`] when unset
pub const REQUIRED_FIELDS: [&str; 3] = ["Name", "Version", "Home-page"];

/// Result of [`Metadata::check`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    /// Required fields still at their default
    pub missing: Vec<&'static str>,
    /// Advisory findings
    pub warnings: Vec<String>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.missing.is_empty() && self.warnings.is_empty()
    }
}

/// Metadata of a single distribution
#[derive(Clone)]
pub struct Metadata {
    fields: BTreeMap<FieldName, FieldValue>,
    version: MetadataVersion,
    platform_dependent: bool,
    execution_context: Option<ExecutionContext>,
    predicates: Arc<dyn PredicateValidator + Send + Sync>,
}

impl Default for Metadata {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Metadata")
            .field("version", &self.version)
            .field("fields", &self.fields)
            .field("platform_dependent", &self.platform_dependent)
            .field("execution_context", &self.execution_context)
            .finish_non_exhaustive()
    }
}

impl Metadata {
    /// Create an empty record
    pub fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
            version: MetadataVersion::default(),
            platform_dependent: false,
            execution_context: None,
            predicates: Arc::new(VersionPredicateSyntax),
        }
    }

    /// Evaluate environment markers on [`get`](Self::get)
    pub fn with_platform_dependent(mut self, platform_dependent: bool) -> Self {
        self.platform_dependent = platform_dependent;
        self
    }

    /// Variable overrides used when evaluating markers
    pub fn with_execution_context(mut self, context: ExecutionContext) -> Self {
        self.execution_context = Some(context);
        self
    }

    /// Replace the validator used to warn about malformed predicates
    pub fn with_predicate_validator<V>(mut self, validator: V) -> Self
    where
        V: PredicateValidator + Send + Sync + 'static,
    {
        self.predicates = Arc::new(validator);
        self
    }

    pub fn is_platform_dependent(&self) -> bool {
        self.platform_dependent
    }

    pub fn set_platform_dependent(&mut self, platform_dependent: bool) {
        self.platform_dependent = platform_dependent;
    }

    pub fn execution_context(&self) -> Option<&ExecutionContext> {
        self.execution_context.as_ref()
    }

    pub fn set_execution_context(&mut self, context: Option<ExecutionContext>) {
        self.execution_context = context;
    }

    /// The inferred metadata version
    pub fn version(&self) -> MetadataVersion {
        self.version
    }

    /// Set a field
    ///
    /// `name` may be canonical (`Author-email`) or attribute style
    /// (`author_email`). List fields accept a sequence or a comma-separated
    /// string.
    ///
    /// Fails with [`Error::VersionConflict`] if the field cannot coexist with
    /// the fields already present; the record is unchanged in that case.
    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<()> {
        let name = FieldName::canonicalize(name);
        if name == METADATA_VERSION {
            debug!("Ignoring explicit {}, the version is inferred", METADATA_VERSION);
            return Ok(());
        }

        let mut value = value.into().coerce(name.category());
        if name == "Description"
            && let FieldValue::Text(text) = &mut value
        {
            *text = unfold_description(text);
        }

        self.warn_if_invalid(&name, &value);

        let version = infer_version(
            self.fields
                .keys()
                .map(FieldName::as_str)
                .chain(std::iter::once(name.as_str())),
        )
        .map_err(|conflict| Error::VersionConflict {
            field: name.to_string(),
            message: conflict.to_string(),
        })?;

        if version != self.version {
            debug!("Metadata version {} -> {} after setting {}", self.version, version, name);
        }
        self.fields.insert(name, value);
        self.version = version;
        Ok(())
    }

    /// Set several fields in order, stopping at the first failure
    ///
    /// Fields set before the failing one stay set.
    pub fn update<I, K, V>(&mut self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<FieldValue>,
    {
        for (name, value) in pairs {
            self.set(name.as_ref(), value)?;
        }
        Ok(())
    }

    /// Remove a field, returning its stored value
    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        let name = FieldName::canonicalize(name);
        let removed = self.fields.remove(name.as_str())?;

        // Removing a field can only widen the set of possible versions
        if let Ok(version) = infer_version(self.fields.keys().map(FieldName::as_str)) {
            self.version = version;
        }
        Some(removed)
    }

    /// Whether the field has been set explicitly
    pub fn contains(&self, name: &str) -> bool {
        let name = FieldName::canonicalize(name);
        name == METADATA_VERSION || self.fields.contains_key(name.as_str())
    }

    /// The stored value, without defaults or marker filtering
    pub fn raw(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(FieldName::canonicalize(name).as_str())
    }

    /// Get a field
    ///
    /// Unset fields return their default (`UNKNOWN` or an empty list). A
    /// marker that cannot be evaluated hides its value; use
    /// [`try_get`](Self::try_get) to see the error instead.
    pub fn get(&self, name: &str) -> FieldValue {
        let name = FieldName::canonicalize(name);
        self.lookup(&name, false)
            .unwrap_or_else(|_| FieldValue::default_for(name.category()))
    }

    /// Like [`get`](Self::get) but fails on marker errors
    pub fn try_get(&self, name: &str) -> Result<FieldValue> {
        self.lookup(&FieldName::canonicalize(name), true)
    }

    /// [`get`](Self::get) as a single string; lists are comma-joined
    pub fn get_text(&self, name: &str) -> String {
        self.get(name).into_text()
    }

    /// [`get`](Self::get) as a list; scalars become one element
    pub fn get_list(&self, name: &str) -> Vec<String> {
        self.get(name).into_list()
    }

    fn lookup(&self, name: &FieldName, strict: bool) -> Result<FieldValue> {
        if *name == METADATA_VERSION {
            return Ok(FieldValue::Text(self.version.to_string()));
        }

        let category = name.category();
        let Some(stored) = self.fields.get(name.as_str()) else {
            return Ok(FieldValue::default_for(category));
        };

        if !self.platform_dependent || !category.is_marker_filtered() {
            return Ok(stored.clone());
        }

        match stored {
            FieldValue::Text(text) => Ok(match self.filter(name, text, strict)? {
                Some(value) => FieldValue::Text(value.to_string()),
                None => FieldValue::default_for(category),
            }),
            FieldValue::List(items) => {
                let mut kept = Vec::with_capacity(items.len());
                for item in items {
                    if let Some(value) = self.filter(name, item, strict)? {
                        kept.push(value.to_string());
                    }
                }
                Ok(FieldValue::List(kept))
            }
        }
    }

    /// Apply the marker suffix of `value`, if any
    fn filter<'v>(&self, name: &FieldName, value: &'v str, strict: bool) -> Result<Option<&'v str>> {
        let (value, marker) = split_marker(value);
        let Some(marker) = marker else {
            return Ok(Some(value));
        };

        match marker::interpret(marker, self.execution_context.as_ref()) {
            Ok(true) => Ok(Some(value)),
            Ok(false) => Ok(None),
            Err(e) if !strict => {
                warn!("Hiding {} value {:?}: {}", name, value, e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn warn_if_invalid(&self, name: &FieldName, value: &FieldValue) {
        let project = self
            .fields
            .get("Name")
            .and_then(FieldValue::as_text)
            .unwrap_or(UNKNOWN);

        match (name.category(), value) {
            (FieldCategory::PredicateList, FieldValue::List(items)) => {
                for item in items {
                    if !self.predicates.is_valid(split_marker(item).0) {
                        warn!("{}: {:?} is not a valid predicate (field {})", project, item, name);
                    }
                }
            }
            (_, FieldValue::Text(text)) if *name == "Requires-Python" => {
                if !is_valid_versions(split_marker(text).0) {
                    warn!("{}: {:?} is not a valid version list (field {})", project, text, name);
                }
            }
            (_, FieldValue::Text(text)) if *name == "Version" => {
                if !is_valid_version(split_marker(text).0) {
                    warn!("{}: {:?} is not a normalized version (field {})", project, text, name);
                }
            }
            _ => {}
        }
    }

    /// Field names of the current version, in write order
    pub fn keys(&self) -> &'static [&'static str] {
        self.version.fields()
    }

    /// `(name, value)` for every field of the current version
    pub fn items(&self) -> Vec<(&'static str, FieldValue)> {
        self.keys()
            .iter()
            .map(|name| (*name, self.get(name)))
            .collect()
    }

    /// `Project-URL` entries as `(label, url)` pairs
    pub fn project_urls(&self) -> Vec<(String, String)> {
        self.get_list("Project-URL")
            .iter()
            .map(|entry| match entry.split_once(',') {
                Some((label, url)) => (label.trim().to_string(), url.trim().to_string()),
                None => (entry.trim().to_string(), String::new()),
            })
            .collect()
    }

    /// `name-version`
    pub fn fullname(&self) -> String {
        format!("{}-{}", self.get_text("Name"), self.get_text("Version"))
    }

    /// Person to contact: the maintainer, else the author
    pub fn contact(&self) -> String {
        self.first_known(&["Maintainer", "Author"])
    }

    /// Contact address: the maintainer's, else the author's
    pub fn contact_email(&self) -> String {
        self.first_known(&["Maintainer-email", "Author-email"])
    }

    fn first_known(&self, names: &[&str]) -> String {
        names
            .iter()
            .map(|name| self.get_text(name))
            .find(|value| value != UNKNOWN)
            .unwrap_or_else(|| UNKNOWN.to_string())
    }

    /// Report unset required fields and advisory warnings
    pub fn check(&self) -> CheckReport {
        self.run_checks(None)
    }

    /// [`check`](Self::check), also running `prose` over `Description`
    pub fn check_with(&self, prose: &dyn ProseValidator) -> CheckReport {
        self.run_checks(Some(prose))
    }

    fn run_checks(&self, prose: Option<&dyn ProseValidator>) -> CheckReport {
        let mut report = CheckReport::default();

        for field in REQUIRED_FIELDS {
            if self.get_text(field) == UNKNOWN {
                report.missing.push(field);
            }
        }

        if let Some(prose) = prose
            && self.contains("Description")
        {
            for (severity, message) in prose.validate(&self.get_text("Description")) {
                report.warnings.push(format!("Description {}: {}", severity, message));
            }
        }

        if self.version != MetadataVersion::V1_2 {
            return report;
        }

        for field in ["Requires-Dist", "Provides-Dist", "Obsoletes-Dist"] {
            let values = self.get_list(field);
            if values
                .iter()
                .any(|value| !self.predicates.is_valid(split_marker(value).0))
            {
                report
                    .warnings
                    .push(format!("Wrong value for '{}': {}", field, values.join(", ")));
            }
        }

        let requires_python = self.get_text("Requires-Python");
        if requires_python != UNKNOWN && !is_valid_versions(split_marker(&requires_python).0) {
            report
                .warnings
                .push(format!("Wrong value for 'Requires-Python': {}", requires_python));
        }

        let version = self.get_text("Version");
        if version != UNKNOWN && !is_valid_version(split_marker(&version).0) {
            report
                .warnings
                .push(format!("Wrong value for 'Version': {}", version));
        }

        report
    }
}
