// src/predicate.rs

//! Version predicates for dependency fields
//!
//! Dependency fields (`Requires-Dist`, `Provides-Dist`, `Obsoletes-Dist`)
//! hold a project name optionally followed by version constraints:
//!
//! - `zope.interface`
//! - `zope.interface (>3.5.0)`
//! - `Twisted (>=8.2, <9.0)`
//!
//! Versions must be normalized: at least `N.N`, any further `.N`, an
//! optional `aN`/`bN`/`cN`/`rcN` pre-release, then optional `.postN` and
//! `.devN` suffixes.
//!
//! Validation here is advisory only: metadata with a malformed predicate is
//! still stored and written, callers just get a warning.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\w[\s\w-]*(?:\.\w*)*)(.*)$").unwrap());

static PARENTHESIZED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\((.*)\)$").unwrap());

static CONSTRAINT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(<=|>=|<|>|!=|==)\s*([^\s,]+)\s*$").unwrap());

static NORMALIZED_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+\.\d+(?:\.\d+)*(?:(?:[abc]|rc)\d+(?:\.\d+)*)?(?:\.post\d+)?(?:\.dev\d+)?$")
        .unwrap()
});

/// Why a predicate or version was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PredicateError {
    #[error("no project name in predicate {0:?}")]
    MissingName(String),

    #[error("{0:?} is not a normalized version")]
    IrrationalVersion(String),
}

/// Comparison operator of a version constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    Equal,
    NotEqual,
}

impl Comparison {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "<" => Some(Self::Less),
            "<=" => Some(Self::LessOrEqual),
            ">" => Some(Self::Greater),
            ">=" => Some(Self::GreaterOrEqual),
            "==" => Some(Self::Equal),
            "!=" => Some(Self::NotEqual),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Less => "<",
            Self::LessOrEqual => "<=",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `op version` constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionConstraint {
    pub op: Comparison,
    pub version: String,
}

impl VersionConstraint {
    /// Parse `>=1.0`, `< 2.0`, or a bare version meaning `==`
    pub fn parse(s: &str) -> Result<Self, PredicateError> {
        let (op, version) = match CONSTRAINT_RE.captures(s) {
            Some(caps) => (
                Comparison::parse(&caps[1]).unwrap_or(Comparison::Equal),
                caps[2].to_string(),
            ),
            None => (Comparison::Equal, s.trim().to_string()),
        };

        if !is_valid_version(&version) {
            return Err(PredicateError::IrrationalVersion(version));
        }
        Ok(Self { op, version })
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op, self.version)
    }
}

/// Parse a comma-separated constraint list, skipping empty items
fn parse_constraints(s: &str) -> Result<Vec<VersionConstraint>, PredicateError> {
    s.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(VersionConstraint::parse)
        .collect()
}

/// A project name with optional version constraints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionPredicate {
    pub name: String,
    pub constraints: Vec<VersionConstraint>,
}

impl VersionPredicate {
    /// Parse `name`, `name (constraints)` or `name constraints`
    pub fn parse(s: &str) -> Result<Self, PredicateError> {
        let s = s.trim();
        let caps = NAME_RE
            .captures(s)
            .ok_or_else(|| PredicateError::MissingName(s.to_string()))?;

        let name = caps[1].trim().to_string();
        let rest = caps[2].trim();

        let versions = match PARENTHESIZED_RE.captures(rest) {
            Some(inner) => inner.get(1).map_or("", |m| m.as_str()),
            None => rest,
        };

        Ok(Self {
            name,
            constraints: parse_constraints(versions)?,
        })
    }
}

impl fmt::Display for VersionPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.constraints.is_empty() {
            let constraints: Vec<String> =
                self.constraints.iter().map(|c| c.to_string()).collect();
            write!(f, " ({})", constraints.join(", "))?;
        }
        Ok(())
    }
}

/// Whether `version` is a normalized version number
pub fn is_valid_version(version: &str) -> bool {
    NORMALIZED_VERSION_RE.is_match(version.trim())
}

/// Whether `predicate` is a valid dependency predicate
pub fn is_valid_predicate(predicate: &str) -> bool {
    VersionPredicate::parse(predicate).is_ok()
}

/// Whether `versions` is a valid comma-separated constraint list, as used
/// by `Requires-Python`
pub fn is_valid_versions(versions: &str) -> bool {
    parse_constraints(versions).is_ok()
}

/// Syntax check applied to dependency predicates
pub trait PredicateValidator {
    /// Whether `predicate` (without any marker suffix) is acceptable
    fn is_valid(&self, predicate: &str) -> bool;
}

/// Default validator using [`VersionPredicate`] syntax
#[derive(Debug, Clone, Copy, Default)]
pub struct VersionPredicateSyntax;

impl PredicateValidator for VersionPredicateSyntax {
    fn is_valid(&self, predicate: &str) -> bool {
        is_valid_predicate(predicate)
    }
}

impl<F> PredicateValidator for F
where
    F: Fn(&str) -> bool,
{
    fn is_valid(&self, predicate: &str) -> bool {
        self(predicate)
    }
}
