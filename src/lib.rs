// src/lib.rs

//! PKG-INFO metadata handling
//!
//! Reads, edits, validates and writes the `PKG-INFO` metadata file that
//! describes a source distribution, across metadata versions 1.0, 1.1
//! and 1.2.
//!
//! # Architecture
//!
//! - Schema: static field tables per version, categories and name aliases
//! - Metadata: the record itself, with version inference on every change
//! - Markers: `; sys.platform == 'win32'` suffixes evaluated per platform
//! - Codec: the header-based text format, including `Description` folding
//!
//! # Example
//!
//! ```
//! use pkgmeta::{Metadata, MetadataVersion};
//!
//! let text = "Metadata-Version: 1.2\nName: demo\nVersion: 0.1\nRequires-Dist: bar (>=1.0)\n";
//! let metadata: Metadata = text.parse().unwrap();
//! assert_eq!(metadata.version(), MetadataVersion::V1_2);
//! assert_eq!(metadata.get_list("Requires-Dist"), vec!["bar (>=1.0)"]);
//! ```

pub mod codec;
pub mod config;
mod error;
pub mod marker;
pub mod metadata;
pub mod predicate;
pub mod prose;
pub mod schema;

pub use config::MarkerConfig;
pub use error::{Error, Result};
pub use marker::{interpret, ExecutionContext, Marker, MarkerEnvironment};
pub use metadata::{CheckReport, FieldValue, Metadata};
pub use predicate::{PredicateValidator, VersionPredicate};
pub use prose::{ProseValidator, Severity};
pub use schema::{FieldCategory, FieldName, MetadataVersion};
