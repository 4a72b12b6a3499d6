// src/codec/mod.rs

//! PKG-INFO reading and writing
//!
//! The file is a header block, one field per line:
//!
//! ```text
//! Metadata-Version: 1.2
//! Name: demo
//! Version: 0.1
//! Classifier: Programming Language :: Rust
//! Classifier: License :: OSI Approved :: MIT License
//! Keywords: cli,metadata
//! Description: First line
//!        |second line
//! ```
//!
//! List fields repeat their header, except `Keywords` which is written
//! comma-joined on one line. Newlines inside any value are folded with
//! [`DESCRIPTION_CONTINUATION`] and unfolded again on read.
//!
//! [`DESCRIPTION_CONTINUATION`]: crate::metadata::DESCRIPTION_CONTINUATION

pub mod headers;

pub use headers::Headers;

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

use crate::error::{Error, Result};
use crate::metadata::{fold_description, unfold_description, FieldValue, Metadata};
use crate::schema::{FieldCategory, FieldName, MetadataVersion, METADATA_VERSION, UNKNOWN};

/// File name written by [`Metadata::write_pkg_info`]
pub const PKG_INFO: &str = "PKG-INFO";

/// Read a record from `reader`
pub fn read<R: Read>(reader: R) -> Result<Metadata> {
    let mut metadata = Metadata::new();
    read_into(&mut metadata, reader)?;
    Ok(metadata)
}

/// Read fields from `reader` into an existing record
///
/// Only fields known to the declared `Metadata-Version` are taken.
pub fn read_into<R: Read>(metadata: &mut Metadata, reader: R) -> Result<()> {
    let headers = headers::parse(reader)?;

    let declared = headers
        .get(METADATA_VERSION)
        .ok_or_else(|| Error::format(1, format!("missing {} header", METADATA_VERSION)))?;
    let version = MetadataVersion::parse(declared)?;
    debug!("Reading metadata {} ({} headers)", version, headers.len());

    for field in version.fields() {
        if *field == METADATA_VERSION {
            continue;
        }

        // `set` already unfolds Description
        let decode = |value: &str| {
            if *field == "Description" {
                value.to_string()
            } else {
                unfold_description(value)
            }
        };

        match FieldName::canonicalize(field).category() {
            FieldCategory::ElementList => {
                let values: Vec<String> = headers.get_all(field).into_iter().map(decode).collect();
                if !values.is_empty() {
                    metadata.set(field, values.join(","))?;
                }
            }
            category if category.is_list() => {
                let values: Vec<String> = headers.get_all(field).into_iter().map(decode).collect();
                if !values.is_empty() {
                    metadata.set(field, values)?;
                }
            }
            _ => match headers.get(field) {
                Some(value) if value != UNKNOWN => metadata.set(field, decode(value))?,
                _ => {}
            },
        }
    }

    Ok(())
}

/// Write `metadata` to `writer`
pub fn write<W: Write>(metadata: &Metadata, mut writer: W) -> Result<()> {
    writer.write_all(render(metadata).as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Render `metadata` in PKG-INFO format
///
/// Values spanning several lines are folded with the continuation prefix.
pub fn render(metadata: &Metadata) -> String {
    let version = metadata.version();
    debug!("Writing metadata {}", version);

    let mut out = format!("{}: {}\n", METADATA_VERSION, version);
    let mut line = |field: &str, value: &str| {
        out.push_str(&format!("{}: {}\n", field, fold_description(value)));
    };

    for field in version.fields() {
        if *field == METADATA_VERSION {
            continue;
        }
        if *field == "Download-URL" && !metadata.contains(field) {
            continue;
        }

        let category = FieldName::canonicalize(field).category();
        match metadata.get(field) {
            FieldValue::List(values) if category == FieldCategory::ElementList => {
                if !values.is_empty() {
                    line(field, &values.join(","));
                }
            }
            FieldValue::List(values) => {
                for value in &values {
                    line(field, value);
                }
            }
            FieldValue::Text(value) => line(field, &value),
        }
    }

    out
}

impl Metadata {
    /// Read a record from `reader`
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        read(reader)
    }

    /// Read a record from a file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Reading {}", path.display());
        read(File::open(path)?)
    }

    /// Read more fields into this record
    pub fn read_from<R: Read>(&mut self, reader: R) -> Result<()> {
        read_into(self, reader)
    }

    /// Write this record to `writer`
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        write(self, writer)
    }

    /// Write this record to a file, replacing it
    pub fn write_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        debug!("Writing {}", path.display());
        let file = File::create(path)?;
        write(self, BufWriter::new(file))
    }

    /// Write `PKG-INFO` into `dir`, returning the path written
    pub fn write_pkg_info(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(PKG_INFO);
        self.write_to_path(&path)?;
        Ok(path)
    }

    /// The record in PKG-INFO format
    pub fn to_pkg_info_string(&self) -> String {
        render(self)
    }
}

impl FromStr for Metadata {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        read(s.as_bytes())
    }
}
