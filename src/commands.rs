// src/commands.rs
//! Command handlers for the pkgmeta CLI

use anyhow::{bail, Context, Result};
use pkgmeta::config::MarkerConfig;
use pkgmeta::marker::Marker;
use pkgmeta::{FieldName, FieldValue, Metadata};
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, info};

use crate::cli::MarkerArgs;

/// Merge the config file (if any) with `--var` overrides
pub fn load_marker_config(args: &MarkerArgs) -> Result<MarkerConfig> {
    let mut config = match &args.config {
        Some(path) => MarkerConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => MarkerConfig::default(),
    };
    for (name, value) in &args.vars {
        debug!("Marker variable override: {}={}", name, value);
        config.set_variable(name.clone(), value.clone());
    }
    Ok(config)
}

fn read_metadata(path: &Path) -> Result<Metadata> {
    Metadata::from_path(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Fields to print: the selection (canonicalized) or every field of the version
fn selected_fields(metadata: &Metadata, fields: &[String]) -> Vec<String> {
    if fields.is_empty() {
        metadata.keys().iter().map(|name| name.to_string()).collect()
    } else {
        fields
            .iter()
            .map(|name| FieldName::canonicalize(name).to_string())
            .collect()
    }
}

/// Render fields as `Name: value` lines, one per list element
pub fn render_headers(metadata: &Metadata, fields: &[String]) -> String {
    let mut out = String::new();
    for name in fields {
        match metadata.get(name) {
            FieldValue::Text(value) => out.push_str(&format!("{}: {}\n", name, value)),
            FieldValue::List(values) => {
                for value in values {
                    out.push_str(&format!("{}: {}\n", name, value));
                }
            }
        }
    }
    out
}

/// Render fields as a JSON object
pub fn render_json(metadata: &Metadata, fields: &[String]) -> Result<String> {
    let mut object = serde_json::Map::new();
    for name in fields {
        object.insert(name.clone(), serde_json::to_value(metadata.get(name))?);
    }
    Ok(serde_json::to_string_pretty(&object)?)
}

pub fn cmd_show(
    file: &Path,
    fields: &[String],
    platform_dependent: bool,
    markers: &MarkerArgs,
    json: bool,
) -> Result<()> {
    let config = load_marker_config(markers)?;
    let mut metadata = read_metadata(file)?;
    metadata.set_platform_dependent(platform_dependent || config.platform_dependent);
    metadata.set_execution_context(Some(config.execution_context()));
    info!("Loaded {} (metadata {})", metadata.fullname(), metadata.version());

    let fields = selected_fields(&metadata, fields);
    let rendered = if json {
        render_json(&metadata, &fields)? + "\n"
    } else {
        render_headers(&metadata, &fields)
    };
    io::stdout().write_all(rendered.as_bytes())?;
    Ok(())
}

pub fn cmd_check(file: &Path) -> Result<()> {
    let metadata = read_metadata(file)?;
    let report = metadata.check();

    for field in &report.missing {
        println!("missing: {}", field);
    }
    for warning in &report.warnings {
        println!("warning: {}", warning);
    }

    if !report.missing.is_empty() {
        bail!(
            "{} is missing required fields: {}",
            file.display(),
            report.missing.join(", ")
        );
    }
    if report.is_ok() {
        println!("{}: ok", metadata.fullname());
    }
    Ok(())
}

pub fn cmd_eval(marker: &str, markers: &MarkerArgs) -> Result<()> {
    let config = load_marker_config(markers)?;
    let marker = Marker::parse(marker).with_context(|| format!("Invalid marker '{}'", marker))?;
    let context = config.execution_context();
    let result = marker
        .evaluate(Some(&context))
        .with_context(|| format!("Failed to evaluate '{}'", marker))?;
    println!("{}", result);
    Ok(())
}

pub fn cmd_normalize(file: &Path, output: Option<&Path>) -> Result<()> {
    let metadata = read_metadata(file)?;
    match output {
        Some(path) => {
            metadata
                .write_to_path(path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => metadata.write_to(io::stdout().lock())?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample() -> Metadata {
        let mut metadata = Metadata::new();
        metadata.set("Name", "demo").unwrap();
        metadata.set("Platform", vec!["linux", "darwin"]).unwrap();
        metadata
    }

    #[test]
    fn test_render_headers_repeats_list_fields() {
        let fields = vec!["Name".to_string(), "Platform".to_string()];
        assert_eq!(
            render_headers(&sample(), &fields),
            "Name: demo\nPlatform: linux\nPlatform: darwin\n"
        );
    }

    #[test]
    fn test_render_json() {
        let fields = vec!["Name".to_string(), "Platform".to_string()];
        let value: serde_json::Value =
            serde_json::from_str(&render_json(&sample(), &fields).unwrap()).unwrap();
        assert_eq!(value["Name"], "demo");
        assert_eq!(value["Platform"], serde_json::json!(["linux", "darwin"]));
    }

    #[test]
    fn test_selected_fields_canonicalizes() {
        let fields = selected_fields(&sample(), &["home_page".to_string()]);
        assert_eq!(fields, vec!["Home-page"]);
        assert_eq!(selected_fields(&sample(), &[]).len(), sample().keys().len());
    }

    #[test]
    fn test_vars_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("markers.toml");
        std::fs::write(&path, "[variables]\n\"os.name\" = \"posix\"\n").unwrap();

        let args = MarkerArgs {
            config: Some(path),
            vars: vec![("os.name".to_string(), "nt".to_string())],
        };
        let config = load_marker_config(&args).unwrap();
        assert_eq!(
            config.execution_context().get("os.name").map(String::as_str),
            Some("nt")
        );
    }

    #[test]
    fn test_missing_config_file_is_reported() {
        let args = MarkerArgs {
            config: Some(PathBuf::from("/nonexistent/markers.toml")),
            vars: Vec::new(),
        };
        let err = load_marker_config(&args).unwrap_err();
        assert!(err.to_string().contains("Failed to load config"));
    }

    #[test]
    fn test_check_fails_on_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = Metadata::new().write_pkg_info(dir.path()).unwrap();
        assert!(cmd_check(&path).is_err());
    }
}
