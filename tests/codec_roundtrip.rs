// tests/codec_roundtrip.rs

//! Reading and writing PKG-INFO files end to end.

mod common;

use common::{PKG_INFO_1_0, PKG_INFO_1_2};
use pkgmeta::{Error, FieldValue, Metadata, MetadataVersion};

#[test]
fn test_1_0_file_rewrites_identically() {
    let metadata = common::parse(PKG_INFO_1_0);
    assert_eq!(metadata.version(), MetadataVersion::V1_0);
    assert_eq!(metadata.to_pkg_info_string(), PKG_INFO_1_0);
}

#[test]
fn test_description_round_trips_byte_for_byte() {
    let description = "Title\n=====\n\n  indented block\n\ttabbed\ntrailing space \nend";
    let mut metadata = Metadata::new();
    metadata.set("Name", "demo").unwrap();
    metadata.set("Description", description).unwrap();

    let reread = common::parse(&metadata.to_pkg_info_string());
    assert_eq!(reread.get_text("Description"), description);
}

#[test]
fn test_leading_whitespace_in_values_survives_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut metadata = Metadata::new();
    metadata.set("Name", " demo").unwrap();
    metadata.set("Description", "  indented first line\nsecond").unwrap();

    let path = metadata.write_pkg_info(dir.path()).unwrap();
    let reread = Metadata::from_path(&path).unwrap();
    assert_eq!(reread.get_text("Name"), " demo");
    assert_eq!(reread.get_text("Description"), "  indented first line\nsecond");
}

#[test]
fn test_multiline_values_outside_description_round_trip() {
    let mut metadata = Metadata::new();
    metadata.set("Summary", "line one\nline two").unwrap();
    metadata.set("Maintainer", "A\nB").unwrap();
    metadata
        .set("Requires-Dist", vec!["foo (>=1.0)", "bar\n; os.name == 'posix'"])
        .unwrap();

    let written = metadata.to_pkg_info_string();
    for line in written.lines() {
        assert!(
            line.contains(": ") || line.starts_with("       |"),
            "stray line {line:?} in\n{written}"
        );
    }

    let reread = common::parse(&written);
    assert_eq!(reread.version(), MetadataVersion::V1_2);
    assert_eq!(reread.get_text("Summary"), "line one\nline two");
    assert_eq!(reread.get_text("Maintainer"), "A\nB");
    assert_eq!(
        reread.get_list("Requires-Dist"),
        vec!["foo (>=1.0)", "bar\n; os.name == 'posix'"]
    );
}

#[test]
fn test_keywords_written_on_one_line() {
    let mut metadata = Metadata::new();
    metadata.set("Keywords", vec!["a", "b"]).unwrap();
    let written = metadata.to_pkg_info_string();
    assert!(written.contains("\nKeywords: a,b\n"));

    let reread = common::parse(&written);
    assert_eq!(reread.get_list("Keywords"), vec!["a", "b"]);
}

#[test]
fn test_read_1_2_fields() {
    let metadata = common::parse(PKG_INFO_1_2);
    assert_eq!(metadata.version(), MetadataVersion::V1_2);
    assert_eq!(metadata.get_text("Maintainer"), "Tarek Ziade");
    assert_eq!(metadata.get_text("Requires-Python"), ">=2.4, <3.0");
    assert_eq!(
        metadata.get_list("Requires-Dist"),
        vec![
            "pywin32 (>1.0); sys.platform == 'win32'",
            "foo (>=1.0, <2.0)",
            "bar; os.name == 'posix' or sys.platform == 'win32'",
        ]
    );
    assert_eq!(
        metadata.project_urls(),
        vec![(
            "Bug Tracker".to_string(),
            "http://bitbucket.org/tarek/clvault/issues".to_string()
        )]
    );
}

#[test]
fn test_1_2_file_survives_rewrite() {
    let metadata = common::parse(PKG_INFO_1_2);
    let reread = common::parse(&metadata.to_pkg_info_string());
    assert_eq!(reread.version(), MetadataVersion::V1_2);
    for (name, value) in metadata.items() {
        assert_eq!(reread.get(name), value, "{name} changed");
    }
}

#[test]
fn test_check_on_complete_file() {
    let report = common::parse(PKG_INFO_1_2).check();
    assert!(report.missing.is_empty());
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
}

#[test]
fn test_unknown_metadata_version_is_rejected() {
    let result = "Metadata-Version: 9.9\nName: demo\n".parse::<Metadata>();
    assert!(matches!(result, Err(Error::UnrecognizedVersion(_))));
}

#[test]
fn test_conflicting_file_is_rejected() {
    // 1.1 declares Requires; Requires-Dist is not read for 1.1 so no conflict
    let metadata = common::parse("Metadata-Version: 1.1\nRequires: foo\nRequires-Dist: bar\n");
    assert!(!metadata.contains("Requires-Dist"));

    // but reading more fields into an existing record can conflict
    let mut metadata = common::parse("Metadata-Version: 1.2\nRequires-Dist: bar\n");
    let err = metadata
        .read_from("Metadata-Version: 1.1\nRequires: foo\n".as_bytes())
        .unwrap_err();
    assert!(matches!(err, Error::VersionConflict { .. }));
    assert_eq!(metadata.get("Requires"), FieldValue::List(Vec::new()));
}

#[test]
fn test_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let metadata = common::parse(PKG_INFO_1_0);

    let path = metadata.write_pkg_info(dir.path()).unwrap();
    assert_eq!(path, dir.path().join("PKG-INFO"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), PKG_INFO_1_0);

    let reread = Metadata::from_path(&path).unwrap();
    assert_eq!(reread.fullname(), "demo-0.4.1");
}

#[test]
fn test_from_path_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = Metadata::from_path(dir.path().join("PKG-INFO"));
    assert!(matches!(result, Err(Error::Io(_))));
}
