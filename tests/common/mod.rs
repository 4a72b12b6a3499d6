// tests/common/mod.rs

//! Shared fixtures for integration tests.

#![allow(dead_code)]

use pkgmeta::{ExecutionContext, Metadata};

/// A complete 1.0 PKG-INFO, as written by the codec.
pub const PKG_INFO_1_0: &str = "\
Metadata-Version: 1.0
Name: demo
Version: 0.4.1
Platform: linux
Platform: win32
Summary: A small demonstration package
Description: demo
       |====
       |
       |Long description with *markup*.
Keywords: demo,metadata,testing
Home-page: http://example.com/demo
Author: Jane Doe
Author-email: jane@example.com
License: MIT
";

/// A 1.2 PKG-INFO with dependency predicates and markers.
pub const PKG_INFO_1_2: &str = "\
Metadata-Version: 1.2
Name: CLVault
Version: 0.5
Summary: Command-Line utility to store and retrieve passwords
Home-page: http://bitbucket.org/tarek/clvault
Author: Tarek Ziade
Author-email: tarek@ziade.org
Maintainer: Tarek Ziade
License: PSF
Classifier: Development Status :: 3 - Alpha
Classifier: Operating System :: OS Independent
Requires-Dist: pywin32 (>1.0); sys.platform == 'win32'
Requires-Dist: foo (>=1.0, <2.0)
Requires-Dist: bar; os.name == 'posix' or sys.platform == 'win32'
Requires-Python: >=2.4, <3.0
Project-URL: Bug Tracker, http://bitbucket.org/tarek/clvault/issues
";

/// Parse a fixture, panicking on error.
pub fn parse(text: &str) -> Metadata {
    text.parse().unwrap()
}

/// Execution context with the given variable overrides.
pub fn context(pairs: &[(&str, &str)]) -> ExecutionContext {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}
