// src/codec/headers.rs

//! RFC822-style header block parsing
//!
//! Lines have the form `Name: value`. A line starting with a space or tab
//! continues the previous value; it is appended after a `\n` exactly as
//! written, so indentation-based encodings survive. The single space after
//! the colon is a separator; any further leading whitespace belongs to the
//! value. The first blank line ends the block and anything after it is
//! ignored.

use std::io::{BufRead, BufReader, Read};

use crate::error::{Error, Result};

/// Ordered header pairs with case-insensitive lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a header, keeping any earlier occurrence
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// First value for `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Every value for `name`, in order
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

/// Parse a header block from `reader`
pub fn parse<R: Read>(reader: R) -> Result<Headers> {
    let mut reader = BufReader::new(reader);
    let mut headers = Headers::new();
    let mut buf = Vec::new();
    let mut line_no = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_no += 1;

        let line = std::str::from_utf8(&buf)
            .map_err(|e| Error::format(line_no, format!("invalid UTF-8: {}", e)))?;
        let line = line.strip_suffix('\n').unwrap_or(line);
        let line = line.strip_suffix('\r').unwrap_or(line);

        if line.is_empty() {
            break;
        }

        if line.starts_with([' ', '\t']) {
            let Some((_, value)) = headers.entries.last_mut() else {
                return Err(Error::format(line_no, "continuation line before any header"));
            };
            value.push('\n');
            value.push_str(line);
            continue;
        }

        let Some((name, value)) = line.split_once(':') else {
            return Err(Error::format(
                line_no,
                format!("expected 'Name: value', got {:?}", line),
            ));
        };
        let name = name.trim_end();
        if name.is_empty() {
            return Err(Error::format(line_no, "empty header name"));
        }
        // Only the separator space after the colon is syntax
        headers.push(name, value.strip_prefix(' ').unwrap_or(value));
    }

    Ok(headers)
}

/// Parse a header block from a string
pub fn parse_str(content: &str) -> Result<Headers> {
    parse(content.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_headers() {
        let headers = parse_str("Name: foo\nVersion: 1.0\n").unwrap();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("Name"), Some("foo"));
        assert_eq!(headers.get("version"), Some("1.0"));
        assert_eq!(headers.get("Summary"), None);
    }

    #[test]
    fn test_repeated_headers_keep_order() {
        let headers = parse_str("Classifier: b\nName: x\nClassifier: a\n").unwrap();
        assert_eq!(headers.get_all("classifier"), vec!["b", "a"]);
        assert_eq!(headers.get("Classifier"), Some("b"));
    }

    #[test]
    fn test_continuation_lines_are_verbatim() {
        let headers = parse_str("Description: one\n       |two\n\tthree\nName: x\n").unwrap();
        assert_eq!(headers.get("Description"), Some("one\n       |two\n\tthree"));
        assert_eq!(headers.get("Name"), Some("x"));
    }

    #[test]
    fn test_blank_line_ends_headers() {
        let headers = parse_str("Name: foo\n\nbody text: not a header\n").unwrap();
        assert_eq!(headers.len(), 1);
        assert!(!headers.contains("body text"));
    }

    #[test]
    fn test_crlf_line_endings() {
        let headers = parse_str("Name: foo\r\nVersion: 1.0\r\n\r\nignored\r\n").unwrap();
        assert_eq!(headers.get("Name"), Some("foo"));
        assert_eq!(headers.get("Version"), Some("1.0"));
    }

    #[test]
    fn test_value_keeps_colons() {
        let headers = parse_str("Home-page: http://example.com:8080/\n").unwrap();
        assert_eq!(headers.get("Home-page"), Some("http://example.com:8080/"));
    }

    #[test]
    fn test_value_keeps_leading_whitespace_after_separator() {
        let headers = parse_str("Name:  demo\nSummary:\tx\nLicense:MIT\nAuthor: \n").unwrap();
        assert_eq!(headers.get("Name"), Some(" demo"));
        assert_eq!(headers.get("Summary"), Some("\tx"));
        assert_eq!(headers.get("License"), Some("MIT"));
        assert_eq!(headers.get("Author"), Some(""));
    }

    #[test]
    fn test_missing_colon_is_an_error() {
        let err = parse_str("Name: foo\nnot a header\n").unwrap_err();
        assert!(matches!(err, Error::Format { line: 2, .. }));
    }

    #[test]
    fn test_leading_continuation_is_an_error() {
        let err = parse_str("  orphan\nName: foo\n").unwrap_err();
        assert!(matches!(err, Error::Format { line: 1, .. }));
    }

    #[test]
    fn test_empty_name_is_an_error() {
        let err = parse_str("Name: foo\n: bare\n").unwrap_err();
        assert!(matches!(err, Error::Format { line: 2, .. }));
    }

    #[test]
    fn test_invalid_utf8_is_an_error() {
        let err = parse(&b"Name: foo\nSummary: \xff\xfe\n"[..]).unwrap_err();
        assert!(matches!(err, Error::Format { line: 2, .. }));
    }
}
