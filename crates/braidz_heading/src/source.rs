//! Local path or URL → bytes

use heading_core::{HeadingError, Result};
use std::fmt;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

const USER_AGENT: &str = concat!("braidz_heading/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveSource {
    Local(PathBuf),
    Remote(String),
}

impl ArchiveSource {
    /// Classify a path-or-URL argument.
    ///
    /// A one-letter scheme is a Windows drive (`C:\data`), not a URL.
    pub fn parse(input: &str) -> Self {
        match url_scheme(input) {
            Some(scheme) if scheme.len() > 1 => ArchiveSource::Remote(input.to_string()),
            _ => ArchiveSource::Local(PathBuf::from(input)),
        }
    }

    pub fn local(path: &Path) -> Self {
        ArchiveSource::Local(path.to_path_buf())
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, ArchiveSource::Remote(_))
    }

    /// Last path or URL segment
    pub fn file_name(&self) -> String {
        match self {
            ArchiveSource::Local(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            ArchiveSource::Remote(url) => url.rsplit('/').next().unwrap_or_default().to_string(),
        }
    }

    /// Read the whole source into memory.
    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        match self {
            ArchiveSource::Local(path) => {
                fs::read(path).map_err(|e| HeadingError::unreadable(self.to_string(), e))
            }
            ArchiveSource::Remote(url) => fetch(url),
        }
    }
}

impl fmt::Display for ArchiveSource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ArchiveSource::Local(path) => write!(f, "{}", path.display()),
            ArchiveSource::Remote(url) => write!(f, "{}", url),
        }
    }
}

fn url_scheme(input: &str) -> Option<&str> {
    let (scheme, _) = input.split_once(':')?;
    let mut chars = scheme.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(scheme)
}

fn fetch(url: &str) -> Result<Vec<u8>> {
    log::debug!("Fetching {}", url);
    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| HeadingError::unreadable(url, e))?;
    let mut response = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|e| HeadingError::unreadable(url, e))?;

    let mut bytes = Vec::new();
    response
        .read_to_end(&mut bytes)
        .map_err(|e| HeadingError::unreadable(url, e))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_classifies_urls_and_paths() {
        assert_eq!(
            ArchiveSource::parse("https://example.org/data/20240101_120000.braidz"),
            ArchiveSource::Remote("https://example.org/data/20240101_120000.braidz".to_string())
        );
        assert_eq!(
            ArchiveSource::parse("data/run.braidz"),
            ArchiveSource::Local(PathBuf::from("data/run.braidz"))
        );
        assert_eq!(
            ArchiveSource::parse(r"C:\data\run.braidz"),
            ArchiveSource::Local(PathBuf::from(r"C:\data\run.braidz"))
        );
        // Colon inside a path segment is not a scheme
        assert!(!ArchiveSource::parse("runs/12:30/a.braidz").is_remote());
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            ArchiveSource::parse("http://host/a/b/session.braidz").file_name(),
            "session.braidz"
        );
        assert_eq!(
            ArchiveSource::parse("/tmp/out/session.v2.braidz").file_name(),
            "session.v2.braidz"
        );
    }

    #[test]
    fn test_read_local_bytes() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"PK\x03\x04").unwrap();
        let bytes = ArchiveSource::local(file.path()).read_bytes().unwrap();
        assert_eq!(bytes, b"PK\x03\x04");
    }

    #[test]
    fn test_missing_local_file_is_unreadable() {
        let err = ArchiveSource::parse("/nonexistent/dir/missing.braidz")
            .read_bytes()
            .unwrap_err();
        assert_eq!(err.kind(), "source_unreadable");
        assert!(err.to_string().contains("missing.braidz"));
    }
}
