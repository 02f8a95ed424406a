//! JSON document retrieval.
//!
//! Fetching is an external concern: viewers only care that a URL resolves to
//! bytes. [`Transport`] is that seam, [`fetch_json`] layers serde on top, and
//! [`FsTransport`] is the shipped implementation, mapping URLs under the site
//! base to files under a local directory (the usual deployment layout, and
//! what the test suite drives). There is no retry, timeout, or caching; the
//! first failure is reported to the caller.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("document not found: {0}")]
    NotFound(Url),
    #[error("URL {url} is outside the site base {base}")]
    OutsideBase { url: Url, base: Url },
    #[error("IO error reading {url}: {source}")]
    Io {
        url: Url,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON at {url}: {source}")]
    Json {
        url: Url,
        #[source]
        source: serde_json::Error,
    },
}

/// Byte-level document retrieval for a gallery site.
///
/// `Sync` so the renderer can fan albums out across threads; implementations
/// hold no per-request state.
pub trait Transport: Sync {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>, TransportError>;
}

/// Fetch a URL and deserialize it as JSON.
pub fn fetch_json<T: serde::de::DeserializeOwned>(
    transport: &dyn Transport,
    url: &Url,
) -> Result<T, TransportError> {
    let bytes = transport.fetch(url)?;
    serde_json::from_slice(&bytes).map_err(|source| TransportError::Json {
        url: url.clone(),
        source,
    })
}

/// Serves a site from a local directory.
///
/// A URL resolves by stripping the base URL's path prefix and joining the
/// remainder onto the root directory. URLs outside the base (different host,
/// or a path that does not start with the base path) are rejected rather
/// than guessed at.
pub struct FsTransport {
    root: PathBuf,
    base: Url,
}

impl FsTransport {
    pub fn new(root: impl Into<PathBuf>, base: Url) -> Self {
        Self {
            root: root.into(),
            base,
        }
    }

    fn resolve(&self, url: &Url) -> Result<PathBuf, TransportError> {
        let outside = || TransportError::OutsideBase {
            url: url.clone(),
            base: self.base.clone(),
        };

        if url.host() != self.base.host() || url.scheme() != self.base.scheme() {
            return Err(outside());
        }

        let base_path = self.base.path().trim_end_matches('/');
        let rest = url.path().strip_prefix(base_path).ok_or_else(outside)?;
        if !rest.is_empty() && !rest.starts_with('/') {
            // "/gallerystuff" must not match a base of "/gallery"
            return Err(outside());
        }
        let rest = rest.trim_start_matches('/');

        let mut path = self.root.clone();
        for segment in rest.split('/').filter(|s| !s.is_empty()) {
            if segment == ".." {
                return Err(outside());
            }
            path.push(segment);
        }
        Ok(path)
    }
}

impl Transport for FsTransport {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>, TransportError> {
        let path = self.resolve(url)?;
        read_file(&path, url)
    }
}

fn read_file(path: &Path, url: &Url) -> Result<Vec<u8>, TransportError> {
    match fs::read(path) {
        Ok(bytes) => Ok(bytes),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            Err(TransportError::NotFound(url.clone()))
        }
        Err(source) => Err(TransportError::Io {
            url: url.clone(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    fn base() -> Url {
        Url::parse("https://photos.example.com/gallery/").unwrap()
    }

    fn transport(tmp: &TempDir) -> FsTransport {
        FsTransport::new(tmp.path(), base())
    }

    #[test]
    fn fetch_reads_file_under_base() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.json"), b"{}").unwrap();

        let url = base().join("config.json").unwrap();
        let bytes = transport(&tmp).fetch(&url).unwrap();
        assert_eq!(bytes, b"{}");
    }

    #[test]
    fn fetch_nested_document() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("vacation")).unwrap();
        fs::write(tmp.path().join("vacation/folderInfo.json"), b"[1]").unwrap();

        let url = base().join("vacation/folderInfo.json").unwrap();
        assert_eq!(transport(&tmp).fetch(&url).unwrap(), b"[1]");
    }

    #[test]
    fn missing_file_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let url = base().join("nope.json").unwrap();
        let err = transport(&tmp).fetch(&url).unwrap_err();
        assert!(matches!(err, TransportError::NotFound(_)));
    }

    #[test]
    fn foreign_host_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let url = Url::parse("https://elsewhere.example.com/gallery/config.json").unwrap();
        let err = transport(&tmp).fetch(&url).unwrap_err();
        assert!(matches!(err, TransportError::OutsideBase { .. }));
    }

    #[test]
    fn path_above_base_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let url = Url::parse("https://photos.example.com/other/config.json").unwrap();
        let err = transport(&tmp).fetch(&url).unwrap_err();
        assert!(matches!(err, TransportError::OutsideBase { .. }));
    }

    #[test]
    fn fetch_json_deserializes() {
        #[derive(Deserialize)]
        struct Doc {
            n: u32,
        }

        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("doc.json"), br#"{"n": 7}"#).unwrap();

        let t = transport(&tmp);
        let url = base().join("doc.json").unwrap();
        let doc: Doc = fetch_json(&t, &url).unwrap();
        assert_eq!(doc.n, 7);
    }

    #[test]
    fn fetch_json_reports_bad_json() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("doc.json"), b"not json").unwrap();

        let t = transport(&tmp);
        let url = base().join("doc.json").unwrap();
        let err = fetch_json::<serde_json::Value>(&t, &url).unwrap_err();
        assert!(matches!(err, TransportError::Json { .. }));
    }
}
