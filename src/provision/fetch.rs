//! Archive downloads over HTTP/HTTPS.
//!
//! Downloads stream straight to disk and are hashed on the way through,
//! so large archives never have to fit in memory.

use reqwest::blocking::Client;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use super::outcome::ProvisionError;

/// Default per-download timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches archives over HTTP/HTTPS.
#[derive(Debug, Clone)]
pub struct ArchiveFetcher {
    client: Client,
    timeout: Duration,
}

/// A completed download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// Bytes written to disk.
    pub bytes: u64,
    /// Lowercase hex SHA-256 of the payload.
    pub sha256: String,
}

impl ArchiveFetcher {
    /// Create a fetcher with the default timeout.
    pub fn new() -> anyhow::Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a fetcher whose downloads give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("hgtdeps/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .timeout(timeout)
            .build()?;
        Ok(Self { client, timeout })
    }

    /// Get the configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Download `url` into `dest`, verifying status, length and checksum.
    pub fn fetch_to(
        &self,
        url: &str,
        dest: &Path,
        expected_sha256: Option<&str>,
    ) -> Result<Download, ProvisionError> {
        tracing::debug!("Downloading {} to {}", url, dest.display());

        let mut response = self
            .client
            .get(url)
            .send()
            .map_err(|e| ProvisionError::download(url, self.describe(&e)))?;

        if !response.status().is_success() {
            return Err(ProvisionError::download(
                url,
                format!("HTTP {}", response.status()),
            ));
        }

        let file = File::create(dest).map_err(|e| {
            ProvisionError::download(url, format!("cannot create {}: {}", dest.display(), e))
        })?;
        let mut writer = HashingWriter::new(BufWriter::new(file));

        let bytes = response
            .copy_to(&mut writer)
            .map_err(|e| ProvisionError::download(url, self.describe(&e)))?;
        let sha256 = writer
            .finish()
            .map_err(|e| ProvisionError::download(url, format!("write failed: {}", e)))?;

        if bytes == 0 {
            return Err(ProvisionError::download(url, "server returned an empty payload"));
        }

        if let Some(expected) = expected_sha256 {
            if !expected.eq_ignore_ascii_case(&sha256) {
                return Err(ProvisionError::download(
                    url,
                    format!("checksum mismatch: expected {}, got {}", expected, sha256),
                ));
            }
        }

        tracing::debug!("Downloaded {} bytes from {}", bytes, url);
        Ok(Download { bytes, sha256 })
    }

    fn describe(&self, err: &reqwest::Error) -> String {
        if err.is_timeout() {
            format!("timed out after {}s", self.timeout.as_secs())
        } else {
            err.to_string()
        }
    }
}

/// Writer that hashes everything passing through it.
struct HashingWriter<W: Write> {
    inner: W,
    hasher: Sha256,
}

impl<W: Write> HashingWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: Sha256::new(),
        }
    }

    fn finish(mut self) -> std::io::Result<String> {
        self.inner.flush()?;
        Ok(hex::encode(self.hasher.finalize()))
    }
}

impl<W: Write> Write for HashingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provision::outcome::ErrorKind;
    use httpmock::prelude::*;
    use tempfile::TempDir;

    fn sha256_hex(data: &[u8]) -> String {
        hex::encode(Sha256::digest(data))
    }

    #[test]
    fn default_timeout_is_ten_minutes() {
        let fetcher = ArchiveFetcher::new().unwrap();
        assert_eq!(fetcher.timeout(), Duration::from_secs(600));
    }

    #[test]
    fn fetch_writes_payload_and_hash() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/tool.tar.gz");
            then.status(200).body("archive-bytes");
        });

        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("tool.tar.gz");
        let fetcher = ArchiveFetcher::with_timeout(Duration::from_secs(10)).unwrap();
        let download = fetcher
            .fetch_to(&server.url("/tool.tar.gz"), &dest, None)
            .unwrap();

        assert_eq!(download.bytes, 13);
        assert_eq!(download.sha256, sha256_hex(b"archive-bytes"));
        assert_eq!(std::fs::read(&dest).unwrap(), b"archive-bytes");
    }

    #[test]
    fn fetch_reports_http_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404);
        });

        let temp = TempDir::new().unwrap();
        let fetcher = ArchiveFetcher::with_timeout(Duration::from_secs(10)).unwrap();
        let err = fetcher
            .fetch_to(&server.url("/missing"), &temp.path().join("x"), None)
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Download);
        assert!(err.to_string().contains("404"), "got: {}", err);
    }

    #[test]
    fn fetch_rejects_empty_payload() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/empty");
            then.status(200).body("");
        });

        let temp = TempDir::new().unwrap();
        let fetcher = ArchiveFetcher::with_timeout(Duration::from_secs(10)).unwrap();
        let err = fetcher
            .fetch_to(&server.url("/empty"), &temp.path().join("x"), None)
            .unwrap_err();

        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn fetch_checks_sha256() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/pinned");
            then.status(200).body("payload");
        });

        let temp = TempDir::new().unwrap();
        let fetcher = ArchiveFetcher::with_timeout(Duration::from_secs(10)).unwrap();

        let good = sha256_hex(b"payload").to_uppercase();
        assert!(fetcher
            .fetch_to(&server.url("/pinned"), &temp.path().join("a"), Some(&good))
            .is_ok());

        let err = fetcher
            .fetch_to(&server.url("/pinned"), &temp.path().join("b"), Some("00ff"))
            .unwrap_err();
        assert!(err.to_string().contains("checksum mismatch"));
    }

    #[test]
    fn slow_server_hits_the_download_timeout() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/slow.tar.gz");
            then.status(200)
                .delay(Duration::from_secs(5))
                .body("late");
        });

        let temp = TempDir::new().unwrap();
        let fetcher = ArchiveFetcher::with_timeout(Duration::from_secs(1)).unwrap();
        let started = std::time::Instant::now();
        let err = fetcher
            .fetch_to(&server.url("/slow.tar.gz"), &temp.path().join("x"), None)
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Download);
        assert!(err.to_string().contains("timed out after 1s"), "got: {}", err);
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn fetch_reports_unreachable_host() {
        let temp = TempDir::new().unwrap();
        let fetcher = ArchiveFetcher::with_timeout(Duration::from_secs(5)).unwrap();
        let err = fetcher
            .fetch_to("http://127.0.0.1:1/nothing", &temp.path().join("x"), None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Download);
    }
}
