//! Where snapshots come from.
//!
//! The HTTP source always re-reads the document: every request carries a
//! fresh cache-bust query parameter plus `no-cache` directives, so neither
//! the browser-style caches in between nor a CDN can answer with a stale copy.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::Client;
use url::Url;

use crate::error::FetchError;
use crate::progress::Snapshot;
use crate::storage::SourceConfig;

const USER_AGENT: &str = "leetboard";

/// Query parameter carrying the cache-bust value.
pub const CACHE_BUST_PARAM: &str = "_";

/// Anything that can produce one snapshot per call.
pub trait SnapshotSource: Send + Sync {
    /// Human-readable location, used in logs.
    fn describe(&self) -> String;

    /// Fetch and decode one snapshot.
    fn fetch(&self) -> impl Future<Output = Result<Snapshot, FetchError>> + Send;
}

/// Snapshot served over HTTP as a static JSON file.
#[derive(Debug, Clone)]
pub struct HttpSnapshotSource {
    client: Client,
    url: Url,
}

impl HttpSnapshotSource {
    /// Create a source for an absolute URL with a per-request timeout.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let url = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl {
                url: url.to_string(),
                message: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client, url })
    }

    pub fn from_config(config: &SourceConfig) -> Result<Self, FetchError> {
        Self::new(&config.url, Duration::from_secs(config.timeout_secs))
    }

    /// The configured URL with a cache-bust parameter appended.
    pub fn cache_busted_url(&self, bust: i64) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut()
            .append_pair(CACHE_BUST_PARAM, &bust.to_string());
        url
    }

    pub async fn fetch_snapshot(&self) -> Result<Snapshot, FetchError> {
        let url = self.cache_busted_url(Utc::now().timestamp_millis());
        tracing::debug!(%url, "fetching snapshot");

        let response = self
            .client
            .get(url)
            .header(CACHE_CONTROL, "no-cache, no-store")
            .header(PRAGMA, "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: self.url.to_string(),
            });
        }

        let body = response.bytes().await?;
        Snapshot::from_json_slice(&body)
    }
}

impl SnapshotSource for HttpSnapshotSource {
    fn describe(&self) -> String {
        self.url.to_string()
    }

    fn fetch(&self) -> impl Future<Output = Result<Snapshot, FetchError>> + Send {
        self.fetch_snapshot()
    }
}

/// Snapshot read from a JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileSnapshotSource {
    path: PathBuf,
}

impl FileSnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn fetch_snapshot(&self) -> Result<Snapshot, FetchError> {
        let body = tokio::fs::read(&self.path)
            .await
            .map_err(|source| FetchError::Io {
                path: self.path.clone(),
                source,
            })?;
        Snapshot::from_json_slice(&body)
    }
}

impl SnapshotSource for FileSnapshotSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> impl Future<Output = Result<Snapshot, FetchError>> + Send {
        self.fetch_snapshot()
    }
}

/// Either built-in source, chosen at runtime.
#[derive(Debug, Clone)]
pub enum AnySource {
    Http(HttpSnapshotSource),
    File(FileSnapshotSource),
}

impl AnySource {
    /// Pick a file source when a path is given, else HTTP from `url` or the config.
    pub fn resolve(
        file: Option<&Path>,
        url: Option<&str>,
        config: &SourceConfig,
    ) -> Result<Self, FetchError> {
        match (file, url) {
            (Some(path), _) => Ok(Self::File(FileSnapshotSource::new(path))),
            (None, Some(url)) => Ok(Self::Http(HttpSnapshotSource::new(
                url,
                Duration::from_secs(config.timeout_secs),
            )?)),
            (None, None) => Ok(Self::Http(HttpSnapshotSource::from_config(config)?)),
        }
    }
}

impl SnapshotSource for AnySource {
    fn describe(&self) -> String {
        match self {
            AnySource::Http(source) => source.describe(),
            AnySource::File(source) => source.describe(),
        }
    }

    fn fetch(&self) -> impl Future<Output = Result<Snapshot, FetchError>> + Send {
        async move {
            match self {
                AnySource::Http(source) => source.fetch_snapshot().await,
                AnySource::File(source) => source.fetch_snapshot().await,
            }
        }
    }
}
