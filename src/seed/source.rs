//! Where the seed file comes from.

use std::future::Future;
use std::path::PathBuf;

use log::info;

use crate::config::SeedConfig;
use crate::error::{Result, SpotError};

/// The seed file shipped with the crate.
pub static BUNDLED_SEED: &str = include_str!("../../data/spots.geojson");

/// A source of seed text. Fetched at most once per store lifetime.
pub trait SeedSource {
    /// Fetch the raw seed document.
    fn fetch(&self) -> impl Future<Output = Result<String>>;

    /// Human-readable origin, for logs.
    fn describe(&self) -> String;
}

/// The seed file compiled into the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledSeed;

impl SeedSource for BundledSeed {
    async fn fetch(&self) -> Result<String> {
        Ok(BUNDLED_SEED.to_string())
    }

    fn describe(&self) -> String {
        "bundled spots.geojson".to_string()
    }
}

/// Seed text supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct StaticSeed(pub String);

impl SeedSource for StaticSeed {
    async fn fetch(&self) -> Result<String> {
        Ok(self.0.clone())
    }

    fn describe(&self) -> String {
        format!("static seed ({} bytes)", self.0.len())
    }
}

/// Seed file read from disk.
#[derive(Debug, Clone)]
pub struct FileSeed {
    pub path: PathBuf,
}

impl FileSeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SeedSource for FileSeed {
    /// Reads through `tokio::fs` when tokio is enabled (and must then run
    /// inside a tokio runtime). Without tokio the read blocks the caller.
    async fn fetch(&self) -> Result<String> {
        #[cfg(feature = "tokio")]
        let read = tokio::fs::read_to_string(&self.path).await;
        #[cfg(not(feature = "tokio"))]
        let read = std::fs::read_to_string(&self.path);

        let text = read.map_err(|e| SpotError::SeedFetch {
            message: format!("Failed to read {}: {}", self.path.display(), e),
        })?;
        info!("[Seed] Read {} bytes from {}", text.len(), self.path.display());
        Ok(text)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Seed file fetched over HTTP.
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpSeed {
    client: reqwest::Client,
    url: String,
}

#[cfg(feature = "http")]
impl HttpSeed {
    /// Create an HTTP seed source. No timeout unless one is given.
    pub fn new(url: &str, timeout: Option<std::time::Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| SpotError::Config {
            message: format!("Failed to create HTTP client: {}", e),
        })?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[cfg(feature = "http")]
impl SeedSource for HttpSeed {
    async fn fetch(&self) -> Result<String> {
        let to_fetch_error = |e: reqwest::Error| SpotError::SeedFetch {
            message: format!("{}: {}", self.url, e),
        };

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(to_fetch_error)?
            .error_for_status()
            .map_err(to_fetch_error)?;

        let text = response.text().await.map_err(to_fetch_error)?;
        info!("[Seed] Fetched {} bytes from {}", text.len(), self.url);
        Ok(text)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// A seed source chosen at runtime from [`SeedConfig`].
#[derive(Debug, Clone)]
pub enum ConfiguredSeed {
    Bundled(BundledSeed),
    File(FileSeed),
    #[cfg(feature = "http")]
    Http(HttpSeed),
}

impl ConfiguredSeed {
    pub fn from_config(config: &SeedConfig) -> Result<Self> {
        match config {
            SeedConfig::Bundled => Ok(ConfiguredSeed::Bundled(BundledSeed)),
            SeedConfig::File { path } => Ok(ConfiguredSeed::File(FileSeed::new(path.clone()))),
            #[cfg(feature = "http")]
            SeedConfig::Http { url, timeout_secs } => {
                let timeout = timeout_secs.map(std::time::Duration::from_secs);
                Ok(ConfiguredSeed::Http(HttpSeed::new(url, timeout)?))
            }
            #[cfg(not(feature = "http"))]
            SeedConfig::Http { url, .. } => Err(SpotError::Config {
                message: format!("HTTP seed {} requires the \"http\" feature", url),
            }),
        }
    }
}

impl SeedSource for ConfiguredSeed {
    async fn fetch(&self) -> Result<String> {
        info!("[Seed] Fetching seed from {}", self.describe());
        match self {
            ConfiguredSeed::Bundled(source) => source.fetch().await,
            ConfiguredSeed::File(source) => source.fetch().await,
            #[cfg(feature = "http")]
            ConfiguredSeed::Http(source) => source.fetch().await,
        }
    }

    fn describe(&self) -> String {
        match self {
            ConfiguredSeed::Bundled(source) => source.describe(),
            ConfiguredSeed::File(source) => source.describe(),
            #[cfg(feature = "http")]
            ConfiguredSeed::Http(source) => source.describe(),
        }
    }
}
