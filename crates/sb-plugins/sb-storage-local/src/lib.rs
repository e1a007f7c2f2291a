//! # sb-storage-local
//!
//! Local filesystem implementation of `MediaStore`. Photos land under a
//! root directory keyed by `{semester}/{spotter}_{message_id}.{ext}` and
//! are served from a public URL prefix. Fetching pulls the attachment from
//! the platform's private URL with the bot token, under a bounded timeout.

use anyhow::Context;
use async_trait::async_trait;
use sb_core::traits::MediaStore;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tokio::fs;

pub struct LocalMediaStore {
    /// Root directory for all stored photos (e.g. "./data/spots").
    root_path: PathBuf,
    /// Public URL prefix mapped to `root_path` (e.g. "https://host/spots").
    url_prefix: String,
    client: reqwest::Client,
    /// Bearer token for fetching platform-private attachment URLs.
    fetch_token: Option<String>,
}

impl LocalMediaStore {
    pub fn new(root: PathBuf, url_prefix: String, fetch_token: Option<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("building media fetch client")?;
        Ok(Self { root_path: root, url_prefix, client, fetch_token })
    }

    /// Rejects keys that would escape the root directory.
    fn resolve(&self, key: &str) -> anyhow::Result<PathBuf> {
        let rel = Path::new(key);
        if rel.components().any(|c| !matches!(c, Component::Normal(_))) {
            anyhow::bail!("invalid storage key: {key}");
        }
        Ok(self.root_path.join(rel))
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn fetch(&self, locator: &str) -> anyhow::Result<Vec<u8>> {
        let mut request = self.client.get(locator);
        if let Some(token) = &self.fetch_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.context("fetching attachment")?;
        if !response.status().is_success() {
            anyhow::bail!("attachment fetch returned {}", response.status());
        }
        Ok(response.bytes().await.context("reading attachment body")?.to_vec())
    }

    async fn store(&self, key: &str, data: Vec<u8>) -> anyhow::Result<String> {
        let target = self.resolve(key)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await.context("creating storage directory")?;
        }
        fs::write(&target, &data).await.with_context(|| format!("writing {key}"))?;
        log::debug!("stored {} bytes under {key}", data.len());
        Ok(format!("{}/{key}", self.url_prefix.trim_end_matches('/')))
    }
}
