use crate::constants::PAGE_ID_PARAM;
use crate::error::{Result, ScraperError};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Anything that can turn a URL into page HTML.
pub trait PageSource {
    fn fetch(&self, url: &str) -> Result<String>;
}

/// Stable cache key for a detail page URL.
///
/// Uses the `seq` query parameter when present, otherwise a short SHA-256
/// digest of the whole URL.
pub fn page_id(url: &str) -> String {
    let seq = Url::parse(url).ok().and_then(|parsed| {
        parsed
            .query_pairs()
            .find(|(key, _)| key == PAGE_ID_PARAM)
            .map(|(_, value)| value.into_owned())
    });
    match seq {
        Some(seq) if !seq.is_empty() => seq,
        _ => {
            let mut hasher = Sha256::new();
            hasher.update(url.as_bytes());
            hex::encode(hasher.finalize())[..16].to_string()
        }
    }
}

pub struct HttpPageSource {
    client: reqwest::blocking::Client,
}

impl HttpPageSource {
    pub fn new(timeout_seconds: u64, user_agent: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }
}

impl PageSource for HttpPageSource {
    fn fetch(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().map_err(|e| ScraperError::Fetch {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        if !response.status().is_success() {
            return Err(ScraperError::Fetch {
                url: url.to_string(),
                message: format!("request failed with status: {}", response.status()),
            });
        }

        response.text().map_err(|e| ScraperError::Fetch {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

/// Directory of previously fetched pages, one `<key>.html` file each.
pub struct PageCache {
    dir: PathBuf,
}

impl PageCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.html", key))
    }

    pub fn has_cached(&self, key: &str) -> bool {
        self.path_for(key).is_file()
    }

    pub fn read_cached(&self, key: &str) -> Result<String> {
        Ok(fs::read_to_string(self.path_for(key))?)
    }

    pub fn write_cached(&self, key: &str, text: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), text)?;
        Ok(())
    }
}

/// Read-through cache in front of another page source.
pub struct CachedPageSource<S> {
    inner: S,
    cache: PageCache,
}

impl<S: PageSource> CachedPageSource<S> {
    pub fn new(inner: S, cache: PageCache) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &PageCache {
        &self.cache
    }
}

impl<S: PageSource> PageSource for CachedPageSource<S> {
    fn fetch(&self, url: &str) -> Result<String> {
        let key = page_id(url);
        if self.cache.has_cached(&key) {
            debug!("Reading {} from cache", key);
            return self.cache.read_cached(&key);
        }

        info!("Fetching {} from the web", url);
        let text = self.inner.fetch(url)?;
        if let Err(e) = self.cache.write_cached(&key, &text) {
            warn!("Failed to cache page {}: {}", key, e);
        }
        Ok(text)
    }
}
