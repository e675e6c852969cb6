//! OMDb lookups and the on-disk rating corpus
//!
//! The client is a thin sync HTTP wrapper: any failure (offline, bad
//! key, unknown title, unparsable body) degrades to an empty payload
//! with a warning. Callers cannot tell, and must not care, why a
//! payload is empty.
//!
//! The corpus is a JSON file of every payload ever fetched, keyed by
//! normalized title/year. It doubles as the lookup cache and as the
//! sample the adaptive thresholds are derived from.

use crate::extract::{self, RatingPayload};
use crate::models::RatingSignals;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

const OMDB_BASE_URL: &str = "https://www.omdbapi.com/";

/// Errors from OMDb client construction
#[derive(Error, Debug)]
pub enum OmdbError {
    #[error(
        "Missing API key: set omdb_api_key in cinecull.toml or CINECULL_OMDB_API_KEY. \
         Free keys at https://www.omdbapi.com/apikey.aspx"
    )]
    MissingApiKey,
}

/// Sync OMDb API client
pub struct OmdbClient {
    agent: ureq::Agent,
    api_key: String,
    base_url: String,
}

impl OmdbClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, OMDB_BASE_URL)
    }

    /// Point the client at a different endpoint (tests).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        // Sync HTTP via ureq (no tokio needed)
        let agent = ureq::config::Config::builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self {
            agent,
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    pub fn from_key(api_key: Option<&str>) -> Result<Self, OmdbError> {
        match api_key {
            Some(key) if !key.trim().is_empty() => Ok(Self::new(key.trim())),
            _ => Err(OmdbError::MissingApiKey),
        }
    }

    /// Fetch ratings for a title. Total: every failure path returns an
    /// empty payload.
    pub fn lookup(&self, title: &str, year: Option<i32>) -> RatingPayload {
        let mut request = self
            .agent
            .get(&self.base_url)
            .query("apikey", &self.api_key)
            .query("type", "movie")
            .query("t", title);
        if let Some(y) = year {
            request = request.query("y", y.to_string());
        }

        let response = match request.call() {
            Ok(r) => r,
            Err(e) => {
                warn!("OMDb request for '{}' failed (working offline): {}", title, e);
                return RatingPayload::default();
            }
        };

        let text = match response.into_body().read_to_string() {
            Ok(t) => t,
            Err(e) => {
                warn!("OMDb response for '{}' unreadable: {}", title, e);
                return RatingPayload::default();
            }
        };

        match serde_json::from_str::<RatingPayload>(&text) {
            Ok(payload) => {
                // OMDb signals "not found" in-band
                if payload.response.as_deref() == Some("False") {
                    debug!("OMDb has no record for '{}' ({:?})", title, year);
                    RatingPayload::default()
                } else {
                    payload
                }
            }
            Err(e) => {
                warn!("OMDb response for '{}' unparsable: {}", title, e);
                RatingPayload::default()
            }
        }
    }
}

/// Cache key for a title lookup
pub fn lookup_key(title: &str, year: Option<i32>) -> String {
    match year {
        Some(y) => format!("{} ({})", title.trim().to_lowercase(), y),
        None => title.trim().to_lowercase(),
    }
}

/// Every payload ever fetched, persisted as one JSON file.
#[derive(Debug, Default)]
pub struct RatingCorpus {
    path: Option<PathBuf>,
    entries: BTreeMap<String, RatingPayload>,
    dirty: bool,
}

impl RatingCorpus {
    /// Load from disk. A missing or corrupt file yields an empty corpus.
    pub fn load(path: &Path) -> Self {
        let entries = match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<BTreeMap<String, RatingPayload>>(&content) {
                Ok(entries) => {
                    debug!("loaded {} cached ratings from {}", entries.len(), path.display());
                    entries
                }
                Err(e) => {
                    warn!("ignoring corrupt rating cache {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };
        Self {
            path: Some(path.to_path_buf()),
            entries,
            dirty: false,
        }
    }

    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&RatingPayload> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: String, payload: RatingPayload) {
        self.entries.insert(key, payload);
        self.dirty = true;
    }

    /// Normalized signals for every cached payload, the threshold
    /// provider's sample.
    pub fn signals(&self) -> Vec<RatingSignals> {
        self.entries.values().map(extract::extract).collect()
    }

    /// Persist back to disk if anything changed.
    pub fn save(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating cache dir {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(path, json)
            .with_context(|| format!("writing rating cache {}", path.display()))?;
        self.dirty = false;
        Ok(())
    }
}

/// Default corpus location under the user cache directory.
pub fn default_cache_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|p| p.join("cinecull").join("ratings.json"))
}
