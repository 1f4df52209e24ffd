use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use reqwest::blocking::Client;
use tracing::info;

use crate::config::TrackerConfig;

/// Source of the external tracker roster. `refresh` fetches a fresh copy and
/// returns it; any failure aborts the comparison (no stale fallback).
pub trait TrackerSource: Send + Sync + Debug {
    fn refresh(&self) -> Result<Vec<String>, RefreshError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("tracker request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("tracker responded with status {status}")]
    Status { status: reqwest::StatusCode },
    #[error("snapshot file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("snapshot file {} is not a JSON list of names: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// JSON array of display names cached on disk between refreshes.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Vec<String>, RefreshError> {
        let raw = fs::read_to_string(&self.path).map_err(|source| RefreshError::Io {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| RefreshError::Decode {
            path: self.path.clone(),
            source,
        })
    }

    /// Overwrites the snapshot; concurrent writers race, last one wins.
    pub fn store(&self, names: &[String]) -> Result<(), RefreshError> {
        let body = serde_json::to_string_pretty(names).map_err(|source| RefreshError::Decode {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, body).map_err(|source| RefreshError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// TempleOSRS group roster fetched over HTTP and mirrored to a snapshot file.
#[derive(Debug, Clone)]
pub struct TempleTracker {
    client: Client,
    members_url: String,
    snapshot: SnapshotFile,
}

impl TempleTracker {
    pub fn new(config: &TrackerConfig) -> Result<Self, RefreshError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            members_url: config.members_url(),
            snapshot: SnapshotFile::new(config.snapshot_path.clone()),
        })
    }

    fn fetch(&self) -> Result<Vec<String>, RefreshError> {
        let response = self.client.get(&self.members_url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(RefreshError::Status { status });
        }
        Ok(response.json::<Vec<String>>()?)
    }
}

impl TrackerSource for TempleTracker {
    fn refresh(&self) -> Result<Vec<String>, RefreshError> {
        let members = self.fetch()?;
        self.snapshot.store(&members)?;
        info!(
            count = members.len(),
            path = %self.snapshot.path().display(),
            "temple snapshot refreshed"
        );
        self.snapshot.load()
    }
}
