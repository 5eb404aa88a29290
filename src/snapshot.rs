use crate::db::{MemoryStore, PollStore};
use crate::error::PollError;
use crate::handlers::{IotClick, PollAnalyticsView, poll_analytics, smart_click};
use crate::models::{Device, Poll};
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Failed to read snapshot {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error(transparent)]
    Poll(#[from] PollError),
}

/// Polls, devices and pending button clicks exported from the poll service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub polls: Vec<Poll>,
    #[serde(default)]
    pub devices: Vec<Device>,
    #[serde(default)]
    pub clicks: Vec<IotClick>,
}

impl Snapshot {
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let raw = fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Replays the snapshot's clicks, then reports analytics for the requested
/// poll or for every poll, newest first.
///
/// A rejected click is logged and skipped; the remaining clicks still apply.
pub async fn evaluate(
    snapshot: Snapshot,
    poll_id: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Vec<PollAnalyticsView>, SnapshotError> {
    let store = MemoryStore::with_data(snapshot.polls, snapshot.devices);

    let mut accepted = 0usize;
    for click in snapshot.clicks {
        let device_id = click.device_id.clone();
        match smart_click(&store, click, now).await {
            Ok(_) => accepted += 1,
            Err(e) => warn!("Skipping click from {}: {}", device_id, e),
        }
    }
    if accepted > 0 {
        info!("Applied {} click(s) from snapshot", accepted);
    }

    let ids: Vec<String> = match poll_id {
        Some(id) => vec![id.to_string()],
        None => store.list_polls().await.map_err(PollError::from)?.into_iter().map(|p| p.id).collect(),
    };

    let mut views = Vec::with_capacity(ids.len());
    for id in ids {
        views.push(poll_analytics(&store, &id, now).await?);
    }
    Ok(views)
}
