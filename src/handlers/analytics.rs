use crate::analytics::{AnalyticsReport, build_analytics};
use crate::db::PollStore;
use crate::error::PollError;
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

/// Poll summary fields with the analytics report alongside.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollAnalyticsView {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub room_id: String,
    pub is_active: bool,
    pub owner_id: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub report: AnalyticsReport,
}

pub async fn poll_analytics(
    store: &dyn PollStore,
    poll_id: &str,
    now: DateTime<Utc>,
) -> Result<PollAnalyticsView, PollError> {
    // One read gives a consistent snapshot of every option's tally
    let poll = store
        .get_poll(poll_id)
        .await?
        .ok_or_else(|| PollError::PollNotFound(poll_id.to_string()))?;

    let report = build_analytics(&poll.options, poll.created_at, now);
    info!(
        "Analytics for poll {}: {} votes, {}, {}",
        poll.id, report.analytics.total_votes, report.analytics.activity_status, report.analytics.consensus_status
    );

    Ok(PollAnalyticsView {
        id: poll.id,
        title: poll.title,
        description: poll.description,
        room_id: poll.room_id,
        is_active: poll.is_active,
        owner_id: poll.owner_id,
        created_at: poll.created_at,
        report,
    })
}
