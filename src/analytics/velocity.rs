use crate::analytics::round_to;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Polls younger than this are treated as this old.
pub const MIN_ELAPSED_MINUTES: f64 = 1.0;
pub const HIGH_HYPE_VELOCITY: f64 = 5.0;
pub const MODERATE_VELOCITY: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityStatus {
    #[serde(rename = "Low")]
    Low,
    #[serde(rename = "Moderate")]
    Moderate,
    #[serde(rename = "High Hype")]
    HighHype,
}

impl ActivityStatus {
    /// Bands are checked from the top and both bounds are strict.
    pub fn classify(votes_per_minute: f64) -> Self {
        if votes_per_minute > HIGH_HYPE_VELOCITY {
            ActivityStatus::HighHype
        } else if votes_per_minute > MODERATE_VELOCITY {
            ActivityStatus::Moderate
        } else {
            ActivityStatus::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityStatus::Low => "Low",
            ActivityStatus::Moderate => "Moderate",
            ActivityStatus::HighHype => "High Hype",
        }
    }
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minutes since `created_at`, floored at [`MIN_ELAPSED_MINUTES`].
///
/// A `now` earlier than `created_at` (clock skew between writer and reader)
/// also lands on the floor.
pub fn elapsed_minutes(created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let millis = (now - created_at).num_milliseconds() as f64;
    (millis / 60_000.0).max(MIN_ELAPSED_MINUTES)
}

/// Votes per minute since creation, rounded to two decimals, with its band.
pub fn compute_velocity(
    total_votes: u64,
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> (f64, ActivityStatus) {
    let minutes = elapsed_minutes(created_at, now);
    let velocity = round_to(total_votes as f64 / minutes, 2);
    (velocity, ActivityStatus::classify(velocity))
}
