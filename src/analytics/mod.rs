pub mod controversy;
pub mod options;
pub mod velocity;

use crate::models::PollOption;
use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

pub use controversy::{ConsensusStatus, compute_controversy_index};
pub use options::compute_option_stats;
pub use velocity::{ActivityStatus, compute_velocity};

// Per-option share and 95% confidence half-width
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionStat {
    pub id: String,
    pub text: String,
    pub vote_count: u64,
    pub percentage: f64,
    pub margin_of_error: f64,
}

// Poll-level aggregate metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollAnalytics {
    pub total_votes: u64,
    pub controversy_index: f64,
    pub vote_velocity_bpm: f64,
    pub activity_status: ActivityStatus,
    pub consensus_status: ConsensusStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub analytics: PollAnalytics,
    pub options: Vec<OptionStat>,
}

/// Sum of all option tallies.
pub fn total_votes(options: &[PollOption]) -> u64 {
    options.iter().map(|option| option.vote_count).sum()
}

/// Rounds half away from zero at `decimals` places, so 0.05 becomes 0.1
/// and 0.25 becomes 0.3 at one decimal.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Computes the full analytics report for one poll snapshot.
///
/// `options` must be a consistent snapshot of the poll's tallies; the
/// function never re-reads them. It has no side effects, so calling it
/// twice with the same inputs yields the same report.
pub fn build_analytics(
    options: &[PollOption],
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> AnalyticsReport {
    let total = total_votes(options);
    let entropy = compute_controversy_index(options);
    let (velocity, activity_status) = compute_velocity(total, created_at, now);

    debug!(
        "Analytics over {} options: total={}, entropy={:.4}, velocity={}",
        options.len(),
        total,
        entropy,
        velocity
    );

    AnalyticsReport {
        analytics: PollAnalytics {
            total_votes: total,
            controversy_index: round_to(entropy, 2),
            vote_velocity_bpm: velocity,
            activity_status,
            consensus_status: ConsensusStatus::classify(entropy),
        },
        options: compute_option_stats(options),
    }
}
