use crate::analytics::options::vote_share;
use crate::analytics::total_votes;
use crate::models::PollOption;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Entropy above which a poll counts as split. Compared strictly, so an even
/// two-way split (exactly 1 bit) is still a consensus.
pub const CONTROVERSY_THRESHOLD_BITS: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsensusStatus {
    #[serde(rename = "Consensus")]
    Consensus,
    #[serde(rename = "High Controversy")]
    HighControversy,
}

impl ConsensusStatus {
    pub fn classify(entropy_bits: f64) -> Self {
        if entropy_bits > CONTROVERSY_THRESHOLD_BITS {
            ConsensusStatus::HighControversy
        } else {
            ConsensusStatus::Consensus
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConsensusStatus::Consensus => "Consensus",
            ConsensusStatus::HighControversy => "High Controversy",
        }
    }
}

impl fmt::Display for ConsensusStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shannon entropy, in bits, of the vote-share distribution.
///
/// Options without votes contribute nothing, and an empty poll scores 0.
pub fn compute_controversy_index(options: &[PollOption]) -> f64 {
    let total = total_votes(options);
    if total == 0 {
        return 0.0;
    }

    let entropy: f64 = options
        .iter()
        .map(|option| vote_share(option.vote_count, total))
        .filter(|&p| p > 0.0)
        .map(|p| -p * p.log2())
        .sum();

    // A single option holding every vote yields -0.0
    if entropy <= 0.0 { 0.0 } else { entropy }
}
