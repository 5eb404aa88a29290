use crate::analytics::{OptionStat, round_to, total_votes};
use crate::models::PollOption;

/// z-score for a two-sided 95% confidence interval.
pub const Z_95: f64 = 1.96;

pub fn compute_option_stats(options: &[PollOption]) -> Vec<OptionStat> {
    let total = total_votes(options);

    options
        .iter()
        .map(|option| {
            let share = vote_share(option.vote_count, total);
            OptionStat {
                id: option.id.clone(),
                text: option.text.clone(),
                vote_count: option.vote_count,
                percentage: round_to(share * 100.0, 1),
                margin_of_error: round_to(margin_of_error(share, total) * 100.0, 1),
            }
        })
        .collect()
}

pub(crate) fn vote_share(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

// Wald interval half-width; undefined below two votes so reported as 0
fn margin_of_error(share: f64, total: u64) -> f64 {
    if total <= 1 {
        return 0.0;
    }
    Z_95 * (share * (1.0 - share) / total as f64).sqrt()
}
