//! Aggregate feedback statistics, recomputed from scratch on every read.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::records::{FeedbackEntry, FeedbackRecord};
use crate::util::round2;

pub const NO_DATA_MESSAGE: &str = "No feedback data available yet.";

/// Anything carrying a function type and a 1-5 rating.
pub trait Rated {
    fn function_type(&self) -> &str;
    fn rating(&self) -> u8;
}

impl Rated for FeedbackRecord {
    fn function_type(&self) -> &str {
        &self.function_type
    }

    fn rating(&self) -> u8 {
        self.rating
    }
}

impl Rated for FeedbackEntry {
    fn function_type(&self) -> &str {
        &self.function_type
    }

    fn rating(&self) -> u8 {
        self.rating
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionStats {
    pub count: usize,
    pub avg_rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackStats {
    pub total_feedback: usize,
    pub average_rating: f64,
    /// Only function types that actually received feedback.
    pub function_stats: BTreeMap<String, FunctionStats>,
}

/// Fold feedback into totals and means. `None` when there is nothing to
/// average over.
pub fn compute_stats<'a, T, I>(feedback: I) -> Option<FeedbackStats>
where
    T: Rated + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut total = 0usize;
    let mut sum = 0u64;
    let mut per_function: BTreeMap<String, (usize, u64)> = BTreeMap::new();

    for item in feedback {
        let rating = u64::from(item.rating());
        total += 1;
        sum += rating;
        let slot = per_function
            .entry(item.function_type().to_string())
            .or_insert((0, 0));
        slot.0 += 1;
        slot.1 += rating;
    }

    if total == 0 {
        return None;
    }

    let function_stats = per_function
        .into_iter()
        .map(|(function_type, (count, sum))| {
            (
                function_type,
                FunctionStats {
                    count,
                    avg_rating: round2(sum as f64 / count as f64),
                },
            )
        })
        .collect();

    Some(FeedbackStats {
        total_feedback: total,
        average_rating: round2(sum as f64 / total as f64),
        function_stats,
    })
}
