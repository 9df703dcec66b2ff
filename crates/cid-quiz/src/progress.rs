//! Coverage statistics and serializable quiz progress.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Saved set of questions already asked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizProgress {
    pub used_ids: Vec<u32>,
}

/// How much of a question pool has been asked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageStat {
    pub total: usize,
    pub used: usize,
}

impl CoverageStat {
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.used as f64 / self.total as f64 * 100.0
    }
}

impl fmt::Display for CoverageStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({:.1}%)", self.used, self.total, self.percentage())
    }
}
