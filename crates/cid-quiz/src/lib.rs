//! Question bank for CID Defender encounters.
//!
//! Serves questions by defender pillar with usage tracking so questions
//! are not repeated until the bank runs dry, plus coverage statistics and
//! progress export/import.

pub mod bank;
pub mod error;
pub mod progress;

pub use bank::{QuestionBank, QuestionSource};
pub use error::QuizError;
pub use progress::{CoverageStat, QuizProgress};
