//! Quiz question records.

use serde::{Deserialize, Serialize};

use crate::enums::DefenderId;

/// Number of answer options on every question.
pub const OPTION_COUNT: usize = 4;

/// Topic pool a question belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QuestionCategory {
    Confidentiality,
    Integrity,
    Availability,
    General,
}

impl QuestionCategory {
    pub const ALL: [QuestionCategory; 4] = [
        QuestionCategory::Confidentiality,
        QuestionCategory::Integrity,
        QuestionCategory::Availability,
        QuestionCategory::General,
    ];
}

impl From<DefenderId> for QuestionCategory {
    fn from(id: DefenderId) -> Self {
        match id {
            DefenderId::Confidentiality => QuestionCategory::Confidentiality,
            DefenderId::Integrity => QuestionCategory::Integrity,
            DefenderId::Availability => QuestionCategory::Availability,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// A multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub text: String,
    pub options: [String; OPTION_COUNT],
    /// Index into `options` of the correct answer.
    pub correct_index: usize,
    pub explanation: String,
    pub category: QuestionCategory,
    pub difficulty: Difficulty,
}

impl Question {
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_index
    }
}
