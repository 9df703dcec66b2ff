//! Question selection with usage tracking.

use std::collections::{BTreeMap, BTreeSet};

use rand::seq::SliceRandom;
use rand::RngCore;
use tracing::{debug, info, warn};

use cid_core::enums::DefenderId;
use cid_core::question::{Difficulty, Question, QuestionCategory, OPTION_COUNT};

use crate::error::QuizError;
use crate::progress::{CoverageStat, QuizProgress};

const BUILTIN_QUESTIONS: &str = include_str!("../data/questions.json");

/// Supplies questions for encounters.
///
/// Implementations must keep returning a question as long as they hold any,
/// recycling already-asked questions when the unused pool is empty.
pub trait QuestionSource: Send {
    /// A question for the pillar under attack, falling back to any unused question.
    fn question_for_defender(
        &mut self,
        defender: DefenderId,
        rng: &mut dyn RngCore,
    ) -> Result<Question, QuizError>;

    /// Any unused question.
    fn random_question(&mut self, rng: &mut dyn RngCore) -> Result<Question, QuizError>;

    /// Forget which questions have been asked.
    fn reset_progress(&mut self);
}

/// Result of checking an answer against a question.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerCheck {
    pub correct: bool,
    pub correct_answer: String,
    pub explanation: String,
}

/// In-memory question bank.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
    used: BTreeSet<u32>,
}

impl QuestionBank {
    /// Build a bank, rejecting duplicate ids and out-of-range answers.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuizError> {
        let mut seen = BTreeSet::new();
        for q in &questions {
            if !seen.insert(q.id) {
                return Err(QuizError::Malformed {
                    id: q.id,
                    reason: "duplicate id".into(),
                });
            }
            if q.correct_index >= OPTION_COUNT {
                return Err(QuizError::Malformed {
                    id: q.id,
                    reason: format!("correct index {} out of range", q.correct_index),
                });
            }
            if q.text.trim().is_empty() {
                return Err(QuizError::Malformed {
                    id: q.id,
                    reason: "empty text".into(),
                });
            }
        }
        Ok(Self {
            questions,
            used: BTreeSet::new(),
        })
    }

    pub fn from_json(json: &str) -> Result<Self, QuizError> {
        let questions: Vec<Question> = serde_json::from_str(json)?;
        Self::new(questions)
    }

    /// The bundled security-awareness question set.
    pub fn builtin() -> Result<Self, QuizError> {
        Self::from_json(BUILTIN_QUESTIONS)
    }

    pub fn question_by_id(&self, id: u32) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn questions_in(&self, category: QuestionCategory) -> impl Iterator<Item = &Question> {
        self.questions.iter().filter(move |q| q.category == category)
    }

    pub fn validate_answer(&self, id: u32, option: usize) -> Result<AnswerCheck, QuizError> {
        let q = self
            .question_by_id(id)
            .ok_or(QuizError::UnknownQuestion(id))?;
        Ok(AnswerCheck {
            correct: q.is_correct(option),
            correct_answer: q.options[q.correct_index].clone(),
            explanation: q.explanation.clone(),
        })
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn used_count(&self) -> usize {
        self.used.len()
    }

    pub fn remaining_count(&self) -> usize {
        self.questions.len().saturating_sub(self.used.len())
    }

    pub fn all_used(&self) -> bool {
        self.remaining_count() == 0
    }

    pub fn category_stats(&self) -> BTreeMap<QuestionCategory, CoverageStat> {
        let mut stats = BTreeMap::new();
        for q in &self.questions {
            let entry: &mut CoverageStat = stats.entry(q.category).or_default();
            entry.total += 1;
            entry.used += usize::from(self.used.contains(&q.id));
        }
        stats
    }

    pub fn difficulty_stats(&self) -> BTreeMap<Difficulty, CoverageStat> {
        let mut stats = BTreeMap::new();
        for q in &self.questions {
            let entry: &mut CoverageStat = stats.entry(q.difficulty).or_default();
            entry.total += 1;
            entry.used += usize::from(self.used.contains(&q.id));
        }
        stats
    }

    /// Multi-line coverage summary by category and difficulty.
    pub fn progress_report(&self) -> String {
        let mut report = String::from("Question coverage\n\nBy category:\n");
        for (category, stat) in self.category_stats() {
            report.push_str(&format!("  {category:?}: {stat}\n"));
        }
        report.push_str("\nBy difficulty:\n");
        for (difficulty, stat) in self.difficulty_stats() {
            report.push_str(&format!("  {difficulty:?}: {stat}\n"));
        }
        report
    }

    pub fn export_progress(&self) -> QuizProgress {
        QuizProgress {
            used_ids: self.used.iter().copied().collect(),
        }
    }

    /// Restore usage from saved progress. Ids not in this bank are dropped.
    /// Returns how many ids were restored.
    pub fn import_progress(&mut self, progress: &QuizProgress) -> usize {
        let known: BTreeSet<u32> = progress
            .used_ids
            .iter()
            .copied()
            .filter(|id| self.question_by_id(*id).is_some())
            .collect();
        let dropped = progress.used_ids.len() - known.len();
        if dropped > 0 {
            warn!(dropped, "ignoring unknown question ids in saved progress");
        }
        self.used = known;
        info!(used = self.used.len(), "quiz progress imported");
        self.used.len()
    }

    fn pick_unused(
        &mut self,
        category: Option<QuestionCategory>,
        rng: &mut dyn RngCore,
    ) -> Option<Question> {
        let candidates: Vec<&Question> = self
            .questions
            .iter()
            .filter(|q| !self.used.contains(&q.id))
            .filter(|q| category.map_or(true, |c| q.category == c))
            .collect();
        let picked = candidates.choose(rng).map(|q| (*q).clone())?;
        self.used.insert(picked.id);
        debug!(id = picked.id, category = ?picked.category, "question selected");
        Some(picked)
    }
}

impl QuestionSource for QuestionBank {
    fn question_for_defender(
        &mut self,
        defender: DefenderId,
        rng: &mut dyn RngCore,
    ) -> Result<Question, QuizError> {
        let category = QuestionCategory::from(defender);
        if let Some(q) = self.pick_unused(Some(category), rng) {
            return Ok(q);
        }
        debug!(?category, "category exhausted, using general pool");
        if let Some(q) = self.pick_unused(None, rng) {
            return Ok(q);
        }
        self.reset_progress();
        self.pick_unused(Some(category), rng)
            .or_else(|| self.pick_unused(None, rng))
            .ok_or(QuizError::Exhausted)
    }

    fn random_question(&mut self, rng: &mut dyn RngCore) -> Result<Question, QuizError> {
        if let Some(q) = self.pick_unused(None, rng) {
            return Ok(q);
        }
        self.reset_progress();
        self.pick_unused(None, rng).ok_or(QuizError::Exhausted)
    }

    fn reset_progress(&mut self) {
        self.used.clear();
        info!("question usage reset");
    }
}
