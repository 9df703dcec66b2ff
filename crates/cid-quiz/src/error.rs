use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("question bank is empty")]
    Exhausted,
    #[error("unknown question id {0}")]
    UnknownQuestion(u32),
    #[error("question {id} is malformed: {reason}")]
    Malformed { id: u32, reason: String },
    #[error("invalid question data: {0}")]
    InvalidData(#[from] serde_json::Error),
}
