use thiserror::Error;

use super::budget::BudgetExceeded;
use super::draft::FieldError;
use super::types::CriterionId;
use crate::api::ApiError;

#[derive(Debug, Error)]
pub enum WeightingError {
    /// Local gate; no request was sent.
    #[error("{0}")]
    BudgetExceeded(BudgetExceeded),

    /// Local gate; no request was sent.
    #[error("invalid input: {}", join(.0))]
    InvalidDraft(Vec<FieldError>),

    #[error("criterion {0} is not part of this course's evaluation template")]
    UnknownCriterion(CriterionId),

    #[error("weightings have not been loaded yet")]
    NotLoaded,

    /// Another mutation is still outstanding.
    #[error("another change is still being saved")]
    Busy,

    #[error("no active course selected")]
    NoActiveCourse,

    #[error(transparent)]
    Api(#[from] ApiError),
}

fn join(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl WeightingError {
    /// Whether the error was raised before anything reached the network.
    pub fn is_local(&self) -> bool {
        !matches!(self, Self::Api(_))
    }
}

impl From<BudgetExceeded> for WeightingError {
    fn from(err: BudgetExceeded) -> Self {
        Self::BudgetExceeded(err)
    }
}
