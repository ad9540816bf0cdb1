//! Criteria weightings for a course: loading, nesting, and the point-budget
//! gate in front of every sub-criterion write.

mod aggregator;
pub mod budget;
mod draft;
mod error;
mod snapshot;
mod types;

use async_trait::async_trait;

use crate::api::ApiError;

pub use aggregator::WeightingAggregator;
pub use budget::BudgetExceeded;
pub use draft::{CriterionDraft, Field, FieldError, Rule};
pub use error::WeightingError;
pub use snapshot::{CriterionWeighting, WeightingSnapshot, WeightingView};
pub use types::{
    Course, CourseCriterion, CourseId, Criterion, CriterionId, CriterionPayload,
    EvaluationTemplate, ItemId, ItemKind, SpecialCriterion, SubCriterion,
};

/// Backend operations the aggregator depends on.
#[async_trait]
pub trait WeightingBackend: Send + Sync {
    /// Criteria of the evaluation template assigned to `course`.
    async fn fetch_criteria(&self, course: CourseId) -> Result<Vec<Criterion>, ApiError>;

    async fn list_items(
        &self,
        kind: ItemKind,
        course: CourseId,
    ) -> Result<Vec<CourseCriterion>, ApiError>;

    async fn create_item(
        &self,
        kind: ItemKind,
        payload: &CriterionPayload,
    ) -> Result<CourseCriterion, ApiError>;

    /// Full replace of an existing item.
    async fn update_item(
        &self,
        kind: ItemKind,
        id: ItemId,
        payload: &CriterionPayload,
    ) -> Result<CourseCriterion, ApiError>;

    async fn delete_item(&self, kind: ItemKind, id: ItemId) -> Result<(), ApiError>;
}
