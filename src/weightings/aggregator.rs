use arc_swap::ArcSwapOption;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

use super::draft::CriterionDraft;
use super::error::WeightingError;
use super::snapshot::{WeightingSnapshot, WeightingView};
use super::types::{CourseCriterion, CourseId, CriterionId, ItemId, ItemKind};
use super::WeightingBackend;
use crate::api::ApiError;
use crate::session::Session;

/// Weighting screen state for one course.
///
/// Reads go through an immutable [`WeightingSnapshot`] swapped in as a whole
/// after each successful load. Writes are submitted one at a time and always
/// followed by a full reload; local collections are never patched.
pub struct WeightingAggregator<B> {
    backend: B,
    course: CourseId,
    snapshot: ArcSwapOption<WeightingSnapshot>,
    in_flight: AtomicBool,
}

struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn logged<T>(
    collection: &'static str,
    course: CourseId,
    result: Result<T, ApiError>,
) -> Result<T, ApiError> {
    if let Err(e) = &result {
        warn!(course, collection, code = e.code(), error = %e, "failed to load");
    }
    result
}

impl<B: WeightingBackend> WeightingAggregator<B> {
    pub fn new(backend: B, course: CourseId) -> Self {
        Self {
            backend,
            course,
            snapshot: ArcSwapOption::empty(),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn for_session(backend: B, session: &Session) -> Result<Self, WeightingError> {
        let course = session
            .active_course
            .ok_or(WeightingError::NoActiveCourse)?;
        Ok(Self::new(backend, course))
    }

    pub fn course(&self) -> CourseId {
        self.course
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn snapshot(&self) -> Option<Arc<WeightingSnapshot>> {
        self.snapshot.load_full()
    }

    pub fn is_saving(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn loaded(&self) -> Result<Arc<WeightingSnapshot>, WeightingError> {
        self.snapshot().ok_or(WeightingError::NotLoaded)
    }

    /// Fetches criteria, sub-criteria and special criteria concurrently. The
    /// snapshot is replaced only if all three reads succeed; otherwise the
    /// previous one stays and the first failure is returned.
    pub async fn load_all(&self) -> Result<Arc<WeightingSnapshot>, WeightingError> {
        let course = self.course;
        let (criteria, sub_criteria, special_criteria) = tokio::join!(
            self.backend.fetch_criteria(course),
            self.backend.list_items(ItemKind::Sub, course),
            self.backend.list_items(ItemKind::Special, course),
        );

        let criteria = logged("criteria", course, criteria);
        let sub_criteria = logged("sub-criteria", course, sub_criteria);
        let special_criteria = logged("special criteria", course, special_criteria);

        let snapshot = Arc::new(WeightingSnapshot {
            course,
            criteria: criteria?,
            sub_criteria: sub_criteria?,
            special_criteria: special_criteria?,
        });
        self.snapshot.store(Some(snapshot.clone()));
        Ok(snapshot)
    }

    /// Sum of the criterion's sub-criteria points; zero when none are loaded.
    pub fn compute_criterion_total(&self, criterion: CriterionId) -> Decimal {
        self.snapshot()
            .map(|s| s.criterion_total(criterion))
            .unwrap_or(Decimal::ZERO)
    }

    /// Percent of the criterion's weight in use; zero for unknown criteria and
    /// zero weights.
    pub fn progress(&self, criterion: CriterionId) -> f64 {
        self.snapshot()
            .and_then(|s| s.progress(criterion))
            .unwrap_or(0.0)
    }

    pub fn validate_sub_criterion(
        &self,
        criterion: CriterionId,
        candidate: Decimal,
        excluding: Option<ItemId>,
    ) -> Result<(), WeightingError> {
        let snapshot = self.loaded()?;
        match snapshot.check_sub_criterion(criterion, candidate, excluding) {
            None => Err(WeightingError::UnknownCriterion(criterion)),
            Some(Err(exceeded)) => {
                info!(
                    course = self.course,
                    criterion,
                    current = %exceeded.current_total,
                    attempted = %exceeded.attempted,
                    limit = %exceeded.limit,
                    "sub-criterion rejected by budget"
                );
                Err(exceeded.into())
            }
            Some(Ok(())) => Ok(()),
        }
    }

    pub fn view(&self) -> Option<WeightingView> {
        self.snapshot().map(|s| s.view())
    }

    /// Creates a sub-criterion, or fully replaces `existing`, after the draft
    /// and the criterion's point budget both check out.
    pub async fn upsert_sub_criterion(
        &self,
        draft: CriterionDraft,
        existing: Option<ItemId>,
    ) -> Result<CourseCriterion, WeightingError> {
        self.upsert(ItemKind::Sub, draft, existing).await
    }

    pub async fn delete_sub_criterion(&self, id: ItemId) -> Result<(), WeightingError> {
        self.delete(ItemKind::Sub, id).await
    }

    /// Same as [`Self::upsert_sub_criterion`] without the budget gate.
    pub async fn upsert_special_criterion(
        &self,
        draft: CriterionDraft,
        existing: Option<ItemId>,
    ) -> Result<CourseCriterion, WeightingError> {
        self.upsert(ItemKind::Special, draft, existing).await
    }

    pub async fn delete_special_criterion(&self, id: ItemId) -> Result<(), WeightingError> {
        self.delete(ItemKind::Special, id).await
    }

    fn begin(&self) -> Result<InFlight<'_>, WeightingError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| InFlight(&self.in_flight))
            .map_err(|_| WeightingError::Busy)
    }

    async fn upsert(
        &self,
        kind: ItemKind,
        draft: CriterionDraft,
        existing: Option<ItemId>,
    ) -> Result<CourseCriterion, WeightingError> {
        let _guard = self.begin()?;

        let payload = draft
            .into_payload(self.course)
            .map_err(WeightingError::InvalidDraft)?;

        if kind.is_capped() {
            self.validate_sub_criterion(payload.parent_criterion, payload.percentage, existing)?;
        }

        let result = match existing {
            Some(id) => self.backend.update_item(kind, id, &payload).await,
            None => self.backend.create_item(kind, &payload).await,
        };
        let saved = result.inspect_err(|e| {
            warn!(course = self.course, %kind, code = e.code(), error = %e, "save failed");
        })?;

        info!(
            course = self.course,
            %kind,
            id = saved.id,
            points = %saved.percentage,
            created = existing.is_none(),
            "saved"
        );
        self.refresh().await;
        Ok(saved)
    }

    async fn delete(&self, kind: ItemKind, id: ItemId) -> Result<(), WeightingError> {
        let _guard = self.begin()?;

        self.backend.delete_item(kind, id).await.inspect_err(|e| {
            warn!(course = self.course, %kind, id, code = e.code(), error = %e, "delete failed");
        })?;

        info!(course = self.course, %kind, id, "deleted");
        self.refresh().await;
        Ok(())
    }

    /// Reload after a successful write. A failed reload keeps the previous
    /// snapshot; the write itself already succeeded.
    async fn refresh(&self) {
        if self.load_all().await.is_err() {
            warn!(course = self.course, "showing stale weightings until the next load");
        }
    }
}
