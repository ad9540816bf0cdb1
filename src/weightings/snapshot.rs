use rust_decimal::Decimal;
use std::collections::HashSet;

use super::budget::{self, BudgetExceeded};
use super::types::{
    CourseCriterion, CourseId, Criterion, CriterionId, ItemId, ItemKind, SpecialCriterion,
    SubCriterion,
};

/// The three collections from one successful load. Never mutated; a reload
/// replaces it as a whole.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeightingSnapshot {
    pub course: CourseId,
    pub criteria: Vec<Criterion>,
    pub sub_criteria: Vec<SubCriterion>,
    pub special_criteria: Vec<SpecialCriterion>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CriterionWeighting {
    pub criterion: Criterion,
    pub sub_criteria: Vec<SubCriterion>,
    pub special_criteria: Vec<SpecialCriterion>,
    pub total: Decimal,
    pub special_total: Decimal,
    pub remaining: Decimal,
    /// Percent of the weight used; may exceed 100 if the backend already
    /// holds more points than the weight allows.
    pub progress: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeightingView {
    pub course: CourseId,
    pub criteria: Vec<CriterionWeighting>,
    /// Items whose parent criterion is not part of the course's template.
    pub unassigned: Vec<(ItemKind, CourseCriterion)>,
}

impl WeightingSnapshot {
    pub fn criterion(&self, id: CriterionId) -> Option<&Criterion> {
        self.criteria.iter().find(|c| c.id == id)
    }

    pub fn items(&self, kind: ItemKind) -> &[CourseCriterion] {
        match kind {
            ItemKind::Sub => &self.sub_criteria,
            ItemKind::Special => &self.special_criteria,
        }
    }

    pub fn criterion_total(&self, criterion: CriterionId) -> Decimal {
        budget::total_for(&self.sub_criteria, criterion)
    }

    pub fn special_total(&self, criterion: CriterionId) -> Decimal {
        budget::total_for(&self.special_criteria, criterion)
    }

    /// `None` when the criterion is unknown.
    pub fn progress(&self, criterion: CriterionId) -> Option<f64> {
        self.criterion(criterion)
            .map(|c| budget::progress_percent(self.criterion_total(c.id), c.weight))
    }

    /// `None` when the criterion is not in this snapshot.
    pub fn check_sub_criterion(
        &self,
        criterion: CriterionId,
        candidate: Decimal,
        excluding: Option<ItemId>,
    ) -> Option<Result<(), BudgetExceeded>> {
        self.criterion(criterion)
            .map(|c| budget::check_budget(c, &self.sub_criteria, candidate, excluding))
    }

    pub fn view(&self) -> WeightingView {
        let criteria = self
            .criteria
            .iter()
            .map(|criterion| {
                let sub_criteria = children(&self.sub_criteria, criterion.id);
                let special_criteria = children(&self.special_criteria, criterion.id);
                let total = self.criterion_total(criterion.id);
                CriterionWeighting {
                    criterion: criterion.clone(),
                    special_total: self.special_total(criterion.id),
                    remaining: budget::remaining(total, criterion.weight),
                    progress: budget::progress_percent(total, criterion.weight),
                    total,
                    sub_criteria,
                    special_criteria,
                }
            })
            .collect();

        let known: HashSet<CriterionId> = self.criteria.iter().map(|c| c.id).collect();
        let unassigned = [ItemKind::Sub, ItemKind::Special]
            .into_iter()
            .flat_map(|kind| {
                self.items(kind)
                    .iter()
                    .filter(|item| !known.contains(&item.parent_criterion))
                    .map(move |item| (kind, item.clone()))
            })
            .collect();

        WeightingView {
            course: self.course,
            criteria,
            unassigned,
        }
    }
}

fn children(items: &[CourseCriterion], parent: CriterionId) -> Vec<CourseCriterion> {
    items
        .iter()
        .filter(|item| item.parent_criterion == parent)
        .cloned()
        .collect()
}
