//! Point-budget arithmetic for criteria and their regular sub-criteria.
//!
//! All sums use `Decimal`, so "10" and "9" compare as numbers and repeated
//! additions of values like 0.1 stay exact.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::fmt;

use super::types::{CourseCriterion, Criterion, CriterionId, ItemId};

/// Rejected create/update: the criterion's total would exceed its weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetExceeded {
    pub criterion: CriterionId,
    /// Total of the criterion's other sub-criteria.
    pub current_total: Decimal,
    pub attempted: Decimal,
    pub limit: Decimal,
}

impl BudgetExceeded {
    pub fn resulting_total(&self) -> Decimal {
        self.current_total.saturating_add(self.attempted)
    }
}

impl fmt::Display for BudgetExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sub-criteria of criterion {} would total {} points but the limit is {} (current total {}, new value {})",
            self.criterion,
            self.resulting_total().normalize(),
            self.limit.normalize(),
            self.current_total.normalize(),
            self.attempted.normalize()
        )
    }
}

/// Saturates at `Decimal::MAX`/`Decimal::MIN` instead of overflowing.
pub fn total_for<'a>(
    items: impl IntoIterator<Item = &'a CourseCriterion>,
    criterion: CriterionId,
) -> Decimal {
    items
        .into_iter()
        .filter(|item| item.parent_criterion == criterion)
        .fold(Decimal::ZERO, |total, item| {
            total.saturating_add(item.percentage)
        })
}

fn total_excluding(
    items: &[CourseCriterion],
    criterion: CriterionId,
    excluding: Option<ItemId>,
) -> Decimal {
    total_for(
        items.iter().filter(|item| Some(item.id) != excluding),
        criterion,
    )
}

/// Passes when `total(others) + candidate <= weight`. With `excluding` set,
/// that item's stored value is left out first, so re-saving an unchanged
/// item never trips the gate on its own contribution. A sum that overflows
/// `Decimal` counts as over the limit.
pub fn check_budget(
    criterion: &Criterion,
    sub_criteria: &[CourseCriterion],
    candidate: Decimal,
    excluding: Option<ItemId>,
) -> Result<(), BudgetExceeded> {
    let current_total = total_excluding(sub_criteria, criterion.id, excluding);
    let within = current_total
        .checked_add(candidate)
        .is_some_and(|total| total <= criterion.weight);
    if !within {
        return Err(BudgetExceeded {
            criterion: criterion.id,
            current_total,
            attempted: candidate,
            limit: criterion.weight,
        });
    }
    Ok(())
}

/// `total / weight * 100`, unclamped. A zero or negative weight yields `0.0`.
pub fn progress_percent(total: Decimal, weight: Decimal) -> f64 {
    if weight <= Decimal::ZERO {
        return 0.0;
    }
    match total
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(weight))
    {
        Some(percent) => percent.to_f64().unwrap_or(0.0),
        None => match (total.to_f64(), weight.to_f64()) {
            (Some(total), Some(weight)) => total / weight * 100.0,
            _ => 0.0,
        },
    }
}

pub fn remaining(total: Decimal, weight: Decimal) -> Decimal {
    weight.saturating_sub(total)
}
