use rust_decimal::Decimal;
use std::fmt;
use strum::Display;

use super::types::{CourseId, CriterionId, CriterionPayload};

/// Form input for a sub-criterion or special criterion, before the course is
/// attached.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CriterionDraft {
    pub name: String,
    pub percentage: Option<Decimal>,
    pub parent_criterion: Option<CriterionId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Field {
    #[strum(serialize = "name")]
    Name,
    #[strum(serialize = "percentage")]
    Percentage,
    #[strum(serialize = "parent_criterion")]
    ParentCriterion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Required,
    NonNegative,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub rule: Rule,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rule {
            Rule::Required => write!(f, "{} is required", self.field),
            Rule::NonNegative => write!(f, "{} must be zero or greater", self.field),
        }
    }
}

struct Constraint {
    field: Field,
    rule: Rule,
    holds: fn(&CriterionDraft) -> bool,
}

fn has_name(d: &CriterionDraft) -> bool {
    !d.name.trim().is_empty()
}

fn has_percentage(d: &CriterionDraft) -> bool {
    d.percentage.is_some()
}

fn percentage_non_negative(d: &CriterionDraft) -> bool {
    !matches!(d.percentage, Some(p) if p < Decimal::ZERO)
}

fn has_parent(d: &CriterionDraft) -> bool {
    d.parent_criterion.is_some()
}

const CONSTRAINTS: &[Constraint] = &[
    Constraint {
        field: Field::Name,
        rule: Rule::Required,
        holds: has_name,
    },
    Constraint {
        field: Field::Percentage,
        rule: Rule::Required,
        holds: has_percentage,
    },
    Constraint {
        field: Field::Percentage,
        rule: Rule::NonNegative,
        holds: percentage_non_negative,
    },
    Constraint {
        field: Field::ParentCriterion,
        rule: Rule::Required,
        holds: has_parent,
    },
];

impl CriterionDraft {
    pub fn new(name: impl Into<String>, percentage: Decimal, parent_criterion: CriterionId) -> Self {
        Self {
            name: name.into(),
            percentage: Some(percentage),
            parent_criterion: Some(parent_criterion),
        }
    }

    pub fn validate(&self) -> Vec<FieldError> {
        CONSTRAINTS
            .iter()
            .filter(|c| !(c.holds)(self))
            .map(|c| FieldError {
                field: c.field,
                rule: c.rule.clone(),
            })
            .collect()
    }

    /// Checks every constraint and binds the draft to `course`.
    pub fn into_payload(self, course: CourseId) -> Result<CriterionPayload, Vec<FieldError>> {
        let errors = self.validate();
        match (self.percentage, self.parent_criterion) {
            (Some(percentage), Some(parent_criterion)) if errors.is_empty() => {
                Ok(CriterionPayload {
                    name: self.name.trim().to_string(),
                    percentage,
                    course,
                    parent_criterion,
                })
            }
            _ => Err(errors),
        }
    }
}
