use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::Display;

pub type CourseId = i64;
pub type CriterionId = i64;
pub type ItemId = i64;

/// Top-level graded category defined by an evaluation template. `weight` is
/// the point budget shared by its regular sub-criteria.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub id: CriterionId,
    pub name: String,
    pub weight: Decimal,
}

/// A graded item attached to a criterion for one course. `percentage` holds
/// points added to the criterion's total, not a share of 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseCriterion {
    pub id: ItemId,
    pub name: String,
    pub percentage: Decimal,
    pub parent_criterion: CriterionId,
    pub course: CourseId,
}

/// Regular item, capped by its parent's weight.
pub type SubCriterion = CourseCriterion;
/// Bonus item, exempt from the cap.
pub type SpecialCriterion = CourseCriterion;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Course {
    pub id: CourseId,
    #[serde(default)]
    pub name: Option<String>,
    pub evaluation_template: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EvaluationTemplate {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    pub criteria: Vec<Criterion>,
}

/// The two per-course collections the weighting screen edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ItemKind {
    #[strum(serialize = "sub-criterion")]
    Sub,
    #[strum(serialize = "special criterion")]
    Special,
}

impl ItemKind {
    pub fn resource(&self) -> &'static str {
        match self {
            ItemKind::Sub => "course-sub-criteria",
            ItemKind::Special => "course-special-criteria",
        }
    }

    pub fn is_capped(&self) -> bool {
        matches!(self, ItemKind::Sub)
    }
}

/// Wire body for create and full-replace requests.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionPayload {
    pub name: String,
    pub percentage: Decimal,
    pub course: CourseId,
    pub parent_criterion: CriterionId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_decimal_fields_accept_strings_and_numbers() {
        let from_string: SubCriterion = serde_json::from_value(json!({
            "id": 1, "name": "Quizzes", "percentage": "12.50",
            "parent_criterion": 3, "course": 7
        }))
        .unwrap();
        let from_number: SubCriterion = serde_json::from_value(json!({
            "id": 1, "name": "Quizzes", "percentage": 12.5,
            "parent_criterion": 3, "course": 7
        }))
        .unwrap();
        assert_eq!(from_string.percentage, dec!(12.5));
        assert_eq!(from_number.percentage, dec!(12.5));
    }

    #[test]
    fn test_numeric_not_string_ordering() {
        let ten: Criterion =
            serde_json::from_value(json!({"id": 1, "name": "a", "weight": "10"})).unwrap();
        let nine: Criterion =
            serde_json::from_value(json!({"id": 2, "name": "b", "weight": "9"})).unwrap();
        assert!(ten.weight > nine.weight);
    }

    #[test]
    fn test_item_kind_resources() {
        assert_eq!(ItemKind::Sub.resource(), "course-sub-criteria");
        assert_eq!(ItemKind::Special.resource(), "course-special-criteria");
        assert!(ItemKind::Sub.is_capped());
        assert!(!ItemKind::Special.is_capped());
        assert_eq!(ItemKind::Special.to_string(), "special criterion");
    }
}
