//! Submission checks for change orders.
//!
//! Validation never fails with an error type: it reports what is missing
//! and leaves the decision to block a transition to the caller.

use serde::{Deserialize, Serialize};

use crate::models::{ChangeOrderRequest, CostCategory};

pub const TITLE_REQUIRED: &str = "Title is required.";
pub const SCOPE_REQUIRED: &str = "Scope of work is required.";
pub const LINE_ITEM_REQUIRED: &str = "At least one line item with a non-zero total is required.";

/// Outcome of a validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorValidation {
    pub valid: bool,
    /// Missing requirements, most actionable first.
    pub errors: Vec<String>,
}

impl CorValidation {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// The message to show the user, if any.
    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(String::as_str)
    }
}

/// Checks that a change order can move from draft to pending approval.
///
/// Requires a title, a scope of work and at least one line item (in any
/// category) whose total is not zero. Area, group and period are optional
/// organization and are not checked.
pub fn validate_cor(cor: &ChangeOrderRequest) -> CorValidation {
    let mut errors = Vec::new();

    if cor.title.trim().is_empty() {
        errors.push(TITLE_REQUIRED.to_string());
    }
    if cor.scope_of_work.trim().is_empty() {
        errors.push(SCOPE_REQUIRED.to_string());
    }

    let has_priced_line = CostCategory::ALL
        .iter()
        .flat_map(|c| cor.line_totals(*c))
        .any(|total| !total.is_zero());
    if !has_priced_line {
        errors.push(LINE_ITEM_REQUIRED.to_string());
    }

    CorValidation::from_errors(errors)
}

/// Checks the lighter bar for saving a draft: only a title is needed.
pub fn validate_draft(cor: &ChangeOrderRequest) -> CorValidation {
    if cor.title.trim().is_empty() {
        CorValidation::from_errors(vec![TITLE_REQUIRED.to_string()])
    } else {
        CorValidation::from_errors(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{Cents, MaterialItem, SubcontractorItem};

    fn submittable() -> ChangeOrderRequest {
        ChangeOrderRequest {
            title: "Extra outlets".to_string(),
            scope_of_work: "Add four duplex outlets in room 204".to_string(),
            change_order_subcontractors: vec![SubcontractorItem {
                company_name: "Bright Electric".to_string(),
                amount: Cents(45000),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn complete_cor_is_valid() {
        let result = validate_cor(&submittable());

        assert!(result.valid);
        assert!(result.errors.is_empty());
        assert_eq!(result.first_error(), None);
    }

    #[test]
    fn missing_title_is_reported_first() {
        let cor = ChangeOrderRequest {
            title: "   ".to_string(),
            scope_of_work: String::new(),
            ..submittable()
        };

        let result = validate_cor(&cor);

        assert!(!result.valid);
        assert_eq!(result.first_error(), Some(TITLE_REQUIRED));
        assert_eq!(result.errors, vec![TITLE_REQUIRED, SCOPE_REQUIRED]);
    }

    #[test]
    fn zero_total_lines_do_not_count() {
        let cor = ChangeOrderRequest {
            change_order_subcontractors: Vec::new(),
            change_order_materials: vec![MaterialItem {
                description: "Placeholder".to_string(),
                quantity: dec!(0),
                unit_cost: Cents(1500),
                ..Default::default()
            }],
            ..submittable()
        };

        let result = validate_cor(&cor);

        assert!(!result.valid);
        assert_eq!(result.first_error(), Some(LINE_ITEM_REQUIRED));
    }

    #[test]
    fn optional_organization_is_not_required() {
        let cor = ChangeOrderRequest {
            area: None,
            group_name: None,
            period_start: None,
            period_end: None,
            ..submittable()
        };

        assert!(validate_cor(&cor).valid);
    }

    #[test]
    fn draft_only_needs_a_title() {
        let cor = ChangeOrderRequest {
            title: "Rough idea".to_string(),
            ..Default::default()
        };

        assert!(validate_draft(&cor).valid);
        assert!(!validate_cor(&cor).valid);
        assert!(!validate_draft(&ChangeOrderRequest::default()).valid);
    }
}
