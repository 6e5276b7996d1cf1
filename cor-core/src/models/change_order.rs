use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{
    BasisPoints, Cents, CostCategory, EquipmentItem, LaborItem, LineItem, MaterialItem,
    SubcontractorItem,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorStatus {
    #[default]
    Draft,
    PendingApproval,
    Approved,
    Rejected,
    Billed,
    Closed,
}

impl CorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::PendingApproval => "pending_approval",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Billed => "billed",
            Self::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "pending_approval" => Some(Self::PendingApproval),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "billed" => Some(Self::Billed),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

impl fmt::Display for CorStatus {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A change order request as handed over by the form or persistence layer.
///
/// Rate fields are optional: `None` means "not set" and resolves to the
/// default table, while `Some(BasisPoints(0))` is an explicit zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangeOrderRequest {
    pub id: i64,
    pub project_id: i64,
    pub cor_number: String,
    pub title: String,
    pub description: String,
    pub scope_of_work: String,

    // Optional organization, never required to submit
    pub area: Option<String>,
    pub group_name: Option<String>,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,

    // Markup rates
    pub labor_markup_percent: Option<BasisPoints>,
    pub materials_markup_percent: Option<BasisPoints>,
    pub equipment_markup_percent: Option<BasisPoints>,
    pub subcontractors_markup_percent: Option<BasisPoints>,

    // Fee rates
    pub liability_insurance_percent: Option<BasisPoints>,
    pub bond_percent: Option<BasisPoints>,
    pub license_fee_percent: Option<BasisPoints>,

    // Line items
    pub change_order_labor: Vec<LaborItem>,
    pub change_order_materials: Vec<MaterialItem>,
    pub change_order_equipment: Vec<EquipmentItem>,
    pub change_order_subcontractors: Vec<SubcontractorItem>,

    // Lifecycle
    pub status: CorStatus,
    pub submitted_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub billed_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl ChangeOrderRequest {
    /// Line totals for one category, in stored order.
    pub fn line_totals(
        &self,
        category: CostCategory,
    ) -> Vec<Cents> {
        match category {
            CostCategory::Labor => self.change_order_labor.iter().map(LaborItem::total).collect(),
            CostCategory::Materials => self
                .change_order_materials
                .iter()
                .map(MaterialItem::total)
                .collect(),
            CostCategory::Equipment => self
                .change_order_equipment
                .iter()
                .map(EquipmentItem::total)
                .collect(),
            CostCategory::Subcontractors => self
                .change_order_subcontractors
                .iter()
                .map(SubcontractorItem::total)
                .collect(),
        }
    }

    /// Number of line items across all four categories.
    pub fn line_item_count(&self) -> usize {
        self.change_order_labor.len()
            + self.change_order_materials.len()
            + self.change_order_equipment.len()
            + self.change_order_subcontractors.len()
    }

    /// Adds a line item to the collection matching its category.
    pub fn push_line_item(
        &mut self,
        item: LineItem,
    ) {
        match item {
            LineItem::Labor(item) => self.change_order_labor.push(item),
            LineItem::Material(item) => self.change_order_materials.push(item),
            LineItem::Equipment(item) => self.change_order_equipment.push(item),
            LineItem::Subcontractor(item) => self.change_order_subcontractors.push(item),
        }
    }
}
