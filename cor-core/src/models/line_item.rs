use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::line_items::{calculate_labor_item_total, calculate_line_item_total};
use crate::models::Cents;

/// The four cost categories a change order is priced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostCategory {
    Labor,
    Materials,
    Equipment,
    Subcontractors,
}

impl CostCategory {
    pub const ALL: [CostCategory; 4] = [
        Self::Labor,
        Self::Materials,
        Self::Equipment,
        Self::Subcontractors,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Labor => "labor",
            Self::Materials => "materials",
            Self::Equipment => "equipment",
            Self::Subcontractors => "subcontractors",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "labor" => Some(Self::Labor),
            "material" | "materials" => Some(Self::Materials),
            "equipment" => Some(Self::Equipment),
            "subcontractor" | "subcontractors" => Some(Self::Subcontractors),
            _ => None,
        }
    }
}

/// Where a material, equipment or subcontractor price came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    BackupSheet,
    Invoice,
    Mobilization,
    #[default]
    Custom,
}

impl SourceType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "backup_sheet" | "backup sheet" => Some(Self::BackupSheet),
            "invoice" => Some(Self::Invoice),
            "mobilization" => Some(Self::Mobilization),
            "custom" | "" => Some(Self::Custom),
            _ => None,
        }
    }
}

/// Labor priced as regular plus overtime hours.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaborItem {
    pub labor_class: String,
    pub description: String,
    pub regular_hours: Decimal,
    pub overtime_hours: Decimal,
    /// Cents per regular hour.
    pub regular_rate: Cents,
    /// Cents per overtime hour.
    pub overtime_rate: Cents,
}

impl LaborItem {
    pub fn total(&self) -> Cents {
        calculate_labor_item_total(
            self.regular_hours,
            self.overtime_hours,
            self.regular_rate,
            self.overtime_rate,
        )
        .total
    }
}

/// Materials priced as quantity times unit cost.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialItem {
    pub description: String,
    pub quantity: Decimal,
    pub unit: String,
    pub unit_cost: Cents,
    pub source_type: SourceType,
}

impl MaterialItem {
    pub fn total(&self) -> Cents {
        calculate_line_item_total(self.quantity, self.unit_cost)
    }
}

/// Equipment priced as quantity (usually hours or days) times unit cost.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquipmentItem {
    pub description: String,
    pub quantity: Decimal,
    pub unit: String,
    pub unit_cost: Cents,
    pub source_type: SourceType,
}

impl EquipmentItem {
    pub fn total(&self) -> Cents {
        calculate_line_item_total(self.quantity, self.unit_cost)
    }
}

/// A subcontractor quote or invoice entered as a lump amount.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubcontractorItem {
    pub company_name: String,
    pub description: String,
    pub amount: Cents,
    pub source_type: SourceType,
}

impl SubcontractorItem {
    pub fn total(&self) -> Cents {
        self.amount
    }
}

/// A priced line of a change order, one variant per cost category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum LineItem {
    Labor(LaborItem),
    Material(MaterialItem),
    Equipment(EquipmentItem),
    Subcontractor(SubcontractorItem),
}

impl LineItem {
    pub fn category(&self) -> CostCategory {
        match self {
            Self::Labor(_) => CostCategory::Labor,
            Self::Material(_) => CostCategory::Materials,
            Self::Equipment(_) => CostCategory::Equipment,
            Self::Subcontractor(_) => CostCategory::Subcontractors,
        }
    }

    /// Line total in cents, derived from the item's own fields.
    pub fn total(&self) -> Cents {
        match self {
            Self::Labor(item) => item.total(),
            Self::Material(item) => item.total(),
            Self::Equipment(item) => item.total(),
            Self::Subcontractor(item) => item.total(),
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Self::Labor(item) => &item.description,
            Self::Material(item) => &item.description,
            Self::Equipment(item) => &item.description,
            Self::Subcontractor(item) => &item.description,
        }
    }
}
