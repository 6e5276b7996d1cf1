use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{BasisPoints, Cents};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawStatus {
    #[default]
    Draft,
    Submitted,
    Approved,
    Paid,
}

impl DrawStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::Approved => "approved",
            Self::Paid => "paid",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "submitted" => Some(Self::Submitted),
            "approved" => Some(Self::Approved),
            "paid" => Some(Self::Paid),
            _ => None,
        }
    }
}

impl fmt::Display for DrawStatus {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One priced line of the contract's schedule of values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleOfValuesLine {
    pub id: i64,
    pub line_number: u32,
    pub description: String,
    pub area: Option<String>,
    pub scheduled_value: Cents,
}

/// A schedule-of-values line as billed in one draw request.
///
/// `previous_*` is everything billed in earlier draws; `current_*` is what
/// this draw bills. `previous_percent + current_percent` never exceeds
/// 100% because the current percent is clamped when it is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SovItem {
    pub id: i64,
    pub line_number: u32,
    pub description: String,
    pub area: Option<String>,
    pub scheduled_value: Cents,

    pub previous_percent: BasisPoints,
    pub previous_amount: Cents,

    /// Raw text the user typed for this period, kept for redisplay.
    pub current_percent_input: Option<String>,
    pub current_percent: BasisPoints,
    pub current_amount: Cents,
}

impl From<&ScheduleOfValuesLine> for SovItem {
    fn from(line: &ScheduleOfValuesLine) -> Self {
        Self {
            id: line.id,
            line_number: line.line_number,
            description: line.description.clone(),
            area: line.area.clone(),
            scheduled_value: line.scheduled_value,
            ..Default::default()
        }
    }
}

/// One billing period of a project (a pay application).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRequest {
    pub id: i64,
    pub project_id: i64,
    pub draw_number: u32,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub retention_percent: BasisPoints,
    /// Total retention held through the prior draw.
    pub previous_retention: Cents,
    pub status: DrawStatus,
    pub items: Vec<SovItem>,
}
