//! Percentage-of-completion billing for draw requests (AIA G702/G703 style).
//!
//! # Per item
//!
//! | Step | Figure            | Rule                                                  |
//! |------|-------------------|-------------------------------------------------------|
//! | 1    | current percent   | clamp(input, 0, 100% − previous percent)              |
//! | 2    | current amount    | round(scheduled value × current percent / 10000)      |
//!
//! # Per draw
//!
//! | Step | Figure                   | Rule                                        |
//! |------|--------------------------|---------------------------------------------|
//! | 3    | completed total          | Σ previous amount + Σ current amount        |
//! | 4    | total retention          | round(completed total × retention / 10000)  |
//! | 4    | current retention change | total retention − previous retention        |
//! | 5    | payment due              | current total − current retention change    |
//! | 6    | balance to finish        | scheduled total − completed total           |
//!
//! Over-entry is clamped, not rejected. Payment due is returned as is, even
//! when negative.
//!
//! # History
//!
//! Draws are numbered 1, 2, 3, … per project. A new draw's previous figures
//! are the prior draw's previous plus current figures, and its previous
//! retention is the prior draw's total retention.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::money::percent_to_basis_points;
use crate::models::units::{BASIS_POINTS_PER_WHOLE, div_round_half_away};
use crate::models::{
    BasisPoints, Cents, DrawRequest, DrawStatus, ScheduleOfValuesLine, SovItem,
};

/// Breaks in a project's draw history.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DrawChainError {
    #[error("expected draw number {expected}, found {found}")]
    NonSequential { expected: u32, found: u32 },

    #[error(
        "draw {draw_number} item {item_id}: previous percent {found} does not match prior cumulative {expected}"
    )]
    PreviousPercentMismatch {
        draw_number: u32,
        item_id: i64,
        expected: BasisPoints,
        found: BasisPoints,
    },

    #[error(
        "draw {draw_number} item {item_id}: previous amount {found} does not match prior cumulative {expected}"
    )]
    PreviousAmountMismatch {
        draw_number: u32,
        item_id: i64,
        expected: Cents,
        found: Cents,
    },

    #[error(
        "draw {draw_number}: previous retention {found} does not match prior total retention {expected}"
    )]
    PreviousRetentionMismatch {
        draw_number: u32,
        expected: Cents,
        found: Cents,
    },

    #[error("draw {draw_number}: item {item_id} from the prior draw is missing")]
    MissingItem { draw_number: u32, item_id: i64 },
}

/// Aggregate figures of one draw request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawTotals {
    pub scheduled_total: Cents,
    pub previous_total: Cents,
    pub current_total: Cents,
    pub completed_total: Cents,
    /// Completed total over scheduled total; zero for an empty schedule.
    pub percent_complete: BasisPoints,
    pub retention_percent: BasisPoints,
    pub total_retention: Cents,
    pub previous_retention: Cents,
    pub current_retention_change: Cents,
    /// May be negative when new retention exceeds this period's billing.
    pub payment_due: Cents,
    pub balance_to_finish: Cents,
}

/// Caps a current-period percent so the item never exceeds 100%.
///
/// Negative input becomes zero. Input above the remaining share becomes the
/// remaining share.
pub fn clamp_current_percent(
    previous_percent: BasisPoints,
    input: BasisPoints,
) -> BasisPoints {
    let max_allowed = (BasisPoints::ONE_HUNDRED_PERCENT - previous_percent).max(BasisPoints::ZERO);
    input.max(BasisPoints::ZERO).min(max_allowed)
}

impl SovItem {
    /// Sets this period's percent, clamping it, and recomputes the amount.
    pub fn with_current_percent(
        &self,
        input: BasisPoints,
    ) -> SovItem {
        let current_percent = clamp_current_percent(self.previous_percent, input);
        if current_percent != input {
            warn!(
                item_id = self.id,
                input = input.0,
                clamped = current_percent.0,
                "current percent clamped"
            );
        }

        SovItem {
            current_percent,
            current_amount: self.scheduled_value.apply_rate(current_percent),
            ..self.clone()
        }
    }

    /// Sets this period's percent from user text such as `"30"` or `"12.5"`.
    ///
    /// Unparseable text counts as 0%. The raw text is kept in
    /// `current_percent_input`.
    pub fn with_current_percent_input(
        &self,
        input: &str,
    ) -> SovItem {
        SovItem {
            current_percent_input: Some(input.to_string()),
            ..self.with_current_percent(percent_to_basis_points(input))
        }
    }

    pub fn completed_percent(&self) -> BasisPoints {
        self.previous_percent + self.current_percent
    }

    pub fn completed_amount(&self) -> Cents {
        self.previous_amount + self.current_amount
    }

    pub fn balance_to_finish(&self) -> Cents {
        self.scheduled_value - self.completed_amount()
    }

    /// This item as it starts the following draw.
    fn carried_forward(&self) -> SovItem {
        SovItem {
            id: self.id,
            line_number: self.line_number,
            description: self.description.clone(),
            area: self.area.clone(),
            scheduled_value: self.scheduled_value,
            previous_percent: self.completed_percent(),
            previous_amount: self.completed_amount(),
            current_percent_input: None,
            current_percent: BasisPoints::ZERO,
            current_amount: Cents::ZERO,
        }
    }
}

/// Computes the aggregate figures of a draw request.
pub fn calculate_draw_totals(draw: &DrawRequest) -> DrawTotals {
    let scheduled_total: Cents = draw.items.iter().map(|i| i.scheduled_value).sum();
    let previous_total: Cents = draw.items.iter().map(|i| i.previous_amount).sum();
    let current_total: Cents = draw.items.iter().map(|i| i.current_amount).sum();
    let completed_total = previous_total + current_total;

    let total_retention = completed_total.apply_rate(draw.retention_percent);
    let current_retention_change = total_retention - draw.previous_retention;
    let payment_due = current_total - current_retention_change;

    let totals = DrawTotals {
        scheduled_total,
        previous_total,
        current_total,
        completed_total,
        percent_complete: percent_of(completed_total, scheduled_total),
        retention_percent: draw.retention_percent,
        total_retention,
        previous_retention: draw.previous_retention,
        current_retention_change,
        payment_due,
        balance_to_finish: scheduled_total - completed_total,
    };

    debug!(
        draw_number = draw.draw_number,
        current_total = current_total.0,
        total_retention = total_retention.0,
        payment_due = payment_due.0,
        "calculated draw totals"
    );

    totals
}

/// Next draw number for a project: highest existing number plus one,
/// starting at 1.
pub fn next_draw_number(draws: &[DrawRequest]) -> u32 {
    draws
        .iter()
        .map(|d| d.draw_number)
        .max()
        .unwrap_or(0)
        .saturating_add(1)
}

impl DrawRequest {
    /// Opens a project's first draw from its schedule of values.
    pub fn first(
        project_id: i64,
        period_start: NaiveDate,
        period_end: NaiveDate,
        retention_percent: BasisPoints,
        schedule: &[ScheduleOfValuesLine],
    ) -> Self {
        Self {
            id: 0,
            project_id,
            draw_number: 1,
            period_start,
            period_end,
            retention_percent,
            previous_retention: Cents::ZERO,
            status: DrawStatus::Draft,
            items: schedule.iter().map(SovItem::from).collect(),
        }
    }

    /// Opens the draw that follows `prior`, chaining every item's previous
    /// figures and the retention already held.
    pub fn next(
        prior: &DrawRequest,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Self {
        let prior_totals = calculate_draw_totals(prior);

        Self {
            id: 0,
            project_id: prior.project_id,
            draw_number: prior.draw_number.saturating_add(1),
            period_start,
            period_end,
            retention_percent: prior.retention_percent,
            previous_retention: prior_totals.total_retention,
            status: DrawStatus::Draft,
            items: prior.items.iter().map(SovItem::carried_forward).collect(),
        }
    }

    /// Adds schedule lines that are not yet billed in this draw (e.g. a
    /// change order added to the contract). New lines start at 0%.
    pub fn add_schedule_lines(
        &mut self,
        schedule: &[ScheduleOfValuesLine],
    ) {
        for line in schedule {
            if !self.items.iter().any(|i| i.id == line.id) {
                self.items.push(SovItem::from(line));
            }
        }
    }
}

/// Checks that a project's draws form an unbroken chain.
///
/// Draws may be passed in any order. Numbers must run 1, 2, 3, …; each
/// draw's previous figures must equal the prior draw's cumulative figures
/// item by item, and its previous retention the prior total retention.
/// Items absent from the prior draw must start at zero, and every prior
/// item must be carried forward.
///
/// # Errors
///
/// Returns the first [`DrawChainError`] found, walking draws in order.
pub fn verify_draw_chain(draws: &[DrawRequest]) -> Result<(), DrawChainError> {
    let mut ordered: Vec<&DrawRequest> = draws.iter().collect();
    ordered.sort_by_key(|d| d.draw_number);

    let mut prior: Option<&DrawRequest> = None;
    for (index, draw) in ordered.into_iter().enumerate() {
        let expected = u32::try_from(index).unwrap_or(u32::MAX).saturating_add(1);
        if draw.draw_number != expected {
            return Err(DrawChainError::NonSequential {
                expected,
                found: draw.draw_number,
            });
        }

        let expected_retention = prior
            .map(|p| calculate_draw_totals(p).total_retention)
            .unwrap_or(Cents::ZERO);
        if draw.previous_retention != expected_retention {
            return Err(DrawChainError::PreviousRetentionMismatch {
                draw_number: draw.draw_number,
                expected: expected_retention,
                found: draw.previous_retention,
            });
        }

        if let Some(missing) = prior
            .into_iter()
            .flat_map(|p| p.items.iter())
            .find(|p| !draw.items.iter().any(|i| i.id == p.id))
        {
            return Err(DrawChainError::MissingItem {
                draw_number: draw.draw_number,
                item_id: missing.id,
            });
        }

        for item in &draw.items {
            let prior_item = prior.and_then(|p| p.items.iter().find(|i| i.id == item.id));
            let (expected_percent, expected_amount) = prior_item
                .map(|p| (p.completed_percent(), p.completed_amount()))
                .unwrap_or((BasisPoints::ZERO, Cents::ZERO));

            if item.previous_percent != expected_percent {
                return Err(DrawChainError::PreviousPercentMismatch {
                    draw_number: draw.draw_number,
                    item_id: item.id,
                    expected: expected_percent,
                    found: item.previous_percent,
                });
            }
            if item.previous_amount != expected_amount {
                return Err(DrawChainError::PreviousAmountMismatch {
                    draw_number: draw.draw_number,
                    item_id: item.id,
                    expected: expected_amount,
                    found: item.previous_amount,
                });
            }
        }

        prior = Some(draw);
    }

    Ok(())
}

fn percent_of(
    part: Cents,
    whole: Cents,
) -> BasisPoints {
    if whole.is_zero() {
        return BasisPoints::ZERO;
    }
    let bp = div_round_half_away(
        i128::from(part.0) * i128::from(BASIS_POINTS_PER_WHOLE),
        i128::from(whole.0),
    );
    match i32::try_from(bp) {
        Ok(bp) => BasisPoints(bp),
        Err(_) if bp < 0 => BasisPoints(i32::MIN),
        Err(_) => BasisPoints(i32::MAX),
    }
}
