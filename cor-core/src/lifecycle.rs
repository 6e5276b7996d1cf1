//! Change order status machine and the write gate built on it.
//!
//! ```text
//! draft ──submit──▶ pending_approval ──approve──▶ approved ──mark billed──▶ billed ──close──▶ closed
//!                          │
//!                          └──reject──▶ rejected ──reopen──▶ draft
//! ```
//!
//! Line items and rates may change while a COR is draft, pending approval,
//! approved or rejected. Once billed or closed, recomputed totals must not be
//! written back; [`prepare_totals_write`] is the single check callers go
//! through before persisting totals.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::{CorTotals, calculate_cor_totals};
use crate::models::{ChangeOrderRequest, CorStatus};
use crate::validation::{validate_cor, validate_draft};

/// Named reasons a lifecycle operation is refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("cannot move change order from {from} to {to}")]
    IllegalTransition { from: CorStatus, to: CorStatus },

    #[error("change order is not ready to submit: {}", .0.join(" "))]
    ValidationFailed(Vec<String>),

    #[error("change order is {0} and can no longer be edited")]
    NotEditable(CorStatus),

    #[error("a title is required to save a draft")]
    MissingTitle,
}

/// A requested status change.
///
/// Authorization is decided by the caller; the expected actor is noted
/// on each variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Preparer sends a draft for approval.
    Submit,
    /// Reviewer accepts a pending COR.
    Approve,
    /// Reviewer turns down a pending COR. The reason may be empty.
    Reject { reason: String },
    /// Office marks an approved COR as billed. Irreversible.
    MarkBilled,
    /// Office closes a billed COR.
    Close,
}

impl Transition {
    /// Status the COR ends up in when the transition succeeds.
    pub fn target(&self) -> CorStatus {
        match self {
            Self::Submit => CorStatus::PendingApproval,
            Self::Approve => CorStatus::Approved,
            Self::Reject { .. } => CorStatus::Rejected,
            Self::MarkBilled => CorStatus::Billed,
            Self::Close => CorStatus::Closed,
        }
    }

    /// Status the COR must be in for the transition to apply.
    pub fn source(&self) -> CorStatus {
        match self {
            Self::Submit => CorStatus::Draft,
            Self::Approve | Self::Reject { .. } => CorStatus::PendingApproval,
            Self::MarkBilled => CorStatus::Approved,
            Self::Close => CorStatus::Billed,
        }
    }
}

/// Whether line items and rates may still change in `status`.
pub fn is_editable(status: CorStatus) -> bool {
    !matches!(status, CorStatus::Billed | CorStatus::Closed)
}

/// Refuses edits to billed or closed change orders.
pub fn ensure_editable(status: CorStatus) -> Result<(), LifecycleError> {
    if is_editable(status) {
        Ok(())
    } else {
        Err(LifecycleError::NotEditable(status))
    }
}

/// Applies `transition` and returns the updated change order.
///
/// The input is left untouched. `at` stamps `submitted_at`, `approved_at`,
/// `billed_at` or `closed_at` as appropriate.
///
/// # Errors
///
/// * [`LifecycleError::IllegalTransition`] when the COR is not in the
///   transition's source status.
/// * [`LifecycleError::ValidationFailed`] when submitting a COR that does
///   not pass [`validate_cor`].
pub fn apply_transition(
    cor: &ChangeOrderRequest,
    transition: Transition,
    at: DateTime<Utc>,
) -> Result<ChangeOrderRequest, LifecycleError> {
    let from = cor.status;
    let to = transition.target();

    if from != transition.source() {
        warn!(cor_number = %cor.cor_number, %from, %to, "rejected status transition");
        return Err(LifecycleError::IllegalTransition { from, to });
    }

    let mut next = cor.clone();
    match transition {
        Transition::Submit => {
            let validation = validate_cor(cor);
            if !validation.valid {
                return Err(LifecycleError::ValidationFailed(validation.errors));
            }
            next.submitted_at = Some(at);
        }
        Transition::Approve => {
            next.approved_at = Some(at);
            next.rejection_reason = None;
        }
        Transition::Reject { reason } => {
            next.rejection_reason = Some(reason);
        }
        Transition::MarkBilled => {
            next.billed_at = Some(at);
        }
        Transition::Close => {
            next.closed_at = Some(at);
        }
    }
    next.status = to;

    debug!(cor_number = %cor.cor_number, %from, %to, "status transition applied");
    Ok(next)
}

/// Re-opens a rejected change order for editing as a draft.
///
/// The rejection reason is kept so the preparer can see what to fix.
pub fn reopen_rejected(cor: &ChangeOrderRequest) -> Result<ChangeOrderRequest, LifecycleError> {
    if cor.status != CorStatus::Rejected {
        return Err(LifecycleError::IllegalTransition {
            from: cor.status,
            to: CorStatus::Draft,
        });
    }

    let mut next = cor.clone();
    next.status = CorStatus::Draft;
    next.submitted_at = None;
    Ok(next)
}

/// Checks that a change order may be saved as a draft.
pub fn ensure_draft_savable(cor: &ChangeOrderRequest) -> Result<(), LifecycleError> {
    ensure_editable(cor.status)?;
    if validate_draft(cor).valid {
        Ok(())
    } else {
        Err(LifecycleError::MissingTitle)
    }
}

/// Recomputes totals for a persisted write.
///
/// This is the gate the persistence path goes through: a billed or closed
/// change order is refused instead of having its cached totals rewritten.
pub fn prepare_totals_write(cor: &ChangeOrderRequest) -> Result<CorTotals, LifecycleError> {
    ensure_editable(cor.status)?;
    Ok(calculate_cor_totals(cor))
}
