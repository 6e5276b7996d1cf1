//! Workflows that combine the calculations with a [`BillingRepository`].
//!
//! The calculations themselves never touch storage; these functions load a
//! snapshot, run the pure engine on it and hand the result back to the
//! repository.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info};

use crate::calculations::{CorTotals, DrawChainError, next_draw_number, verify_draw_chain};
use crate::db::repository::{BillingRepository, RepositoryError};
use crate::lifecycle::{LifecycleError, prepare_totals_write};
use crate::models::{BasisPoints, DrawRequest};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),

    #[error("Draw history error: {0}")]
    DrawChain(#[from] DrawChainError),
}

/// Recomputes a change order's totals and stores them as its cache.
///
/// # Errors
///
/// * [`ServiceError::Lifecycle`] if the change order is billed or closed;
///   nothing is written in that case.
/// * [`ServiceError::Repository`] if loading or saving fails.
pub async fn recalculate_cor_totals<R: BillingRepository + ?Sized>(
    repo: &R,
    cor_id: i64,
) -> Result<CorTotals, ServiceError> {
    let cor = repo.get_change_order(cor_id).await?;
    let totals = prepare_totals_write(&cor)?;

    repo.save_change_order_totals(cor_id, &totals).await?;
    debug!(cor_id, cor_total = totals.cor_total.0, "stored COR totals");

    Ok(totals)
}

/// Opens the next draw request of a project.
///
/// The first draw is built from the project's schedule of values. Later
/// draws chain from the latest existing draw, after the history has been
/// checked with [`verify_draw_chain`]. Schedule lines added since the last
/// draw are appended at 0%.
///
/// `retention_percent` overrides the retention rate; `None` keeps the prior
/// draw's rate (0% for the first draw).
///
/// # Errors
///
/// * [`ServiceError::DrawChain`] if the existing history is inconsistent.
/// * [`ServiceError::Repository`] if loading or saving fails.
pub async fn start_next_draw<R: BillingRepository + ?Sized>(
    repo: &R,
    project_id: i64,
    period_start: NaiveDate,
    period_end: NaiveDate,
    retention_percent: Option<BasisPoints>,
) -> Result<DrawRequest, ServiceError> {
    let history = repo.list_draw_requests(project_id).await?;
    let schedule = repo.get_schedule_of_values(project_id).await?;

    let draw = match history.iter().max_by_key(|d| d.draw_number) {
        None => DrawRequest::first(
            project_id,
            period_start,
            period_end,
            retention_percent.unwrap_or(BasisPoints::ZERO),
            &schedule,
        ),
        Some(prior) => {
            verify_draw_chain(&history)?;

            let mut next = DrawRequest::next(prior, period_start, period_end);
            next.add_schedule_lines(&schedule);
            if let Some(retention) = retention_percent {
                next.retention_percent = retention;
            }
            next
        }
    };
    debug_assert_eq!(draw.draw_number, next_draw_number(&history));

    let created = repo.create_draw_request(&draw).await?;
    info!(
        project_id,
        draw_number = created.draw_number,
        items = created.items.len(),
        "opened draw request"
    );

    Ok(created)
}
