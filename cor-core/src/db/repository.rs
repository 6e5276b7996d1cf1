use async_trait::async_trait;
use thiserror::Error;

use crate::calculations::CorTotals;
use crate::models::{ChangeOrderRequest, DrawRequest, ScheduleOfValuesLine};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),
}

/// Storage the billing engine reads snapshots from and writes results to.
///
/// Backends are responsible for serializing concurrent edits and for
/// writing cached totals atomically with the rows they were derived from.
#[async_trait]
pub trait BillingRepository: Send + Sync {
    // Change orders
    async fn get_change_order(&self, id: i64) -> Result<ChangeOrderRequest, RepositoryError>;

    /// Stores recomputed totals as a cache next to the change order row.
    async fn save_change_order_totals(
        &self,
        id: i64,
        totals: &CorTotals,
    ) -> Result<(), RepositoryError>;

    // Schedule of values
    async fn get_schedule_of_values(
        &self,
        project_id: i64,
    ) -> Result<Vec<ScheduleOfValuesLine>, RepositoryError>;

    // Draw requests
    async fn list_draw_requests(
        &self,
        project_id: i64,
    ) -> Result<Vec<DrawRequest>, RepositoryError>;

    /// Inserts a new draw and returns it with its assigned id.
    async fn create_draw_request(
        &self,
        draw: &DrawRequest,
    ) -> Result<DrawRequest, RepositoryError>;
}
