pub mod calculations;
pub mod db;
pub mod lifecycle;
pub mod models;
pub mod service;
pub mod validation;

pub use db::repository::{BillingRepository, RepositoryError};
pub use lifecycle::{LifecycleError, Transition};
pub use models::*;
pub use service::ServiceError;
pub use validation::{CorValidation, validate_cor, validate_draft};
