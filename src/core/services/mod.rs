//! Pure calculators plus store-backed services. Store-backed services take the
//! data store and the acting user's id as arguments.

pub mod dashboard_service;
pub mod insights_service;
pub mod recurrence_service;
pub mod search;
pub mod summary_service;
pub mod tag_service;
pub mod transaction_service;

pub use dashboard_service::{DashboardService, DashboardView};
pub use insights_service::{InsightsService, TagInsights};
pub use recurrence_service::{RecurrenceRequest, RecurrenceService};
pub use summary_service::{PeriodSummary, SummaryService, Totals};
pub use tag_service::TagService;
pub use transaction_service::TransactionService;

use crate::errors::CoreError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("{0}")]
    Invalid(String),
}
