mod analytics;
mod outcome;
mod responses;
mod transaction;

pub use analytics::{AnalyticsResult, AnalyticsSummary};
pub use outcome::{OutcomeStatus, ProcessingOutcome};
pub use responses::{BatchResponse, HealthResponse, SubmitResponse};
pub use transaction::{Transaction, TransactionView};
