mod analytics_engine;
mod errors;

pub use analytics_engine::AnalyticsEngine;
pub use errors::AnalyticsError;
