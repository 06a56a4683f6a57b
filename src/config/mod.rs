mod service_config;

pub use service_config::{ServiceConfig, DEFAULT_PROCESSING_DELAY};
