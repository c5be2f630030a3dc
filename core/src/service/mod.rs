pub mod metrics;
pub mod record_service;
