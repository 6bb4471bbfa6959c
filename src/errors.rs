use crate::config::ConfigError;
use crate::network::DeliveryError;
use thiserror::Error;

/// Failures that end the run with a non-zero exit status
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("cannot set up delivery: {0}")]
    Delivery(#[from] DeliveryError),
    #[error("digest delivery incomplete: {sent} of {parts} parts sent, {failed} failed")]
    DeliveryFailed {
        parts: usize,
        sent: usize,
        failed: usize,
    },
}
