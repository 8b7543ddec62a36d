use thiserror::Error;

/// Errors surfaced to whoever drives a reactor run.
///
/// The rate law itself never fails; everything here is raised either at the
/// input boundary, by the solver, or by the output layer.
#[derive(Debug, Error)]
pub enum PbrError {
    #[error("invalid input for {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("integration failed at W = {mass} g: {reason}")]
    IntegrationFailure { mass: f64, reason: String },

    #[error("rendering failed: {0}")]
    Render(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl PbrError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        PbrError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PbrError>;
