//! Error types for spk-viz

use thiserror::Error;

/// Result type for spk-viz operations
pub type Result<T> = std::result::Result<T, VizError>;

/// spk-viz error types
#[derive(Error, Debug)]
pub enum VizError {
    #[error("Empty input: {0}")]
    EmptyInput(&'static str),

    #[error("Drawing error: {0}")]
    Draw(String),
}

/// Flatten a backend-specific plotters error into [`VizError`].
///
/// The drawing error type is generic over the backend, so it is carried as
/// its rendered message.
pub(crate) fn draw_err<E>(e: plotters::drawing::DrawingAreaErrorKind<E>) -> VizError
where
    E: std::error::Error + Send + Sync,
{
    VizError::Draw(e.to_string())
}
