use std::path::PathBuf;
use thiserror::Error;

pub type PlotResult<T> = Result<T, PlotError>;

#[derive(Debug, Error)]
pub enum PlotError {
    /// A data series or an option violates its constraint; `field` names it.
    #[error("invalid input `{field}`: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("could not write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("display backend unavailable: {reason}")]
    RenderBackendUnavailable { reason: String },

    #[error("rendering failed: {0}")]
    Render(String),
}

impl PlotError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        PlotError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PlotError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, PlotError::InvalidInput { .. })
    }
}

/// Maps plotters and image encoder failures, which only need to be displayed.
pub(crate) fn render_err<E: std::fmt::Display>(e: E) -> PlotError {
    PlotError::Render(e.to_string())
}
