//! Error types.
//!
//! Two layers:
//!
//! - [`MetricsError`] — typed, matchable errors raised by the metrics core and
//!   CSV ingest. Callers (report, TUI, tests) can distinguish a missing column
//!   from a malformed cell from an oversized rolling window.
//! - [`AppError`] — the application-boundary error carrying a process exit
//!   code. The binary prints it and exits; nothing in the library calls
//!   `process::exit` itself.

use thiserror::Error;

/// Errors raised by the metrics core and CSV ingest.
///
/// All of these are data-integrity problems detected synchronously at the call
/// site. There is no retry or silent recovery: the caller decides whether to
/// abort or substitute a placeholder view.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MetricsError {
    /// A required column is absent from the input.
    #[error("missing required column `{column}`")]
    Schema { column: String },

    /// A date or numeric cell could not be parsed.
    #[error("line {line}: {message}")]
    MalformedInput { line: usize, message: String },

    /// The caller referenced a column the series does not have.
    #[error("unknown column `{column}`")]
    UnknownColumn { column: String },

    /// The operation requires at least one observation.
    #[error("series has no observations")]
    EmptySeries,

    /// Rolling window outside `1..=len`.
    #[error("invalid rolling window {window} for series of length {len}")]
    InvalidWindow { window: usize, len: usize },

    /// Stacked composition over missing columns or negative values.
    #[error("invalid stack composition: {reason}")]
    InvalidComposition { reason: String },
}

impl MetricsError {
    pub fn schema(column: impl Into<String>) -> Self {
        Self::Schema {
            column: column.into(),
        }
    }

    pub fn malformed(line: usize, message: impl Into<String>) -> Self {
        Self::MalformedInput {
            line,
            message: message.into(),
        }
    }

    pub fn unknown_column(column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            column: column.into(),
        }
    }

    pub fn composition(reason: impl Into<String>) -> Self {
        Self::InvalidComposition {
            reason: reason.into(),
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<MetricsError> for AppError {
    fn from(err: MetricsError) -> Self {
        // Exit codes: 2 = bad input/config, 3 = no usable data.
        let exit_code = match &err {
            MetricsError::EmptySeries => 3,
            _ => 2,
        };
        AppError::new(exit_code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_error_maps_to_exit_codes() {
        let app: AppError = MetricsError::EmptySeries.into();
        assert_eq!(app.exit_code(), 3);

        let app: AppError = MetricsError::schema("date").into();
        assert_eq!(app.exit_code(), 2);
        assert!(app.to_string().contains("date"));
    }
}
