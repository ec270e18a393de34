//! Error types for the coupon-scout service.

use coupon_search::SearchError;

/// Top-level error type for the HTTP service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Configuration file could not be parsed or is invalid.
    #[error("config error: {0}")]
    Config(String),

    /// Search layer error (validation or search configuration).
    #[error(transparent)]
    Search(#[from] SearchError),

    /// I/O error (config file, listener bind).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_errors_display_unchanged() {
        let err = ServiceError::from(SearchError::Config(
            "max_results must be greater than 0".into(),
        ));
        assert_eq!(err.to_string(), "config error: max_results must be greater than 0");
    }

    #[test]
    fn io_error_converts() {
        let err = ServiceError::from(std::io::Error::new(
            std::io::ErrorKind::AddrInUse,
            "address in use",
        ));
        assert!(err.to_string().starts_with("I/O error"));
    }
}
