use thiserror::Error;

/// Central error type for request pipelines
#[derive(Error, Debug)]
pub enum StreelityError {
    // ============================================================================
    // Request Parameter Errors
    // ============================================================================
    #[error("{0} param is missing")]
    MissingParam(String),

    #[error("cannot parse {name} to {expected}")]
    MalformedParam { name: String, expected: &'static str },

    #[error("{0}")]
    InvalidParam(String),

    // ============================================================================
    // Pipeline / Domain Errors
    // ============================================================================
    #[error("Pipeline error: {0}")]
    PipelineError(String),

    #[error("{0}")]
    Domain(String),

    // ============================================================================
    // Generic/System Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("{0}")]
    GenericError(String),
}

impl StreelityError {
    /// Shorthand for a parameter that is present but fails conversion
    pub fn malformed(name: impl Into<String>, expected: &'static str) -> Self {
        StreelityError::MalformedParam {
            name: name.into(),
            expected,
        }
    }
}

// Handlers render failures straight into the response payload
impl From<StreelityError> for String {
    fn from(err: StreelityError) -> Self {
        err.to_string()
    }
}

impl From<String> for StreelityError {
    fn from(err: String) -> Self {
        StreelityError::GenericError(err)
    }
}

impl From<&str> for StreelityError {
    fn from(err: &str) -> Self {
        StreelityError::GenericError(err.to_string())
    }
}

// Helper type alias for Results
pub type StreelityResult<T> = Result<T, StreelityError>;
