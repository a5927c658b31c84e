use thiserror::Error;

/// Failure of a single forecast request.
///
/// Every variant is terminal for the request that produced it; nothing in
/// this crate retries. Transports decide how each kind is shown to callers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ForecastError {
    /// Caller-supplied parameters were rejected before any network call.
    #[error("{0}")]
    InvalidInput(String),

    /// Transport failure or non-success status from a provider.
    #[error("{0}")]
    ProviderUnavailable(String),

    /// The weather provider answered but had nothing usable for the query.
    #[error("{0}")]
    ProviderDataMissing(String),

    /// The text-generation provider failed or rejected the prompt.
    #[error("{0}")]
    SummaryGenerationFailed(String),
}

/// Fieldless mirror of [`ForecastError`] for matching and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    ProviderUnavailable,
    ProviderDataMissing,
    SummaryGenerationFailed,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::ProviderUnavailable => "provider_unavailable",
            ErrorKind::ProviderDataMissing => "provider_data_missing",
            ErrorKind::SummaryGenerationFailed => "summary_generation_failed",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ForecastError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::ProviderUnavailable(_) => ErrorKind::ProviderUnavailable,
            Self::ProviderDataMissing(_) => ErrorKind::ProviderDataMissing,
            Self::SummaryGenerationFailed(_) => ErrorKind::SummaryGenerationFailed,
        }
    }

    /// `true` when the caller, not a provider, is at fault.
    pub fn is_client_error(&self) -> bool {
        self.kind() == ErrorKind::InvalidInput
    }

    pub fn message(&self) -> &str {
        match self {
            Self::InvalidInput(m)
            | Self::ProviderUnavailable(m)
            | Self::ProviderDataMissing(m)
            | Self::SummaryGenerationFailed(m) => m,
        }
    }
}
