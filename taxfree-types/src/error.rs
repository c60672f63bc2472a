//! Error types for the tax-free calculator.

/// Domain-level errors (business rule violations).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    #[error("Tax-free rate must be between 0 and 100, got {0}")]
    InvalidTaxFreeRate(f64),

    #[error("Select 2 or 3 countries, got {0}")]
    CountryCount(usize),

    #[error("Country selected more than once: {0}")]
    DuplicateCountry(String),

    #[error("Unknown country: {0}")]
    UnknownCountry(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Storage-level errors (durable key-value backend failures).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Rate-provider errors. Never surfaced past the rate resolver.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Malformed rate response: {0}")]
    MalformedResponse(String),

    #[error("Rate not available for base {0}")]
    RateNotAvailable(String),
}

/// Application-level errors (for HTTP responses and CLI output).
///
/// Maps cleanly to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No exchange rate from {from} to {to}")]
    RateUnavailable { from: String, to: String },

    #[error("Could not save: {0}")]
    Storage(String),
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Storage(err.to_string())
    }
}
