use thiserror::Error;

/// Errors raised at the provider-adapter boundary.
///
/// Every outbound integration (nutrition lookup, OCR, image recognition)
/// translates its failures into one of these before anything reaches the
/// normalization core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider could not be reached, rejected our credentials, or failed
    #[error("{provider} is unavailable: {message}")]
    Unavailable { provider: String, message: String },

    /// The provider refused the request because our quota is used up
    #[error("{provider} quota exceeded")]
    QuotaExceeded { provider: String },

    /// The provider answered, but not with anything we can use
    #[error("{provider} returned invalid data: {message}")]
    DataInvalid { provider: String, message: String },
}

impl ProviderError {
    pub fn unavailable(provider: &str, message: impl Into<String>) -> Self {
        ProviderError::Unavailable {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    pub fn quota_exceeded(provider: &str) -> Self {
        ProviderError::QuotaExceeded {
            provider: provider.to_string(),
        }
    }

    pub fn data_invalid(provider: &str, message: impl Into<String>) -> Self {
        ProviderError::DataInvalid {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    /// Map a non-success HTTP status to an error kind.
    pub fn from_status(provider: &str, status: reqwest::StatusCode, body: &str) -> Self {
        match status.as_u16() {
            402 | 429 => ProviderError::quota_exceeded(provider),
            401 | 403 => ProviderError::unavailable(provider, "credentials rejected"),
            code => {
                let detail: String = body.chars().take(200).collect();
                ProviderError::unavailable(provider, format!("HTTP {}: {}", code, detail))
            }
        }
    }

    /// Map a transport-level failure (connect, timeout, decode) to an error kind.
    pub fn from_transport(provider: &str, err: reqwest::Error) -> Self {
        if err.is_decode() {
            ProviderError::data_invalid(provider, err.to_string())
        } else {
            ProviderError::unavailable(provider, err.to_string())
        }
    }

    /// Name of the provider that produced this error
    pub fn provider(&self) -> &str {
        match self {
            ProviderError::Unavailable { provider, .. }
            | ProviderError::QuotaExceeded { provider }
            | ProviderError::DataInvalid { provider, .. } => provider,
        }
    }

    /// Only transient failures are worth retrying against the same provider.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProviderError::Unavailable { .. })
    }
}

/// Errors that can occur during nutrition import operations
#[derive(Error, Debug)]
pub enum NutritionError {
    /// A provider, OCR or recognition call failed
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// No usable ingredient lines could be read from the supplied text
    #[error("Not enough ingredient text to analyze")]
    InsufficientText,

    /// A raw payload did not carry a nutrient list where one was expected
    #[error("Malformed nutrient entries: {0}")]
    MalformedEntries(String),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    /// Failed to read an input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse or produce JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
