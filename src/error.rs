use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Failure talking to one of the hosted vendor APIs.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{key_env} is not set in the environment")]
    MissingApiKey { key_env: &'static str },

    #[error("{service} request failed: {source}")]
    Request {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} API error {status}: {body}")]
    Api {
        service: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("{service} response did not contain {what}")]
    EmptyResponse {
        service: &'static str,
        what: &'static str,
    },
}

/// Coarse failure categories used to pick a user-facing explanation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Credentials,
    RateLimited,
    Other,
}

impl ProviderError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Request { source, .. } => source.status(),
            _ => None,
        }
    }

    pub fn kind(&self) -> FailureKind {
        if matches!(self, Self::MissingApiKey { .. }) {
            return FailureKind::Credentials;
        }
        match self.status() {
            Some(StatusCode::UNAUTHORIZED) => FailureKind::Credentials,
            Some(StatusCode::TOO_MANY_REQUESTS) => FailureKind::RateLimited,
            _ => FailureKind::Other,
        }
    }
}

/// Avatar intake and image hosting failures.
///
/// Remote failures deliberately carry no cause; callers get a stable message
/// and the underlying error is only logged.
#[derive(Debug, Error)]
pub enum MediaError {
    /// Raised before any request when credentials are absent, so callers that
    /// only handle `Upload`/`Delete` must match this variant too.
    #[error("Image hosting is not configured; set CLOUDINARY_CLOUD_NAME, CLOUDINARY_API_KEY and CLOUDINARY_API_SECRET")]
    NotConfigured,

    #[error("Failed to upload avatar")]
    Upload,

    #[error("Failed to delete avatar")]
    Delete,

    #[error("File too large: {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },

    #[error("Only image files are allowed (got '{content_type}')")]
    UnsupportedType { content_type: String },

    #[error("Invalid image payload: {0}")]
    InvalidPayload(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid config value for '{key}': {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::{FailureKind, ProviderError};
    use reqwest::StatusCode;

    fn api(status: StatusCode) -> ProviderError {
        ProviderError::Api {
            service: "chat completion",
            status,
            body: String::new(),
        }
    }

    #[test]
    fn unauthorized_is_a_credential_problem() {
        assert_eq!(api(StatusCode::UNAUTHORIZED).kind(), FailureKind::Credentials);
        assert_eq!(
            ProviderError::MissingApiKey {
                key_env: "OPENAI_API_KEY"
            }
            .kind(),
            FailureKind::Credentials
        );
    }

    #[test]
    fn too_many_requests_is_rate_limited() {
        assert_eq!(
            api(StatusCode::TOO_MANY_REQUESTS).kind(),
            FailureKind::RateLimited
        );
    }

    #[test]
    fn other_statuses_fall_through() {
        assert_eq!(api(StatusCode::INTERNAL_SERVER_ERROR).kind(), FailureKind::Other);
        assert_eq!(api(StatusCode::FORBIDDEN).kind(), FailureKind::Other);
        assert_eq!(
            ProviderError::EmptyResponse {
                service: "embedding",
                what: "an embedding"
            }
            .kind(),
            FailureKind::Other
        );
    }

    #[test]
    fn api_error_display_includes_status_and_body() {
        let err = ProviderError::Api {
            service: "embedding",
            status: StatusCode::BAD_GATEWAY,
            body: "upstream down".to_string(),
        };
        assert_eq!(err.to_string(), "embedding API error 502 Bad Gateway: upstream down");
    }
}
