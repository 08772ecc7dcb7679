//! Error types and retry classification for the marketplace crate.
//!
//! This module provides:
//! - [`MarketplaceError`]: The main error enum for all marketplace operations
//! - [`RetryClass`]: Classification for determining retry behavior

mod retry;

pub use retry::RetryClass;

use thiserror::Error;

/// Errors that can occur during marketplace operations.
///
/// Each variant is classified into a [`RetryClass`] via the
/// [`retry_class`](Self::retry_class) method, which determines how the
/// retry wrapper should handle the error.
#[derive(Error, Debug)]
pub enum MarketplaceError {
    /// The product failed local validation.
    /// Raised before any network call is made - retrying won't help.
    #[error("Validation failed: {message}")]
    Validation {
        /// Description of the validation failure
        message: String,
    },

    /// The provider rejected the credential (HTTP 401).
    /// The access token is expired or the grant was revoked; the user
    /// must reconnect the marketplace.
    #[error("Authentication failed: {provider} - {message}")]
    Authentication {
        /// The provider that rejected the credential
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The credential lacks the required OAuth scope (HTTP 403).
    #[error("Permission denied: {provider}")]
    Permission {
        /// The provider that denied the request
        provider: String,
    },

    /// The provider rate limited the request (HTTP 429).
    /// Eligible for retry with exponential backoff.
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The provider reported the resource as absent (HTTP 404).
    /// Read paths translate this into an absent result, not an error.
    #[error("Not found: {provider} - {resource}")]
    NotFound {
        /// The provider that returned 404
        provider: String,
        /// The resource that was requested
        resource: String,
    },

    /// The request to the provider timed out.
    /// Eligible for retry with exponential backoff.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// The operation is not supported by this provider.
    #[error("Operation '{operation}' not supported by provider: {provider}")]
    Unsupported {
        /// The operation that was attempted
        operation: String,
        /// The provider that does not support it
        provider: String,
    },

    /// Any other non-2xx or malformed provider response.
    #[error("Provider error: {provider} - {message}")]
    Provider {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketplaceError {
    /// Returns the retry classification for this error.
    ///
    /// - [`RetryClass::Never`]: terminal, don't retry
    /// - [`RetryClass::WithBackoff`]: transient, retry with exponential backoff
    ///
    /// # Examples
    ///
    /// ```
    /// use sellbridge_marketplace::errors::{MarketplaceError, RetryClass};
    ///
    /// let error = MarketplaceError::RateLimited { provider: "EBAY".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    ///
    /// let error = MarketplaceError::Validation { message: "price must be > 0".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::Never);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            // Terminal errors - never retry
            Self::Validation { .. }
            | Self::Authentication { .. }
            | Self::Permission { .. }
            | Self::NotFound { .. }
            | Self::Unsupported { .. } => RetryClass::Never,

            // Transient errors - retry with backoff
            Self::RateLimited { .. }
            | Self::Timeout { .. }
            | Self::Provider { .. }
            | Self::Network(_) => RetryClass::WithBackoff,
        }
    }

    /// Translate a non-success HTTP status into the error taxonomy.
    ///
    /// `body` is the provider's response text, used as the message for
    /// authentication and generic provider errors.
    pub fn from_status(provider: &str, status: reqwest::StatusCode, body: &str) -> Self {
        match status.as_u16() {
            401 => Self::Authentication {
                provider: provider.to_string(),
                message: if body.is_empty() {
                    "invalid or expired token".to_string()
                } else {
                    body.to_string()
                },
            },
            403 => Self::Permission {
                provider: provider.to_string(),
            },
            404 => Self::NotFound {
                provider: provider.to_string(),
                resource: body.to_string(),
            },
            429 => Self::RateLimited {
                provider: provider.to_string(),
            },
            _ => Self::Provider {
                provider: provider.to_string(),
                message: format!("HTTP {}: {}", status, body),
            },
        }
    }

    /// Shorthand for a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_validation_never_retries() {
        let error = MarketplaceError::validation("title is required");
        assert_eq!(error.retry_class(), RetryClass::Never);
    }

    #[test]
    fn test_authentication_never_retries() {
        let error = MarketplaceError::Authentication {
            provider: "ETSY".to_string(),
            message: "invalid_grant".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::Never);
    }

    #[test]
    fn test_permission_never_retries() {
        let error = MarketplaceError::Permission {
            provider: "EBAY".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::Never);
    }

    #[test]
    fn test_not_found_never_retries() {
        let error = MarketplaceError::NotFound {
            provider: "EBAY".to_string(),
            resource: "offer 123".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::Never);
    }

    #[test]
    fn test_rate_limited_retries_with_backoff() {
        let error = MarketplaceError::RateLimited {
            provider: "EBAY".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    }

    #[test]
    fn test_timeout_retries_with_backoff() {
        let error = MarketplaceError::Timeout {
            provider: "ETSY".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    }

    #[test]
    fn test_provider_error_retries_with_backoff() {
        let error = MarketplaceError::Provider {
            provider: "ETSY".to_string(),
            message: "HTTP 500".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    }

    #[test]
    fn test_status_mapping() {
        let err = MarketplaceError::from_status("EBAY", StatusCode::UNAUTHORIZED, "expired");
        assert!(matches!(err, MarketplaceError::Authentication { .. }));

        let err = MarketplaceError::from_status("EBAY", StatusCode::FORBIDDEN, "");
        assert!(matches!(err, MarketplaceError::Permission { .. }));

        let err = MarketplaceError::from_status("EBAY", StatusCode::NOT_FOUND, "offer");
        assert!(matches!(err, MarketplaceError::NotFound { .. }));

        let err = MarketplaceError::from_status("EBAY", StatusCode::TOO_MANY_REQUESTS, "");
        assert!(matches!(err, MarketplaceError::RateLimited { .. }));

        let err = MarketplaceError::from_status("EBAY", StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert!(matches!(err, MarketplaceError::Provider { .. }));
    }

    #[test]
    fn test_error_display() {
        let error = MarketplaceError::validation("price must be greater than zero");
        assert_eq!(
            format!("{}", error),
            "Validation failed: price must be greater than zero"
        );

        let error = MarketplaceError::Unsupported {
            operation: "create_listing".to_string(),
            provider: "WHATNOT".to_string(),
        };
        assert_eq!(
            format!("{}", error),
            "Operation 'create_listing' not supported by provider: WHATNOT"
        );
    }
}
