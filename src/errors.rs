//! Error types for input validation, the analysis gateway and configuration.
//!
//! Every error here is recoverable: the view returns to input entry with the
//! draft text intact and the message from `user_message()` attached.

use thiserror::Error;

/// Why raw input was rejected before submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No non-empty utterance remained after splitting.
    #[error("input contains no utterances")]
    EmptyInput,

    #[error("input has {count} utterances, the maximum is {max}")]
    TooManyUtterances { count: usize, max: usize },

    /// `index` is the zero-based position of the first offending utterance.
    #[error("utterance {index} has {words} words, the maximum is {max}")]
    UtteranceTooLong { index: usize, words: usize, max: usize },
}

impl ValidationError {
    pub fn user_message(&self) -> String {
        match self {
            ValidationError::EmptyInput => {
                "Input cannot be empty. Please enter at least one utterance.".to_string()
            }
            ValidationError::TooManyUtterances { max, .. } => {
                format!("Input exceeds the maximum of {} utterances.", max)
            }
            ValidationError::UtteranceTooLong { max, .. } => {
                format!("Each utterance can have a maximum of {} words.", max)
            }
        }
    }
}

/// Failures of the backend round trip.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Transport failure, timeout or non-2xx status.
    #[error("network error: {detail}")]
    Network { status: Option<u16>, detail: String },

    /// The payload did not have the expected shape.
    #[error("malformed response: {detail}")]
    MalformedResponse { detail: String },

    /// Well-formed payload with zero results.
    #[error("backend returned no results")]
    EmptyResult,
}

impl GatewayError {
    pub fn network(detail: impl Into<String>) -> Self {
        GatewayError::Network {
            status: None,
            detail: detail.into(),
        }
    }

    pub fn malformed(detail: impl Into<String>) -> Self {
        GatewayError::MalformedResponse {
            detail: detail.into(),
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            GatewayError::Network { .. } => {
                "The analysis service could not be reached. Please try again.".to_string()
            }
            GatewayError::MalformedResponse { .. } => {
                "The analysis service returned an unexpected response.".to_string()
            }
            GatewayError::EmptyResult => {
                "No utterances could be analyzed. Please check your input and try again."
                    .to_string()
            }
        }
    }
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages_name_the_limit() {
        let err = ValidationError::TooManyUtterances { count: 6, max: 5 };
        assert_eq!(err.user_message(), "Input exceeds the maximum of 5 utterances.");

        let err = ValidationError::UtteranceTooLong {
            index: 2,
            words: 11,
            max: 10,
        };
        assert_eq!(err.user_message(), "Each utterance can have a maximum of 10 words.");
        assert_eq!(err.to_string(), "utterance 2 has 11 words, the maximum is 10");
    }

    #[test]
    fn test_gateway_messages_distinguish_server_from_input() {
        assert_ne!(
            GatewayError::network("refused").user_message(),
            GatewayError::EmptyResult.user_message()
        );
        assert_eq!(
            GatewayError::malformed("missing results").to_string(),
            "malformed response: missing results"
        );
    }
}
