//! Configuration loaded from TOML.
//!
//! ```toml
//! max_utterances = 5
//! max_words_per_utterance = 10
//! reveal_dwell_ms = 2000
//! transition_delay_ms = 500
//! backend_endpoint = "https://taskeasy.org/center"
//! request_timeout_ms = 10000
//! match_policy = "constituent-word"
//! cb_evidence = "linked"
//! ```
//!
//! Every key is optional; a missing file yields the defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::binding::{CbEvidence, MatchOptions};
use crate::errors::ConfigError;
use crate::input::InputLimits;
use crate::mention::MatchPolicy;

pub const DEFAULT_BACKEND_ENDPOINT: &str = "https://taskeasy.org/center";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CenteringConfig {
    pub max_utterances: usize,
    pub max_words_per_utterance: usize,
    pub reveal_dwell_ms: u64,
    /// Delay between the cosmetic steps of showing and clearing results.
    pub transition_delay_ms: u64,
    pub backend_endpoint: String,
    pub request_timeout_ms: u64,
    pub match_policy: MatchPolicy,
    pub cb_evidence: CbEvidence,
}

impl Default for CenteringConfig {
    fn default() -> Self {
        let limits = InputLimits::default();
        Self {
            max_utterances: limits.max_utterances,
            max_words_per_utterance: limits.max_words_per_utterance,
            reveal_dwell_ms: 2000,
            transition_delay_ms: 500,
            backend_endpoint: DEFAULT_BACKEND_ENDPOINT.to_string(),
            request_timeout_ms: 10_000,
            match_policy: MatchPolicy::default(),
            cb_evidence: CbEvidence::default(),
        }
    }
}

/// Reveal and transition timing in logical milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealTiming {
    pub dwell_ms: u64,
    pub transition_delay_ms: u64,
}

impl Default for RevealTiming {
    fn default() -> Self {
        CenteringConfig::default().reveal_timing()
    }
}

/// Where and how long to wait for the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewaySettings {
    pub endpoint: String,
    pub timeout: Duration,
}

impl CenteringConfig {
    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_toml_str(&content).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_utterances == 0 || self.max_words_per_utterance == 0 {
            return Err(ConfigError::Invalid {
                message: "utterance and word limits must be at least 1".to_string(),
            });
        }
        if self.backend_endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "backend_endpoint must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn input_limits(&self) -> InputLimits {
        InputLimits::new(self.max_utterances, self.max_words_per_utterance)
    }

    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            policy: self.match_policy,
            cb_evidence: self.cb_evidence,
        }
    }

    pub fn reveal_timing(&self) -> RevealTiming {
        RevealTiming {
            dwell_ms: self.reveal_dwell_ms,
            transition_delay_ms: self.transition_delay_ms,
        }
    }

    pub fn gateway_settings(&self) -> GatewaySettings {
        GatewaySettings {
            endpoint: self.backend_endpoint.clone(),
            timeout: Duration::from_millis(self.request_timeout_ms),
        }
    }
}
