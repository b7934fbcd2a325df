use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use centering_view::{
    parse_response, BoundDiscourse, CenteringConfig, DiscourseDisplay, DiscourseView,
    GatewayError, ValidationError,
};

mod samples;

pub use samples::{SampleDiscourse, SAMPLE_DISCOURSES};

// Set up panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

// ============================================================================
// INPUT VALIDATION API
// ============================================================================

/// Error shape shared by every entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WasmError {
    /// Machine-readable kind, e.g. `TooManyUtterances`
    pub kind: String,
    /// Message to show to the user
    pub message: String,
    /// Developer detail
    pub detail: String,
}

impl From<&ValidationError> for WasmError {
    fn from(err: &ValidationError) -> Self {
        let kind = match err {
            ValidationError::EmptyInput => "EmptyInput",
            ValidationError::TooManyUtterances { .. } => "TooManyUtterances",
            ValidationError::UtteranceTooLong { .. } => "UtteranceTooLong",
        };
        Self {
            kind: kind.to_string(),
            message: err.user_message(),
            detail: err.to_string(),
        }
    }
}

impl From<&GatewayError> for WasmError {
    fn from(err: &GatewayError) -> Self {
        let kind = match err {
            GatewayError::Network { .. } => "NetworkError",
            GatewayError::MalformedResponse { .. } => "MalformedResponse",
            GatewayError::EmptyResult => "EmptyResult",
        };
        Self {
            kind: kind.to_string(),
            message: err.user_message(),
            detail: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub ok: bool,
    /// The utterances the text splits into, when valid
    pub utterances: Vec<String>,
    pub error: Option<WasmError>,
}

/// Check raw text against the configured limits before submitting it.
#[wasm_bindgen]
pub fn validate_input(text: &str, config_toml: Option<String>) -> JsValue {
    init();
    let result = validate_input_internal(text, config_toml.as_deref());
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn validate_input_internal(text: &str, config_toml: Option<&str>) -> ValidationResult {
    let config = match load_config(config_toml) {
        Ok(config) => config,
        Err(error) => {
            return ValidationResult {
                ok: false,
                utterances: Vec::new(),
                error: Some(error),
            }
        }
    };

    match config.input_limits().validate(text) {
        Ok(utterances) => ValidationResult {
            ok: true,
            utterances: utterances.iter().map(|u| u.text().to_string()).collect(),
            error: None,
        },
        Err(e) => ValidationResult {
            ok: false,
            utterances: Vec::new(),
            error: Some(WasmError::from(&e)),
        },
    }
}

// ============================================================================
// ANALYSIS BINDING API
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindingResult {
    pub ok: bool,
    pub view: Option<DiscourseView>,
    /// Plain-text rendering of the visible sentences with their relations
    pub display: Option<String>,
    pub error: Option<WasmError>,
}

/// Bind a backend response body and project it through `cursor`.
///
/// The page advances `cursor` itself; calling this once per step returns
/// only what may be drawn at that step.
#[wasm_bindgen]
pub fn bind_analysis(response_json: &str, cursor: usize, config_toml: Option<String>) -> JsValue {
    init();
    let result = bind_analysis_internal(response_json, cursor, config_toml.as_deref());
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn bind_analysis_internal(
    response_json: &str,
    cursor: usize,
    config_toml: Option<&str>,
) -> BindingResult {
    let failed = |error: WasmError| BindingResult {
        ok: false,
        view: None,
        display: None,
        error: Some(error),
    };

    let config = match load_config(config_toml) {
        Ok(config) => config,
        Err(error) => return failed(error),
    };
    let payload = match parse_response(response_json.as_bytes()) {
        Ok(payload) => payload,
        Err(e) => return failed(WasmError::from(&e)),
    };

    let discourse = BoundDiscourse::bind(&payload, config.match_options());
    let cursor = cursor.min(discourse.len().saturating_sub(1));

    BindingResult {
        ok: true,
        view: Some(DiscourseView::through(&discourse, cursor)),
        display: Some(
            DiscourseDisplay::new(&discourse)
                .through(cursor)
                .with_relations()
                .to_string(),
        ),
        error: None,
    }
}

// ============================================================================
// METADATA API
// ============================================================================

/// The built-in example discourses.
#[wasm_bindgen]
pub fn sample_discourses() -> JsValue {
    serde_wasm_bindgen::to_value(SAMPLE_DISCOURSES).unwrap_or(JsValue::NULL)
}

/// The default configuration, as the page should use it for timing.
#[wasm_bindgen]
pub fn default_config() -> JsValue {
    serde_wasm_bindgen::to_value(&CenteringConfig::default()).unwrap_or(JsValue::NULL)
}

fn load_config(config_toml: Option<&str>) -> Result<CenteringConfig, WasmError> {
    match config_toml {
        None => Ok(CenteringConfig::default()),
        Some(content) => CenteringConfig::from_toml_str(content).map_err(|e| WasmError {
            kind: "ConfigError".to_string(),
            message: "The demo configuration is invalid.".to_string(),
            detail: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use centering_view::WordRole;

    const STUDY_RESPONSE: &str = include_str!("../../fixtures/study.json");

    #[test]
    fn test_validate_input_splits_utterances() {
        let result = validate_input_internal("Jill caught a ball. She tossed it to John.", None);
        assert!(result.ok);
        assert_eq!(result.utterances, vec!["Jill caught a ball", "She tossed it to John"]);
    }

    #[test]
    fn test_validate_input_reports_kind_and_message() {
        let result = validate_input_internal("   ", None);
        assert!(!result.ok);
        let error = result.error.unwrap();
        assert_eq!(error.kind, "EmptyInput");
        assert_eq!(
            error.message,
            "Input cannot be empty. Please enter at least one utterance."
        );
    }

    #[test]
    fn test_validate_input_honors_config() {
        let text = "one two three four five six seven eight nine ten eleven twelve.";
        assert!(!validate_input_internal(text, None).ok);
        assert!(validate_input_internal(text, Some("max_words_per_utterance = 20")).ok);

        let bad = validate_input_internal(text, Some("max_words = 20"));
        assert_eq!(bad.error.unwrap().kind, "ConfigError");
    }

    #[test]
    fn test_bind_analysis_gates_by_cursor() {
        let result = bind_analysis_internal(STUDY_RESPONSE, 1, None);
        assert!(result.ok);

        let view = result.view.unwrap();
        assert_eq!(view.sentences.len(), 2);
        assert_eq!(view.total, 4);
        assert_eq!(view.sentences[1].label, "U₂");
        assert_eq!(view.sentences[1].words[0].role, WordRole::Cb);
        assert!(view.sentences[1].words[3].relations.is_empty());
        assert!(result.display.unwrap().contains("└─>word-1-0"));
    }

    #[test]
    fn test_bind_analysis_clamps_cursor() {
        let view = bind_analysis_internal(STUDY_RESPONSE, 99, None).view.unwrap();
        assert_eq!(view.cursor, 3);
        assert!(view.is_complete());
    }

    #[test]
    fn test_bind_analysis_reports_malformed_body() {
        let result = bind_analysis_internal(r#"{"error": "No text provided"}"#, 0, None);
        assert!(!result.ok);
        assert_eq!(result.error.unwrap().kind, "MalformedResponse");

        let empty = bind_analysis_internal(r#"{"results": []}"#, 0, None);
        assert_eq!(empty.error.unwrap().kind, "EmptyResult");
    }

    #[test]
    fn test_view_serializes_for_the_page() {
        let view = bind_analysis_internal(STUDY_RESPONSE, 3, None).view.unwrap();
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["sentences"][1]["words"][3]["relations"][1]["targetId"], "word-2-4");
        assert_eq!(json["sentences"][3]["cf_label"], "{John's, He, John's call}");
    }
}
