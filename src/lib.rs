//! Binding of discourse-centering analysis results for visualization.
//!
//! Given utterances annotated with a backward-looking center (Cb) and
//! forward-looking centers (Cf), this crate:
//!
//! - validates raw input against utterance and word limits ([`InputLimits`]);
//! - parses and shape-checks backend payloads ([`parse_response`]);
//! - classifies every word as Cb, Cf or neither ([`MentionMatcher`]);
//! - builds a filtered, duplicate-free relation graph between addressable
//!   words and sentences ([`RelationSet`], [`RelationBuilder`]);
//! - projects the result through a reveal cursor for a renderer
//!   ([`DiscourseView`]).
//!
//! ## Example
//!
//! ```
//! use centering_view::{parse_response, BoundDiscourse, DiscourseView, InputLimits, MatchOptions, WordRole};
//!
//! InputLimits::default().validate("John left. He came back.").unwrap();
//!
//! let body = br#"{"results": [
//!     {"Cb": null, "Cf": ["John"], "sentence": "John left."},
//!     {"Cb": "John", "Cf": ["John"], "sentence": "John came back."}
//! ]}"#;
//! let payload = parse_response(body).unwrap();
//! let discourse = BoundDiscourse::bind(&payload, MatchOptions::default());
//!
//! let view = DiscourseView::through(&discourse, 1);
//! assert_eq!(view.sentences[1].words[0].role, WordRole::Cb);
//! assert_eq!(view.sentences[0].words[0].relations[0].target_id.to_string(), "word-1-0");
//! ```
//!
//! ## Modules
//!
//! - [`model`] - utterances, centering results, ids and relations
//! - [`input`] - input validation
//! - [`mention`] - word normalization and matching
//! - [`relation`] - relation sets and client-side derivation
//! - [`binding`] - classification of a whole result
//! - [`response`] - backend payload parsing
//! - [`view`] - cursor-gated renderer projection
//! - [`config`] - TOML configuration
//! - [`errors`] - error taxonomy

pub mod binding;
pub mod config;
mod display;
pub mod errors;
pub mod input;
pub mod mention;
pub mod model;
pub mod relation;
pub mod response;
pub mod view;

pub use binding::{BoundDiscourse, BoundSentence, BoundWord, CbEvidence, MatchOptions};
pub use config::{CenteringConfig, GatewaySettings, RevealTiming, DEFAULT_BACKEND_ENDPOINT};
pub use display::DiscourseDisplay;
pub use errors::{ConfigError, GatewayError, GatewayResult, ValidationError};
pub use input::{split_utterances, InputLimits};
pub use mention::{normalize_word, MatchPolicy, MentionMatcher, WordRole};
pub use model::{Anchor, AnchorId, CenteringResult, Relation, SentenceId, TokenId, Utterance};
pub use relation::{AddressSpace, RelationBuilder, RelationSet, SentenceMentions};
pub use response::{parse_response, parse_response_value, AnalysisPayload, RelationSource, ResponseShape};
pub use view::{utterance_label, DiscourseView, EdgeView, SentenceView, WordView};
