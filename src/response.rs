//! Backend response parsing.
//!
//! Two payload shapes are accepted and normalized into one [`AnalysisPayload`]:
//!
//! ```text
//! canonical  { "sentences": [..], "results": { "results": [..], "relations": [..] } }
//! legacy     { "results": [..] }
//! ```
//!
//! The canonical shape carries server-addressed relations; the legacy one
//! leaves relations to be derived from the word classification.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::errors::{GatewayError, GatewayResult};
use crate::model::{Anchor, AnchorId, CenteringResult, Relation};

/// Which payload shape a response used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseShape {
    Canonical,
    Legacy,
}

/// Where the relation set of a result comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationSource {
    /// Relations addressed by the backend, with unaddressable ids already removed.
    Supplied(Vec<Relation>),
    /// No relations supplied; derive them from the classification.
    Derived,
}

/// A shape-validated analysis result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisPayload {
    pub shape: ResponseShape,
    /// Sentence texts as split by the backend, when supplied.
    pub sentences: Option<Vec<String>>,
    pub results: Vec<CenteringResult>,
    pub relations: RelationSource,
}

impl AnalysisPayload {
    /// A payload whose relations will be derived locally.
    pub fn derived(results: Vec<CenteringResult>) -> Self {
        Self {
            shape: ResponseShape::Legacy,
            sentences: None,
            results,
            relations: RelationSource::Derived,
        }
    }

    /// A payload carrying backend-addressed relations.
    pub fn supplied(results: Vec<CenteringResult>, relations: Vec<Relation>) -> Self {
        Self {
            shape: ResponseShape::Canonical,
            sentences: Some(results.iter().map(|r| r.sentence.clone()).collect()),
            results,
            relations: RelationSource::Supplied(relations),
        }
    }
}

/// Relation as it appears on the wire, before ids are checked.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireRelation {
    source_id: String,
    target_id: String,
    source_anchor: Anchor,
    target_anchor: Anchor,
}

/// Parse a raw response body.
pub fn parse_response(body: &[u8]) -> GatewayResult<AnalysisPayload> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| GatewayError::malformed(format!("body is not JSON: {}", e)))?;
    parse_response_value(value)
}

/// Parse an already-decoded JSON response.
pub fn parse_response_value(value: Value) -> GatewayResult<AnalysisPayload> {
    let Value::Object(mut root) = value else {
        return Err(GatewayError::malformed("top level is not an object"));
    };

    let sentences = match root.remove("sentences") {
        None | Some(Value::Null) => None,
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .map(|item| match item {
                    Value::String(text) => Ok(text),
                    other => Err(GatewayError::malformed(format!(
                        "`sentences` entry is not a string: {}",
                        other
                    ))),
                })
                .collect::<GatewayResult<Vec<_>>>()?,
        ),
        Some(_) => return Err(GatewayError::malformed("`sentences` is not an array")),
    };

    match root.remove("results") {
        Some(Value::Object(mut nested)) => {
            let results = parse_results(nested.remove("results"), "results.results")?;
            let relations = match nested.remove("relations") {
                None | Some(Value::Null) => RelationSource::Derived,
                Some(Value::Array(items)) => RelationSource::Supplied(parse_relations(items)?),
                Some(_) => {
                    return Err(GatewayError::malformed("`results.relations` is not an array"))
                }
            };
            Ok(AnalysisPayload {
                shape: ResponseShape::Canonical,
                sentences,
                results,
                relations,
            })
        }
        Some(list @ Value::Array(_)) => Ok(AnalysisPayload {
            shape: ResponseShape::Legacy,
            sentences,
            results: parse_results(Some(list), "results")?,
            relations: RelationSource::Derived,
        }),
        Some(_) => Err(GatewayError::malformed(
            "`results` is neither an array nor an object",
        )),
        None => Err(GatewayError::malformed("missing `results`")),
    }
}

fn parse_results(value: Option<Value>, field: &str) -> GatewayResult<Vec<CenteringResult>> {
    let items = match value {
        Some(Value::Array(items)) => items,
        Some(_) => return Err(GatewayError::malformed(format!("`{}` is not an array", field))),
        None => return Err(GatewayError::malformed(format!("missing `{}`", field))),
    };

    if items.is_empty() {
        return Err(GatewayError::EmptyResult);
    }

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|e| {
                GatewayError::malformed(format!("`{}[{}]`: {}", field, index, e))
            })
        })
        .collect()
}

fn parse_relations(items: Vec<Value>) -> GatewayResult<Vec<Relation>> {
    let mut relations = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let wire: WireRelation = serde_json::from_value(item).map_err(|e| {
            GatewayError::malformed(format!("`results.relations[{}]`: {}", index, e))
        })?;

        match (
            wire.source_id.parse::<AnchorId>(),
            wire.target_id.parse::<AnchorId>(),
        ) {
            (Ok(source_id), Ok(target_id)) => relations.push(Relation {
                source_id,
                target_id,
                source_anchor: wire.source_anchor,
                target_anchor: wire.target_anchor,
            }),
            (source, target) => {
                warn!(
                    source = %wire.source_id,
                    target = %wire.target_id,
                    source_ok = source.is_ok(),
                    target_ok = target.is_ok(),
                    "ignoring relation with an unaddressable id"
                );
            }
        }
    }
    Ok(relations)
}
