pub mod client;

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::error::Error;

// MODELS
//
// Only the fields the migration reads are modeled; everything else in the
// LaunchDarkly payloads is ignored. Listed fields are required unless
// wrapped in Option, and a missing required field fails the run as a
// schema error.

/// Minimal flag listing entry, used only to drive the per-flag detail fetch.
#[derive(Debug, Clone, Deserialize)]
pub struct FlagSummary {
    pub key: String,
    pub name: String,
}

/// Full flag detail as returned by GET /flags/{project}/{key}.
///
/// Environments deserialize into a BTreeMap, so a flag's environments are
/// processed in alphabetical order. Synthesized segment keys depend on
/// visit order, and this keeps them stable across runs.
#[derive(Debug, Deserialize)]
pub struct SourceFlag {
    pub key: String,
    pub name: String,
    pub description: String,
    pub variations: Vec<Variation>,
    pub environments: BTreeMap<String, EnvironmentConfig>,
}

#[derive(Debug, Deserialize)]
pub struct Variation {
    pub value: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct EnvironmentConfig {
    pub rules: Vec<SourceRule>,
}

/// One targeting rule. A rule with a `rollout` is percentage-based;
/// otherwise it serves a single `variation` at 100%.
#[derive(Debug, Deserialize)]
pub struct SourceRule {
    pub clauses: Vec<Clause>,
    pub rollout: Option<Rollout>,
    pub variation: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct Rollout {
    pub variations: Vec<WeightedVariation>,
}

#[derive(Debug, Deserialize)]
pub struct WeightedVariation {
    pub variation: usize,
    pub weight: i64,
}

#[derive(Debug, Deserialize)]
pub struct Clause {
    pub attribute: String,
    pub op: String,
    pub values: Vec<String>,
}

/// Native LaunchDarkly segment for one environment.
#[derive(Debug, Deserialize)]
pub struct SourceSegment {
    pub key: String,
    pub rules: Vec<SegmentRule>,
}

#[derive(Debug, Deserialize)]
pub struct SegmentRule {
    pub clauses: Vec<Clause>,
}

/// Single-page list envelope shared by the flags and segments endpoints.
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
}

// HELPER FUNCTIONS

impl Clause {
    /// Only the first clause value is carried over; multi-value clauses
    /// are narrowed to their first entry.
    pub fn single_value(&self) -> Result<String, Error> {
        self.values
            .first()
            .cloned()
            .ok_or_else(|| Error::EmptyClauseValues {
                attribute: self.attribute.clone(),
            })
    }
}

impl Variation {
    pub fn value_string(&self) -> String {
        scalar_to_string(&self.value)
    }
}

/// Renders a JSON scalar the way it reads in the source UI: strings
/// unquoted, everything else in its JSON form.
fn scalar_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
