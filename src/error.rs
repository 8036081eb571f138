use std::path::PathBuf;

use thiserror::Error;

/// Everything that can abort a migration run. There is no partial-success
/// mode: the first error propagates to `main` and nothing is written.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Config(String),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected payload from {url}: {source}")]
    Schema {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("clause on attribute '{attribute}' has an empty values list")]
    EmptyClauseValues { attribute: String },

    #[error("flag '{flag}' references variation index {index} but only has {count} variations")]
    VariationOutOfRange {
        flag: String,
        index: usize,
        count: usize,
    },

    #[error("a rule on flag '{flag}' has neither a rollout nor a variation")]
    RuleWithoutDistribution { flag: String },

    #[error("failed to serialize document for namespace '{namespace}': {source}")]
    Serialize {
        namespace: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
