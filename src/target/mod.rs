use serde::Serialize;

// MODELS
//
// The Flipt declarative document shape. Struct field order is the YAML
// field order, so it is part of the contract: documents serialize as
// namespace, flags, segments.

pub const VARIANT_FLAG_TYPE: &str = "VARIANT_FLAG_TYPE";
pub const ALL_MATCH_TYPE: &str = "ALL_MATCH_TYPE";
pub const STRING_COMPARISON_TYPE: &str = "STRING_COMPARISON_TYPE";

/// One output document per environment, written as
/// `<namespace>.features.yaml`.
#[derive(Debug, Serialize)]
pub struct EnvironmentDocument {
    pub namespace: String,
    pub flags: Vec<TargetFlag>,
    pub segments: Vec<TargetSegment>,
}

/// Flipt only supports percentage rollouts on variant flags, so every
/// migrated flag becomes a variant flag, boolean ones included.
#[derive(Debug, Clone, Serialize)]
pub struct TargetFlag {
    pub key: String,
    #[serde(rename = "type")]
    pub flag_type: String,
    pub name: String,
    pub description: String,
    pub enabled: bool,
    pub variants: Vec<Variant>,
    pub rules: Vec<TargetRule>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Variant {
    pub key: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetSegment {
    pub key: String,
    pub name: String,
    pub constraints: Vec<Constraint>,
    pub match_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Constraint {
    #[serde(rename = "type")]
    pub constraint_type: String,
    pub property: String,
    pub operator: Operator,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Eq,
    Prefix,
    Suffix,
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetRule {
    pub segment: String,
    pub distributions: Vec<Distribution>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Distribution {
    pub variant: String,
    pub rollout: f64,
}

// HELPER FUNCTIONS

impl Operator {
    /// Translate a LaunchDarkly clause operator. Anything outside the
    /// table falls back to an equality match.
    pub fn from_source_op(op: &str) -> Self {
        match op {
            "endsWith" => Operator::Suffix,
            "startsWith" => Operator::Prefix,
            _ => Operator::Eq,
        }
    }
}

impl TargetSegment {
    /// Segments carry their key as their display name.
    pub fn new(key: String, constraints: Vec<Constraint>) -> Self {
        Self {
            name: key.clone(),
            key,
            constraints,
            match_type: ALL_MATCH_TYPE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_mapping_table() {
        assert_eq!(Operator::from_source_op("endsWith"), Operator::Suffix);
        assert_eq!(Operator::from_source_op("startsWith"), Operator::Prefix);
        assert_eq!(Operator::from_source_op("in"), Operator::Eq);
        assert_eq!(Operator::from_source_op("matches"), Operator::Eq);
    }

    #[test]
    fn test_operator_serializes_lowercase() {
        assert_eq!(serde_yaml::to_string(&Operator::Suffix).unwrap().trim(), "suffix");
        assert_eq!(serde_yaml::to_string(&Operator::Prefix).unwrap().trim(), "prefix");
        assert_eq!(serde_yaml::to_string(&Operator::Eq).unwrap().trim(), "eq");
    }

    #[test]
    fn test_document_field_order_is_stable() {
        let document = EnvironmentDocument {
            namespace: "production".to_string(),
            flags: vec![TargetFlag {
                key: "dark-mode".to_string(),
                flag_type: VARIANT_FLAG_TYPE.to_string(),
                name: "Dark Mode".to_string(),
                description: String::new(),
                enabled: true,
                variants: vec![],
                rules: vec![],
            }],
            segments: vec![],
        };

        let yaml = serde_yaml::to_string(&document).unwrap();
        let namespace_at = yaml.find("namespace:").unwrap();
        let flags_at = yaml.find("flags:").unwrap();
        let segments_at = yaml.find("segments:").unwrap();
        assert!(namespace_at < flags_at && flags_at < segments_at);
        assert!(yaml.contains("type: VARIANT_FLAG_TYPE"));
    }
}
