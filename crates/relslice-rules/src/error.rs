use thiserror::Error;

/// A single user-visible error for any malformed rule file fragment — no partial
/// acceptance of a rule file, per SPEC_FULL.md §4.1.
#[derive(Debug, Error)]
pub enum RuleLoadError {
    #[error("could not read rule file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("rule file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid rule: {fragment}. {reason}")]
    Invalid { fragment: String, reason: String },

    #[error("tables in source rules should be unique. Found duplicate: {table}")]
    DuplicateSourceTable { table: String },

    #[error("unknown rule type: {rule_type}")]
    UnknownRuleType { rule_type: String },

    #[error("rule type {rule_type} is not implemented as a data-graph rule; try using it without 'where'")]
    UnsupportedDataGraphRule { rule_type: String },

    #[error("table '{table}' referenced by a rule was not found in the database")]
    TableNotFound { table: String },
}

impl RuleLoadError {
    pub fn invalid(fragment: impl serde::Serialize, reason: impl Into<String>) -> Self {
        let fragment = serde_json::to_string(&fragment).unwrap_or_else(|_| "<unserializable>".to_string());
        RuleLoadError::Invalid {
            fragment,
            reason: reason.into(),
        }
    }
}
