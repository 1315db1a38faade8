use std::collections::HashSet;
use std::path::Path;

use serde_json::Value;

use crate::data_graph_rules::DataGraphRuleSpec;
use crate::error::RuleLoadError;
use crate::source_rules::SourceRules;
use crate::table_graph_rules::TableGraphRuleSpec;

const RULE_TYPE_NO_ENTER: &str = "no_enter";
const RULE_TYPE_NO_EXIT: &str = "no_exit";
const RULE_TYPE_LIMIT_DISTANCE: &str = "limit_distance";

/// A rule file's contents, parsed but not yet resolved against a schema: table names
/// are still raw strings.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    pub source_rules: SourceRules,
    pub table_graph_rules: Vec<TableGraphRuleSpec>,
    pub data_graph_rules: Vec<DataGraphRuleSpec>,
}

impl RuleSet {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RuleLoadError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| RuleLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let document: Value = serde_json::from_str(&text)?;
        Self::from_document(&document)
    }

    pub fn from_document(document: &Value) -> Result<Self, RuleLoadError> {
        let source_rules = Self::parse_source_rules(document)?;
        let (table_graph_rules, data_graph_rules) = Self::parse_traversal_rules(document)?;
        Ok(Self {
            source_rules,
            table_graph_rules,
            data_graph_rules,
        })
    }

    fn parse_source_rules(document: &Value) -> Result<SourceRules, RuleLoadError> {
        let raw = document.get("source_rules").and_then(Value::as_array).ok_or_else(|| {
            RuleLoadError::invalid(document.get("source_rules").cloned().unwrap_or(Value::Null), "source_rules must be an array")
        })?;

        let mut rules = SourceRules::new();
        for rule in raw {
            let table = rule
                .get("table")
                .and_then(Value::as_str)
                .ok_or_else(|| RuleLoadError::invalid(rule.clone(), "source rule must have a string 'table'"))?;
            let where_clause = rule
                .get("where")
                .and_then(Value::as_str)
                .ok_or_else(|| RuleLoadError::invalid(rule.clone(), "source rule must have a string 'where'"))?;
            let extra_keys: Vec<&String> = rule
                .as_object()
                .into_iter()
                .flat_map(|map| map.keys())
                .filter(|key| key.as_str() != "table" && key.as_str() != "where")
                .collect();
            if rule.as_object().is_none() || !extra_keys.is_empty() {
                return Err(RuleLoadError::invalid(
                    rule.clone(),
                    "source rule must be exactly {'table', 'where'}",
                ));
            }
            rules.insert(table.to_string(), where_clause.to_string())?;
        }
        Ok(rules)
    }

    fn parse_traversal_rules(
        document: &Value,
    ) -> Result<(Vec<TableGraphRuleSpec>, Vec<DataGraphRuleSpec>), RuleLoadError> {
        let raw = document.get("traversal_rules").and_then(Value::as_array).ok_or_else(|| {
            RuleLoadError::invalid(
                document.get("traversal_rules").cloned().unwrap_or(Value::Null),
                "traversal_rules must be an array",
            )
        })?;

        let mut table_graph_rules = Vec::new();
        let mut data_graph_rules = Vec::new();

        for rule in raw {
            let rule_type = rule
                .get("type")
                .and_then(Value::as_str)
                .ok_or_else(|| RuleLoadError::invalid(rule.clone(), "rule must have a string 'type'"))?;
            let values = rule
                .get("values")
                .and_then(Value::as_array)
                .ok_or_else(|| RuleLoadError::invalid(rule.clone(), "rule must have an array 'values'"))?;

            let expected_keys: HashSet<&str> = ["type", "values"].into_iter().collect();
            let actual_keys: HashSet<&str> = rule.as_object().into_iter().flat_map(|m| m.keys()).map(String::as_str).collect();
            if actual_keys != expected_keys {
                return Err(RuleLoadError::invalid(rule.clone(), "rule must be exactly {'type', 'values'}"));
            }

            if !matches!(rule_type, RULE_TYPE_NO_ENTER | RULE_TYPE_NO_EXIT | RULE_TYPE_LIMIT_DISTANCE) {
                return Err(RuleLoadError::UnknownRuleType {
                    rule_type: rule_type.to_string(),
                });
            }

            for value in values {
                let table = value
                    .get("table")
                    .and_then(Value::as_str)
                    .ok_or_else(|| RuleLoadError::invalid(value.clone(), "rule value must contain 'table'"))?
                    .to_string();
                let where_clause = value.get("where").and_then(Value::as_str);

                match where_clause {
                    None => table_graph_rules.push(match rule_type {
                        RULE_TYPE_NO_ENTER => TableGraphRuleSpec::NoEnter { table },
                        RULE_TYPE_NO_EXIT => TableGraphRuleSpec::NoExit { table },
                        RULE_TYPE_LIMIT_DISTANCE => TableGraphRuleSpec::LimitDistance {
                            table,
                            max_distance: value
                                .get("max_distance")
                                .and_then(Value::as_u64)
                                .map(|n| n as u32)
                                .unwrap_or(1),
                        },
                        _ => unreachable!(),
                    }),
                    Some(where_clause) => {
                        if rule_type == RULE_TYPE_LIMIT_DISTANCE {
                            return Err(RuleLoadError::UnsupportedDataGraphRule {
                                rule_type: rule_type.to_string(),
                            });
                        }
                        data_graph_rules.push(match rule_type {
                            RULE_TYPE_NO_ENTER => DataGraphRuleSpec::NoEnter {
                                table,
                                where_clause: where_clause.to_string(),
                            },
                            RULE_TYPE_NO_EXIT => DataGraphRuleSpec::NoExit {
                                table,
                                where_clause: where_clause.to_string(),
                            },
                            _ => unreachable!(),
                        });
                    }
                }
            }
        }

        Ok((table_graph_rules, data_graph_rules))
    }
}
