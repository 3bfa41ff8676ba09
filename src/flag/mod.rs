//! Feature flag documents and the edits the webhook applies to them.
//!
//! A flag document looks like:
//!
//! ```json
//! {
//!     "environments": {
//!         "production": {
//!             "defaultVariation": false,
//!             "rules": [
//!                 { "variation": true, "versions": { "start": "4.0" } }
//!             ]
//!         }
//!     }
//! }
//! ```
//!
//! Only `environments.production` is touched; everything else, including key
//! order, is carried through unchanged.

use serde_json::{Map, Value, json};

use crate::errors::FlagError;

pub mod format;

pub use format::format_document;

pub const TARGET_ENVIRONMENT: &str = "production";
const RULES_KEY: &str = "rules";
const DEFAULT_VARIATION_KEY: &str = "defaultVariation";

/// How `defaultVariation` is written when a flag is switched on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum DefaultVariation {
    /// JSON `true`
    #[default]
    Boolean,
    /// JSON `"true"`, as older tooling wrote it
    String,
}

impl DefaultVariation {
    pub fn on_value(self) -> Value {
        match self {
            DefaultVariation::Boolean => Value::Bool(true),
            DefaultVariation::String => Value::String("true".to_string()),
        }
    }
}

/// The edit requested by a webhook call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagChange {
    /// Enable the flag from `version` onwards by appending a rollout rule.
    Rollout { version: String },
    /// Enable the flag unconditionally.
    TurnOn,
}

impl FlagChange {
    /// A blank or missing release version means "turn on".
    pub fn from_release(release_version: Option<&str>) -> Self {
        match release_version.map(str::trim) {
            Some(v) if !v.is_empty() => FlagChange::Rollout {
                version: v.to_string(),
            },
            _ => FlagChange::TurnOn,
        }
    }
}

/// The rule appended for a release: on from `<version>.0`.
pub fn rollout_rule(version: &str) -> Value {
    json!({
        "variation": true,
        "versions": {
            "start": format!("{version}.0")
        }
    })
}

/// Parses the text of a flag file.
pub fn parse_document(text: &str) -> Result<Value, FlagError> {
    let doc: Value = serde_json::from_str(text)?;
    if !doc.is_object() {
        return Err(FlagError::MalformedDocument(
            "top level is not an object".to_string(),
        ));
    }
    Ok(doc)
}

/// Applies `change` to the production environment of `doc`.
///
/// `rules` always ends up as a list. A document carrying a bare rule object
/// under `rules` has that object wrapped into the list ahead of the new rule.
pub fn apply_change(
    doc: &mut Value,
    change: &FlagChange,
    default_variation: DefaultVariation,
) -> Result<(), FlagError> {
    let production = production_mut(doc)?;

    match change {
        FlagChange::Rollout { version } => {
            let rule = rollout_rule(version);
            match production.get_mut(RULES_KEY) {
                Some(Value::Array(rules)) => rules.push(rule),
                Some(existing) if existing.is_object() => {
                    let previous = existing.take();
                    *existing = Value::Array(vec![previous, rule]);
                }
                Some(slot) if slot.is_null() => *slot = Value::Array(vec![rule]),
                Some(other) => {
                    return Err(FlagError::MalformedDocument(format!(
                        "`{RULES_KEY}` must be a list, found {other}"
                    )));
                }
                None => {
                    production.insert(RULES_KEY.to_string(), Value::Array(vec![rule]));
                }
            }
        }
        FlagChange::TurnOn => {
            production.insert(
                DEFAULT_VARIATION_KEY.to_string(),
                default_variation.on_value(),
            );
        }
    }

    Ok(())
}

fn production_mut(doc: &mut Value) -> Result<&mut Map<String, Value>, FlagError> {
    doc.get_mut("environments")
        .and_then(|envs| envs.get_mut(TARGET_ENVIRONMENT))
        .and_then(Value::as_object_mut)
        .ok_or_else(|| {
            FlagError::MalformedDocument(format!(
                "missing `environments.{TARGET_ENVIRONMENT}` object"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_from_release() {
        assert_eq!(FlagChange::from_release(None), FlagChange::TurnOn);
        assert_eq!(FlagChange::from_release(Some("")), FlagChange::TurnOn);
        assert_eq!(FlagChange::from_release(Some("  ")), FlagChange::TurnOn);
        assert_eq!(
            FlagChange::from_release(Some(" 12 ")),
            FlagChange::Rollout {
                version: "12".to_string()
            }
        );
    }

    #[test]
    fn test_rollout_appends_to_existing_rules() {
        let mut d = json!({
            "environments": { "production": {
                "defaultVariation": false,
                "rules": [
                    { "variation": true, "versions": { "start": "3.0" } }
                ]
            }}
        });

        apply_change(
            &mut d,
            &FlagChange::Rollout {
                version: "4".into(),
            },
            DefaultVariation::Boolean,
        )
        .unwrap();

        let rules = d["environments"]["production"]["rules"].as_array().unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0]["versions"]["start"], "3.0");
        assert_eq!(
            rules[1],
            json!({ "variation": true, "versions": { "start": "4.0" } })
        );
        // untouched
        assert_eq!(d["environments"]["production"]["defaultVariation"], false);
    }

    #[test]
    fn test_rollout_creates_single_element_list() {
        let mut d = json!({ "environments": { "production": {} } });

        apply_change(
            &mut d,
            &FlagChange::Rollout {
                version: "5".into(),
            },
            DefaultVariation::Boolean,
        )
        .unwrap();

        assert_eq!(
            d["environments"]["production"]["rules"],
            json!([{ "variation": true, "versions": { "start": "5.0" } }])
        );
    }

    #[test]
    fn test_rollout_wraps_bare_rule_object() {
        let mut d = json!({ "environments": { "production": {
            "rules": { "variation": true, "versions": { "start": "1.0" } }
        }}});

        apply_change(
            &mut d,
            &FlagChange::Rollout {
                version: "2".into(),
            },
            DefaultVariation::Boolean,
        )
        .unwrap();

        let rules = d["environments"]["production"]["rules"].as_array().unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0]["versions"]["start"], "1.0");
        assert_eq!(rules[1]["versions"]["start"], "2.0");
    }

    #[test]
    fn test_rollout_replaces_null_rules() {
        let mut d = json!({ "environments": { "production": { "rules": null } } });
        apply_change(
            &mut d,
            &FlagChange::Rollout {
                version: "7".into(),
            },
            DefaultVariation::Boolean,
        )
        .unwrap();
        assert_eq!(
            d["environments"]["production"]["rules"].as_array().unwrap().len(),
            1
        );
    }

    #[test]
    fn test_rollout_rejects_scalar_rules() {
        let mut d = json!({ "environments": { "production": { "rules": 3 } } });
        let err = apply_change(
            &mut d,
            &FlagChange::Rollout {
                version: "7".into(),
            },
            DefaultVariation::Boolean,
        )
        .unwrap_err();
        assert!(matches!(err, FlagError::MalformedDocument(_)));
    }

    #[test]
    fn test_turn_on_boolean() {
        let mut d = json!({ "environments": { "production": {
            "defaultVariation": false,
            "rules": [ { "variation": true, "versions": { "start": "3.0" } } ]
        }}});
        let rules_before = d["environments"]["production"]["rules"].clone();

        apply_change(&mut d, &FlagChange::TurnOn, DefaultVariation::Boolean).unwrap();

        assert_eq!(d["environments"]["production"]["defaultVariation"], true);
        assert_eq!(d["environments"]["production"]["rules"], rules_before);
    }

    #[test]
    fn test_turn_on_string() {
        let mut d = json!({ "environments": { "production": {} } });
        apply_change(&mut d, &FlagChange::TurnOn, DefaultVariation::String).unwrap();
        assert_eq!(d["environments"]["production"]["defaultVariation"], "true");
        assert!(d["environments"]["production"].get("rules").is_none());
    }

    #[test]
    fn test_missing_production_is_malformed() {
        for mut d in [
            json!({}),
            json!({ "environments": {} }),
            json!({ "environments": { "production": [] } }),
        ] {
            let err = apply_change(&mut d, &FlagChange::TurnOn, DefaultVariation::Boolean)
                .unwrap_err();
            assert!(matches!(err, FlagError::MalformedDocument(_)));
        }
    }

    #[test]
    fn test_parse_document() {
        assert!(parse_document("{\"environments\":{}}").is_ok());
        assert!(matches!(
            parse_document("[1, 2]"),
            Err(FlagError::MalformedDocument(_))
        ));
        assert!(matches!(parse_document("{oops"), Err(FlagError::Json(_))));
    }

    #[test]
    fn test_key_order_is_preserved() {
        let mut d = parse_document(
            r#"{"zeta":1,"environments":{"production":{"z":1,"a":2}},"alpha":3}"#,
        )
        .unwrap();
        apply_change(&mut d, &FlagChange::TurnOn, DefaultVariation::Boolean).unwrap();

        let top: Vec<&String> = d.as_object().unwrap().keys().collect();
        assert_eq!(top, ["zeta", "environments", "alpha"]);
        let prod: Vec<&String> = d["environments"]["production"]
            .as_object()
            .unwrap()
            .keys()
            .collect();
        assert_eq!(prod, ["z", "a", "defaultVariation"]);
    }
}
