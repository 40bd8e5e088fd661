// src/utils/schema.rs

use serde_json::Value;

/// JSON type a field must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
}

impl FieldKind {
    fn matches(self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Integer => value.is_i64() || value.is_u64(),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            FieldKind::String => "a string",
            FieldKind::Integer => "an integer",
        }
    }
}

/// A single property rule of an object schema.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Accept an explicit `null` in place of a value.
    pub nullable: bool,
}

impl FieldRule {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
            nullable: false,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            nullable: true,
        }
    }
}

/// Checks `value` against an object schema and returns every violation found.
///
/// Properties not named in `rules` are ignored.
pub fn check(value: &Value, rules: &[FieldRule]) -> Vec<String> {
    let Some(object) = value.as_object() else {
        return vec!["request body must be a JSON object".to_string()];
    };

    let mut errors = Vec::new();

    for rule in rules {
        match object.get(rule.name) {
            None => {
                if rule.required {
                    errors.push(format!("'{}' is required", rule.name));
                }
            }
            Some(Value::Null) if rule.nullable => {}
            Some(Value::Null) if rule.required => {
                errors.push(format!("'{}' is required", rule.name));
            }
            Some(field) => {
                if !rule.kind.matches(field) {
                    errors.push(format!("'{}' must be {}", rule.name, rule.kind.describe()));
                }
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const RULES: &[FieldRule] = &[
        FieldRule::required("title", FieldKind::String),
        FieldRule::required("pages", FieldKind::Integer),
        FieldRule::optional("url", FieldKind::String),
    ];

    #[test]
    fn accepts_valid_object() {
        let errors = check(&json!({"title": "Dune", "pages": 412}), RULES);
        assert!(errors.is_empty());
    }

    #[test]
    fn collects_every_missing_field() {
        let errors = check(&json!({}), RULES);
        assert_eq!(errors, vec!["'title' is required", "'pages' is required"]);
    }

    #[test]
    fn rejects_wrong_types() {
        let errors = check(&json!({"title": 7, "pages": "ten", "url": false}), RULES);
        assert_eq!(
            errors,
            vec![
                "'title' must be a string",
                "'pages' must be an integer",
                "'url' must be a string",
            ]
        );
    }

    #[test]
    fn fractional_number_is_not_an_integer() {
        let errors = check(&json!({"title": "Dune", "pages": 41.5}), RULES);
        assert_eq!(errors, vec!["'pages' must be an integer"]);
    }

    #[test]
    fn null_allowed_only_for_optional_fields() {
        let errors = check(&json!({"title": null, "pages": 1, "url": null}), RULES);
        assert_eq!(errors, vec!["'title' is required"]);
    }

    #[test]
    fn non_object_body_is_rejected() {
        let errors = check(&json!(["title"]), RULES);
        assert_eq!(errors, vec!["request body must be a JSON object"]);
    }
}
