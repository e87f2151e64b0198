//! Declarative payload schemas.
//!
//! A schema is plain data: an [`ObjectSchema`] lists the accepted fields and
//! the rule each one must satisfy. [`ObjectSchema::validate`] walks those
//! rules against a decoded JSON value and stops at the first violation.

use serde_json::{Map, Value};
use thiserror::Error;

/// Largest integer that survives a round trip through an IEEE-754 double.
pub const MAX_SAFE_INTEGER: i64 = (1 << 53) - 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text { allow_empty: bool },
    Integer { min: Option<i64>, max: Option<i64> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldRule {
    /// Non-empty text unless [`FieldRule::allow_empty`] is applied.
    pub fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text { allow_empty: false },
            required: false,
        }
    }

    pub fn integer(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Integer {
                min: None,
                max: None,
            },
            required: false,
        }
    }

    pub fn allow_empty(mut self) -> Self {
        if let FieldKind::Text { allow_empty } = &mut self.kind {
            *allow_empty = true;
        }
        self
    }

    pub fn min(mut self, bound: i64) -> Self {
        if let FieldKind::Integer { min, .. } = &mut self.kind {
            *min = Some(bound);
        }
        self
    }

    pub fn max(mut self, bound: i64) -> Self {
        if let FieldKind::Integer { max, .. } = &mut self.kind {
            *max = Some(bound);
        }
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Checks `value` and returns it in normal form: integers written as
    /// `10.0` or `1e1` come back as the JSON integer `10`.
    fn check(&self, value: &Value) -> Result<Value, ValidationError> {
        match &self.kind {
            FieldKind::Text { allow_empty } => match value {
                Value::String(s) if s.is_empty() && !allow_empty => {
                    Err(ValidationError::Empty { field: self.name })
                }
                Value::String(_) => Ok(value.clone()),
                _ => Err(ValidationError::NotText { field: self.name }),
            },
            FieldKind::Integer { min, max } => {
                let n = self.integer_value(value)?;
                if let Some(min) = *min {
                    if n < min {
                        return Err(ValidationError::BelowMin {
                            field: self.name,
                            min,
                        });
                    }
                }
                if let Some(max) = *max {
                    if n > max {
                        return Err(ValidationError::AboveMax {
                            field: self.name,
                            max,
                        });
                    }
                }
                Ok(Value::from(n))
            }
        }
    }

    fn integer_value(&self, value: &Value) -> Result<i64, ValidationError> {
        const SAFE: std::ops::RangeInclusive<i64> = -MAX_SAFE_INTEGER..=MAX_SAFE_INTEGER;

        if let Some(n) = value.as_i64() {
            return if SAFE.contains(&n) {
                Ok(n)
            } else {
                Err(ValidationError::UnsafeInteger { field: self.name })
            };
        }

        // Unsigned values past i64::MAX and float-form numbers land here.
        let f = value
            .as_f64()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .ok_or(ValidationError::NotInteger { field: self.name })?;
        if f.abs() > MAX_SAFE_INTEGER as f64 {
            return Err(ValidationError::UnsafeInteger { field: self.name });
        }
        Ok(f as i64)
    }
}

/// A closed object schema: keys not listed in `fields` are rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSchema {
    pub fields: Vec<FieldRule>,
}

impl ObjectSchema {
    pub fn new(fields: Vec<FieldRule>) -> Self {
        Self { fields }
    }

    /// Returns the payload with every field in normal form.
    pub fn validate(&self, value: &Value) -> Result<Value, ValidationError> {
        let object = value.as_object().ok_or(ValidationError::NotAnObject)?;

        self.reject_unknown(object)?;

        let mut normalized = Map::with_capacity(object.len());
        for rule in &self.fields {
            match object.get(rule.name) {
                Some(field) => {
                    normalized.insert(rule.name.to_string(), rule.check(field)?);
                }
                None if rule.required => {
                    return Err(ValidationError::Missing { field: rule.name })
                }
                None => {}
            }
        }

        Ok(Value::Object(normalized))
    }

    fn reject_unknown(&self, object: &Map<String, Value>) -> Result<(), ValidationError> {
        match object
            .keys()
            .find(|key| !self.fields.iter().any(|rule| rule.name == key.as_str()))
        {
            Some(key) => Err(ValidationError::UnknownField(key.clone())),
            None => Ok(()),
        }
    }
}

/// Shape accepted by `POST /item`.
pub fn item_schema() -> ObjectSchema {
    ObjectSchema::new(vec![
        FieldRule::text("name").required(),
        FieldRule::integer("quantity").min(0).required(),
    ])
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("payload must be an object")]
    NotAnObject,

    #[error("\"{0}\" is not allowed")]
    UnknownField(String),

    #[error("\"{field}\" is required")]
    Missing { field: &'static str },

    #[error("\"{field}\" is not allowed to be empty")]
    Empty { field: &'static str },

    #[error("\"{field}\" must be a string")]
    NotText { field: &'static str },

    #[error("\"{field}\" must be an integer")]
    NotInteger { field: &'static str },

    #[error("\"{field}\" must be a safe number")]
    UnsafeInteger { field: &'static str },

    #[error("\"{field}\" must be greater than or equal to {min}")]
    BelowMin { field: &'static str, min: i64 },

    #[error("\"{field}\" must be less than or equal to {max}")]
    AboveMax { field: &'static str, max: i64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_well_formed_item() {
        let payload = json!({ "name": "bolt", "quantity": 10 });
        assert_eq!(item_schema().validate(&payload), Ok(payload));
    }

    #[test]
    fn accepts_zero_quantity() {
        assert!(item_schema()
            .validate(&json!({ "name": "bolt", "quantity": 0 }))
            .is_ok());
    }

    #[test]
    fn rejects_negative_quantity() {
        assert_eq!(
            item_schema().validate(&json!({ "name": "bolt", "quantity": -1 })),
            Err(ValidationError::BelowMin {
                field: "quantity",
                min: 0
            })
        );
    }

    #[test]
    fn rejects_fractional_quantity() {
        assert_eq!(
            item_schema().validate(&json!({ "name": "bolt", "quantity": 1.5 })),
            Err(ValidationError::NotInteger { field: "quantity" })
        );
    }

    #[test]
    fn float_form_integers_are_normalized() {
        let expected = json!({ "name": "bolt", "quantity": 10 });
        for quantity in [json!(10.0), serde_json::from_str::<Value>("1e1").unwrap()] {
            let normalized = item_schema()
                .validate(&json!({ "name": "bolt", "quantity": quantity }))
                .unwrap();
            assert_eq!(normalized, expected);
            assert_eq!(normalized["quantity"].as_i64(), Some(10));
        }
    }

    #[test]
    fn rejects_float_form_quantity_beyond_safe_range() {
        assert_eq!(
            item_schema().validate(&json!({ "name": "bolt", "quantity": 1e300 })),
            Err(ValidationError::UnsafeInteger { field: "quantity" })
        );
    }

    #[test]
    fn rejects_numeric_string_quantity() {
        assert_eq!(
            item_schema().validate(&json!({ "name": "bolt", "quantity": "10" })),
            Err(ValidationError::NotInteger { field: "quantity" })
        );
    }

    #[test]
    fn rejects_quantity_beyond_safe_range() {
        assert_eq!(
            item_schema().validate(&json!({ "name": "bolt", "quantity": MAX_SAFE_INTEGER + 1 })),
            Err(ValidationError::UnsafeInteger { field: "quantity" })
        );
    }

    #[test]
    fn rejects_non_text_name() {
        assert_eq!(
            item_schema().validate(&json!({ "name": 42, "quantity": 1 })),
            Err(ValidationError::NotText { field: "name" })
        );
    }

    #[test]
    fn rejects_empty_name() {
        assert_eq!(
            item_schema().validate(&json!({ "name": "", "quantity": 1 })),
            Err(ValidationError::Empty { field: "name" })
        );
    }

    #[test]
    fn empty_text_allowed_when_opted_in() {
        let schema = ObjectSchema::new(vec![FieldRule::text("note").allow_empty()]);
        assert!(schema.validate(&json!({ "note": "" })).is_ok());
    }

    #[test]
    fn rejects_empty_object() {
        assert_eq!(
            item_schema().validate(&json!({})),
            Err(ValidationError::Missing { field: "name" })
        );
    }

    #[test]
    fn rejects_unknown_keys() {
        assert_eq!(
            item_schema().validate(&json!({ "name": "bolt", "quantity": 1, "_id": "abc" })),
            Err(ValidationError::UnknownField("_id".to_string()))
        );
    }

    #[test]
    fn rejects_non_object_payloads() {
        for payload in [json!([]), json!(null), json!("bolt"), json!(3)] {
            assert_eq!(item_schema().validate(&payload), Err(ValidationError::NotAnObject));
        }
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let schema = ObjectSchema::new(vec![FieldRule::text("note")]);
        assert!(schema.validate(&json!({})).is_ok());
    }

    #[test]
    fn upper_bound_is_enforced() {
        let schema = ObjectSchema::new(vec![FieldRule::integer("n").max(5)]);
        assert_eq!(
            schema.validate(&json!({ "n": 6 })),
            Err(ValidationError::AboveMax { field: "n", max: 5 })
        );
    }
}
