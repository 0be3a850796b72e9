//! # Serialization Strategies
//!
//! Concrete [`JsonStrategy`] implementations for the two API surfaces:
//!
//! - [`JsonApiStrategy`] — JSON:API resource objects
//!   (`{"type", "id", "attributes"}`) for identified entities.
//! - [`FlatJsonStrategy`] — the legacy flat representation.
//!
//! Both apply a [`TimestampFormat`] to every string in the entity's default
//! representation that parses as RFC 3339. Everything else passes through
//! unchanged, so two strategies differing only in timestamp format produce
//! output differing only in timestamp fields. Error objects serialize
//! themselves and never reach a strategy.

use std::fmt::Write as _;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};

use jsonmail_core::json::kind_of;
use jsonmail_core::{JsonError, JsonStrategy, Serializable};

use crate::config::ConfigError;

/// How timestamps are rendered.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TimestampFormat {
    /// RFC 3339, as produced by the entity (unchanged).
    #[default]
    Rfc3339,
    /// Integer seconds since the Unix epoch.
    UnixSeconds,
    /// A chrono `strftime` pattern, rendered in UTC.
    Pattern(String),
}

impl TimestampFormat {
    /// Parse `rfc3339`, `unix`, or a `strftime` pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTimestampPattern`] if the pattern
    /// contains an unknown specifier or no specifier at all (a misspelled
    /// format name such as `iso8601` would otherwise replace every timestamp
    /// with literal text).
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.trim() {
            "rfc3339" | "RFC3339" => Ok(Self::Rfc3339),
            "unix" | "UNIX" => Ok(Self::UnixSeconds),
            pattern => {
                let mut specifiers = 0;
                for item in StrftimeItems::new(pattern) {
                    match item {
                        Item::Error => {
                            return Err(ConfigError::InvalidTimestampPattern(pattern.to_string()))
                        }
                        Item::Numeric(..) | Item::Fixed(_) => specifiers += 1,
                        _ => {}
                    }
                }
                if specifiers == 0 {
                    return Err(ConfigError::InvalidTimestampPattern(pattern.to_string()));
                }
                Ok(Self::Pattern(pattern.to_string()))
            }
        }
    }

    /// Re-render every RFC 3339 string in `value`.
    pub fn apply(&self, value: Value) -> Value {
        if *self == Self::Rfc3339 {
            return value;
        }
        match value {
            Value::String(s) => match DateTime::parse_from_rfc3339(&s) {
                Ok(at) => self.render(&at.with_timezone(&Utc)).unwrap_or(Value::String(s)),
                Err(_) => Value::String(s),
            },
            Value::Array(items) => Value::Array(items.into_iter().map(|v| self.apply(v)).collect()),
            Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, self.apply(v)))
                    .collect::<Map<_, _>>(),
            ),
            other => other,
        }
    }

    fn render(&self, at: &DateTime<Utc>) -> Option<Value> {
        match self {
            Self::Rfc3339 => None,
            Self::UnixSeconds => Some(Value::from(at.timestamp())),
            Self::Pattern(pattern) => {
                let mut out = String::new();
                // An invalid pattern surfaces as fmt::Error; keep the original string.
                write!(out, "{}", at.format_with_items(StrftimeItems::new(pattern))).ok()?;
                Some(Value::String(out))
            }
        }
    }
}

/// Legacy flat JSON: the entity's own representation.
#[derive(Debug, Clone, Default)]
pub struct FlatJsonStrategy {
    pub timestamps: TimestampFormat,
}

impl FlatJsonStrategy {
    pub fn new(timestamps: TimestampFormat) -> Self {
        Self { timestamps }
    }
}

impl JsonStrategy for FlatJsonStrategy {
    fn to_json(&self, source: &dyn Serializable) -> Result<Value, JsonError> {
        Ok(self.timestamps.apply(source.to_json_value()?))
    }
}

/// JSON:API resource objects for identified entities.
///
/// An entity exposing both `resource_type` and `resource_id` renders as
/// `{"type", "id", "attributes"}`, with `type` and `id` removed from the
/// attributes. Unidentified entities (error objects, plain values) render
/// flat.
#[derive(Debug, Clone, Default)]
pub struct JsonApiStrategy {
    pub timestamps: TimestampFormat,
}

impl JsonApiStrategy {
    pub fn new(timestamps: TimestampFormat) -> Self {
        Self { timestamps }
    }
}

impl JsonStrategy for JsonApiStrategy {
    fn to_json(&self, source: &dyn Serializable) -> Result<Value, JsonError> {
        let value = self.timestamps.apply(source.to_json_value()?);
        let (Some(resource_type), Some(id)) = (source.resource_type(), source.resource_id()) else {
            return Ok(value);
        };
        let mut attributes = match value {
            Value::Object(map) => map,
            other => {
                return Err(JsonError::NotAnObject {
                    resource_type: resource_type.to_string(),
                    found: kind_of(&other),
                })
            }
        };
        attributes.remove("id");
        attributes.remove("type");
        Ok(json!({
            "type": resource_type,
            "id": id,
            "attributes": attributes,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonmail_core::json::to_plain_json;
    use jsonmail_core::{ErrorObject, TypedList};
    use serde::Serialize;

    #[derive(Serialize)]
    struct MessageItem {
        id: String,
        subject: String,
        date: DateTime<Utc>,
        seen: bool,
    }

    impl Serializable for MessageItem {
        fn to_json_value(&self) -> Result<Value, JsonError> {
            to_plain_json(self)
        }

        fn resource_type(&self) -> Option<&str> {
            Some("MessageItem")
        }

        fn resource_id(&self) -> Option<String> {
            Some(self.id.clone())
        }
    }

    /// Identified, but renders as a bare string.
    struct Opaque;

    impl Serializable for Opaque {
        fn to_json_value(&self) -> Result<Value, JsonError> {
            Ok(json!("opaque"))
        }

        fn resource_type(&self) -> Option<&str> {
            Some("Opaque")
        }

        fn resource_id(&self) -> Option<String> {
            Some("1".to_string())
        }
    }

    fn message() -> MessageItem {
        MessageItem {
            id: "311".to_string(),
            subject: "Quarterly report".to_string(),
            date: DateTime::parse_from_rfc3339("2026-01-15T12:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            seen: false,
        }
    }

    #[test]
    fn parse_formats() {
        assert_eq!(TimestampFormat::parse("rfc3339").unwrap(), TimestampFormat::Rfc3339);
        assert_eq!(TimestampFormat::parse("unix").unwrap(), TimestampFormat::UnixSeconds);
        assert_eq!(
            TimestampFormat::parse("%Y-%m-%d %H:%M").unwrap(),
            TimestampFormat::Pattern("%Y-%m-%d %H:%M".to_string())
        );
        assert!(TimestampFormat::parse("%Q").is_err());
    }

    #[test]
    fn parse_rejects_patterns_without_specifiers() {
        for typo in ["rfc-3339", "iso8601", "%%", "   "] {
            assert_eq!(
                TimestampFormat::parse(typo),
                Err(ConfigError::InvalidTimestampPattern(typo.trim().to_string())),
                "{typo:?} accepted"
            );
        }
        assert!(TimestampFormat::parse("day %d").is_ok());
    }

    #[test]
    fn flat_rfc3339_is_default_representation() {
        let m = message();
        let flat = m.to_json(Some(&FlatJsonStrategy::default())).unwrap();
        assert_eq!(flat, m.to_json_value().unwrap());
    }

    #[test]
    fn strategies_differ_only_in_timestamp_fields() {
        let m = message();
        let a = m
            .to_json(Some(&FlatJsonStrategy::new(TimestampFormat::UnixSeconds)))
            .unwrap();
        let b = m
            .to_json(Some(&FlatJsonStrategy::new(
                TimestampFormat::parse("%Y-%m-%d %H:%M").unwrap(),
            )))
            .unwrap();

        assert_eq!(a["date"], json!(1_768_478_400_i64));
        assert_eq!(b["date"], json!("2026-01-15 12:00"));

        let (Value::Object(a), Value::Object(b)) = (a, b) else {
            panic!("expected objects");
        };
        for (key, value) in &a {
            if key != "date" {
                assert_eq!(Some(value), b.get(key), "field {key} differs");
            }
        }
        assert_eq!(a.len(), b.len());
    }

    #[test]
    fn jsonapi_wraps_identified_entities() {
        let value = message()
            .to_json(Some(&JsonApiStrategy::new(TimestampFormat::UnixSeconds)))
            .unwrap();
        assert_eq!(
            value,
            json!({
                "type": "MessageItem",
                "id": "311",
                "attributes": {
                    "subject": "Quarterly report",
                    "date": 1_768_478_400_i64,
                    "seen": false,
                },
            })
        );
    }

    #[test]
    fn jsonapi_leaves_error_objects_flat() {
        let error = ErrorObject::new("E1", "T1").with_detail("D1");
        let value = error.to_json(Some(&JsonApiStrategy::default())).unwrap();
        assert_eq!(value, json!({"code": "E1", "title": "T1", "detail": "D1"}));
    }

    #[test]
    fn jsonapi_rejects_identified_non_object() {
        let err = JsonApiStrategy::default().to_json(&Opaque).unwrap_err();
        match err {
            JsonError::NotAnObject {
                resource_type,
                found,
            } => {
                assert_eq!(resource_type, "Opaque");
                assert_eq!(found, "string");
            }
            other => panic!("expected NotAnObject, got: {other}"),
        }
    }

    #[test]
    fn typed_list_renders_resources_in_order() {
        let mut second = message();
        second.id = "312".to_string();
        let list: TypedList<MessageItem> = vec![message(), second].into();
        let values = list.to_json(Some(&JsonApiStrategy::default())).unwrap();
        let ids: Vec<&str> = values.iter().map(|v| v["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["311", "312"]);
    }

    #[test]
    fn strategy_on_list_sees_default_representation() {
        let list: TypedList<MessageItem> = vec![message()].into();
        let strategy = JsonApiStrategy::default();

        let direct = strategy.to_json(&list).unwrap();
        assert_eq!(direct[0]["id"], "311");
        assert!(direct[0].get("attributes").is_none());

        let per_element = Serializable::to_json(&list, Some(&strategy)).unwrap();
        assert_eq!(per_element[0]["type"], "MessageItem");
        assert_eq!(per_element[0]["attributes"]["subject"], "Quarterly report");
    }

    #[test]
    fn nested_timestamps_are_rewritten() {
        let value = json!({"history": [{"at": "2026-01-15T12:00:00+00:00"}], "note": "not a date"});
        let rewritten = TimestampFormat::UnixSeconds.apply(value);
        assert_eq!(
            rewritten,
            json!({"history": [{"at": 1_768_478_400_i64}], "note": "not a date"})
        );
    }
}
