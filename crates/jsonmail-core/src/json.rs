//! # JSON Rendering Contracts
//!
//! Defines the two capabilities every response body flows through:
//!
//! - [`Serializable`] — an entity that can produce its own plain JSON
//!   representation (objects, arrays, primitives; never a cycle).
//! - [`JsonStrategy`] — an injected rendering policy (timestamp format,
//!   resource envelopes, key layout) applied to a `Serializable` without the
//!   entity depending on a concrete renderer.
//!
//! ## Contract
//!
//! An entity either serializes itself unconditionally (override
//! [`Serializable::to_json`] and ignore the strategy), or defers to the
//! strategy when one is supplied and falls back to
//! [`Serializable::to_json_value`] otherwise. The default representation
//! renders timestamps as RFC 3339 strings, which is the format strategies
//! recognise when applying date rules.
//!
//! JSON produced here is always a tree: `serde_json::Value` owns its
//! children, so the acyclicity requirement holds by construction.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Error produced while rendering an entity to JSON.
#[derive(Error, Debug)]
pub enum JsonError {
    /// The entity's `Serialize` impl failed (e.g. a map with non-string keys).
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A strategy required a JSON object but the entity rendered something else.
    #[error("expected a JSON object for resource type {resource_type:?}, got {found}")]
    NotAnObject {
        /// The resource type the strategy was rendering.
        resource_type: String,
        /// JSON kind actually produced (`array`, `string`, ...).
        found: &'static str,
    },
}

/// A rendering policy that converts a [`Serializable`] into plain JSON.
///
/// Implementations are stateless beyond their formatting rules and shared
/// across requests, hence `Send + Sync`.
pub trait JsonStrategy: Send + Sync {
    /// Render `source` into a plain JSON value.
    fn to_json(&self, source: &dyn Serializable) -> Result<Value, JsonError>;
}

/// An entity that can produce its own plain JSON representation.
pub trait Serializable {
    /// The default, strategy-free representation.
    fn to_json_value(&self) -> Result<Value, JsonError>;

    /// Render through `strategy` when supplied, otherwise fall back to
    /// [`to_json_value`](Self::to_json_value).
    fn to_json(&self, strategy: Option<&dyn JsonStrategy>) -> Result<Value, JsonError>
    where
        Self: Sized,
    {
        match strategy {
            Some(strategy) => strategy.to_json(self),
            None => self.to_json_value(),
        }
    }

    /// JSON:API resource type, for entities exposed as resources.
    fn resource_type(&self) -> Option<&str> {
        None
    }

    /// JSON:API resource identifier, for entities exposed as resources.
    fn resource_id(&self) -> Option<String> {
        None
    }
}

/// Serialize any `serde` value into a plain JSON tree.
///
/// Convenience for `Serializable::to_json_value` impls backed by a
/// `#[derive(Serialize)]`.
pub fn to_plain_json<T: Serialize + ?Sized>(value: &T) -> Result<Value, JsonError> {
    Ok(serde_json::to_value(value)?)
}

/// Name of a JSON value's kind, for error messages.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
