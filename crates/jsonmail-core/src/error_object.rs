//! # JSON:API Error Objects
//!
//! An [`ErrorObject`] describes one independent problem. An
//! [`ErrorObjectList`] collects every problem found on one failure occasion
//! (e.g. all failed validation rules) and renders as the JSON:API `errors`
//! array:
//!
//! ```json
//! [{"code": "E1", "title": "T1"}, {"code": "E2", "title": "T2", "detail": "D2"}]
//! ```
//!
//! Optional keys are omitted when absent, never emitted as `null`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::collection::TypedList;
use crate::json::{to_plain_json, JsonError, JsonStrategy, Serializable};

/// A structured descriptor of one failure.
///
/// Immutable once built: a new problem yields a new `ErrorObject`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorObject {
    code: String,
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<String>,
}

impl ErrorObject {
    /// Create an error object with the required `code` and `title`.
    pub fn new(code: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            title: title.into(),
            detail: None,
            source: None,
        }
    }

    /// Attach a human-readable explanation.
    pub fn with_detail(self, detail: impl Into<String>) -> Self {
        Self {
            detail: Some(detail.into()),
            ..self
        }
    }

    /// Attach a pointer to the offending input, e.g. `/data/attributes/email`.
    pub fn with_source(self, source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            ..self
        }
    }

    /// Machine-readable identifier.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Short human summary.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

/// Error objects serialize unconditionally. The `errors` wire shape is fixed
/// (string keys and string values), so no strategy may rewrite it.
impl Serializable for ErrorObject {
    fn to_json_value(&self) -> Result<Value, JsonError> {
        to_plain_json(self)
    }

    fn to_json(&self, _strategy: Option<&dyn JsonStrategy>) -> Result<Value, JsonError> {
        self.to_json_value()
    }
}

/// The errors of one failure occasion, in the order they were found.
pub type ErrorObjectList = TypedList<ErrorObject>;

/// Shared empty list handed out by failures that carry no errors.
pub(crate) static EMPTY_ERRORS: ErrorObjectList = TypedList::new();

impl TypedList<ErrorObject> {
    /// A list holding exactly one error.
    pub fn single(error: ErrorObject) -> Self {
        Self::from(vec![error])
    }

    /// The `code` of every error, in order.
    pub fn codes(&self) -> Vec<&str> {
        self.iter().map(ErrorObject::code).collect()
    }
}
