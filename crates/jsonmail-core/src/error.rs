//! # Error Types — Status-Classified Failure Taxonomy
//!
//! Every failure the service reports to a client is one of the concrete kinds
//! below. Each kind carries a fixed [`StatusClass`]; the HTTP boundary picks
//! the response status from it and never needs to know which kind it holds.
//!
//! | Kind | Status class | Carries errors |
//! |---|---|---|
//! | [`ResourceNotFoundError`] | Not Found | no |
//! | [`RepositoryAccessError`] | Internal Server Error | no |
//! | [`UnexpectedResolveError`] | Internal Server Error | no |
//! | [`BadRequestError`] | Bad Request | yes, set once |
//! | [`ValidationError`] | Bad Request | yes, set once |
//!
//! ## Grouping Kinds
//!
//! [`NotFound`] and [`RepositoryFailure`] group concrete kinds under one
//! capability. They are traits and cannot be constructed:
//!
//! ```compile_fail
//! use jsonmail_core::error::NotFound;
//! let err = NotFound::new("mail account 7");
//! ```
//!
//! ```compile_fail
//! use jsonmail_core::error::RepositoryFailure;
//! let err = RepositoryFailure { repository: "accounts".into() };
//! ```
//!
//! ## Error Lists
//!
//! The two bad-request kinds describe one failure occasion with one complete
//! set of reasons. Build the [`ErrorObjectList`] first, then attach it once,
//! either with `with_errors` or a single `set_errors` call. A second
//! `set_errors` is a contract violation and is rejected with
//! [`ErrorsAlreadySet`].

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

use crate::error_object::{ErrorObjectList, EMPTY_ERRORS};

/// Boxed underlying cause of a server-side failure.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// HTTP-style status classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    /// 400 — caller-supplied input was malformed or failed validation.
    BadRequest,
    /// 404 — the requested resource does not exist.
    NotFound,
    /// 500 — an unrecoverable condition that is not the caller's fault.
    InternalServerError,
}

impl StatusClass {
    /// Numeric HTTP status code.
    pub const fn as_u16(self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::InternalServerError => 500,
        }
    }

    /// Machine-readable code used when a failure carries no error list.
    pub const fn code(self) -> &'static str {
        match self {
            Self::BadRequest => "BAD_REQUEST",
            Self::NotFound => "NOT_FOUND",
            Self::InternalServerError => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Canonical reason phrase.
    pub const fn reason(self) -> &'static str {
        match self {
            Self::BadRequest => "Bad Request",
            Self::NotFound => "Not Found",
            Self::InternalServerError => "Internal Server Error",
        }
    }

    /// Returns true for 5xx classes.
    pub const fn is_server_error(self) -> bool {
        self.as_u16() >= 500
    }
}

impl fmt::Display for StatusClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason())
    }
}

/// A failure with a fixed status classification.
pub trait ClassifiedError: StdError + Send + Sync + 'static {
    /// Status class of this kind. Constant for every instance.
    fn status(&self) -> StatusClass;

    /// Failure message without the kind prefix used by `Display`.
    fn message(&self) -> &str;

    /// Attached errors, or an empty list when none were attached.
    fn errors(&self) -> &ErrorObjectList {
        &EMPTY_ERRORS
    }
}

/// Groups failures reporting a missing resource.
pub trait NotFound: ClassifiedError {}

/// Groups failures of a data-access collaborator.
pub trait RepositoryFailure: ClassifiedError {
    /// Name of the repository that failed.
    fn repository(&self) -> &str;
}

/// A second error list was offered to a failure that already has one.
#[derive(Error, Debug)]
#[error("{kind} already carries an error list; rejected {} additional error(s)", .rejected.len())]
pub struct ErrorsAlreadySet {
    /// Kind of the failure that refused the list.
    pub kind: &'static str,
    /// The list that was not attached.
    pub rejected: ErrorObjectList,
}

/// Set-once storage for an attached error list.
#[derive(Debug, Default)]
struct ErrorSlot(Option<ErrorObjectList>);

impl ErrorSlot {
    fn set(&mut self, kind: &'static str, errors: ErrorObjectList) -> Result<(), ErrorsAlreadySet> {
        if self.0.is_some() {
            return Err(ErrorsAlreadySet {
                kind,
                rejected: errors,
            });
        }
        self.0 = Some(errors);
        Ok(())
    }

    fn get(&self) -> &ErrorObjectList {
        self.0.as_ref().unwrap_or(&EMPTY_ERRORS)
    }

    fn is_set(&self) -> bool {
        self.0.is_some()
    }
}

// ---------------------------------------------------------------------------
// Not found
// ---------------------------------------------------------------------------

/// A requested resource or entity does not exist.
#[derive(Error, Debug)]
#[error("resource not found: {message}")]
pub struct ResourceNotFoundError {
    message: String,
}

impl ResourceNotFoundError {
    pub const STATUS: StatusClass = StatusClass::NotFound;

    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl ClassifiedError for ResourceNotFoundError {
    fn status(&self) -> StatusClass {
        Self::STATUS
    }

    fn message(&self) -> &str {
        &self.message
    }
}

impl NotFound for ResourceNotFoundError {}

// ---------------------------------------------------------------------------
// Internal
// ---------------------------------------------------------------------------

/// A data-access collaborator failed.
///
/// Treated as internal; the core never retries.
#[derive(Error, Debug)]
#[error("repository {repository} failed: {message}")]
pub struct RepositoryAccessError {
    repository: String,
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl RepositoryAccessError {
    pub const STATUS: StatusClass = StatusClass::InternalServerError;

    pub fn new(repository: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Record the collaborator error that caused this failure.
    pub fn with_source(self, source: impl Into<BoxError>) -> Self {
        Self {
            source: Some(source.into()),
            ..self
        }
    }
}

impl ClassifiedError for RepositoryAccessError {
    fn status(&self) -> StatusClass {
        Self::STATUS
    }

    fn message(&self) -> &str {
        &self.message
    }
}

impl RepositoryFailure for RepositoryAccessError {
    fn repository(&self) -> &str {
        &self.repository
    }
}

/// Resolving a request hit a condition that is not the caller's fault.
#[derive(Error, Debug)]
#[error("unexpected resolve error: {message}")]
pub struct UnexpectedResolveError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl UnexpectedResolveError {
    pub const STATUS: StatusClass = StatusClass::InternalServerError;

    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Record the error that caused this failure.
    pub fn with_source(self, source: impl Into<BoxError>) -> Self {
        Self {
            source: Some(source.into()),
            ..self
        }
    }
}

impl ClassifiedError for UnexpectedResolveError {
    fn status(&self) -> StatusClass {
        Self::STATUS
    }

    fn message(&self) -> &str {
        &self.message
    }
}

// ---------------------------------------------------------------------------
// Bad request
// ---------------------------------------------------------------------------

/// The request was malformed.
#[derive(Error, Debug)]
#[error("bad request: {message}")]
pub struct BadRequestError {
    message: String,
    errors: ErrorSlot,
}

impl BadRequestError {
    pub const STATUS: StatusClass = StatusClass::BadRequest;

    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: ErrorSlot::default(),
        }
    }

    /// Construct with the complete error list already attached.
    pub fn with_errors(message: impl Into<String>, errors: ErrorObjectList) -> Self {
        Self {
            message: message.into(),
            errors: ErrorSlot(Some(errors)),
        }
    }

    /// Attach the complete error list.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorsAlreadySet`] if a list is already attached; the
    /// attached list is kept and the offered one handed back.
    pub fn set_errors(&mut self, errors: ErrorObjectList) -> Result<(), ErrorsAlreadySet> {
        self.errors.set("BadRequestError", errors)
    }

    /// Returns true once an error list is attached.
    pub fn has_errors(&self) -> bool {
        self.errors.is_set()
    }
}

impl ClassifiedError for BadRequestError {
    fn status(&self) -> StatusClass {
        Self::STATUS
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn errors(&self) -> &ErrorObjectList {
        self.errors.get()
    }
}

/// Caller-supplied input failed one or more validation rules.
#[derive(Error, Debug)]
#[error("validation failed: {message}")]
pub struct ValidationError {
    message: String,
    errors: ErrorSlot,
}

impl ValidationError {
    pub const STATUS: StatusClass = StatusClass::BadRequest;

    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: ErrorSlot::default(),
        }
    }

    /// Construct with the complete error list already attached.
    pub fn with_errors(message: impl Into<String>, errors: ErrorObjectList) -> Self {
        Self {
            message: message.into(),
            errors: ErrorSlot(Some(errors)),
        }
    }

    /// Attach the complete error list.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorsAlreadySet`] if a list is already attached; the
    /// attached list is kept and the offered one handed back.
    pub fn set_errors(&mut self, errors: ErrorObjectList) -> Result<(), ErrorsAlreadySet> {
        self.errors.set("ValidationError", errors)
    }

    /// Returns true once an error list is attached.
    pub fn has_errors(&self) -> bool {
        self.errors.is_set()
    }
}

impl ClassifiedError for ValidationError {
    fn status(&self) -> StatusClass {
        Self::STATUS
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn errors(&self) -> &ErrorObjectList {
        self.errors.get()
    }
}

// ---------------------------------------------------------------------------
// ServiceError
// ---------------------------------------------------------------------------

/// Transport-agnostic union of every classified failure.
///
/// Domain code returns `Result<_, ServiceError>` and lets `?` lift any
/// concrete kind into it; the boundary layer maps it to its wire format.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    ResourceNotFound(#[from] ResourceNotFoundError),

    #[error(transparent)]
    RepositoryAccess(#[from] RepositoryAccessError),

    #[error(transparent)]
    UnexpectedResolve(#[from] UnexpectedResolveError),

    #[error(transparent)]
    BadRequest(#[from] BadRequestError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ServiceError {
    /// The concrete failure behind this variant.
    pub fn as_classified(&self) -> &dyn ClassifiedError {
        match self {
            Self::ResourceNotFound(e) => e,
            Self::RepositoryAccess(e) => e,
            Self::UnexpectedResolve(e) => e,
            Self::BadRequest(e) => e,
            Self::Validation(e) => e,
        }
    }

    /// Short name of the failure kind, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ResourceNotFound(_) => "resource_not_found",
            Self::RepositoryAccess(_) => "repository_access",
            Self::UnexpectedResolve(_) => "unexpected_resolve",
            Self::BadRequest(_) => "bad_request",
            Self::Validation(_) => "validation",
        }
    }
}

impl ClassifiedError for ServiceError {
    fn status(&self) -> StatusClass {
        self.as_classified().status()
    }

    fn message(&self) -> &str {
        self.as_classified().message()
    }

    fn errors(&self) -> &ErrorObjectList {
        self.as_classified().errors()
    }
}
