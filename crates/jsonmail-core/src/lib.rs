//! # jsonmail-core — Foundational Types for the jsonmail JSON:API Service
//!
//! This crate is the leaf of the jsonmail workspace. It defines how entities
//! render to JSON, how collections stay homogeneous, and how failures are
//! collected and classified for the HTTP boundary. It performs no I/O and
//! knows nothing about HTTP frameworks.
//!
//! ## Key Design Principles
//!
//! 1. **Rendering policy is injected.** Entities implement [`Serializable`];
//!    formatting decisions arrive as a `&dyn` [`JsonStrategy`] per call site.
//!
//! 2. **Homogeneity is a type-level fact.** [`TypedList<T>`] only holds `T`.
//!    Type-erased values go through [`TypedList::try_push`], which rejects a
//!    foreign type with [`TypeMismatchError`].
//!
//! 3. **One failure, one complete set of reasons.** The bad-request kinds take
//!    their [`ErrorObjectList`] exactly once.
//!
//! 4. **Classification is per kind.** Every failure's [`StatusClass`] is fixed
//!    by its type; [`ServiceError`] unifies the kinds for propagation.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `jsonmail-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Lists and failures are request-scoped and single-writer; mutation needs
//!   `&mut`.

pub mod collection;
pub mod error;
pub mod error_object;
pub mod json;

// Re-export primary types for ergonomic imports.
pub use collection::{Entity, EntityType, TypeMismatchError, TypedList};
pub use error::{
    BadRequestError, ClassifiedError, ErrorsAlreadySet, NotFound, RepositoryAccessError,
    RepositoryFailure, ResourceNotFoundError, ServiceError, StatusClass, UnexpectedResolveError,
    ValidationError,
};
pub use error_object::{ErrorObject, ErrorObjectList};
pub use json::{JsonError, JsonStrategy, Serializable};
