//! # Typed Collections — Entity-Homogeneous Ordered Lists
//!
//! `TypedList<T>` is an ordered, mutable container restricted to a single
//! entity type. Any consumer iterating a `TypedList` can assume one concrete
//! shape per element, which is what lets the list be serialized generically.
//!
//! ## Type Identity
//!
//! Homogeneity is enforced by the type parameter: [`TypedList::push`] only
//! accepts `T`. Values arriving through an untyped boundary as
//! `Box<dyn Entity>` go through [`TypedList::try_push`], which compares the
//! runtime [`EntityType`] against the list's declared type and rejects a
//! mismatch with [`TypeMismatchError`], leaving the list untouched.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use crate::json::{JsonError, JsonStrategy, Serializable};

/// Runtime descriptor of an entity type.
///
/// Equality and hashing use the `TypeId` only; the name is for messages.
#[derive(Debug, Clone, Copy)]
pub struct EntityType {
    id: TypeId,
    name: &'static str,
}

impl EntityType {
    /// Descriptor for `T`.
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Fully qualified type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns true if this descriptor denotes `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for EntityType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EntityType {}

impl Hash for EntityType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A type-erased entity that can be checked and recovered by a `TypedList`.
///
/// Implemented for every `'static` type. Call [`Entity::runtime_type`] on the
/// boxed value's contents (`Entity::runtime_type(boxed.as_ref())`), not on the
/// `Box` itself, which is an entity of its own.
pub trait Entity: Any {
    /// Runtime type of the concrete value.
    fn runtime_type(&self) -> EntityType;

    /// Erase to `Box<dyn Any>` for downcasting.
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any> Entity for T {
    fn runtime_type(&self) -> EntityType {
        EntityType::of::<T>()
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// An entity of the wrong type was offered to a `TypedList`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("type mismatch: list holds {expected}, got {found}")]
pub struct TypeMismatchError {
    /// The list's declared entity type.
    pub expected: EntityType,
    /// The type of the rejected value.
    pub found: EntityType,
}

/// An ordered list whose elements are all of entity type `T`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedList<T> {
    items: Vec<T>,
}

impl<T> TypedList<T> {
    /// Create an empty list.
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Create an empty list with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Append `item`, preserving insertion order.
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Remove and return the element at `index`, shifting later elements
    /// down. Returns `None` if `index` is out of bounds.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// Keep only the elements for which `keep` returns true, in order.
    pub fn retain(&mut self, keep: impl FnMut(&T) -> bool) {
        self.items.retain(keep);
    }

    /// Remove every element.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Consume the list, returning its elements in order.
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T: Any> TypedList<T> {
    /// The declared entity type. Constant for the list's lifetime.
    pub fn entity_type(&self) -> EntityType {
        EntityType::of::<T>()
    }

    /// Append a type-erased entity after checking its runtime type.
    ///
    /// # Errors
    ///
    /// Returns [`TypeMismatchError`] if `item` is not a `T`. The list is
    /// left unchanged.
    pub fn try_push(&mut self, item: Box<dyn Entity>) -> Result<(), TypeMismatchError> {
        let expected = EntityType::of::<T>();
        let found = Entity::runtime_type(item.as_ref());
        if found != expected {
            tracing::debug!(%expected, %found, "rejected entity of foreign type");
            return Err(TypeMismatchError { expected, found });
        }
        let item = item
            .into_any()
            .downcast::<T>()
            .map_err(|_| TypeMismatchError { expected, found })?;
        self.items.push(*item);
        Ok(())
    }

    /// Build a list from type-erased entities, failing on the first one
    /// that is not a `T`.
    pub fn try_from_entities(
        items: impl IntoIterator<Item = Box<dyn Entity>>,
    ) -> Result<Self, TypeMismatchError> {
        let mut list = Self::new();
        for item in items {
            list.try_push(item)?;
        }
        Ok(list)
    }
}

impl<T: Serializable> TypedList<T> {
    /// Render every element through its own serialization, in list order.
    ///
    /// Each element receives `strategy` and decides whether to use it. An
    /// empty list renders as an empty vector.
    pub fn to_json(&self, strategy: Option<&dyn JsonStrategy>) -> Result<Vec<Value>, JsonError> {
        self.items.iter().map(|item| item.to_json(strategy)).collect()
    }
}

/// A list is not a resource of its own. Per-element strategy handling only
/// happens through [`Serializable::to_json`]: a strategy invoked directly on
/// the list (`strategy.to_json(&list)`) sees the array built from
/// [`to_json_value`](Serializable::to_json_value) and cannot wrap individual
/// elements.
impl<T: Serializable> Serializable for TypedList<T> {
    fn to_json_value(&self) -> Result<Value, JsonError> {
        let items: Result<Vec<_>, _> = self.items.iter().map(Serializable::to_json_value).collect();
        Ok(Value::Array(items?))
    }

    fn to_json(&self, strategy: Option<&dyn JsonStrategy>) -> Result<Value, JsonError> {
        TypedList::to_json(self, strategy).map(Value::Array)
    }
}

impl<T> Default for TypedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for TypedList<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T> FromIterator<T> for TypedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T> Extend<T> for TypedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<T> IntoIterator for TypedList<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a TypedList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut TypedList<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter_mut()
    }
}

impl<T: Serialize> Serialize for TypedList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.items)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for TypedList<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<T>::deserialize(deserializer).map(Self::from)
    }
}
