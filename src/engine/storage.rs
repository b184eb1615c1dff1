//! Dense columnar storage with type-erased access.
//!
//! This module implements the column container [`ColumnStorage<T>`], which
//! stores one component type densely in insertion order, and the
//! [`Column`] trait, a dynamically-typed interface for interacting with
//! columns without knowing `T` at compile time.
//!
//! # Storage model
//!
//! A column is a plain `Vec<T>` appended to from the spawn path. Storage is
//! append-only: no removal, overwrite, or migration operation exists in this
//! core, so rows keep their insertion index for the lifetime of the world.
//!
//! # Type erasure
//!
//! [`Column`] allows columns to be stored behind trait objects
//! (`Box<dyn Column>`) inside heterogeneous archetypes. It provides:
//!
//! - the element [`TypeId`] and human-readable element type name,
//! - a downcasting hook via `as_any`,
//! - a push API taking a boxed value, guarded by a type check,
//! - a `snapshot` operation cloning the column for point-in-time query
//!   results.
//!
//! Typed slice access succeeds only when the requested type matches the
//! column's real element type; otherwise it returns `None`. The checked
//! downcast happens once per column at the access boundary, never per row
//! and never inside the insertion path.

use std::any::{type_name, Any, TypeId};

use crate::engine::component::Component;
use crate::engine::error::TypeMismatchError;

/// A type-erased interface for dense component columns.
///
/// ## Invariants
/// - `element_type` and `element_name` are stable for the column's lifetime.
/// - `len` equals the number of values pushed since construction.

pub trait Column: Send + Sync {
    /// Returns the `TypeId` of the stored element type.
    fn element_type(&self) -> TypeId;

    /// Returns the human-readable name of the stored element type.
    fn element_name(&self) -> &'static str;

    /// Returns the number of values in the column.
    fn len(&self) -> usize;

    /// Returns `true` if the column holds no values.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends a type-erased value to the column.
    ///
    /// ## Errors
    /// Returns [`TypeMismatchError`] if the value's dynamic type does not
    /// match the column's element type. On error the column is unchanged.

    fn push_value(&mut self, value: Box<dyn Any + Send + Sync>) -> Result<(), TypeMismatchError>;

    /// Clones the column into an independent point-in-time copy.
    ///
    /// Used by query execution so results do not reflect rows inserted after
    /// the query call.

    fn snapshot(&self) -> Box<dyn Column>;

    /// Downcasting hook for typed access.
    fn as_any(&self) -> &dyn Any;
}

/// Dense, insertion-ordered storage for a single component type `T`.
#[derive(Clone)]
pub struct ColumnStorage<T: Component> {
    values: Vec<T>,
}

impl<T: Component> ColumnStorage<T> {
    /// Returns the stored values as a slice, in insertion order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.values
    }
}

impl<T: Component> Default for ColumnStorage<T> {
    fn default() -> Self {
        Self { values: Vec::new() }
    }
}

impl<T: Component> Column for ColumnStorage<T> {
    fn element_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn element_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn push_value(&mut self, value: Box<dyn Any + Send + Sync>) -> Result<(), TypeMismatchError> {
        match value.downcast::<T>() {
            Ok(typed) => {
                self.values.push(*typed);
                Ok(())
            }
            Err(original) => Err(TypeMismatchError {
                expected: TypeId::of::<T>(),
                expected_name: type_name::<T>(),
                actual: (*original).type_id(),
            }),
        }
    }

    fn snapshot(&self) -> Box<dyn Column> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Recovers a typed slice from a type-erased column.
///
/// ## Behavior
/// Performs the single checked downcast at the access boundary. Returns
/// `None` if the column's element type is not `T`.

#[inline]
pub fn column_slice<T: Component>(column: &dyn Column) -> Option<&[T]> {
    column
        .as_any()
        .downcast_ref::<ColumnStorage<T>>()
        .map(ColumnStorage::as_slice)
}
