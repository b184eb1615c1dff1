//! Query construction and point-in-time query results.
//!
//! This module provides a *builder-style* API for describing which component
//! types a query requires, and the [`QueryResult`] type bundling the matching
//! archetypes' columns.
//!
//! ## Design goals
//! * **Static intent:** Required component types are declared at build time
//!   via [`Query::with`].
//! * **Snapshot semantics:** Each result is a point-in-time copy — entities
//!   inserted into a matching archetype after the query call are not
//!   reflected in an already-returned result.
//! * **No central entity shape:** The storage core knows nothing about any
//!   particular entity layout. Consumers recover typed columns with
//!   [`QueryResult::column`] and apply their own mapping function per row,
//!   instead of the engine owning a type-switch over every known component.
//!
//! ## Execution model
//! A [`Query`] is a passive description; execution happens through
//! [`World::query`](crate::engine::world::World::query) (which takes the
//! world's shared lock) or [`WorldView::query`](crate::engine::world::WorldView::query)
//! (already under the shared lock, e.g. inside an Output computation).
//!
//! ## Example
//! ```ignore
//! let query = Query::new().with::<Identity>().with::<Stat>();
//! for result in world.query(&query)? {
//!     let identities = result.column::<Identity>()?;
//!     let stats = result.column::<Stat>()?;
//!     for row in 0..result.count() {
//!         let person = Person::from((&identities[row], &stats[row]));
//!     }
//! }
//! ```

use std::any::{type_name, TypeId};

use crate::engine::component::Component;
use crate::engine::error::QueryError;
use crate::engine::storage::{column_slice, Column};
use crate::engine::types::{ArchetypeId, EntityId, Signature};

/// One component type required by a query.
#[derive(Clone, Copy, Debug)]
pub(crate) struct QueryPart {
    /// Runtime type of the requested component.
    pub(crate) type_id: TypeId,

    /// Human-readable type name for diagnostics.
    pub(crate) type_name: &'static str,
}

/// A reusable description of the component types a query requires.
///
/// ## Notes
/// Building a query performs no registry lookups and takes no locks; types
/// are resolved to ids at execution time. A query mentioning a component type
/// the world has never stored simply matches no archetypes — unregistered
/// types are never an error.

#[derive(Clone, Debug, Default)]
pub struct Query {
    parts: Vec<QueryPart>,
}

impl Query {
    /// Creates an empty query.
    ///
    /// An empty query matches every archetype, including the empty one.
    pub fn new() -> Self {
        Self { parts: Vec::new() }
    }

    /// Requires component type `T`, consuming and returning the query.
    pub fn with<T: Component>(mut self) -> Self {
        self.parts.push(QueryPart {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
        });
        self
    }

    /// Returns the requested parts in declaration order.
    pub(crate) fn parts(&self) -> &[QueryPart] {
        &self.parts
    }
}

/// A point-in-time view of one archetype matched by a query.
///
/// ## Contents
/// * the matched archetype's identity (id and signature),
/// * the entity ids in row order at the instant of the query,
/// * one column snapshot per requested component type, in the order the
///   query asked for them,
/// * the archetype's entity count at the instant of the query.
///
/// ## Invariants
/// Every column snapshot and the entity list share the same length, equal to
/// [`count`](Self::count). Row `i` of every column belongs to `entities()[i]`.

pub struct QueryResult {
    archetype_id: ArchetypeId,
    signature: Signature,
    entities: Vec<EntityId>,
    columns: Vec<Box<dyn Column>>,
    count: usize,
}

impl QueryResult {
    pub(crate) fn new(
        archetype_id: ArchetypeId,
        signature: Signature,
        entities: Vec<EntityId>,
        columns: Vec<Box<dyn Column>>,
    ) -> Self {
        let count = entities.len();
        Self {
            archetype_id,
            signature,
            entities,
            columns,
            count,
        }
    }

    /// Returns the id of the matched archetype.
    #[inline]
    pub fn archetype_id(&self) -> ArchetypeId {
        self.archetype_id
    }

    /// Returns the matched archetype's full signature.
    #[inline]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Returns the number of entity rows captured by this result.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the captured entity ids in row order.
    #[inline]
    pub fn entities(&self) -> &[EntityId] {
        &self.entities
    }

    /// Recovers the typed column for component type `T`.
    ///
    /// ## Behavior
    /// Scans the requested columns for one whose element type is `T` and
    /// performs the single checked downcast at this boundary.
    ///
    /// ## Errors
    /// Returns [`QueryError::ColumnNotFound`] if the query did not request
    /// `T`.

    pub fn column<T: Component>(&self) -> Result<&[T], QueryError> {
        let wanted = TypeId::of::<T>();
        self.columns
            .iter()
            .find(|column| column.element_type() == wanted)
            .and_then(|column| column_slice::<T>(column.as_ref()))
            .ok_or(QueryError::ColumnNotFound {
                name: type_name::<T>(),
            })
    }
}
