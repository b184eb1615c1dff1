//! Core identifiers and archetype signatures.
//!
//! This module defines the **fundamental types and identifiers** shared across
//! the world engine: entity, component, and archetype identifiers, the
//! simulation tick counter, and the [`Signature`] type that describes which
//! component types an entity or archetype carries.
//!
//! ## Design Philosophy
//!
//! The engine is designed around:
//!
//! - **Dense columnar storage**
//! - **Sorted, duplicate-free signatures**
//! - **Stable numeric identifiers**
//!
//! Signatures are stored as sorted vectors of [`ComponentId`] rather than
//! bitsets. The registry grows without bound as component types are seen, so a
//! fixed-width bitset would impose an arbitrary cap; a sorted sequence keeps
//! subset testing linear in the signature lengths while remaining open-ended.
//!
//! ## Signature Semantics
//!
//! Two signatures are equal if and only if their id sequences are equal, which
//! makes [`Signature`] directly usable as the archetype lookup key. Ordering is
//! irrelevant to *meaning* (construction normalizes it) but load-bearing for
//! the subset algorithm in [`Signature::has_components`].

use std::fmt;

use crate::engine::component::{Bundle, ComponentRegistry};

/// Globally unique entity identifier, allocated sequentially and never reused.
pub type EntityId = u64;

/// Stable identifier assigned to a component type in first-registration order.
pub type ComponentId = u32;

/// Index of an archetype within a world.
pub type ArchetypeId = u32;

/// Simulation tick counter.
pub type Tick = u64;

/// A sorted, duplicate-free sequence of component identifiers.
///
/// ## Purpose
/// A `Signature` uniquely describes one composition of component types. It is
/// the identity key for archetypes and the matching key for queries.
///
/// ## Invariants
/// - The id sequence is always sorted ascending.
/// - The id sequence never contains duplicates.
///
/// Both invariants are established by [`Signature::from_ids`] and relied upon
/// by the subset test.

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Signature {
    ids: Vec<ComponentId>,
}

impl Signature {
    /// Builds a canonical signature from an arbitrary list of component ids.
    ///
    /// ## Behavior
    /// Sorts the ids ascending and removes duplicates, so the result is
    /// independent of input order.

    pub fn from_ids(mut ids: Vec<ComponentId>) -> Self {
        ids.sort_unstable();
        ids.dedup();
        Self { ids }
    }

    /// Builds the canonical signature for the component types in a bundle.
    ///
    /// ## Behavior
    /// Maps every bundle entry to its identifier via the registry, registering
    /// unseen types lazily, then normalizes the result.

    pub fn of_bundle(bundle: &Bundle, registry: &mut ComponentRegistry) -> Self {
        Self::from_ids(bundle.register_all(registry))
    }

    /// Returns the component ids in ascending order.
    #[inline]
    pub fn ids(&self) -> &[ComponentId] {
        &self.ids
    }

    /// Returns the number of component types in this signature.
    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if the signature contains no component types.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns `true` if `component_id` is part of this signature.
    #[inline]
    pub fn contains(&self, component_id: ComponentId) -> bool {
        self.ids.binary_search(&component_id).is_ok()
    }

    /// Subset test: returns `true` if every id in `query` appears in `self`.
    ///
    /// ## Algorithm
    /// Two-pointer merge over both sorted sequences: the `self` pointer
    /// advances on every step, the `query` pointer only on an exact match.
    /// The test succeeds iff the query pointer exhausts the query before the
    /// scan ends.
    ///
    /// ## Complexity
    /// O(|self| + |query|). Correctness depends on both sequences being
    /// sorted and duplicate-free, which both constructors guarantee.

    pub fn has_components(&self, query: &Signature) -> bool {
        let mut arch_idx = 0;
        let mut query_idx = 0;

        while arch_idx < self.ids.len() && query_idx < query.ids.len() {
            if self.ids[arch_idx] == query.ids[query_idx] {
                query_idx += 1;
            }
            arch_idx += 1;
        }

        query_idx == query.ids.len()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, id) in self.ids.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{id}")?;
        }
        write!(f, "]")
    }
}
