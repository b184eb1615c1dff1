//! Archetype storage: one dense bucket per component composition.
//!
//! An [`Archetype`] stores every entity that shares one exact
//! [`Signature`]. Component data is held column-major, one column per
//! component type in the signature, with entities densely packed in insertion
//! order.
//!
//! ## Design
//! - `entities` records row order; the entity at index `i` owns row `i` of
//!   every column.
//! - `rows` is the back-reference map from entity id to row index.
//! - `columns` is parallel to the signature's id sequence, so the column for
//!   a given id is found by binary search over the signature.
//!
//! ## Invariants
//! - `entities.len()`, `rows.len()`, and every column's `len()` are always
//!   mutually equal.
//! - The signature is fixed at construction and never changes.
//!
//! ## Append-only
//! No entity-removal or component-add/remove operation exists in this core.
//! An implementation adding mutation would remove the row from this archetype,
//! copy its column values into the target archetype, and update the world's
//! entity index; that is a separate extension, not attempted here.
//!
//! ## Validation
//! Insertion validates the supplied bundle against the signature *before*
//! touching any column. A bundle that does not enumerate exactly the
//! signature's types, one value per type, is rejected with a descriptive
//! error and the archetype is left untouched, so column lengths can never
//! desynchronize.

use std::collections::HashMap;

use crate::engine::component::{Bundle, ComponentRegistry};
use crate::engine::error::{
    SignatureMismatchError, SpawnError, TypeMismatchError, UnregisteredComponentError,
};
use crate::engine::storage::Column;
use crate::engine::types::{ArchetypeId, ComponentId, EntityId, Signature};

/// Dense columnar storage for all entities sharing one exact signature.
pub struct Archetype {
    archetype_id: ArchetypeId,
    signature: Signature,
    entities: Vec<EntityId>,
    rows: HashMap<EntityId, usize>,
    columns: Vec<Box<dyn Column>>,
}

impl std::fmt::Debug for Archetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Archetype")
            .field("archetype_id", &self.archetype_id)
            .field("signature", &self.signature)
            .field("entities", &self.entities)
            .field("rows", &self.rows)
            .field("columns", &self.columns.len())
            .finish()
    }
}

impl Archetype {
    /// Creates an empty archetype for `signature`.
    ///
    /// ## Behavior
    /// Allocates one empty column per signature id using the registry's
    /// factories, in signature order.
    ///
    /// ## Errors
    /// Returns [`SpawnError::Unregistered`] if a signature id has no registry
    /// entry. The spawn path registers every bundle type before computing the
    /// signature, so this indicates an internal invariant violation.

    pub(crate) fn new(
        archetype_id: ArchetypeId,
        signature: Signature,
        registry: &ComponentRegistry,
    ) -> Result<Self, SpawnError> {
        let mut columns = Vec::with_capacity(signature.len());
        for &component_id in signature.ids() {
            let column = registry.new_column(component_id).ok_or(
                UnregisteredComponentError {
                    name: "<unknown>",
                    component_id: Some(component_id),
                },
            )?;
            columns.push(column);
        }

        Ok(Self {
            archetype_id,
            signature,
            entities: Vec::new(),
            rows: HashMap::new(),
            columns,
        })
    }

    /// Returns the identifier of this archetype within its world.
    #[inline]
    pub fn archetype_id(&self) -> ArchetypeId {
        self.archetype_id
    }

    /// Returns the archetype's signature.
    #[inline]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Returns the number of entities stored in this archetype.
    #[inline]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if the archetype holds no entities.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Returns the stored entity ids in row order.
    #[inline]
    pub fn entities(&self) -> &[EntityId] {
        &self.entities
    }

    /// Returns the row index of `entity`, if it lives in this archetype.
    #[inline]
    pub fn row_of(&self, entity: EntityId) -> Option<usize> {
        self.rows.get(&entity).copied()
    }

    /// Subset test used by query matching.
    #[inline]
    pub fn matches(&self, query: &Signature) -> bool {
        self.signature.has_components(query)
    }

    /// Returns the type-erased column for `component_id`, if present.
    pub fn column(&self, component_id: ComponentId) -> Option<&dyn Column> {
        let index = self.column_index(component_id)?;
        Some(self.columns[index].as_ref())
    }

    #[inline]
    fn column_index(&self, component_id: ComponentId) -> Option<usize> {
        self.signature.ids().binary_search(&component_id).ok()
    }

    /// Inserts an entity and its component values.
    ///
    /// ## Contract
    /// The bundle must enumerate exactly this archetype's signature, one
    /// value per component type. Every bundle type must already be registered.
    ///
    /// ## Behavior
    /// Validation runs in full before any column is modified:
    /// 1. every entry's type resolves to a registered id,
    /// 2. the resolved id set equals the signature (catching both missing and
    ///    surplus types; a duplicated type surfaces here as a shorter set),
    /// 3. every value's dynamic type matches its destination column.
    ///
    /// Only then are the values pushed and the row recorded, so a failed call
    /// leaves the archetype untouched.

    pub(crate) fn add_entity(
        &mut self,
        entity: EntityId,
        bundle: Bundle,
        registry: &ComponentRegistry,
    ) -> Result<(), SpawnError> {
        let entries = bundle.into_entries();

        let mut ids = Vec::with_capacity(entries.len());
        for entry in &entries {
            let id = registry.id_of_type_id(entry.type_id).ok_or(
                UnregisteredComponentError {
                    name: entry.type_name,
                    component_id: None,
                },
            )?;
            ids.push(id);
        }

        let got = Signature::from_ids(ids.clone());
        if got != self.signature || entries.len() != self.signature.len() {
            return Err(SignatureMismatchError {
                expected: self.signature.clone(),
                got,
            }
            .into());
        }

        for (entry, &id) in entries.iter().zip(ids.iter()) {
            // Every id was matched against the signature above.
            let index = self.column_index(id).expect("id validated against signature");
            let column = &self.columns[index];
            if (*entry.value).type_id() != column.element_type() {
                return Err(SpawnError::ColumnPush(TypeMismatchError {
                    expected: column.element_type(),
                    expected_name: column.element_name(),
                    actual: (*entry.value).type_id(),
                }));
            }
        }

        let row = self.entities.len();
        for (entry, &id) in entries.into_iter().zip(ids.iter()) {
            let index = self.column_index(id).expect("id validated against signature");
            self.columns[index].push_value(entry.value)?;
        }

        self.entities.push(entity);
        self.rows.insert(entity, row);

        debug_assert!(self.columns.iter().all(|c| c.len() == self.entities.len()));
        debug_assert_eq!(self.rows.len(), self.entities.len());
        Ok(())
    }
}
