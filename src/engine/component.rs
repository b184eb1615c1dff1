//! Component registry and type-erased component bundles.
//!
//! This module assigns stable [`ComponentId`] values to Rust component types
//! and exposes type-erased storage factories for archetype column allocation.
//!
//! ## Purpose
//! The registry decouples component type information (`TypeId`, name, size,
//! alignment) from runtime storage, enabling archetypes to store heterogeneous
//! component columns behind [`Column`] trait objects.
//!
//! ## Design
//! - Components are assigned a compact `ComponentId` in first-seen order
//!   (0, 1, 2, …).
//! - Registration is lazy and unconditional: looking up an unseen type
//!   registers it. The registry never removes or reassigns identifiers.
//! - A per-component factory function is stored for constructing empty column
//!   storage.
//! - The registry is an explicit object owned by each world instance, so
//!   independent worlds (e.g. under test) never contend on or share identifier
//!   assignment.
//!
//! ## Invariants
//! - `ComponentId` values are unique and stable for the lifetime of the
//!   registry.
//! - A registered component always has a corresponding storage factory and
//!   descriptor.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::mem::{align_of, size_of};

use crate::engine::storage::{Column, ColumnStorage};
use crate::engine::types::ComponentId;

/// Marker trait for component types.
///
/// Any `'static` value that is thread-safe and clonable can serve as a
/// component; no further supertype is required. `Clone` is needed because
/// query results are point-in-time snapshots of column data.

pub trait Component: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> Component for T {}

/// Factory function for constructing an empty type-erased component column.
type ColumnFactory = fn() -> Box<dyn Column>;

/// Constructs an empty column for component type `T`.
///
/// Installed as the registered factory for a component id.

fn new_column_storage<T: Component>() -> Box<dyn Column> {
    Box::new(ColumnStorage::<T>::default())
}

/// Describes a registered component type.
///
/// ## Purpose
/// Provides metadata about a component type for debugging, validation, and
/// error reporting.
///
/// ## Notes
/// `ComponentDesc` is `Copy` and safe to clone freely for diagnostics.

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ComponentDesc {
    /// Runtime identifier assigned to this component type.
    pub component_id: ComponentId,

    /// Rust type name for diagnostics.
    pub name: &'static str,

    /// Runtime `TypeId` of the component.
    pub type_id: TypeId,

    /// Size of the component type in bytes.
    pub size: usize,

    /// Alignment of the component type in bytes.
    pub align: usize,
}

impl ComponentDesc {
    /// Constructs a descriptor for type `T` with the given id.
    #[inline]
    fn of<T: 'static>(component_id: ComponentId) -> Self {
        Self {
            component_id,
            name: type_name::<T>(),
            type_id: TypeId::of::<T>(),
            size: size_of::<T>(),
            align: align_of::<T>(),
        }
    }
}

impl fmt::Display for ComponentDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ComponentDesc {{ id: {}, name: {}, size: {}, align: {} }}",
            self.component_id, self.name, self.size, self.align
        )
    }
}

/// Mapping between Rust component types and compact [`ComponentId`] values.
///
/// ## Design
/// - `by_type` maps `TypeId -> ComponentId`.
/// - `descs` stores a [`ComponentDesc`] per id, indexed by `ComponentId`.
/// - `factories` stores the column factory per id, installed at registration.
/// - `next_id` assigns new ids sequentially.
///
/// ## Invariants
/// - Every entry in `by_type` has matching `descs[id]` and `factories[id]`.
/// - Same type ⇒ same identifier, for the lifetime of the registry.

pub struct ComponentRegistry {
    next_id: ComponentId,
    by_type: HashMap<TypeId, ComponentId>,
    descs: Vec<ComponentDesc>,
    factories: Vec<ColumnFactory>,
}

impl ComponentRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            next_id: 0,
            by_type: HashMap::new(),
            descs: Vec::new(),
            factories: Vec::new(),
        }
    }

    /// Registers component type `T` and returns its assigned id.
    ///
    /// ## Behavior
    /// - If `T` is already registered, returns the existing id.
    /// - Otherwise allocates the next sequential id, stores a
    ///   [`ComponentDesc`], and installs the column factory for `T`.
    ///
    /// No type validation is performed; any [`Component`] is accepted.

    pub fn register<T: Component>(&mut self) -> ComponentId {
        let type_id = TypeId::of::<T>();
        if let Some(&existing) = self.by_type.get(&type_id) {
            return existing;
        }

        let id = self.next_id;
        self.next_id += 1;
        self.by_type.insert(type_id, id);
        self.descs.push(ComponentDesc::of::<T>(id));
        self.factories.push(new_column_storage::<T>);

        tracing::debug!(component = type_name::<T>(), id, "registered component type");
        id
    }

    /// Returns the id for `T`, if registered.
    #[inline]
    pub fn id_of<T: 'static>(&self) -> Option<ComponentId> {
        self.id_of_type_id(TypeId::of::<T>())
    }

    /// Returns the id associated with a runtime `TypeId`, if registered.
    #[inline]
    pub fn id_of_type_id(&self, type_id: TypeId) -> Option<ComponentId> {
        self.by_type.get(&type_id).copied()
    }

    /// Returns the descriptor for `component_id`, if registered.
    pub fn desc(&self, component_id: ComponentId) -> Option<&ComponentDesc> {
        self.descs.get(component_id as usize)
    }

    /// Creates an empty type-erased column for `component_id`.
    ///
    /// Used by archetype construction to allocate one column per signature id.
    /// Returns `None` if the id has no registry entry.

    pub fn new_column(&self, component_id: ComponentId) -> Option<Box<dyn Column>> {
        self.factories.get(component_id as usize).map(|factory| factory())
    }

    /// Returns the number of registered component types.
    pub fn len(&self) -> usize {
        self.descs.len()
    }

    /// Returns `true` if no component types have been registered.
    pub fn is_empty(&self) -> bool {
        self.descs.is_empty()
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// One type-erased component value carried by a [`Bundle`].
pub(crate) struct BundleEntry {
    /// Runtime type of the stored value.
    pub(crate) type_id: TypeId,

    /// Human-readable type name for diagnostics.
    pub(crate) type_name: &'static str,

    /// Registers the value's type with a registry, monomorphized at insert.
    register: fn(&mut ComponentRegistry) -> ComponentId,

    /// The component value itself.
    pub(crate) value: Box<dyn Any + Send + Sync>,
}

/// Type-erased container for the component values of one entity.
///
/// ## Purpose
/// A `Bundle` groups heterogeneous component values together for entity
/// creation, trading compile-time typing for flexibility. Typing is recovered
/// at the column boundary with a single checked downcast per value.
///
/// ## Preconditions
/// At most one value per component type per entity. The world rejects bundles
/// violating this with [`SpawnError::Duplicate`](crate::engine::error::SpawnError)
/// rather than inferring dedup semantics.
///
/// ## Example
/// ```ignore
/// let entity = world.spawn(
///     Bundle::new()
///         .with(Identity { name: "Ada".into(), age: 36 })
///         .with(Stat { health: 100 }),
/// )?;
/// ```

pub struct Bundle {
    entries: Vec<BundleEntry>,
}

impl Bundle {
    /// Creates an empty bundle.
    #[inline]
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Adds a component value, consuming and returning the bundle.
    #[inline]
    pub fn with<T: Component>(mut self, value: T) -> Self {
        self.insert(value);
        self
    }

    /// Adds a component value in place.
    #[inline]
    pub fn insert<T: Component>(&mut self, value: T) {
        self.entries.push(BundleEntry {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            register: ComponentRegistry::register::<T>,
            value: Box::new(value),
        });
    }

    /// Returns the number of component values in the bundle.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the bundle holds no component values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the name of the first component type appearing more than once.
    ///
    /// The world checks this before computing a signature, since signature
    /// normalization would silently collapse the duplicate.

    pub(crate) fn find_duplicate(&self) -> Option<&'static str> {
        for (i, entry) in self.entries.iter().enumerate() {
            if self.entries[..i].iter().any(|e| e.type_id == entry.type_id) {
                return Some(entry.type_name);
            }
        }
        None
    }

    /// Registers every entry's type and returns the ids in entry order.
    ///
    /// Lazy-unconditional: unseen types gain a fresh id, known types return
    /// their stable one.

    pub(crate) fn register_all(&self, registry: &mut ComponentRegistry) -> Vec<ComponentId> {
        self.entries
            .iter()
            .map(|entry| (entry.register)(registry))
            .collect()
    }

    /// Consumes the bundle, yielding its entries.
    pub(crate) fn into_entries(self) -> Vec<BundleEntry> {
        self.entries
    }
}

impl Default for Bundle {
    fn default() -> Self {
        Self::new()
    }
}
