//! Error types for entity spawning, querying, and world access.
//!
//! This module declares focused, composable error types used across the
//! entity–component storage pipeline. Each error carries enough context to
//! make failures actionable while remaining small and cheap to pass around or
//! convert into higher-level variants like [`SpawnError`] and [`WorldError`].
//!
//! ## Goals
//! * **Specificity:** Each error type models a single failure mode (e.g.
//!   duplicate component values, column type mismatches, bundle/signature
//!   divergence).
//! * **Ergonomics:** All errors implement [`std::error::Error`] and
//!   [`fmt::Display`], and provide `From<T>` conversions into aggregate
//!   errors.
//! * **Actionability:** Structured fields (e.g. expected vs. actual types,
//!   expected vs. supplied signatures) make logs useful without reproducing
//!   the issue.
//!
//! ## Typical flow
//! Low-level storage operations return small, dedicated error types (e.g.
//! [`TypeMismatchError`]). Orchestration code in the world uses `?` to bubble
//! failures into [`SpawnError`] or [`WorldError`], which callers can match on
//! for control flow or log with user-readable messages.
//!
//! ## Display vs. Debug
//! * [`fmt::Display`] is optimized for operator logs (short, imperative
//!   phrasing).
//! * [`fmt::Debug`] (derived) retains full structure for diagnostics.

use std::any::TypeId;
use std::fmt;

use crate::engine::types::{ComponentId, Signature};

/// Convenience alias for fallible world operations.
pub type WorldResult<T> = Result<T, WorldError>;

/// Returned when a component value is written into a column whose element
/// type does not match the value's dynamic type.
///
/// This is a logic error surfaced by storage when component ids diverge from
/// the types actually stored (e.g. writing `Mood` into an `Identity` column).
///
/// ### Fields
/// * `expected` — The [`TypeId`] the destination column declares.
/// * `expected_name` — Human-readable name of the declared element type.
/// * `actual` — The [`TypeId`] of the value provided by the caller.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeMismatchError {
    /// Destination column's declared element type.
    pub expected: TypeId,

    /// Human-readable name of the declared element type.
    pub expected_name: &'static str,

    /// Provided value's dynamic type.
    pub actual: TypeId,
}

impl fmt::Display for TypeMismatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "type mismatch: column stores {} ({:?}), got {:?}",
            self.expected_name, self.expected, self.actual
        )
    }
}

impl std::error::Error for TypeMismatchError {}

/// Returned when a bundle supplies more than one value of the same component
/// type.
///
/// ## Context
/// An entity carries at most one value per component type. Rather than
/// inferring dedup semantics, the world rejects the bundle outright with the
/// offending type named.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateComponentError {
    /// Human-readable name of the duplicated component type.
    pub name: &'static str,
}

impl fmt::Display for DuplicateComponentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "duplicate component value for type {}", self.name)
    }
}

impl std::error::Error for DuplicateComponentError {}

/// Returned when the component set supplied during insertion does not match
/// the archetype's signature exactly.
///
/// ## Context
/// An archetype accepts only bundles that enumerate exactly its signature,
/// one value per type. Accepting anything else would desynchronize column
/// lengths, so the archetype validates eagerly and reports both signatures.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureMismatchError {
    /// The archetype's signature.
    pub expected: Signature,

    /// The signature computed from the supplied bundle.
    pub got: Signature,
}

impl fmt::Display for SignatureMismatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "bundle does not match archetype signature: expected {}, got {}",
            self.expected, self.got
        )
    }
}

impl std::error::Error for SignatureMismatchError {}

/// Returned when a component type has no registry entry where one is
/// required (e.g. while wiring archetype columns).
///
/// ## Notes
/// Registration is lazy and unconditional on the spawn path, so this
/// indicates an internal invariant violation rather than caller misuse.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnregisteredComponentError {
    /// Human-readable name of the unregistered component type, if known.
    pub name: &'static str,

    /// The component id with no registry entry, when the failure is id-keyed
    /// (archetype column wiring) rather than type-keyed (bundle resolution).
    pub component_id: Option<ComponentId>,
}

impl fmt::Display for UnregisteredComponentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.component_id {
            Some(id) => write!(f, "component id {id} ({}) is not registered", self.name),
            None => write!(f, "component type {} is not registered", self.name),
        }
    }
}

impl std::error::Error for UnregisteredComponentError {}

/// High-level error for entity spawning.
///
/// This aggregates the failure modes encountered while creating an entity and
/// attaching its components. It preserves the underlying structured error to
/// keep diagnostics actionable.
///
/// ### Usage
/// `From<T>` conversions allow `?` from low-level operations:
/// ```ignore
/// fn add_entity(arch: &mut Archetype, entity: EntityId, bundle: Bundle) -> Result<(), SpawnError> {
///     arch.validate(&bundle)?;   // -> SignatureMismatch / Duplicate -> SpawnError
///     arch.push_columns(bundle)?; // -> TypeMismatchError -> SpawnError
///     Ok(())
/// }
/// ```

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpawnError {
    /// A bundle supplied more than one value of the same component type.
    Duplicate(DuplicateComponentError),

    /// The bundle's component set diverged from the archetype signature.
    SignatureMismatch(SignatureMismatchError),

    /// A component value failed the column type check.
    ColumnPush(TypeMismatchError),

    /// A component id had no registry entry during column construction.
    Unregistered(UnregisteredComponentError),
}

impl fmt::Display for SpawnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpawnError::Duplicate(e) => write!(f, "{e}"),
            SpawnError::SignatureMismatch(e) => write!(f, "{e}"),
            SpawnError::ColumnPush(e) => write!(f, "failed to push into column: {e}"),
            SpawnError::Unregistered(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SpawnError {}

impl From<DuplicateComponentError> for SpawnError {
    fn from(e: DuplicateComponentError) -> Self {
        SpawnError::Duplicate(e)
    }
}

impl From<SignatureMismatchError> for SpawnError {
    fn from(e: SignatureMismatchError) -> Self {
        SpawnError::SignatureMismatch(e)
    }
}

impl From<TypeMismatchError> for SpawnError {
    fn from(e: TypeMismatchError) -> Self {
        SpawnError::ColumnPush(e)
    }
}

impl From<UnregisteredComponentError> for SpawnError {
    fn from(e: UnregisteredComponentError) -> Self {
        SpawnError::Unregistered(e)
    }
}

/// Errors produced while consuming query results.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryError {
    /// No column of the requested element type exists in the result.
    ColumnNotFound {
        /// Human-readable name of the requested element type.
        name: &'static str,
    },
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::ColumnNotFound { name } => {
                write!(f, "query result has no column of type {}", name)
            }
        }
    }
}

impl std::error::Error for QueryError {}

/// Aggregate error for world-level operations.
///
/// ### Variants
/// * `Spawn(SpawnError)` — Entity creation failed.
/// * `Query(QueryError)` — Query result consumption failed.
/// * `Internal(String)` — An internal invariant was violated (e.g. a poisoned
///   world lock). These indicate bugs, not recoverable conditions.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    /// Entity creation failed.
    Spawn(SpawnError),

    /// Query result consumption failed.
    Query(QueryError),

    /// An internal invariant was violated.
    Internal(String),
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldError::Spawn(e) => write!(f, "{e}"),
            WorldError::Query(e) => write!(f, "{e}"),
            WorldError::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for WorldError {}

impl From<SpawnError> for WorldError {
    fn from(e: SpawnError) -> Self {
        WorldError::Spawn(e)
    }
}

impl From<QueryError> for WorldError {
    fn from(e: QueryError) -> Self {
        WorldError::Query(e)
    }
}
