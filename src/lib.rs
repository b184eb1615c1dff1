//! # Govsim World Core
//!
//! In-memory entity/component storage engine for LLM-driven council
//! simulations.
//!
//! The world is a compact database for simulation entities: component types
//! are assigned stable identifiers by a per-world registry, entities sharing
//! the same component composition live together in dense columnar archetypes,
//! and subset queries retrieve matching archetypes' columns as point-in-time
//! snapshots. Named inputs and outputs expose a control/metric surface the
//! surrounding agent loop observes each round.
//!
//! ## Design Goals
//! - Archetype-based storage for cache efficiency
//! - Append-only entity lifecycle, no hidden global state
//! - Safe, explicit data access via checked downcasts at the query boundary
//! - One shared/exclusive lock per world; one independent lock per input
//!
//! Out of scope here: agent dialogue and prompt construction, message
//! relaying, audit logging, telemetry, CLI — those live in the surrounding
//! application.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(dead_code)]

pub mod engine;

// ─────────────────────────────────────────────────────────────────────────────
// Re-exports (Public API)
// ─────────────────────────────────────────────────────────────────────────────

// Core world types

pub use engine::world::{Observation, World, WorldView};

pub use engine::component::{Bundle, Component, ComponentDesc, ComponentRegistry};

pub use engine::types::{ArchetypeId, ComponentId, EntityId, Signature, Tick};

pub use engine::archetype::Archetype;

pub use engine::query::{Query, QueryResult};

pub use engine::inputs::{Action, Input, SimpleInput};
pub use engine::outputs::{Output, OutputValue};

pub use engine::systems::System;

pub use engine::error::{
    DuplicateComponentError, QueryError, SignatureMismatchError, SpawnError, TypeMismatchError,
    UnregisteredComponentError, WorldError, WorldResult,
};

// ─────────────────────────────────────────────────────────────────────────────
// Prelude (Optional but recommended)
// ─────────────────────────────────────────────────────────────────────────────

/// Commonly used world types.
///
/// Import with:
/// ```rust
/// use govsim::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Action, Bundle, Component, Input, Observation, Output, OutputValue, Query, QueryResult,
        Signature, SimpleInput, System, World, WorldResult, WorldView,
    };
}
