//! Per-tick behavior contract.
//!
//! A **system** is a unit of logic invoked once per tick by an external
//! driving loop, given the world and the elapsed duration. Systems perform
//! arbitrary reads and writes against the world through its public API and
//! return nothing.
//!
//! This core defines only the contract. Scheduling — ordering systems,
//! running non-conflicting systems in parallel, deferring structural
//! mutations — is a separately designed extension and deliberately absent
//! here: [`World::tick`](crate::engine::world::World::tick) advances the
//! clock and nothing else.

use std::time::Duration;

use crate::engine::world::World;

/// A unit of per-tick logic driven by the surrounding application.
///
/// Implementations take the world's locks through its public methods, so
/// `update` must not be called while the caller already holds a view into
/// the same world.

pub trait System: Send + Sync {
    /// Returns the system's name, useful for logging.
    fn name(&self) -> &str;

    /// Executes one step against the world.
    fn update(&self, world: &World, elapsed: Duration);
}
