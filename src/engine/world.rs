//! World orchestration: entities, queries, the clock, and observations.
//!
//! The [`World`] owns every archetype, the entity→archetype index, the
//! component registry, named [`Input`]s and [`Output`]s, and the simulation
//! clock. It is the single entry point the surrounding application (the
//! clock-driving loop, the council loop, external actuators) shares.
//!
//! ## Concurrency model
//!
//! All world state lives behind one reader/writer lock:
//!
//! * structural mutations — entity creation, input/output registration, tick
//!   advance — take the exclusive form,
//! * read-only traversal — lookups, queries, observation — takes the shared
//!   form.
//!
//! Exclusive operations on one world are linearized; a query or observation
//! sees archetype and entity state exactly as of the instant it acquires the
//! shared lock, with no freshness guarantee beyond that instant.
//!
//! Each input additionally carries its own lock (see the `inputs` module),
//! so setting a control value never contends with entity creation or query
//! traversal.
//!
//! Every operation here is synchronous, in-memory, and CPU-bound; none block
//! on I/O. Callers may impose their own deadlines around calls.
//!
//! ## Observation consistency
//!
//! [`World::observe`] holds the shared lock for the duration of the call, so
//! the *set* of registered inputs/outputs and the entity/archetype structure
//! are consistent at that instant. It does not serialize against an input's
//! internal lock: an input's value may still change between being read here
//! and being consumed downstream.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::Serialize;
use serde_json::Value;

use crate::engine::archetype::Archetype;
use crate::engine::component::{Bundle, ComponentRegistry};
use crate::engine::error::{DuplicateComponentError, SpawnError, WorldError, WorldResult};
use crate::engine::inputs::{Action, Input};
use crate::engine::outputs::{Output, OutputValue};
use crate::engine::query::{Query, QueryResult};
use crate::engine::types::{ArchetypeId, EntityId, Signature, Tick};

/// An immutable snapshot of tick, timestamp, and all input/output values.
///
/// Produced by [`World::observe`] and fed into prompt construction by the
/// council loop. Maps are ordered so serialized observations are
/// deterministic.

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Observation {
    /// The tick counter at the instant of observation.
    pub tick: Tick,

    /// Wall-clock timestamp in Unix milliseconds.
    pub timestamp: i64,

    /// Every registered input's current value, keyed by name.
    pub inputs: BTreeMap<String, Value>,

    /// Every registered output, freshly computed, keyed by name.
    pub outputs: BTreeMap<String, OutputValue>,
}

/// All world state, guarded by the world's single reader/writer lock.
///
/// ## Invariants
/// * `by_signature` and `archetypes` stay consistent: at most one archetype
///   per distinct signature, ids are indices into `archetypes`.
/// * `entity_index` maps every live entity to the single archetype holding
///   it.
/// * `next_entity_id` only grows; identifiers are never reused.

struct WorldCore {
    registry: ComponentRegistry,
    archetypes: Vec<Archetype>,
    by_signature: HashMap<Signature, ArchetypeId>,
    entity_index: HashMap<EntityId, ArchetypeId>,
    next_entity_id: EntityId,
    tick: Tick,
    clock: Duration,
    inputs: HashMap<String, Arc<dyn Input>>,
    outputs: HashMap<String, Arc<dyn Output>>,
}

impl WorldCore {
    fn new() -> Self {
        Self {
            registry: ComponentRegistry::new(),
            archetypes: Vec::new(),
            by_signature: HashMap::new(),
            entity_index: HashMap::new(),
            next_entity_id: 0,
            tick: 0,
            clock: Duration::ZERO,
            inputs: HashMap::new(),
            outputs: HashMap::new(),
        }
    }

    /// Retrieves the archetype matching `signature`, creating it lazily.
    ///
    /// Archetypes are assigned monotonically increasing ids and never
    /// destroyed.

    fn get_or_create_archetype(&mut self, signature: Signature) -> Result<ArchetypeId, SpawnError> {
        if let Some(&id) = self.by_signature.get(&signature) {
            return Ok(id);
        }

        let id = self.archetypes.len() as ArchetypeId;
        let archetype = Archetype::new(id, signature.clone(), &self.registry)?;
        self.archetypes.push(archetype);
        tracing::debug!(archetype = id, signature = %signature, "created archetype");
        self.by_signature.insert(signature, id);
        Ok(id)
    }

    /// Scans every archetype and snapshots those matching the query.
    ///
    /// Ids are resolved read-only: a component type the registry has never
    /// seen cannot be stored anywhere, so the query matches nothing and the
    /// registry is left untouched. The same type still receives the same id
    /// whenever it is first stored.

    fn execute_query(&self, query: &Query) -> Vec<QueryResult> {
        let mut ids = Vec::with_capacity(query.parts().len());
        for part in query.parts() {
            match self.registry.id_of_type_id(part.type_id) {
                Some(id) => ids.push(id),
                None => {
                    tracing::trace!(
                        component = part.type_name,
                        "query names a component type no entity carries"
                    );
                    return Vec::new();
                }
            }
        }

        let needed = Signature::from_ids(ids.clone());

        let mut results = Vec::new();
        for archetype in &self.archetypes {
            if !archetype.matches(&needed) {
                continue;
            }

            let columns = ids
                .iter()
                .map(|&id| {
                    archetype
                        .column(id)
                        .expect("matched archetype carries every queried column")
                        .snapshot()
                })
                .collect();

            results.push(QueryResult::new(
                archetype.archetype_id(),
                archetype.signature().clone(),
                archetype.entities().to_vec(),
                columns,
            ));
        }

        tracing::trace!(matches = results.len(), "executed query");
        results
    }
}

/// The shared simulation world.
///
/// `World` is `Send + Sync`; multiple concurrent callers may hold references
/// to the same world simultaneously. See the module docs for the locking
/// discipline. Worlds do not share state with one another — in particular,
/// each world owns its component registry, so identifier assignment is never
/// shared across instances.

pub struct World {
    core: RwLock<WorldCore>,
}

impl World {
    /// Creates an empty world with a fresh component registry.
    pub fn new() -> Self {
        Self {
            core: RwLock::new(WorldCore::new()),
        }
    }

    fn read(&self) -> WorldResult<RwLockReadGuard<'_, WorldCore>> {
        self.core
            .read()
            .map_err(|_| WorldError::Internal("world lock poisoned".into()))
    }

    fn write(&self) -> WorldResult<RwLockWriteGuard<'_, WorldCore>> {
        self.core
            .write()
            .map_err(|_| WorldError::Internal("world lock poisoned".into()))
    }

    /// Creates a new entity from a bundle of component values.
    ///
    /// ## Behavior
    /// Allocates the next sequential entity id, registers unseen component
    /// types, computes the bundle's signature, finds or lazily creates the
    /// archetype keyed by that exact signature, inserts the entity, and
    /// records the entity→archetype mapping.
    ///
    /// ## Postcondition
    /// Subsequent queries for any subset of the supplied component types
    /// include this entity exactly once.
    ///
    /// ## Errors
    /// Returns [`SpawnError::Duplicate`] (via [`WorldError::Spawn`]) if the
    /// bundle carries more than one value of the same component type; at most
    /// one value per type per entity is a documented precondition, enforced
    /// rather than silently deduplicated.

    pub fn spawn(&self, bundle: Bundle) -> WorldResult<EntityId> {
        if let Some(name) = bundle.find_duplicate() {
            return Err(SpawnError::from(DuplicateComponentError { name }).into());
        }

        let mut core = self.write()?;

        let entity = core.next_entity_id;
        core.next_entity_id += 1;

        let signature = Signature::of_bundle(&bundle, &mut core.registry);
        let archetype_id = core.get_or_create_archetype(signature.clone())?;

        let WorldCore {
            archetypes,
            registry,
            entity_index,
            ..
        } = &mut *core;
        archetypes[archetype_id as usize].add_entity(entity, bundle, registry)?;
        entity_index.insert(entity, archetype_id);

        tracing::debug!(entity, archetype = archetype_id, signature = %signature, "spawned entity");
        Ok(entity)
    }

    /// Executes a query under the shared lock.
    ///
    /// Returns one [`QueryResult`] per matching archetype; each result is a
    /// point-in-time snapshot. See [`Query`] for construction.

    pub fn query(&self, query: &Query) -> WorldResult<Vec<QueryResult>> {
        Ok(self.read()?.execute_query(query))
    }

    /// Advances the tick counter by one and the elapsed clock by `dt`.
    ///
    /// System execution is deliberately absent here; an external driver
    /// invokes registered [`System`](crate::engine::systems::System)s between
    /// ticks.

    pub fn tick(&self, dt: Duration) -> WorldResult<Tick> {
        let mut core = self.write()?;
        core.tick += 1;
        core.clock += dt;
        tracing::trace!(tick = core.tick, "advanced tick");
        Ok(core.tick)
    }

    /// Returns the current tick counter.
    pub fn current_tick(&self) -> WorldResult<Tick> {
        Ok(self.read()?.tick)
    }

    /// Returns the accumulated simulation time.
    pub fn elapsed(&self) -> WorldResult<Duration> {
        Ok(self.read()?.clock)
    }

    /// Returns the number of live entities across all archetypes.
    pub fn entity_count(&self) -> WorldResult<usize> {
        Ok(self.read()?.entity_index.len())
    }

    /// Returns the number of distinct archetypes created so far.
    pub fn archetype_count(&self) -> WorldResult<usize> {
        Ok(self.read()?.archetypes.len())
    }

    /// Returns the archetype currently holding `entity`, if it exists.
    pub fn entity_archetype(&self, entity: EntityId) -> WorldResult<Option<ArchetypeId>> {
        Ok(self.read()?.entity_index.get(&entity).copied())
    }

    /// Registers a named control value. A later registration under the same
    /// name replaces the earlier one.
    pub fn register_input(&self, input: Arc<dyn Input>) -> WorldResult<()> {
        let mut core = self.write()?;
        tracing::debug!(input = input.name(), "registered input");
        core.inputs.insert(input.name().to_owned(), input);
        Ok(())
    }

    /// Looks up an input by name. Absence is an ordinary `None`, never an
    /// error.
    pub fn get_input(&self, name: &str) -> WorldResult<Option<Arc<dyn Input>>> {
        Ok(self.read()?.inputs.get(name).cloned())
    }

    /// Registers a named derived metric. A later registration under the same
    /// name replaces the earlier one.
    pub fn register_output(&self, output: Arc<dyn Output>) -> WorldResult<()> {
        let mut core = self.write()?;
        tracing::debug!(output = output.name(), "registered output");
        core.outputs.insert(output.name().to_owned(), output);
        Ok(())
    }

    /// Looks up an output by name. Absence is an ordinary `None`, never an
    /// error.
    pub fn get_output(&self, name: &str) -> WorldResult<Option<Arc<dyn Output>>> {
        Ok(self.read()?.outputs.get(name).cloned())
    }

    /// Applies a council action by setting the named input.
    ///
    /// Returns `true` if the input exists and was set, `false` if the action
    /// names an unknown input.

    pub fn apply_action(&self, action: &Action) -> WorldResult<bool> {
        match self.get_input(&action.input)? {
            Some(input) => {
                input.set(action.value.clone());
                tracing::debug!(input = %action.input, "applied action");
                Ok(true)
            }
            None => {
                tracing::debug!(input = %action.input, "action names unknown input");
                Ok(false)
            }
        }
    }

    /// Produces a consistent snapshot of tick, inputs, and outputs.
    ///
    /// Holds the shared lock while reading every input's current value and
    /// recomputing every output against a [`WorldView`] of the locked state.

    pub fn observe(&self) -> WorldResult<Observation> {
        let core = self.read()?;
        let view = WorldView { core: &core };

        let mut inputs = BTreeMap::new();
        for (name, input) in &core.inputs {
            inputs.insert(name.clone(), input.get());
        }

        let mut outputs = BTreeMap::new();
        for (name, output) in &core.outputs {
            outputs.insert(name.clone(), output.compute(&view));
        }

        tracing::debug!(tick = core.tick, inputs = inputs.len(), outputs = outputs.len(), "observed world");
        Ok(Observation {
            tick: core.tick,
            timestamp: unix_millis(),
            inputs,
            outputs,
        })
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// A read-only view of world state, borrowed from the held shared lock.
///
/// ## Purpose
/// Passed to [`Output::compute`] during observation so output
/// implementations can traverse entity state without re-acquiring the world
/// lock.

pub struct WorldView<'a> {
    core: &'a WorldCore,
}

impl WorldView<'_> {
    /// Returns the current tick counter.
    pub fn tick(&self) -> Tick {
        self.core.tick
    }

    /// Returns the accumulated simulation time.
    pub fn elapsed(&self) -> Duration {
        self.core.clock
    }

    /// Returns the number of live entities.
    pub fn entity_count(&self) -> usize {
        self.core.entity_index.len()
    }

    /// Returns the number of distinct archetypes.
    pub fn archetype_count(&self) -> usize {
        self.core.archetypes.len()
    }

    /// Executes a query against the viewed state.
    pub fn query(&self, query: &Query) -> Vec<QueryResult> {
        self.core.execute_query(query)
    }
}

/// Wall-clock time in Unix milliseconds; zero if the clock predates the
/// epoch.
fn unix_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}
