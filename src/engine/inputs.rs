//! Named, externally controllable simulation parameters.
//!
//! An [`Input`] is a named mutable cell holding an opaque JSON value,
//! representing a control surface the surrounding application (council
//! agents, external actuators) can read and write between observations.
//!
//! ## Concurrency
//! Each input carries its **own** lock, deliberately decoupled from the
//! world's shared/exclusive lock, so that updating a control value never
//! contends with entity creation or query traversal. An observation reads an
//! input's current value under the world's shared lock, but the value may
//! still change between being read there and being consumed downstream.

use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A named, independently lockable mutable control value.
///
/// Implementations must be cheap to read; `get` is called on every
/// observation.

pub trait Input: Send + Sync {
    /// Returns the input's unique name.
    fn name(&self) -> &str;

    /// Returns a human-readable description, used in prompt construction.
    fn description(&self) -> &str;

    /// Returns the current value.
    fn get(&self) -> Value;

    /// Replaces the current value.
    fn set(&self, value: Value);
}

/// A plain value cell guarded by its own reader/writer lock.
pub struct SimpleInput {
    name: String,
    description: String,
    value: RwLock<Value>,
}

impl SimpleInput {
    /// Creates an input with an initial value.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        initial: impl Into<Value>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            value: RwLock::new(initial.into()),
        }
    }
}

impl Input for SimpleInput {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn get(&self) -> Value {
        // A poisoned cell still holds a coherent value: `set` replaces the
        // whole value in one assignment, so recovery is safe here.
        self.value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, value: Value) {
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = value;
    }
}

/// A requested input mutation, as produced by a council decision step.
///
/// The agent loop parses these out of model responses and applies them
/// through [`World::apply_action`](crate::engine::world::World::apply_action).

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Name of the input to mutate.
    pub input: String,

    /// Replacement value.
    pub value: Value,
}
