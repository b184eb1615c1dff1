//! Named derived metrics recomputed on every observation.
//!
//! An [`Output`] is a stateless function of world state. Outputs are
//! registered during setup and recomputed fresh each time the world is
//! observed, so implementations must be cheap.
//!
//! ## Concurrency
//! `compute` receives a [`WorldView`], a read-only view borrowed from the
//! world's already-held shared lock. Outputs therefore never acquire the
//! world lock themselves — re-acquiring it from inside an observation would
//! risk deadlocking against a queued writer.

use serde::Serialize;
use serde_json::Value;

use crate::engine::world::WorldView;

/// The result of computing one output.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OutputValue {
    /// The output's unique name.
    pub name: String,

    /// Human-readable description, used in prompt construction.
    pub description: String,

    /// The computed value.
    pub value: Value,
}

/// A named, derived metric over world state.
pub trait Output: Send + Sync {
    /// Returns the output's unique name.
    fn name(&self) -> &str;

    /// Returns a human-readable description, used in prompt construction.
    fn description(&self) -> &str;

    /// Computes the current value from a read-only view of the world.
    fn compute(&self, world: &WorldView<'_>) -> OutputValue;
}
