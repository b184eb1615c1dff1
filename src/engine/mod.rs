//! # Engine Module
//!
//! Internal world engine implementation.
//!
//! This module contains all core building blocks such as:
//! - Component registry and bundles
//! - Archetypes and columnar storage
//! - Query execution
//! - World orchestration, inputs/outputs, observations
//!
//! Public API exposure is controlled by `lib.rs`.

pub mod archetype;
pub mod component;
pub mod error;
pub mod inputs;
pub mod outputs;
pub mod query;
pub mod storage;
pub mod systems;
pub mod types;
pub mod world;
