//! Shared component types and sizes for benchmarks.

#[derive(Clone, Debug)]
pub struct Identity {
    pub name: u64,
    pub age: u8,
}

#[derive(Clone, Debug)]
pub struct Stat {
    pub health: i32,
    pub money: i64,
}

#[derive(Clone, Debug)]
pub struct Mood {
    pub happiness: i32,
}

/// Population size for spawn-heavy benchmarks.
pub const POPULATION: u64 = 100_000;
