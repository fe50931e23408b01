//! Event-driven molecular dynamics of hard disks in a square box.
//!
//! Instead of stepping at a fixed Δt, the engine advances state to the exact
//! instants of particle-particle and particle-wall collisions, predicted
//! analytically and kept in a time-ordered priority queue with lazy
//! invalidation (stale predictions are detected by collision-counter
//! snapshots when popped, never deleted eagerly).
//!
//! The particle with the largest radius is tracked to study its random walk:
//! a run halts either when that particle touches a wall or when the
//! configured event budget is exhausted, appending textual state records to
//! the dynamic file as it goes.

pub mod config;
pub mod core;
pub mod error;
pub mod generate;
pub mod input;
pub mod output;

pub use crate::config::Config;
pub use crate::core::{Event, EventKind, HaltReason, Particle, Simulation};
pub use crate::error::{Error, Result};
pub use crate::output::StateWriter;
