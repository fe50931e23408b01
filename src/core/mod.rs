//! Core event-driven collision engine: particles, timed collision
//! predictions, and the driver loop that resolves them in time order.

pub mod event;
pub mod particle;
pub mod sim;

pub use event::{Event, EventKind};
pub use particle::Particle;
pub use sim::{HaltReason, Simulation};
