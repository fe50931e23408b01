use crate::core::Particle;
use crate::error::{Error, Result};
use ordered_float::NotNan;
use std::cmp::Ordering;

/// The three shapes a predicted collision can take.
///
/// Particles are referenced by their index into the driver's particle
/// collection; the driver exclusively owns the particles and an event never
/// copies one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Particle `i` hits the left or right wall.
    VerticalWall { i: usize },
    /// Particle `i` hits the bottom or top wall.
    HorizontalWall { i: usize },
    /// Particles `i` and `j` collide.
    Pair { i: usize, j: usize },
}

impl EventKind {
    #[inline]
    fn order_key(&self) -> (u8, usize, usize) {
        match *self {
            EventKind::Pair { i, j } => (0, i, j),
            EventKind::VerticalWall { i } => (1, i, 0),
            EventKind::HorizontalWall { i } => (2, i, 0),
        }
    }
}

/// An immutable prediction of a future collision at an absolute time.
///
/// At construction the event snapshots the collision counter of each particle
/// it references (0 for an absent second particle). The snapshot never
/// changes; once any referenced particle undergoes a collision the event is
/// permanently stale and [`Event::is_valid`] reports false. Stale events are
/// never removed from the queue, only discarded when popped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    time: NotNan<f64>,
    kind: EventKind,
    cc_i: u64,
    cc_j: u64,
}

impl Event {
    fn new(time: f64, kind: EventKind, cc_i: u64, cc_j: u64) -> Result<Self> {
        if !time.is_finite() {
            return Err(Error::InvalidParam("event time must be finite".into()));
        }
        let time = NotNan::new(time)
            .map_err(|_| Error::InvalidParam("event time cannot be NaN".into()))?;
        Ok(Self {
            time,
            kind,
            cc_i,
            cc_j,
        })
    }

    /// Predicted vertical-wall collision of particle `i` at absolute `time`.
    pub fn vertical_wall(time: f64, i: usize, particles: &[Particle]) -> Result<Self> {
        Self::new(
            time,
            EventKind::VerticalWall { i },
            particles[i].collision_count,
            0,
        )
    }

    /// Predicted horizontal-wall collision of particle `i` at absolute `time`.
    pub fn horizontal_wall(time: f64, i: usize, particles: &[Particle]) -> Result<Self> {
        Self::new(
            time,
            EventKind::HorizontalWall { i },
            particles[i].collision_count,
            0,
        )
    }

    /// Predicted collision between particles `i` and `j` at absolute `time`.
    pub fn pair(time: f64, i: usize, j: usize, particles: &[Particle]) -> Result<Self> {
        Self::new(
            time,
            EventKind::Pair { i, j },
            particles[i].collision_count,
            particles[j].collision_count,
        )
    }

    /// Absolute event time.
    #[inline]
    pub fn time(&self) -> f64 {
        self.time.into_inner()
    }

    /// Event kind and participants.
    #[inline]
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Index of the primary particle.
    #[inline]
    pub fn primary(&self) -> usize {
        match self.kind {
            EventKind::VerticalWall { i }
            | EventKind::HorizontalWall { i }
            | EventKind::Pair { i, .. } => i,
        }
    }

    /// True for wall-type events (the tracked-particle halting condition).
    #[inline]
    pub fn is_wall(&self) -> bool {
        matches!(
            self.kind,
            EventKind::VerticalWall { .. } | EventKind::HorizontalWall { .. }
        )
    }

    /// True iff every snapshotted collision counter still matches the
    /// particle's current counter.
    pub fn is_valid(&self, particles: &[Particle]) -> bool {
        match self.kind {
            EventKind::VerticalWall { i } | EventKind::HorizontalWall { i } => {
                particles[i].collision_count == self.cc_i
            }
            EventKind::Pair { i, j } => {
                particles[i].collision_count == self.cc_i
                    && particles[j].collision_count == self.cc_j
            }
        }
    }

    /// Apply the collision this event predicts.
    ///
    /// Must only be called on an event confirmed valid, with all particles
    /// already advanced to the event time.
    pub fn resolve(&self, particles: &mut [Particle]) {
        match self.kind {
            EventKind::VerticalWall { i } => particles[i].bounce_off_vertical_wall(),
            EventKind::HorizontalWall { i } => particles[i].bounce_off_horizontal_wall(),
            EventKind::Pair { i, j } => {
                let (a, b) = pair_mut(particles, i, j);
                a.bounce(b);
            }
        }
    }
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        // Time is the only physically meaningful key; the remaining
        // comparisons just make the order total for the heap.
        self.time
            .cmp(&other.time)
            .then_with(|| self.kind.order_key().cmp(&other.kind.order_key()))
            .then_with(|| (self.cc_i, self.cc_j).cmp(&(other.cc_i, other.cc_j)))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Disjoint mutable borrows of particles `i` and `j` (`i != j`).
fn pair_mut(particles: &mut [Particle], i: usize, j: usize) -> (&mut Particle, &mut Particle) {
    debug_assert_ne!(i, j);
    if i < j {
        let (lo, hi) = particles.split_at_mut(j);
        (&mut lo[i], &mut hi[0])
    } else {
        let (lo, hi) = particles.split_at_mut(i);
        (&mut hi[0], &mut lo[j])
    }
}
