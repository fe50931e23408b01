use crate::core::{Event, EventKind, Particle};
use crate::error::{Error, Result};
use crate::output::StateWriter;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::io::Write;

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    /// The configured number of resolved events was reached (also reported in
    /// the degenerate case of an empty event queue).
    BudgetExhausted,
    /// The tracked (largest-radius) particle touched a wall.
    TrackedHitWall,
}

/// Event-driven simulation of hard disks in the square box [0, L] x [0, L].
///
/// The driver exclusively owns the particle collection and the event queue.
/// Stale events are never deleted from the heap; they are discarded when
/// popped via the collision-counter validity check (lazy invalidation).
#[derive(Debug)]
pub struct Simulation {
    time_now: f64,
    box_len: f64,
    pub particles: Vec<Particle>,
    tracked: usize,
    pq: BinaryHeap<Reverse<Event>>,
    events_processed: u64,
}

impl Simulation {
    /// Create a simulation from an already-parsed particle collection.
    ///
    /// `start_time` is the initial simulation clock (first line of the
    /// dynamic input). The tracked particle is the one with the largest
    /// radius, first occurrence on ties. The full O(n^2) initial event build
    /// runs here; all later prediction is incremental.
    pub fn new(particles: Vec<Particle>, box_len: f64, start_time: f64) -> Result<Self> {
        if particles.is_empty() {
            return Err(Error::InvalidParam("particle list must not be empty".into()));
        }
        if !box_len.is_finite() || box_len <= 0.0 {
            return Err(Error::InvalidParam(
                "box side length must be finite and > 0".into(),
            ));
        }
        if !start_time.is_finite() {
            return Err(Error::InvalidParam("start time must be finite".into()));
        }
        for p in &particles {
            if 2.0 * p.radius > box_len {
                return Err(Error::InvalidParam(format!(
                    "particle {} with radius {} does not fit in a box of side {}",
                    p.id, p.radius, box_len
                )));
            }
        }

        let tracked = tracked_index(&particles);
        let mut sim = Self {
            time_now: start_time,
            box_len,
            particles,
            tracked,
            pq: BinaryHeap::new(),
            events_processed: 0,
        };
        sim.schedule_initial_events()?;
        Ok(sim)
    }

    /// Current simulation time.
    pub fn time(&self) -> f64 {
        self.time_now
    }

    /// Number of particles.
    pub fn num_particles(&self) -> usize {
        self.particles.len()
    }

    /// Index of the tracked (largest-radius) particle.
    pub fn tracked_index(&self) -> usize {
        self.tracked
    }

    /// Number of valid events resolved so far.
    pub fn events_processed(&self) -> u64 {
        self.events_processed
    }

    /// Total kinetic energy (diagnostic).
    pub fn kinetic_energy(&self) -> f64 {
        self.particles.iter().map(|p| p.kinetic_energy()).sum()
    }

    /// Run the main loop until `max_events` valid events have been resolved
    /// or the tracked particle touches a wall.
    ///
    /// Emits the initial snapshot, one snapshot per valid event (including
    /// the halting wall event), and the end-of-stream sentinel. The wall
    /// event that halts the run is NOT resolved: the run ends at the exact
    /// moment of contact, with the tracked particle's velocity unchanged.
    pub fn run<W: Write>(&mut self, max_events: u64, out: &mut StateWriter<W>) -> Result<HaltReason> {
        out.write_snapshot(self.time_now, &self.particles)?;

        let reason = loop {
            if self.events_processed >= max_events {
                break HaltReason::BudgetExhausted;
            }
            let Some(Reverse(event)) = self.pq.pop() else {
                break HaltReason::BudgetExhausted;
            };
            // Stale predictions are free to skip: no snapshot, no budget.
            if !event.is_valid(&self.particles) {
                continue;
            }

            let t_event = event.time();
            let dt = t_event - self.time_now;
            for p in &mut self.particles {
                p.advance(dt);
            }
            self.time_now = t_event;

            out.write_snapshot(self.time_now, &self.particles)?;

            if event.is_wall() && event.primary() == self.tracked {
                break HaltReason::TrackedHitWall;
            }

            event.resolve(&mut self.particles);

            // Re-predict for every particle whose velocity just changed. For a
            // pair event both sides re-scan, so the same future pair contact
            // can be pushed twice; whichever copy pops first resolves it and
            // the counter check discards the other.
            match event.kind() {
                EventKind::Pair { i, j } => {
                    self.schedule_for(i)?;
                    self.schedule_for(j)?;
                }
                EventKind::VerticalWall { i } | EventKind::HorizontalWall { i } => {
                    self.schedule_for(i)?;
                }
            }

            self.events_processed += 1;
        };

        out.write_sentinel()?;
        Ok(reason)
    }

    // ============ Internal helpers ============

    fn schedule_initial_events(&mut self) -> Result<()> {
        let n = self.particles.len();
        for i in 0..n {
            self.schedule_walls_for(i)?;
            for j in (i + 1)..n {
                if let Some(tc) = self.particles[i].time_to_collision(&self.particles[j]) {
                    self.pq
                        .push(Reverse(Event::pair(self.time_now + tc, i, j, &self.particles)?));
                }
            }
        }
        Ok(())
    }

    /// Push fresh wall and pair predictions for particle `i`.
    fn schedule_for(&mut self, i: usize) -> Result<()> {
        self.schedule_walls_for(i)?;
        for j in 0..self.particles.len() {
            if j == i {
                continue;
            }
            if let Some(tc) = self.particles[i].time_to_collision(&self.particles[j]) {
                self.pq
                    .push(Reverse(Event::pair(self.time_now + tc, i, j, &self.particles)?));
            }
        }
        Ok(())
    }

    fn schedule_walls_for(&mut self, i: usize) -> Result<()> {
        if let Some(tc) = self.particles[i].time_to_vertical_wall(0.0, self.box_len) {
            self.pq
                .push(Reverse(Event::vertical_wall(self.time_now + tc, i, &self.particles)?));
        }
        if let Some(tc) = self.particles[i].time_to_horizontal_wall(0.0, self.box_len) {
            self.pq
                .push(Reverse(Event::horizontal_wall(self.time_now + tc, i, &self.particles)?));
        }
        Ok(())
    }
}

/// Index of the largest-radius particle, first occurrence on ties.
fn tracked_index(particles: &[Particle]) -> usize {
    let mut best = 0usize;
    for (i, p) in particles.iter().enumerate().skip(1) {
        if p.radius > particles[best].radius {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle(id: u32, x: f64, y: f64, vx: f64, vy: f64, r: f64, m: f64) -> Particle {
        Particle::new(id, x, y, vx, vy, r, m).unwrap()
    }

    #[test]
    fn tracked_is_largest_radius_first_occurrence() -> Result<()> {
        let ps = vec![
            particle(0, 2.0, 2.0, 0.1, 0.0, 0.3, 1.0),
            particle(1, 5.0, 5.0, 0.0, 0.1, 0.7, 2.0),
            particle(2, 8.0, 8.0, -0.1, 0.0, 0.7, 2.0),
        ];
        let sim = Simulation::new(ps, 10.0, 0.0)?;
        assert_eq!(sim.tracked_index(), 1);
        Ok(())
    }

    #[test]
    fn rejects_empty_collection_and_bad_box() {
        assert!(Simulation::new(vec![], 10.0, 0.0).is_err());
        let ps = vec![particle(0, 5.0, 5.0, 0.0, 0.0, 1.0, 1.0)];
        assert!(Simulation::new(ps.clone(), 0.0, 0.0).is_err());
        // Radius 1.0 cannot fit in a box of side 1.5.
        assert!(Simulation::new(ps, 1.5, 0.0).is_err());
    }

    #[test]
    fn initial_queue_has_walls_and_pairs() -> Result<()> {
        // Two moving particles: 2 wall events each (diagonal velocity) plus
        // one pair prediction for the head-on approach.
        let ps = vec![
            particle(0, 3.0, 5.0, 1.0, 0.5, 0.2, 1.0),
            particle(1, 7.0, 5.0, -1.0, 0.5, 0.2, 1.0),
        ];
        let sim = Simulation::new(ps, 10.0, 0.0)?;
        assert_eq!(sim.pq.len(), 5);
        Ok(())
    }

    #[test]
    fn start_time_offsets_event_times() -> Result<()> {
        // Single particle heading right from x=5 with r=1 in L=10 at v=1:
        // contact after 4 time units, so at absolute time 104.
        let ps = vec![particle(0, 5.0, 5.0, 1.0, 0.0, 1.0, 1.0)];
        let sim = Simulation::new(ps, 10.0, 100.0)?;
        let Reverse(ev) = sim.pq.peek().copied().expect("one wall event");
        assert!((ev.time() - 104.0).abs() < 1e-12);
        Ok(())
    }
}
