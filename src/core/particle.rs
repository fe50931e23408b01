use crate::error::{Error, Result};

/// A hard disk confined to a square box.
///
/// Fields:
/// - `id`: stable identifier, used only for identity, never for physics
/// - `x`, `y`: position of the center
/// - `vx`, `vy`: velocity
/// - `radius`: disk radius (> 0), immutable after construction
/// - `mass`: particle mass (> 0), immutable after construction
/// - `collision_count`: incremented each time a resolved collision changes
///   this particle's velocity (the event-invalidation version number)
///
/// Position changes only through [`Particle::advance`]; velocity changes only
/// through the `bounce*` collision resolutions.
#[derive(Debug, Clone)]
pub struct Particle {
    /// Stable particle identifier.
    pub id: u32,
    /// Position x.
    pub x: f64,
    /// Position y.
    pub y: f64,
    /// Velocity x.
    pub vx: f64,
    /// Velocity y.
    pub vy: f64,
    /// Hard-disk radius (> 0).
    pub radius: f64,
    /// Mass (> 0).
    pub mass: f64,
    /// Collision participation counter (for event invalidation).
    pub collision_count: u64,
}

impl Particle {
    /// Create a new particle after validating invariants.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if `radius` or `mass` is non-positive or any
    ///   component is NaN/inf.
    pub fn new(id: u32, x: f64, y: f64, vx: f64, vy: f64, radius: f64, mass: f64) -> Result<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(Error::InvalidParam("radius must be finite and > 0".into()));
        }
        if !mass.is_finite() || mass <= 0.0 {
            return Err(Error::InvalidParam("mass must be finite and > 0".into()));
        }
        if !x.is_finite() || !y.is_finite() {
            return Err(Error::InvalidParam("position must be finite".into()));
        }
        if !vx.is_finite() || !vy.is_finite() {
            return Err(Error::InvalidParam("velocity must be finite".into()));
        }
        Ok(Self {
            id,
            x,
            y,
            vx,
            vy,
            radius,
            mass,
            collision_count: 0,
        })
    }

    /// Duration until the disk's edge touches the left or right wall, or
    /// `None` if `vx == 0` (no vertical-wall contact from current velocity).
    pub fn time_to_vertical_wall(&self, left_x: f64, right_x: f64) -> Option<f64> {
        if self.vx > 0.0 {
            Some((right_x - self.radius - self.x) / self.vx)
        } else if self.vx < 0.0 {
            Some((left_x + self.radius - self.x) / self.vx)
        } else {
            None
        }
    }

    /// Duration until the disk's edge touches the bottom or top wall, or
    /// `None` if `vy == 0`.
    pub fn time_to_horizontal_wall(&self, bottom_y: f64, top_y: f64) -> Option<f64> {
        if self.vy > 0.0 {
            Some((top_y - self.radius - self.y) / self.vy)
        } else if self.vy < 0.0 {
            Some((bottom_y + self.radius - self.y) / self.vy)
        } else {
            None
        }
    }

    /// Duration until this disk contacts `other`, or `None` if they never do.
    ///
    /// Analytic root of the quadratic distance equation: with
    /// ΔR = other − self, ΔV relative velocity and σ the radii sum, the
    /// particles collide iff ΔV·ΔR < 0 (approaching) and the discriminant
    /// `(ΔV·ΔR)² − |ΔV|²(|ΔR|² − σ²)` is non-negative; the earlier root is
    /// the physical contact time.
    pub fn time_to_collision(&self, other: &Particle) -> Option<f64> {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dvx = other.vx - self.vx;
        let dvy = other.vy - self.vy;
        let sigma = self.radius + other.radius;

        let dr_sq = dx * dx + dy * dy;
        let dv_sq = dvx * dvx + dvy * dvy;
        let cross = dvx * dx + dvy * dy;

        if cross >= 0.0 {
            return None;
        }
        let d = cross * cross - dv_sq * (dr_sq - sigma * sigma);
        if d < 0.0 {
            return None;
        }
        Some(-(cross + d.sqrt()) / dv_sq)
    }

    /// Advance `dt` in time by pure translation at constant velocity.
    ///
    /// No side effect on velocity or the collision counter. The driver applies
    /// this to every particle uniformly before resolving any collision so the
    /// whole collection stays time-synchronized.
    #[inline]
    pub fn advance(&mut self, dt: f64) {
        self.x += self.vx * dt;
        self.y += self.vy * dt;
    }

    /// Bounce off a vertical wall: negate vx, bump the collision counter.
    pub fn bounce_off_vertical_wall(&mut self) {
        self.vx = -self.vx;
        self.bump_collision_count();
    }

    /// Bounce off a horizontal wall: negate vy, bump the collision counter.
    pub fn bounce_off_horizontal_wall(&mut self) {
        self.vy = -self.vy;
        self.bump_collision_count();
    }

    /// Resolve an elastic hard-disk collision with `other`.
    ///
    /// Impulse magnitude J = 2·m₁·m₂·(ΔV·ΔR) / (σ·(m₁+m₂)) along the line of
    /// centers; conserves total momentum and kinetic energy for any mass
    /// ratio. Both collision counters are bumped. Caller must only invoke this
    /// at the instant of contact with ΔV·ΔR < 0.
    pub fn bounce(&mut self, other: &mut Particle) {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dvx = other.vx - self.vx;
        let dvy = other.vy - self.vy;
        let sigma = self.radius + other.radius;
        let cross = dvx * dx + dvy * dy;

        let j = (2.0 * self.mass * other.mass * cross) / (sigma * (self.mass + other.mass));
        let jx = j * dx / sigma;
        let jy = j * dy / sigma;

        self.vx += jx / self.mass;
        self.vy += jy / self.mass;
        self.bump_collision_count();

        other.vx -= jx / other.mass;
        other.vy -= jy / other.mass;
        other.bump_collision_count();
    }

    /// Increment the collision counter (used for event invalidation).
    #[inline]
    pub fn bump_collision_count(&mut self) {
        self.collision_count = self.collision_count.saturating_add(1);
    }

    /// Returns the particle's kinetic energy: 1/2 m |v|^2.
    #[inline]
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * (self.vx * self.vx + self.vy * self.vy)
    }
}
