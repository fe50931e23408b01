use crate::error::{Error, Result};
use rand::{rng, rngs::StdRng, Rng, SeedableRng};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Parameters for generating a random initial condition.
///
/// The big (tracked) particle is written as row 0, at rest in the center of
/// the box; the small particles are rejection-sampled to avoid overlap, with
/// uniform random velocity components in [-max_speed, max_speed].
#[derive(Debug, Clone)]
pub struct GenerateParams {
    /// Number of small particles (the big one is added on top).
    pub num_small: usize,
    /// Box side length.
    pub box_len: f64,
    /// Small-particle radius.
    pub small_radius: f64,
    /// Small-particle mass.
    pub small_mass: f64,
    /// Big-particle radius (must exceed `small_radius` to be tracked).
    pub big_radius: f64,
    /// Big-particle mass.
    pub big_mass: f64,
    /// Maximum magnitude of each small-particle velocity component.
    pub max_speed: f64,
    /// RNG seed for reproducibility; `None` for nondeterministic.
    pub seed: Option<u64>,
}

/// Generate a static/dynamic input file pair for a fresh run.
pub fn write_input_files(
    static_path: &Path,
    dynamic_path: &Path,
    params: &GenerateParams,
) -> Result<()> {
    let (positions, velocities) = sample_initial_state(params)?;

    let n = params.num_small + 1;
    let mut static_out = BufWriter::new(File::create(static_path)?);
    writeln!(static_out, "{n}")?;
    writeln!(static_out, "{}", params.box_len)?;
    writeln!(static_out, "{} {}", params.big_radius, params.big_mass)?;
    for _ in 0..params.num_small {
        writeln!(static_out, "{} {}", params.small_radius, params.small_mass)?;
    }
    static_out.flush()?;

    let mut dynamic_out = BufWriter::new(File::create(dynamic_path)?);
    writeln!(dynamic_out, "0.0")?;
    for ((x, y), (vx, vy)) in positions.iter().zip(&velocities) {
        writeln!(dynamic_out, "{x} {y} {vx} {vy}")?;
    }
    dynamic_out.flush()?;
    Ok(())
}

/// Sample the initial positions and velocities, big particle first.
fn sample_initial_state(params: &GenerateParams) -> Result<(Vec<(f64, f64)>, Vec<(f64, f64)>)> {
    if !params.box_len.is_finite() || params.box_len <= 0.0 {
        return Err(Error::InvalidParam("box side must be finite and > 0".into()));
    }
    for (name, v) in [
        ("small_radius", params.small_radius),
        ("small_mass", params.small_mass),
        ("big_radius", params.big_radius),
        ("big_mass", params.big_mass),
        ("max_speed", params.max_speed),
    ] {
        if !v.is_finite() || v <= 0.0 {
            return Err(Error::InvalidParam(format!(
                "{name} must be finite and > 0"
            )));
        }
    }
    if params.big_radius <= params.small_radius {
        return Err(Error::InvalidParam(
            "big_radius must exceed small_radius so the big particle is tracked".into(),
        ));
    }
    if 2.0 * params.big_radius > params.box_len {
        return Err(Error::InvalidParam(
            "big particle does not fit in the box".into(),
        ));
    }

    let mut rng: StdRng = match params.seed {
        Some(s) => SeedableRng::seed_from_u64(s),
        None => SeedableRng::seed_from_u64(rng().random()),
    };

    let center = params.box_len / 2.0;
    let mut positions: Vec<(f64, f64)> = vec![(center, center)];
    let mut radii: Vec<f64> = vec![params.big_radius];
    let mut velocities: Vec<(f64, f64)> = vec![(0.0, 0.0)];

    // Rejection-sample non-overlapping positions for the small particles.
    let max_attempts = 1_000_000usize;
    let lo = params.small_radius;
    let hi = params.box_len - params.small_radius;
    for i in 0..params.num_small {
        let mut attempts = 0usize;
        let (x, y) = loop {
            if attempts >= max_attempts {
                return Err(Error::InvalidParam(format!(
                    "failed to place particle {} without overlap; try fewer particles or a smaller radius",
                    i + 1
                )));
            }
            attempts += 1;
            let x = rng.random_range(lo..=hi);
            let y = rng.random_range(lo..=hi);
            if !overlaps_existing(&positions, &radii, x, y, params.small_radius) {
                break (x, y);
            }
        };
        positions.push((x, y));
        radii.push(params.small_radius);
        velocities.push((
            rng.random_range(-params.max_speed..=params.max_speed),
            rng.random_range(-params.max_speed..=params.max_speed),
        ));
    }

    Ok((positions, velocities))
}

fn overlaps_existing(
    positions: &[(f64, f64)],
    radii: &[f64],
    x: f64,
    y: f64,
    radius: f64,
) -> bool {
    positions.iter().zip(radii).any(|(&(px, py), &pr)| {
        let dx = x - px;
        let dy = y - py;
        let min = radius + pr;
        dx * dx + dy * dy < min * min
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> GenerateParams {
        GenerateParams {
            num_small: 30,
            box_len: 6.0,
            small_radius: 0.2,
            small_mass: 0.9,
            big_radius: 0.7,
            big_mass: 2.0,
            max_speed: 2.0,
            seed: Some(42),
        }
    }

    #[test]
    fn sampled_state_is_non_overlapping_and_in_bounds() -> Result<()> {
        let p = params();
        let (positions, velocities) = sample_initial_state(&p)?;
        assert_eq!(positions.len(), p.num_small + 1);
        assert_eq!(velocities.len(), p.num_small + 1);
        assert_eq!(positions[0], (3.0, 3.0));
        assert_eq!(velocities[0], (0.0, 0.0));

        for (i, &(x, y)) in positions.iter().enumerate() {
            let r = if i == 0 { p.big_radius } else { p.small_radius };
            assert!(x >= r && x <= p.box_len - r, "x out of bounds: {x}");
            assert!(y >= r && y <= p.box_len - r, "y out of bounds: {y}");
            for (j, &(ox, oy)) in positions.iter().enumerate().skip(i + 1) {
                let or = if j == 0 { p.big_radius } else { p.small_radius };
                let dist = ((x - ox).powi(2) + (y - oy).powi(2)).sqrt();
                assert!(dist >= r + or - 1e-12, "particles {i} and {j} overlap");
            }
        }
        Ok(())
    }

    #[test]
    fn seeded_sampling_is_reproducible() -> Result<()> {
        let p = params();
        let a = sample_initial_state(&p)?;
        let b = sample_initial_state(&p)?;
        assert_eq!(a.0, b.0);
        assert_eq!(a.1, b.1);
        Ok(())
    }

    #[test]
    fn rejects_big_particle_not_biggest() {
        let mut p = params();
        p.big_radius = 0.2;
        assert!(sample_initial_state(&p).is_err());
    }
}
