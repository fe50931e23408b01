use crate::core::Particle;
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Static particle properties: one radius/mass pair per particle, plus the
/// box geometry. Row i pairs with row i of the dynamic input.
#[derive(Debug, Clone)]
pub struct StaticInput {
    /// Box side length; the box is [0, L] x [0, L].
    pub box_len: f64,
    /// Per-particle radius.
    pub radii: Vec<f64>,
    /// Per-particle mass.
    pub masses: Vec<f64>,
    /// Index of the tracked (largest-radius) particle, first on ties.
    pub big_index: usize,
}

/// Read the static input file: particle count, box side, then one
/// `radius mass` line per particle.
pub fn read_static(path: &Path) -> Result<StaticInput> {
    let file = File::open(path)
        .map_err(|_| Error::Config(format!("static file {} not found", path.display())))?;
    parse_static(BufReader::new(file))
}

/// Read the dynamic input file against an already-parsed static table:
/// initial time, then one `x y vx vy` line per particle, in static-file
/// order. Returns the initial time and the constructed particle collection.
pub fn read_dynamic(path: &Path, props: &StaticInput) -> Result<(f64, Vec<Particle>)> {
    let file = File::open(path)
        .map_err(|_| Error::Config(format!("dynamic file {} not found", path.display())))?;
    parse_dynamic(BufReader::new(file), props)
}

fn parse_static<R: BufRead>(reader: R) -> Result<StaticInput> {
    let mut lines = reader.lines();

    let n: usize = next_line(&mut lines, 1)?
        .trim()
        .parse()
        .map_err(|_| Error::Format("static file line 1: invalid particle count".into()))?;
    if n == 0 {
        return Err(Error::Format(
            "static file line 1: particle count must be > 0".into(),
        ));
    }
    let box_len = parse_field(&next_line(&mut lines, 2)?, "box side length", 2)?;

    let mut radii = Vec::with_capacity(n);
    let mut masses = Vec::with_capacity(n);
    let mut big_index = 0usize;
    for i in 0..n {
        let line_no = i + 3;
        let line = next_line(&mut lines, line_no)?;
        let mut fields = line.split_whitespace();
        let radius = parse_field(fields.next().unwrap_or(""), "radius", line_no)?;
        let mass = parse_field(fields.next().unwrap_or(""), "mass", line_no)?;
        if radius > radii.get(big_index).copied().unwrap_or(f64::NEG_INFINITY) {
            big_index = i;
        }
        radii.push(radius);
        masses.push(mass);
    }

    Ok(StaticInput {
        box_len,
        radii,
        masses,
        big_index,
    })
}

fn parse_dynamic<R: BufRead>(reader: R, props: &StaticInput) -> Result<(f64, Vec<Particle>)> {
    let mut lines = reader.lines();

    let time = parse_field(&next_line(&mut lines, 1)?, "initial time", 1)?;

    let n = props.radii.len();
    let mut particles = Vec::with_capacity(n);
    for i in 0..n {
        let line_no = i + 2;
        let line = next_line(&mut lines, line_no)?;
        let mut fields = line.split_whitespace();
        let x = parse_field(fields.next().unwrap_or(""), "x", line_no)?;
        let y = parse_field(fields.next().unwrap_or(""), "y", line_no)?;
        let vx = parse_field(fields.next().unwrap_or(""), "vx", line_no)?;
        let vy = parse_field(fields.next().unwrap_or(""), "vy", line_no)?;
        particles.push(Particle::new(
            i as u32,
            x,
            y,
            vx,
            vy,
            props.radii[i],
            props.masses[i],
        )?);
    }

    // Row count must match the static table exactly.
    if lines.next().is_some() {
        return Err(Error::Format(format!(
            "dynamic file: unexpected content after line {}",
            n + 1
        )));
    }

    Ok((time, particles))
}

fn next_line<R: BufRead>(lines: &mut std::io::Lines<R>, line_no: usize) -> Result<String> {
    match lines.next() {
        Some(line) => Ok(line?),
        None => Err(Error::Format(format!(
            "unexpected end of file at line {line_no}"
        ))),
    }
}

fn parse_field(field: &str, what: &str, line_no: usize) -> Result<f64> {
    field
        .trim()
        .parse()
        .map_err(|_| Error::Format(format!("line {line_no}: invalid {what} value {field:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const STATIC: &str = "3\n6.0\n0.2 0.9\n0.7 2.0\n0.2 0.9\n";
    const DYNAMIC: &str = "0.0\n1.0 1.0 0.5 -0.5\n3.0 3.0 0.0 0.0\n5.0 5.0 -0.5 0.5\n";

    #[test]
    fn parses_static_table() -> Result<()> {
        let s = parse_static(Cursor::new(STATIC))?;
        assert_eq!(s.box_len, 6.0);
        assert_eq!(s.radii, vec![0.2, 0.7, 0.2]);
        assert_eq!(s.masses, vec![0.9, 2.0, 0.9]);
        assert_eq!(s.big_index, 1);
        Ok(())
    }

    #[test]
    fn big_index_first_on_ties() -> Result<()> {
        let s = parse_static(Cursor::new("2\n6.0\n0.7 2.0\n0.7 2.0\n"))?;
        assert_eq!(s.big_index, 0);
        Ok(())
    }

    #[test]
    fn parses_dynamic_rows_in_order() -> Result<()> {
        let s = parse_static(Cursor::new(STATIC))?;
        let (time, particles) = parse_dynamic(Cursor::new(DYNAMIC), &s)?;
        assert_eq!(time, 0.0);
        assert_eq!(particles.len(), 3);
        assert_eq!(particles[1].radius, 0.7);
        assert_eq!(particles[1].mass, 2.0);
        assert_eq!((particles[0].x, particles[0].y), (1.0, 1.0));
        assert_eq!((particles[2].vx, particles[2].vy), (-0.5, 0.5));
        assert_eq!(particles[2].id, 2);
        Ok(())
    }

    #[test]
    fn rejects_truncated_static_file() {
        let err = parse_static(Cursor::new("3\n6.0\n0.2 0.9\n")).unwrap_err();
        assert!(err.to_string().contains("unexpected end of file"));
    }

    #[test]
    fn rejects_bad_numeric_field() {
        let err = parse_static(Cursor::new("1\n6.0\n0.2 heavy\n")).unwrap_err();
        assert!(err.to_string().contains("mass"));
    }

    #[test]
    fn rejects_trailing_dynamic_lines() {
        let s = parse_static(Cursor::new(STATIC)).unwrap();
        let extra = format!("{DYNAMIC}7.0 7.0 0.0 0.0\n");
        let err = parse_dynamic(Cursor::new(extra), &s).unwrap_err();
        assert!(err.to_string().contains("unexpected content"));
    }
}
