use crate::core::Particle;
use crate::error::Result;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Append-only writer of simulation state records.
///
/// Record format (one per processed event, plus the initial state):
/// a blank line, a `*` marker line, the snapshot time in scientific notation,
/// then one `x y vx vy` line per particle in id order. After the run a lone
/// `\n*` sentinel marks the end of the stream. The stream is flushed after
/// every record so a consumer can follow the file as the run progresses.
#[derive(Debug)]
pub struct StateWriter<W: Write> {
    out: W,
}

impl StateWriter<BufWriter<std::fs::File>> {
    /// Open `path` for appending. The file must already exist (the run
    /// appends to its own dynamic input file).
    pub fn append(path: &Path) -> Result<Self> {
        let file = OpenOptions::new().append(true).open(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> StateWriter<W> {
    /// Wrap an arbitrary sink.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Append one state record.
    pub fn write_snapshot(&mut self, time: f64, particles: &[Particle]) -> Result<()> {
        write!(self.out, "\n*\n{time:.7E}")?;
        for p in particles {
            write!(self.out, "\n{:.7E} {:.7E} {:.7E} {:.7E}", p.x, p.y, p.vx, p.vy)?;
        }
        self.out.flush()?;
        Ok(())
    }

    /// Append the end-of-stream sentinel.
    pub fn write_sentinel(&mut self) -> Result<()> {
        write!(self.out, "\n*")?;
        self.out.flush()?;
        Ok(())
    }

    /// Consume the writer and return the underlying sink.
    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_record_format() -> Result<()> {
        let particles = vec![
            Particle::new(0, 1.0, 2.0, 0.5, -0.25, 0.2, 1.0)?,
            Particle::new(1, 3.0, 4.0, -1.0, 0.0, 0.2, 1.0)?,
        ];
        let mut w = StateWriter::new(Vec::new());
        w.write_snapshot(0.5, &particles)?;
        w.write_sentinel()?;
        let text = String::from_utf8(w.into_inner()).unwrap();
        assert_eq!(
            text,
            "\n*\n5.0000000E-1\
             \n1.0000000E0 2.0000000E0 5.0000000E-1 -2.5000000E-1\
             \n3.0000000E0 4.0000000E0 -1.0000000E0 0.0000000E0\
             \n*"
        );
        Ok(())
    }
}
