use crate::{error::ConeError, field::ConeField, MAX_CHAIN_DEPTH, PASS_WEIGHT_THRESHOLD};
use geo_types::Coord;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

/// A mountain pass derived from the propagated field.
#[derive(Debug, Clone, PartialEq)]
pub struct Pass {
    /// World coordinates of the pass cell.
    pub location: Coord<f64>,

    /// Number of glide routes traversing the pass.
    pub weight: u32,
}

impl ConeField {
    /// Flags cells whose chosen origin is ground-bound: the first
    /// non-ground cell on the way out of a landable basin is a
    /// terrain saddle.
    pub fn detect_passes(&mut self) {
        for idx in 0..self.cells.len() {
            let cell = &self.cells[idx];
            let flagged = match cell.origin {
                Some((oi, oj)) => self.cells[oi * self.ncols + oj].ground && !cell.ground,
                None => false,
            };
            self.cells[idx].mountain_pass = flagged;
        }
    }

    /// Counts, for every cell, how many origin chains route through
    /// it.
    pub fn weight_passes(&mut self) -> Result<(), ConeError> {
        for i in 0..self.nrows {
            for j in 0..self.ncols {
                self.weigh_chain(i, j)?;
            }
        }
        Ok(())
    }

    /// Walks the origin chain out of `(i, j)`, crediting every
    /// visited origin, until it reaches a ground or self-referential
    /// cell.
    fn weigh_chain(&mut self, i: usize, j: usize) -> Result<(), ConeError> {
        let (mut ci, mut cj) = (i, j);
        for _ in 0..MAX_CHAIN_DEPTH {
            let Some((oi, oj)) = self.cells[ci * self.ncols + cj].origin else {
                // Never relaxed; no chain to credit.
                return Ok(());
            };
            let origin = &mut self.cells[oi * self.ncols + oj];
            origin.weight += 1;
            if origin.ground || (oi == ci && oj == cj) {
                return Ok(());
            }
            (ci, cj) = (oi, oj);
        }
        Err(ConeError::ChainDepth {
            i,
            j,
            max: MAX_CHAIN_DEPTH,
        })
    }

    /// Returns the detected passes carrying more than
    /// [`PASS_WEIGHT_THRESHOLD`] routes, in world coordinates,
    /// row-major order.
    ///
    /// The grand-origin must be ground-bound too; together with the
    /// weight threshold this filters single noisy saddles.
    pub fn passes(&self) -> Vec<Pass> {
        let mut passes = Vec::new();
        for cell in &self.cells {
            if !cell.mountain_pass || cell.weight <= PASS_WEIGHT_THRESHOLD {
                continue;
            }
            let Some((oi, oj)) = cell.origin else { continue };
            let Some((ooi, ooj)) = self.cells[oi * self.ncols + oj].origin else {
                continue;
            };
            if !self.cells[ooi * self.ncols + ooj].ground {
                continue;
            }
            passes.push(Pass {
                location: Coord {
                    x: self.global.x_of(self.start_j + cell.j),
                    y: self.global.y_of(self.start_i + cell.i),
                },
                weight: cell.weight,
            });
        }
        passes
    }

    /// Writes the pass CSV: header `name,x,y,weight`, one `pass` row
    /// per emitted pass.
    pub fn write_passes<W: Write>(&self, mut w: W) -> Result<(), ConeError> {
        writeln!(w, "name,x,y,weight")?;
        for pass in self.passes() {
            writeln!(
                w,
                "pass,{},{},{}",
                pass.location.x, pass.location.y, pass.weight
            )?;
        }
        Ok(())
    }

    pub fn write_passes_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConeError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| ConeError::Create {
            path: path.to_owned(),
            source,
        })?;
        let mut w = BufWriter::new(file);
        self.write_passes(&mut w)?;
        w.flush()?;
        Ok(())
    }
}
