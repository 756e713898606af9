use crate::{cell::Cell, error::ConeError, params::Params};
use ascgrid::{write_grid, AscReader, Header};
use log::debug;
use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

/// Which of the two raster outputs to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Altitudes verbatim. After flattening, ground carries the
    /// display altitude, so per-home rasters recombine by per-cell
    /// minimum.
    Combine,

    /// Zero altitudes replaced by the no-data ceiling, so viewers
    /// render ground transparently.
    Local,
}

/// The safety-altitude field: a dense window of cells clipped out of
/// the source raster around the home point.
///
/// `i` increases southward, `j` eastward, both local to the window.
/// The global header and window offsets are retained so outputs can
/// be re-anchored to world coordinates.
#[derive(Debug)]
pub struct ConeField {
    /// Row-major cells, `nrows × ncols`.
    pub(crate) cells: Vec<Cell>,
    pub(crate) nrows: usize,
    pub(crate) ncols: usize,

    /// Home cell, in window indices.
    pub(crate) home: (usize, usize),

    /// Header of the source raster (global extent).
    pub(crate) global: Header,

    /// Window offset into the global raster, inclusive.
    pub(crate) start_i: usize,
    pub(crate) start_j: usize,

    /// Metres of altitude lost per cell of horizontal travel
    /// (`cellsize / glide_ratio`), precomputed once.
    pub(crate) sink_per_cell: f32,

    /// No-data ceiling, metres.
    pub(crate) ceiling: f32,
}

impl ConeField {
    /// Loads the window of `path` within gliding reach of
    /// `params.home`.
    pub fn load<P: AsRef<Path>>(path: P, params: &Params) -> Result<Self, ConeError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ConeError::Open {
            path: path.to_owned(),
            source,
        })?;
        Self::from_reader(BufReader::new(file), params)
    }

    /// Loads from an already-open raster stream. See [`Self::load`].
    pub fn from_reader<R: BufRead>(reader: R, params: &Params) -> Result<Self, ConeError> {
        let mut reader = AscReader::new(reader)?;
        let global = reader.header().clone();

        let sink_per_cell = (global.cellsize / f64::from(params.glide_ratio)) as f32;

        // Beyond this many cells from home, even an obstacle-free
        // glide needs more altitude than the ceiling tracks.
        #[allow(clippy::cast_possible_truncation)]
        let radius = (f64::from(params.ceiling) * f64::from(params.glide_ratio) / global.cellsize)
            .ceil() as i64;

        let (home_i, home_j) = global.index_of(params.home);
        if home_i < 0
            || home_i >= global.nrows as i64
            || home_j < 0
            || home_j >= global.ncols as i64
        {
            return Err(ConeError::HomeOutsideRaster(params.home));
        }

        let start_i = (home_i - radius).max(0) as usize;
        let end_i = (home_i + radius).min(global.nrows as i64 - 1) as usize;
        let start_j = (home_j - radius).max(0) as usize;
        let end_j = (home_j + radius).min(global.ncols as i64 - 1) as usize;

        let nrows = end_i - start_i + 1;
        let ncols = end_j - start_j + 1;
        let home = (home_i as usize - start_i, home_j as usize - start_j);

        debug!(
            "clipping to rows {start_i}..={end_i}, cols {start_j}..={end_j}; home at {home:?}"
        );

        reader.skip_rows(start_i)?;
        let mut cells = Vec::with_capacity(nrows * ncols);
        let mut row = Vec::with_capacity(ncols);
        for i in 0..nrows {
            row.clear();
            reader.read_row(start_j, ncols, &mut row)?;
            for (j, &elevation) in row.iter().enumerate() {
                cells.push(Cell::new(elevation, i, j, params.ceiling));
            }
        }

        Ok(Self {
            cells,
            nrows,
            ncols,
            home,
            global,
            start_i,
            start_j,
            sink_per_cell,
            ceiling: params.ceiling,
        })
    }

    /// Folds the ground-clearance margin into every elevation. This
    /// is the only elevation mutation; every later comparison treats
    /// the augmented value as ground.
    pub fn add_ground_clearance(&mut self, clearance: f32) {
        for cell in &mut self.cells {
            cell.elevation += clearance;
        }
    }

    /// Seeds the home cell: its cone starts at circuit height above
    /// its own (clearance-augmented) ground, rooted at itself.
    pub fn init_home(&mut self, safety_margin: f32) {
        let (i, j) = self.home;
        let idx = self.idx(i, j);
        let cell = &mut self.cells[idx];
        cell.altitude = cell.elevation + safety_margin;
        cell.origin = Some((i, j));
    }

    /// Rewrites every ground cell to `altitude` before output.
    pub fn flatten_ground(&mut self, altitude: f32) {
        for cell in &mut self.cells {
            if cell.ground {
                cell.altitude = altitude;
            }
        }
    }

    /// Header re-anchored to the clipped window.
    pub fn window_header(&self) -> Header {
        let end_i = self.start_i + self.nrows - 1;
        Header {
            ncols: self.ncols,
            nrows: self.nrows,
            xllcorner: self.global.x_of(self.start_j),
            yllcorner: self.global.y_of(end_i),
            cellsize: self.global.cellsize,
            nodata: Some(f64::from(self.ceiling)),
        }
    }

    pub fn write_raster<W: Write>(&self, w: W, variant: Variant) -> Result<(), ConeError> {
        let samples: Vec<f32> = match variant {
            Variant::Combine => self.cells.iter().map(|cell| cell.altitude).collect(),
            Variant::Local => self
                .cells
                .iter()
                .map(|cell| {
                    if cell.altitude == 0.0 {
                        self.ceiling
                    } else {
                        cell.altitude
                    }
                })
                .collect(),
        };
        write_grid(w, &self.window_header(), &samples)?;
        Ok(())
    }

    pub fn write_raster_file<P: AsRef<Path>>(
        &self,
        path: P,
        variant: Variant,
    ) -> Result<(), ConeError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| ConeError::Create {
            path: path.to_owned(),
            source,
        })?;
        let mut w = BufWriter::new(file);
        self.write_raster(&mut w, variant)?;
        w.flush()?;
        Ok(())
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Home cell, in window indices.
    pub fn home(&self) -> (usize, usize) {
        self.home
    }

    /// Metres of altitude lost per cell of horizontal travel.
    pub fn sink_per_cell(&self) -> f32 {
        self.sink_per_cell
    }

    pub fn cell(&self, i: usize, j: usize) -> &Cell {
        &self.cells[self.idx(i, j)]
    }

    /// Iterates over all cells, row-major.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub(crate) fn idx(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < self.nrows && j < self.ncols);
        i * self.ncols + j
    }

    pub(crate) fn cell_mut(&mut self, i: usize, j: usize) -> &mut Cell {
        let idx = self.idx(i, j);
        &mut self.cells[idx]
    }
}
