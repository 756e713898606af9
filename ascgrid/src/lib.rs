//! ESRI ASCII raster grid (`.asc`) format.
//!
//! # References
//!
//! 1. [ESRI ASCII raster format](https://desktop.arcgis.com/en/arcmap/latest/manage-data/raster-and-images/esri-ascii-raster-format.htm)
//! 1. [GDAL AAIGrid driver](https://gdal.org/drivers/raster/aaigrid.html)

mod error;

pub use crate::error::AscError;
use geo_types::Coord;
use std::{
    io::{BufRead, Lines, Write},
    str::FromStr,
};

/// Grid dimensions and geographic anchor of a raster.
///
/// Data rows run north to south; within a row, samples run west to
/// east. `(xllcorner, yllcorner)` anchor the lower-left (southwest)
/// corner in world coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    /// Number of sample columns.
    pub ncols: usize,

    /// Number of sample rows.
    pub nrows: usize,

    /// World X coordinate of the lower-left corner.
    pub xllcorner: f64,

    /// World Y coordinate of the lower-left corner.
    pub yllcorner: f64,

    /// Sample spacing in world units (cells are square).
    pub cellsize: f64,

    /// Sentinel for missing samples, when declared.
    pub nodata: Option<f64>,
}

impl Header {
    /// Returns the `(row, col)` grid indices of the cell containing
    /// `coord`.
    ///
    /// Indices may fall outside `[0, nrows) × [0, ncols)` when the
    /// coordinate lies outside the raster; callers clamp or reject.
    pub fn index_of(&self, coord: Coord<f64>) -> (i64, i64) {
        #[allow(clippy::cast_possible_truncation)]
        let col = ((coord.x - self.xllcorner) / self.cellsize).floor() as i64;
        #[allow(clippy::cast_possible_truncation)]
        let row_from_south = ((coord.y - self.yllcorner) / self.cellsize).floor() as i64;
        (self.nrows as i64 - 1 - row_from_south, col)
    }

    /// Returns the world X coordinate of column `col`.
    pub fn x_of(&self, col: usize) -> f64 {
        self.xllcorner + col as f64 * self.cellsize
    }

    /// Returns the world Y coordinate of row `row`.
    pub fn y_of(&self, row: usize) -> f64 {
        self.yllcorner + (self.nrows - 1 - row) as f64 * self.cellsize
    }
}

/// Streaming reader over the data section of an `.asc` file.
///
/// Construction parses the five mandatory header lines plus an
/// optional `NODATA_value` line. Rows are then consumed in order,
/// which keeps windowed reads of large rasters to a single pass.
#[derive(Debug)]
pub struct AscReader<R> {
    header: Header,
    lines: Lines<R>,
    /// First data line, when the `NODATA_value` probe consumed it.
    pending: Option<String>,
    /// Index of the next data row, for diagnostics.
    row: usize,
}

impl<R: BufRead> AscReader<R> {
    pub fn new(reader: R) -> Result<Self, AscError> {
        let mut lines = reader.lines();

        let ncols = header_line(&mut lines, "ncols")?;
        let nrows = header_line(&mut lines, "nrows")?;
        let xllcorner = header_line(&mut lines, "xllcorner")?;
        let yllcorner = header_line(&mut lines, "yllcorner")?;
        let cellsize = header_line(&mut lines, "cellsize")?;

        // Outputs of this toolchain declare NODATA_value, raw
        // elevation inputs usually don't. Probe one line and stash it
        // back when it is already data.
        let mut nodata = None;
        let mut pending = None;
        if let Some(line) = lines.next().transpose()? {
            let mut tokens = line.split_whitespace();
            if tokens
                .next()
                .is_some_and(|key| key.eq_ignore_ascii_case("NODATA_value"))
            {
                let value = tokens.next().and_then(|v| v.parse().ok());
                match value {
                    Some(value) => nodata = Some(value),
                    None => {
                        return Err(AscError::Header {
                            key: "NODATA_value",
                            line,
                        })
                    }
                }
            } else {
                pending = Some(line);
            }
        }

        Ok(Self {
            header: Header {
                ncols,
                nrows,
                xllcorner,
                yllcorner,
                cellsize,
                nodata,
            },
            lines,
            pending,
            row: 0,
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Discards the next `n` data rows.
    pub fn skip_rows(&mut self, n: usize) -> Result<(), AscError> {
        for _ in 0..n {
            self.next_line()?.ok_or(AscError::Eof(self.row))?;
            self.row += 1;
        }
        Ok(())
    }

    /// Reads the next data row, appending `take` samples to `out`
    /// after discarding the first `skip` samples of the row.
    pub fn read_row(&mut self, skip: usize, take: usize, out: &mut Vec<f32>) -> Result<(), AscError> {
        let line = self.next_line()?.ok_or(AscError::Eof(self.row))?;
        let mut tokens = line.split_whitespace();

        let mut found = 0;
        for _ in 0..skip {
            if tokens.next().is_none() {
                return Err(AscError::ShortRow {
                    row: self.row,
                    expected: skip + take,
                    found,
                });
            }
            found += 1;
        }

        for col in 0..take {
            let token = tokens.next().ok_or(AscError::ShortRow {
                row: self.row,
                expected: skip + take,
                found: found + col,
            })?;
            let sample = token.parse::<f32>().map_err(|_| AscError::Sample {
                row: self.row,
                col: skip + col,
                token: token.to_string(),
            })?;
            out.push(sample);
        }

        self.row += 1;
        Ok(())
    }

    fn next_line(&mut self) -> Result<Option<String>, AscError> {
        if let Some(line) = self.pending.take() {
            return Ok(Some(line));
        }
        Ok(self.lines.next().transpose()?)
    }
}

fn header_line<R: BufRead, T: FromStr>(
    lines: &mut Lines<R>,
    key: &'static str,
) -> Result<T, AscError> {
    let line = lines
        .next()
        .transpose()?
        .ok_or(AscError::MissingHeader(key))?;
    let mut tokens = line.split_whitespace();
    match (tokens.next(), tokens.next()) {
        (Some(k), Some(v)) if k.eq_ignore_ascii_case(key) => {
            v.parse().map_err(|_| AscError::Header { key, line })
        }
        _ => Err(AscError::Header { key, line }),
    }
}

/// A fully-materialized grid.
pub struct Grid {
    pub header: Header,
    samples: Box<[f32]>,
}

impl Grid {
    /// Parses a complete grid, header and all data rows.
    pub fn parse<R: BufRead>(reader: R) -> Result<Self, AscError> {
        let mut reader = AscReader::new(reader)?;
        let header = reader.header().clone();
        let mut samples = Vec::with_capacity(header.nrows * header.ncols);
        for _ in 0..header.nrows {
            reader.read_row(0, header.ncols, &mut samples)?;
        }
        Ok(Self {
            header,
            samples: samples.into_boxed_slice(),
        })
    }

    /// Returns the sample at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.samples[row * self.header.ncols + col]
    }

    /// Returns all samples, row-major, northmost row first.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }
}

/// Writes `header` and `samples` (row-major, northmost row first) as
/// an `.asc` grid.
pub fn write_grid<W: Write>(mut w: W, header: &Header, samples: &[f32]) -> Result<(), AscError> {
    assert_eq!(
        samples.len(),
        header.nrows * header.ncols,
        "sample count must match header dimensions"
    );

    writeln!(w, "ncols {}", header.ncols)?;
    writeln!(w, "nrows {}", header.nrows)?;
    writeln!(w, "xllcorner {}", header.xllcorner)?;
    writeln!(w, "yllcorner {}", header.yllcorner)?;
    writeln!(w, "cellsize {}", header.cellsize)?;
    if let Some(nodata) = header.nodata {
        writeln!(w, "NODATA_value {nodata}")?;
    }

    for row in samples.chunks(header.ncols) {
        let mut row = row.iter();
        if let Some(first) = row.next() {
            write!(w, "{first}")?;
        }
        for sample in row {
            write!(w, " {sample}")?;
        }
        writeln!(w)?;
    }
    Ok(())
}
