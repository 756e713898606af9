use ascgrid::AscError;
use geo_types::Coord;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConeError {
    #[error("cannot open topology {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot create output {}: {source}", .path.display())]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Asc(#[from] AscError),

    #[error("home point ({}, {}) lies outside the raster", .0.x, .0.y)]
    HomeOutsideRaster(Coord<f64>),

    #[error("origin chain from cell ({i}, {j}) exceeded {max} cells")]
    ChainDepth { i: usize, j: usize, max: usize },
}
