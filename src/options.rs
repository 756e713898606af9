use anyhow::{anyhow, Error as AnyError};
use clap::Parser;
use std::{path::PathBuf, str::FromStr};

/// Compute glide-cone safety-altitude rasters around a landing point.
///
/// Reads an ASCII elevation raster, floods the minimum altitude
/// needed to glide home from every cell within reach, and writes two
/// `.asc` rasters plus an optional mountain-pass CSV into the output
/// directory.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Cli {
    /// World X coordinate of the landing point, metres.
    pub homex: f64,

    /// World Y coordinate of the landing point, metres.
    pub homey: f64,

    /// Glide ratio: horizontal metres per metre of altitude lost.
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    pub finesse: u32,

    /// Ground clearance kept above terrain, metres.
    #[arg(allow_hyphen_values = true)]
    pub dist_sol: i32,

    /// Safety margin above the landing point's ground, metres.
    #[arg(allow_hyphen_values = true)]
    pub securite: i32,

    /// Altitude ceiling; also the no-data value in outputs, metres.
    pub nodataltitude: u32,

    /// Directory the output files are written into.
    pub output_path: PathBuf,

    /// Input elevation raster (.asc).
    pub topology: PathBuf,

    /// Whether to derive and export mountain passes.
    pub export_passes: Switch,
}

/// Case-insensitive boolean argument: `true`, `false`, `0` or `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Switch(pub bool);

impl FromStr for Switch {
    type Err = AnyError;

    fn from_str(s: &str) -> Result<Self, AnyError> {
        match s.to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(Self(true)),
            "false" | "0" => Ok(Self(false)),
            _ => Err(anyhow!("expected one of true, false, 0, 1; got {s:?}")),
        }
    }
}
