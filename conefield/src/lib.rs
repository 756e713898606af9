//! Glide-cone safety-altitude engine.
//!
//! Given a window of an elevation raster and a "home" landing point,
//! [`ConeField`] computes for every cell the lowest altitude from
//! which a glider of fixed glide ratio can reach home while keeping a
//! configured clearance above all terrain en route. A post-pass
//! derives the mountain passes that concentrate many glide routes.
//!
//! The field is built once per invocation, mutated only by the
//! propagation loop and the post-processing passes, then written out
//! and dropped. Cells reference their dominating "origin" cell by
//! grid indices, never by pointer, so the field stays trivially
//! relocatable.

mod cell;
mod error;
mod field;
mod los;
mod params;
mod passes;
mod propagate;

pub use crate::{
    cell::Cell,
    error::ConeError,
    field::{ConeField, Variant},
    params::Params,
    passes::Pass,
};

/// Ground cells are rewritten to this altitude before output, which
/// lets per-home rasters recombine by per-cell minimum.
pub const GROUND_DISPLAY_ALTITUDE: f32 = 0.0;

/// A pass is emitted only when more than this many glide routes
/// traverse it; single noisy saddles stay below it.
pub const PASS_WEIGHT_THRESHOLD: u32 = 100;

/// Upper bound on origin-chain length during pass weighting.
/// Exhausting it indicates a cycle, which the relaxation rules
/// exclude.
pub const MAX_CHAIN_DEPTH: usize = 1000;
