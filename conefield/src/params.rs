use geo_types::Coord;

/// Immutable per-invocation configuration.
///
/// Distances and altitudes are metres in the raster's square-metric
/// projection.
#[derive(Debug, Clone)]
pub struct Params {
    /// Home landing point in world coordinates.
    pub home: Coord<f64>,

    /// Glide ratio: horizontal metres travelled per metre of altitude
    /// lost in still air.
    pub glide_ratio: u32,

    /// Vertical margin a glide path keeps above terrain; folded into
    /// every cell's elevation before propagation.
    pub ground_clearance: f32,

    /// Extra altitude over the home cell (circuit height).
    pub safety_margin: f32,

    /// Altitude ceiling above which cells stop being tracked; also
    /// the no-data sentinel in outputs.
    pub ceiling: f32,
}
