/// One cell of the cone field.
#[derive(Debug, Clone)]
pub struct Cell {
    /// Terrain height, metres. Augmented in place by the ground
    /// clearance before propagation; every later comparison treats
    /// the augmented value as ground.
    pub elevation: f32,

    /// Lowest altitude currently known to reach home from here.
    /// Starts at the no-data ceiling.
    pub altitude: f32,

    /// Indices of the cell whose glide cone this cell inherits.
    /// `None` until the first relaxation assigns one.
    pub origin: Option<(usize, usize)>,

    /// Own row index within the window.
    pub i: usize,

    /// Own column index within the window.
    pub j: usize,

    /// Number of origin chains routed through this cell; set only by
    /// pass weighting.
    pub weight: u32,

    /// The cone reached the (clearance-augmented) terrain here: the
    /// cell is a feasible touchdown, opaque to later visibility
    /// checks, and frozen for propagation.
    pub ground: bool,

    /// First non-ground step out of a landable basin; set only by
    /// pass detection.
    pub mountain_pass: bool,
}

impl Cell {
    pub(crate) fn new(elevation: f32, i: usize, j: usize, ceiling: f32) -> Self {
        Self {
            elevation,
            altitude: ceiling,
            origin: None,
            i,
            j,
            weight: 0,
            ground: false,
            mountain_pass: false,
        }
    }

    /// True once this cell inherits `origin`'s cone.
    pub fn inherits(&self, origin: (usize, usize)) -> bool {
        self.origin == Some(origin)
    }
}
