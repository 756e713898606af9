use crate::field::ConeField;

impl ConeField {
    /// Line-of-sight predicate between two cells of the field.
    ///
    /// Walks an integer Bresenham line with doubled error terms and
    /// rejects as soon as it touches a ground cell. When the line
    /// crosses a cell boundary close to a vertex it additionally
    /// inspects the single corner cell it pinches past, so a diagonal
    /// gap between two ground cells meeting at a vertex does not read
    /// as visible. On an exact centre crossing neither corner is
    /// checked.
    ///
    /// The start cell is never examined; the walk's final cell is the
    /// far endpoint.
    pub fn line_of_sight(&self, from: (usize, usize), to: (usize, usize)) -> bool {
        let (mut x1, mut y1) = (from.0 as i64, from.1 as i64);
        let (x2, y2) = (to.0 as i64, to.1 as i64);

        // Coincident or 8-neighbour endpoints see each other.
        if (x1 - x2).abs() <= 1 && (y1 - y2).abs() <= 1 {
            return true;
        }

        let xstep = if x2 > x1 { 1 } else { -1 };
        let ystep = if y2 > y1 { 1 } else { -1 };

        let dx = (x2 - x1).abs();
        let dy = (y2 - y1).abs();
        let ddx = dx * 2;
        let ddy = dy * 2;

        let mut error = dx;
        let mut prev_error = error;

        if dx >= dy {
            for _ in 0..dx {
                x1 += xstep;
                error += ddy;
                if error > ddx {
                    y1 += ystep;
                    error -= ddx;
                    if error + prev_error < ddx {
                        if self.ground_at(x1, y1 - ystep) {
                            return false;
                        }
                    } else if error + prev_error > ddx {
                        if self.ground_at(x1 - xstep, y1) {
                            return false;
                        }
                    }
                }
                if self.ground_at(x1, y1) {
                    return false;
                }
                prev_error = error;
            }
        } else {
            for _ in 0..dy {
                y1 += ystep;
                error += ddx;
                if error > ddy {
                    x1 += xstep;
                    error -= ddy;
                    if error + prev_error < ddy {
                        if self.ground_at(x1 - xstep, y1) {
                            return false;
                        }
                    } else if error + prev_error > ddy {
                        if self.ground_at(x1, y1 - ystep) {
                            return false;
                        }
                    }
                }
                if self.ground_at(x1, y1) {
                    return false;
                }
                prev_error = error;
            }
        }

        true
    }

    fn ground_at(&self, i: i64, j: i64) -> bool {
        self.cells[i as usize * self.ncols + j as usize].ground
    }
}
