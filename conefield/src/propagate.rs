use crate::field::ConeField;
use log::debug;
use std::{collections::VecDeque, time::Instant};

/// `(cell, parent)` work item: re-examine `cell` against `parent`'s
/// origin.
type Entry = ((usize, usize), (usize, usize));

/// Up, down, left, right. Diagonal and longer-range inheritance
/// arrives through the line-of-sight shortcut instead.
const DIRECTIONS: [(i64, i64); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

impl ConeField {
    /// Floods the field outward from home, repeatedly relaxing cells
    /// against their neighbours' origins, until no cell's required
    /// altitude can be lowered below the ceiling.
    ///
    /// The queue is FIFO and may hold duplicate entries; the origin
    /// and improvement tests below make duplicate work cheap. Every
    /// update either assigns a first origin or strictly lowers an
    /// altitude, and ceiling-level results never enqueue neighbours,
    /// so the queue drains.
    pub fn propagate(&mut self) {
        let started = Instant::now();

        let mut queue: VecDeque<Entry> = VecDeque::new();
        let (home_i, home_j) = self.home;
        self.push_differing_neighbours(home_i, home_j, &mut queue);

        let mut popped: u64 = 0;
        let mut relaxed: u64 = 0;
        while let Some(((i, j), (pi, pj))) = queue.pop_front() {
            popped += 1;

            let parent_origin = self.cell(pi, pj).origin;
            let cell = self.cell(i, j);
            if parent_origin == cell.origin {
                // The parent has nothing new to offer.
                continue;
            }
            if cell.ground {
                continue;
            }

            // Inherit the parent's origin when it is visible from
            // here; fall back to the parent itself otherwise.
            let candidate = match parent_origin {
                Some(origin) if self.line_of_sight((i, j), origin) => origin,
                _ => (pi, pj),
            };
            if self.cell(i, j).inherits(candidate) {
                continue;
            }

            if self.relax((i, j), candidate) {
                relaxed += 1;
                self.push_differing_neighbours(i, j, &mut queue);
            }
        }

        debug!(
            "propagation drained; popped: {popped}, relaxed: {relaxed}, runtime: {:?}",
            started.elapsed()
        );
    }

    /// Tries to lower `(i, j)`'s altitude by inheriting the cone of
    /// `(oi, oj)`. Returns whether the update is worth announcing to
    /// neighbours.
    fn relax(&mut self, (i, j): (usize, usize), (oi, oj): (usize, usize)) -> bool {
        let origin_altitude = self.cell(oi, oj).altitude;
        let di = i as i64 - oi as i64;
        let dj = j as i64 - oj as i64;
        // Integer squared distance and a single sqrt keep the value
        // stable across targets.
        #[allow(clippy::cast_precision_loss)]
        let distance = ((di * di + dj * dj) as f32).sqrt();
        let required = origin_altitude + distance * self.sink_per_cell;

        let ceiling = self.ceiling;
        let cell = self.cell_mut(i, j);

        if cell.origin.is_some() && required >= cell.altitude {
            return false;
        }
        if required <= cell.elevation {
            // The cone dips into terrain: this cell is a feasible
            // touchdown. It freezes and becomes opaque to later
            // visibility checks.
            cell.altitude = cell.elevation;
            cell.origin = Some((i, j));
            cell.ground = true;
            return required < ceiling;
        }
        if required >= ceiling {
            // Out of tracked reach; the cell stays no-data.
            return false;
        }
        cell.altitude = required;
        cell.origin = Some((oi, oj));
        true
    }

    /// Queues `(neighbour, (i, j))` for each 4-neighbour whose origin
    /// differs from `(i, j)`'s.
    fn push_differing_neighbours(&self, i: usize, j: usize, queue: &mut VecDeque<Entry>) {
        let origin = self.cell(i, j).origin;
        for (di, dj) in DIRECTIONS {
            let ni = i as i64 + di;
            let nj = j as i64 + dj;
            if ni < 0 || ni >= self.nrows as i64 || nj < 0 || nj >= self.ncols as i64 {
                continue;
            }
            let (ni, nj) = (ni as usize, nj as usize);
            if self.cell(ni, nj).origin != origin {
                queue.push_back(((ni, nj), (i, j)));
            }
        }
    }
}
