//! End-to-end scenarios over synthetic terrain.

use approx::assert_relative_eq;
use ascgrid::Grid;
use conefield::{ConeField, Params, Variant, GROUND_DISPLAY_ALTITUDE};
use geo_types::Coord;
use std::fmt::Write as _;
use std::io::Cursor;

/// Renders a raster whose elevation at global `(i, j)` is
/// `elevation(i, j)`.
fn asc<F: Fn(usize, usize) -> f64>(
    nrows: usize,
    ncols: usize,
    xllcorner: f64,
    yllcorner: f64,
    elevation: F,
) -> String {
    let mut out = format!(
        "ncols {ncols}\nnrows {nrows}\nxllcorner {xllcorner}\nyllcorner {yllcorner}\ncellsize 100\n"
    );
    for i in 0..nrows {
        for j in 0..ncols {
            if j > 0 {
                out.push(' ');
            }
            write!(out, "{}", elevation(i, j)).unwrap();
        }
        out.push('\n');
    }
    out
}

/// Loads, bootstraps and propagates a field.
fn run(input: &str, params: &Params) -> ConeField {
    let mut field = ConeField::from_reader(Cursor::new(input), params).unwrap();
    field.add_ground_clearance(params.ground_clearance);
    field.init_home(params.safety_margin);
    field.propagate();
    field
}

/// Structural checks every propagated field satisfies.
fn check_field(field: &ConeField, params: &Params) {
    let home = field.home();
    for cell in field.cells() {
        if cell.ground {
            // Ground cells are their own origin and sit on terrain.
            assert_eq!(cell.origin, Some((cell.i, cell.j)));
            assert_eq!(cell.altitude, cell.elevation);
            continue;
        }
        assert!(cell.altitude <= params.ceiling);
        match cell.origin {
            None => assert_eq!(cell.altitude, params.ceiling),
            Some(origin) if origin == (cell.i, cell.j) => {
                assert_eq!((cell.i, cell.j), home, "only home may self-root unlanded");
            }
            Some(origin) => {
                // The digital line to the origin crosses no ground.
                assert!(
                    field.line_of_sight((cell.i, cell.j), origin),
                    "cell ({}, {}) cannot see its origin {:?}",
                    cell.i,
                    cell.j,
                    origin
                );
            }
        }
    }
}

#[test]
fn flat_sea() {
    let params = Params {
        home: Coord { x: 550.0, y: 450.0 },
        glide_ratio: 20,
        ground_clearance: 0.0,
        safety_margin: 0.0,
        ceiling: 1000.0,
    };
    let field = run(&asc(10, 10, 0.0, 0.0, |_, _| 0.0), &params);
    check_field(&field, &params);

    let home = field.home();
    assert_eq!(home, (5, 5));
    for cell in field.cells() {
        let di = cell.i as f32 - home.0 as f32;
        let dj = cell.j as f32 - home.1 as f32;
        // 100 m cells at glide ratio 20 cost 5 m of altitude each.
        assert_relative_eq!(cell.altitude, di.hypot(dj) * 5.0, epsilon = 1e-3);
        assert_eq!(cell.origin, Some(home));
        assert!(!cell.ground);
    }
    assert_eq!(field.cell(5, 5).altitude, 0.0);
}

#[test]
fn single_peak() {
    let params = Params {
        home: Coord { x: 50.0, y: 950.0 },
        glide_ratio: 20,
        ground_clearance: 0.0,
        safety_margin: 0.0,
        ceiling: 1000.0,
    };
    let input = asc(10, 10, 0.0, 0.0, |i, j| {
        if (i, j) == (5, 5) {
            500.0
        } else {
            0.0
        }
    });
    let field = run(&input, &params);
    check_field(&field, &params);

    assert_eq!(field.home(), (0, 0));
    let peak = field.cell(5, 5);
    assert!(peak.ground);
    assert_eq!(peak.altitude, 500.0);

    // Everything else routes around the peak under the ceiling.
    for cell in field.cells() {
        if (cell.i, cell.j) != (5, 5) {
            assert!(!cell.ground);
            assert!(cell.altitude < params.ceiling);
        }
    }
}

#[test]
fn wall_of_ground() {
    let params = Params {
        home: Coord { x: 550.0, y: 150.0 },
        glide_ratio: 20,
        ground_clearance: 0.0,
        safety_margin: 0.0,
        ceiling: 1000.0,
    };
    // Row 5 walls off the grid's northern half from home at (8, 5).
    let input = asc(10, 10, 0.0, 0.0, |i, _| if i == 5 { 9999.0 } else { 0.0 });
    let field = run(&input, &params);
    check_field(&field, &params);

    assert_eq!(field.home(), (8, 5));
    let home = field.home();
    for cell in field.cells() {
        match cell.i {
            // No line fits under the ceiling: the far side stays
            // no-data and never earns an origin.
            0..=4 => {
                assert_eq!(cell.altitude, params.ceiling);
                assert_eq!(cell.origin, None);
            }
            5 => {
                assert!(cell.ground);
                assert_eq!(cell.altitude, 9999.0);
            }
            _ => {
                let di = cell.i as f32 - home.0 as f32;
                let dj = cell.j as f32 - home.1 as f32;
                assert_relative_eq!(cell.altitude, di.hypot(dj) * 5.0, epsilon = 1e-3);
            }
        }
    }
}

#[test]
fn home_island() {
    let params = Params {
        home: Coord { x: 550.0, y: 450.0 },
        glide_ratio: 20,
        ground_clearance: 0.0,
        safety_margin: 100.0,
        ceiling: 1500.0,
    };
    let input = asc(10, 10, 0.0, 0.0, |i, j| {
        if (i, j) == (5, 5) {
            1000.0
        } else {
            0.0
        }
    });
    let field = run(&input, &params);
    check_field(&field, &params);

    let home = field.cell(5, 5);
    assert_eq!(home.altitude, 1100.0);
    assert!(!home.ground);

    for (i, j) in [(4, 5), (6, 5), (5, 4), (5, 6)] {
        let cell = field.cell(i, j);
        assert_relative_eq!(cell.altitude, 1105.0, epsilon = 1e-3);
        assert!(!cell.ground);
        assert_eq!(cell.origin, Some((5, 5)));
    }
}

#[test]
fn home_fixed_point_includes_clearance_and_margin() {
    let params = Params {
        home: Coord { x: 550.0, y: 450.0 },
        glide_ratio: 20,
        ground_clearance: 30.0,
        safety_margin: 100.0,
        ceiling: 2000.0,
    };
    let field = run(&asc(10, 10, 0.0, 0.0, |_, _| 200.0), &params);
    assert_eq!(field.cell(5, 5).altitude, 330.0);
}

/// 41×41 field whose northern half drains through a single gap in a
/// high wall: the gap cell lands the cone, and the cells beside it
/// become heavily-routed passes.
fn funnel_input(xllcorner: f64, yllcorner: f64) -> String {
    asc(41, 41, xllcorner, yllcorner, |i, j| match (i, j) {
        (20, 20) => 100.0,
        (20, _) => 9999.0,
        _ => 0.0,
    })
}

fn funnel_params(xllcorner: f64, yllcorner: f64) -> Params {
    Params {
        home: Coord {
            x: xllcorner + 2050.0,
            y: yllcorner + 1050.0,
        },
        glide_ratio: 20,
        ground_clearance: 0.0,
        safety_margin: 0.0,
        ceiling: 10000.0,
    }
}

#[test]
fn funnel_emits_wall_adjacent_passes() {
    let params = funnel_params(0.0, 0.0);
    let mut field = run(&funnel_input(0.0, 0.0), &params);
    check_field(&field, &params);

    assert_eq!(field.home(), (30, 20));
    assert!(field.cell(20, 20).ground);

    field.detect_passes();
    field.weight_passes().unwrap();
    let passes = field.passes();

    assert!(!passes.is_empty());
    assert!(passes.len() <= 3);
    for pass in &passes {
        assert!(pass.weight > 100);
        // All emitted passes hug the northern side of the gap.
        assert_eq!(pass.location.y, 2100.0);
        assert!([1900.0, 2000.0, 2100.0].contains(&pass.location.x));
    }
}

#[test]
fn identical_runs_are_bitwise_identical() {
    let params = funnel_params(0.0, 0.0);
    let mut outputs = Vec::new();
    for _ in 0..2 {
        let mut field = run(&funnel_input(0.0, 0.0), &params);
        field.flatten_ground(GROUND_DISPLAY_ALTITUDE);
        field.detect_passes();
        field.weight_passes().unwrap();

        let mut combine = Vec::new();
        field.write_raster(&mut combine, Variant::Combine).unwrap();
        let mut local = Vec::new();
        field.write_raster(&mut local, Variant::Local).unwrap();
        let mut csv = Vec::new();
        field.write_passes(&mut csv).unwrap();
        outputs.push((combine, local, csv));
    }
    assert_eq!(outputs[0], outputs[1]);
}

#[test]
fn combine_output_round_trips() {
    let params = funnel_params(0.0, 0.0);
    let mut field = run(&funnel_input(0.0, 0.0), &params);
    field.flatten_ground(GROUND_DISPLAY_ALTITUDE);

    let mut combine = Vec::new();
    field.write_raster(&mut combine, Variant::Combine).unwrap();
    let grid = Grid::parse(Cursor::new(combine)).unwrap();

    assert_eq!(grid.header, field.window_header());
    for cell in field.cells() {
        assert_eq!(grid.get(cell.i, cell.j), cell.altitude);
    }
}

#[test]
fn reanchoring_shifts_world_coordinates_only() {
    let base_params = funnel_params(0.0, 0.0);
    let mut base = run(&funnel_input(0.0, 0.0), &base_params);

    let shifted_params = funnel_params(100_000.0, 200_000.0);
    let mut shifted = run(&funnel_input(100_000.0, 200_000.0), &shifted_params);

    for (a, b) in base.cells().zip(shifted.cells()) {
        assert_eq!(a.altitude, b.altitude);
        assert_eq!(a.origin, b.origin);
        assert_eq!(a.ground, b.ground);
    }

    let base_header = base.window_header();
    let shifted_header = shifted.window_header();
    assert_eq!(shifted_header.xllcorner, base_header.xllcorner + 100_000.0);
    assert_eq!(shifted_header.yllcorner, base_header.yllcorner + 200_000.0);

    base.detect_passes();
    base.weight_passes().unwrap();
    shifted.detect_passes();
    shifted.weight_passes().unwrap();

    let base_passes = base.passes();
    let shifted_passes = shifted.passes();
    assert!(!base_passes.is_empty());
    assert_eq!(base_passes.len(), shifted_passes.len());
    for (a, b) in base_passes.iter().zip(shifted_passes.iter()) {
        assert_eq!(b.location.x, a.location.x + 100_000.0);
        assert_eq!(b.location.y, a.location.y + 200_000.0);
        assert_eq!(b.weight, a.weight);
    }
}

#[test]
fn file_pipeline_writes_all_outputs() {
    let dir = std::env::temp_dir().join(format!("conefield-e2e-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let topology = dir.join("topology.asc");
    std::fs::write(&topology, funnel_input(0.0, 0.0)).unwrap();

    let params = funnel_params(0.0, 0.0);
    let mut field = ConeField::load(&topology, &params).unwrap();
    field.add_ground_clearance(params.ground_clearance);
    field.init_home(params.safety_margin);
    field.propagate();
    field.flatten_ground(GROUND_DISPLAY_ALTITUDE);
    field.detect_passes();
    field.weight_passes().unwrap();

    field
        .write_raster_file(dir.join("output_sub.asc"), Variant::Combine)
        .unwrap();
    field
        .write_raster_file(dir.join("local.asc"), Variant::Local)
        .unwrap();
    field.write_passes_file(dir.join("mountain_passes.csv")).unwrap();

    let combine = std::fs::read_to_string(dir.join("output_sub.asc")).unwrap();
    let local = std::fs::read_to_string(dir.join("local.asc")).unwrap();
    let csv = std::fs::read_to_string(dir.join("mountain_passes.csv")).unwrap();
    std::fs::remove_dir_all(&dir).unwrap();

    // Landed cells are 0 in the combine raster and no-data locally.
    let combine = Grid::parse(Cursor::new(combine)).unwrap();
    let local = Grid::parse(Cursor::new(local.as_bytes())).unwrap();
    assert_eq!(combine.get(20, 0), 0.0);
    assert_eq!(local.get(20, 0), 10000.0);

    assert!(csv.starts_with("name,x,y,weight\n"));
    assert!(csv.lines().count() >= 2);
}
