mod options;

use anyhow::Result;
use clap::Parser;
use conefield::{ConeField, Params, Variant, GROUND_DISPLAY_ALTITUDE};
use geo_types::Coord;
use options::Cli;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let params = Params {
        home: Coord {
            x: cli.homex,
            y: cli.homey,
        },
        glide_ratio: cli.finesse,
        ground_clearance: cli.dist_sol as f32,
        safety_margin: cli.securite as f32,
        ceiling: cli.nodataltitude as f32,
    };

    let mut field = ConeField::load(&cli.topology, &params)?;
    field.add_ground_clearance(params.ground_clearance);
    field.init_home(params.safety_margin);
    field.propagate();

    // Ground drops to the display altitude so per-home rasters
    // recombine by per-cell minimum.
    field.flatten_ground(GROUND_DISPLAY_ALTITUDE);

    field.write_raster_file(cli.output_path.join("output_sub.asc"), Variant::Combine)?;
    field.write_raster_file(cli.output_path.join("local.asc"), Variant::Local)?;

    if cli.export_passes.0 {
        field.detect_passes();
        field.weight_passes()?;
        field.write_passes_file(cli.output_path.join("mountain_passes.csv"))?;
    }

    Ok(())
}
