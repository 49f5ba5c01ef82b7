//! Drawdown around a pumping well in a zoned aquifer
//!
//! Evaluates the disk model on a time × radius grid (or on paired
//! radius/time values) and prints the head table.

use aquiflow::{diskmodel, SimulationParams, SimulationResult};
use clap::Parser;
use env_logger::{Builder, Target};
use log::LevelFilter;
use std::io::Write;
use std::process;

/// Command-line arguments for the disk model
#[derive(Parser, Debug)]
#[command(name = "drawdown")]
#[command(about = "Transient head around a pumping well in a radially zoned aquifer", long_about = None)]
struct Args {
    /// Evaluation radii
    #[arg(long, value_delimiter = ',', required = true)]
    radii: Vec<f64>,

    /// Time values
    #[arg(long, value_delimiter = ',', required = true)]
    times: Vec<f64>,

    /// Transmissivity per zone
    #[arg(long, value_delimiter = ',', required = true)]
    transmissivity: Vec<f64>,

    /// Storativity per zone
    #[arg(long, value_delimiter = ',', required = true)]
    storativity: Vec<f64>,

    /// Interior zone boundaries
    #[arg(long, value_delimiter = ',')]
    zone_radii: Vec<f64>,

    /// Pumping rate, negative for extraction
    #[arg(long, default_value_t = -1e-4, allow_negative_numbers = true)]
    rate: f64,

    /// Well radius, 0 for a point well
    #[arg(long, default_value_t = 0.0)]
    well_radius: f64,

    /// Radius of the fixed-head boundary, unbounded by default
    #[arg(long, default_value_t = f64::INFINITY)]
    outer_radius: f64,

    /// Head at the outer boundary
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    reference_head: f64,

    /// Stehfest order (even)
    #[arg(long, default_value_t = 12)]
    order: usize,

    /// Pair radii and times element-wise instead of building a grid
    #[arg(long)]
    paired: bool,

    /// Log level (error, warn, info, debug, trace); RUST_LOG otherwise
    #[arg(long)]
    log_level: Option<String>,
}

fn init_logging(level: Option<&str>) {
    let filter = level
        .and_then(|l| l.parse::<LevelFilter>().ok())
        .or_else(|| {
            std::env::var("RUST_LOG")
                .ok()
                .and_then(|v| v.parse::<LevelFilter>().ok())
        })
        .unwrap_or(LevelFilter::Warn);

    Builder::new()
        .filter_level(filter)
        .target(Target::Stderr)
        .format(|buf, record| writeln!(buf, "[{:5} {}] {}", record.level(), record.target(), record.args()))
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.log_level.as_deref());

    let params = SimulationParams {
        structured: !args.paired,
        well_radius: args.well_radius,
        outer_radius: args.outer_radius,
        reference_head: args.reference_head,
        stehfest_order: args.order,
    };
    log::info!(
        "disk model: {} zone(s), {} radii, {} time values",
        args.transmissivity.len(),
        args.radii.len(),
        args.times.len()
    );

    let result = match diskmodel(
        &args.radii,
        &args.times,
        &args.transmissivity,
        &args.storativity,
        &args.zone_radii,
        args.rate,
        &params,
    ) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("error: {}", err);
            process::exit(1);
        }
    };

    match result {
        SimulationResult::Grid(grid) => {
            print!("{:>14}", "t \\ r");
            for r in &args.radii {
                print!("{:>16.6}", r);
            }
            println!();
            for (t, row) in args.times.iter().zip(grid.rows()) {
                print!("{:>14.6}", t);
                for h in row {
                    print!("{:>16.8e}", h);
                }
                println!();
            }
        }
        SimulationResult::Paired(values) => {
            println!("{:>14}{:>14}{:>16}", "r", "t", "head");
            for ((r, t), h) in args.radii.iter().zip(&args.times).zip(values.iter()) {
                println!("{:>14.6}{:>14.6}{:>16.8e}", r, t, h);
            }
        }
    }
}
