use brownsim::config::Config;
use brownsim::core::{HaltReason, Simulation};
use brownsim::error::Result;
use brownsim::generate::{write_input_files, GenerateParams};
use brownsim::input;
use brownsim::output::StateWriter;
use clap::{Args as ClapArgs, Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(
    name = "brownsim",
    about = "Event-driven hard-disk molecular dynamics in a square box"
)]
struct Args {
    /// Path to the JSON run configuration.
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a random initial condition (static + dynamic input files).
    Generate(GenerateArgs),
}

#[derive(ClapArgs, Debug)]
struct GenerateArgs {
    /// Static output file.
    #[arg(long, default_value = "static.txt")]
    static_file: PathBuf,
    /// Dynamic output file.
    #[arg(long, default_value = "dynamic.txt")]
    dynamic_file: PathBuf,
    /// Number of small particles.
    #[arg(short, long, default_value_t = 100)]
    num_small: usize,
    /// Box side length.
    #[arg(short = 'l', long, default_value_t = 6.0)]
    box_len: f64,
    /// Small-particle radius.
    #[arg(long, default_value_t = 0.2)]
    small_radius: f64,
    /// Small-particle mass.
    #[arg(long, default_value_t = 0.9)]
    small_mass: f64,
    /// Big-particle radius.
    #[arg(long, default_value_t = 0.7)]
    big_radius: f64,
    /// Big-particle mass.
    #[arg(long, default_value_t = 2.0)]
    big_mass: f64,
    /// Maximum magnitude of each initial velocity component.
    #[arg(long, default_value_t = 2.0)]
    max_speed: f64,
    /// RNG seed for reproducible placement.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("{e}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    match args.command {
        Some(Command::Generate(generate_args)) => generate(generate_args),
        None => simulate(&args.config),
    }
}

fn generate(args: GenerateArgs) -> Result<()> {
    let params = GenerateParams {
        num_small: args.num_small,
        box_len: args.box_len,
        small_radius: args.small_radius,
        small_mass: args.small_mass,
        big_radius: args.big_radius,
        big_mass: args.big_mass,
        max_speed: args.max_speed,
        seed: args.seed,
    };
    write_input_files(&args.static_file, &args.dynamic_file, &params)?;
    info!(
        "wrote {} and {} ({} particles)",
        args.static_file.display(),
        args.dynamic_file.display(),
        params.num_small + 1
    );
    Ok(())
}

fn simulate(config_path: &PathBuf) -> Result<()> {
    let config = Config::load(config_path)?;

    let parse_start = Instant::now();
    let static_input = input::read_static(&config.static_file)?;
    let (start_time, particles) = input::read_dynamic(&config.dynamic_file, &static_input)?;
    info!(
        "file parsing took {:.6} seconds",
        parse_start.elapsed().as_secs_f64()
    );

    let mut sim = Simulation::new(particles, static_input.box_len, start_time)?;
    let mut out = StateWriter::append(&config.dynamic_file)?;

    let sim_start = Instant::now();
    let reason = sim.run(config.max_events, &mut out)?;
    info!(
        "simulation took {:.6} seconds ({} events)",
        sim_start.elapsed().as_secs_f64(),
        sim.events_processed()
    );

    match reason {
        HaltReason::BudgetExhausted => {
            println!("Reached {} events, exiting...", config.max_events)
        }
        HaltReason::TrackedHitWall => println!("Big particle reached border, exiting..."),
    }
    Ok(())
}
