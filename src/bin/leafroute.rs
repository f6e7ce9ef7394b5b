//! Command-line front end: load a problem snapshot, solve, print the routes.

use clap::Parser;
use leafroute::utils::{format_duration, write_solution_report};
use leafroute::{Problem, Solver, SolverConfig};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "leafroute", about = "Capacitated collection routing solver")]
struct Args {
    /// Path to a JSON problem snapshot (vehicles, points, depot).
    instance: PathBuf,

    /// RNG seed; equal seeds reproduce the run exactly.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Wall-clock budget in seconds.
    #[arg(long)]
    time_limit_secs: Option<u64>,

    /// Iteration cap.
    #[arg(long, default_value_t = 100_000)]
    max_iterations: u64,

    /// Initial simulated-annealing temperature in soft-score units;
    /// omitted means greedy acceptance.
    #[arg(long)]
    temperature: Option<f64>,

    /// Write a JSON solution snapshot here.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Write a human-readable route report here.
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let problem = Problem::from_file(&args.instance)?;
    println!(
        "Loaded problem: {} vehicles, {} collection points",
        problem.vehicle_count(),
        problem.point_count()
    );

    let mut config = SolverConfig::new()
        .with_seed(args.seed)
        .with_max_iterations(args.max_iterations);
    if let Some(secs) = args.time_limit_secs {
        config = config.with_time_limit(Duration::from_secs(secs));
    }
    if let Some(temperature) = args.temperature {
        config = config.with_initial_temperature(temperature);
    }

    let solver = Solver::new(config);
    let solved = solver.solve(&problem)?;

    println!(
        "Search completed in {}",
        format_duration(solved.statistics.runtime)
    );
    println!("{}", solved.statistics.format());
    println!();

    let snapshot = solved.solution.to_snapshot(&problem);
    for route in &snapshot.routes {
        if route.stops.is_empty() {
            continue;
        }
        let stops: Vec<String> = route.stops.iter().map(u64::to_string).collect();
        println!(
            "Vehicle #{}: depot -> {}",
            route.vehicle_id,
            stops.join(" -> ")
        );
    }
    if !snapshot.unassigned.is_empty() {
        println!("Unassigned points: {:?}", snapshot.unassigned);
    }
    println!("Score: {}", solved.score);
    if !solved.score.is_feasible() {
        println!("Warning: best solution is infeasible");
    }

    if let Some(path) = &args.report {
        write_solution_report(&solved.solution, &problem, path)?;
        println!("Report written to {}", path.display());
    }
    if let Some(path) = &args.out {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, &snapshot)?;
        println!("Solution snapshot written to {}", path.display());
    }

    Ok(())
}
