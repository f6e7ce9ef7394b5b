//! Utility functions for reporting solver results.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use crate::problem::Problem;
use crate::solution::Solution;

/// Format a duration as hours, minutes, and seconds.
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}h {:02}m {:02}s", hours, minutes, seconds)
}

/// Write a human-readable route report to a file.
pub fn write_solution_report<P: AsRef<Path>>(
    solution: &Solution,
    problem: &Problem,
    path: P,
) -> std::io::Result<()> {
    let mut file = File::create(path)?;

    writeln!(file, "Collection routing solution")?;
    writeln!(file, "Score: {}", solution.score)?;
    writeln!(file, "Unassigned points: {}", solution.unassigned_count())?;
    writeln!(file)?;

    for vehicle in 0..solution.vehicle_count() {
        let chain = solution.chain(vehicle);
        write!(file, "Vehicle #{}: ", problem.vehicles[vehicle].id)?;

        if chain.is_empty() {
            writeln!(file, "idle")?;
            continue;
        }

        write!(file, "depot")?;
        for idx in &chain {
            write!(
                file,
                " -> {}",
                problem.points[solution.assignment(*idx).point].id
            )?;
        }
        writeln!(file)?;

        writeln!(file, "  Distance: {} m", solution.distance_m(vehicle))?;
        writeln!(
            file,
            "  Load: {:.2} / {:.2} kg",
            solution.load_kg(vehicle),
            problem.vehicles[vehicle].capacity_kg
        )?;
        writeln!(file)?;
    }

    Ok(())
}
