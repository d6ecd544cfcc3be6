//! The analysis pipeline.
//!
//! A solve walks Built -> Factored -> Solved -> Reported with no retries:
//! assemble the bordered system, factor and solve it, recover reactions and
//! tie forces, and collect everything into a [`Summary`]. Any failure is
//! terminal for the invocation and carries the phase that detected it.

use crate::assembly;
use crate::csv;
use crate::error::{Error, Result};
use crate::model::{Equation, Force, Job, Tie, BC};
use crate::options::Options;
use crate::postprocess;
use crate::solver::{DirectSolver, FaerLuSolver};
use crate::summary::Summary;
use std::path::Path;
use std::time::Instant;

/// Run a linear static analysis and return its summary.
///
/// Pure function of its inputs: the borrowed collections are never mutated,
/// and all intermediate buffers are owned by this invocation. Output files
/// are written only when the corresponding option flags are set.
pub fn solve(
    job: &Job,
    bcs: &[BC],
    forces: &[Force],
    ties: &[Tie],
    equations: &[Equation],
    options: &Options,
) -> Result<Summary> {
    if options.epsilon < 0.0 {
        return Err(Error::Configuration(format!(
            "epsilon must be non-negative, got {}",
            options.epsilon
        )));
    }

    let total_start = Instant::now();

    let mut summary = Summary {
        num_nodes: job.n_nodes(),
        num_elems: job.n_elems(),
        num_bcs: bcs.len(),
        num_forces: forces.len(),
        num_ties: ties.len(),
        num_eqns: equations.len(),
        ..Summary::default()
    };

    let start = Instant::now();
    let system = assembly::assemble(job, bcs, forces, ties, equations)?;
    summary.assembly_time_ms = start.elapsed().as_millis() as u64;
    log::info!(
        "global stiffness matrix assembled in {} ms, order {}",
        summary.assembly_time_ms,
        system.n_system
    );

    let solver = FaerLuSolver::new();
    let (solution, timings) = solver.solve(&system.stiffness, &system.rhs)?;
    summary.preprocessing_time_ms = timings.symbolic_ms;
    summary.factorization_time_ms = timings.factorization_ms;
    summary.solve_time_ms = timings.solve_ms;
    log::info!(
        "{}: symbolic {} ms, factorization {} ms, solve {} ms",
        solver.name(),
        timings.symbolic_ms,
        timings.factorization_ms,
        timings.solve_ms
    );

    summary.nodal_displacements =
        postprocess::nodal_displacements(&solution, job.n_nodes(), options.epsilon);
    summary.multipliers = postprocess::multipliers(&solution, job.n_nodes());

    let start = Instant::now();
    summary.nodal_forces =
        postprocess::reaction_forces(&system.stiffness, &solution, job.n_nodes(), options.epsilon);
    summary.nodal_forces_time_ms = start.elapsed().as_millis() as u64;

    if !ties.is_empty() {
        let start = Instant::now();
        summary.tie_forces = postprocess::tie_forces(ties, &summary.nodal_displacements);
        summary.tie_forces_time_ms = start.elapsed().as_millis() as u64;
    }

    let start = Instant::now();
    if options.save_nodal_displacements {
        csv::write_table(
            Path::new(&options.nodal_displacements_filename),
            &summary.nodal_displacements,
            options.csv_precision,
            &options.csv_delimiter,
        )?;
    }
    if options.save_nodal_forces {
        csv::write_table(
            Path::new(&options.nodal_forces_filename),
            &summary.nodal_forces,
            options.csv_precision,
            &options.csv_delimiter,
        )?;
    }
    if options.save_tie_forces {
        csv::write_table(
            Path::new(&options.tie_forces_filename),
            &summary.tie_forces,
            options.csv_precision,
            &options.csv_delimiter,
        )?;
    }
    summary.file_save_time_ms = start.elapsed().as_millis() as u64;

    summary.total_time_ms = total_start.elapsed().as_millis() as u64;

    if options.save_report {
        std::fs::write(&options.report_filename, summary.full_report())?;
    }

    Ok(summary)
}
