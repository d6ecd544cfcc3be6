//! Analysis summary and textual report.

use crate::postprocess::DofRow;

/// Location of a matrix extremum: (row, column).
type Location = (usize, usize);

/// Min and max entries of a row-major result matrix with their locations.
fn find_min_max(rows: &[DofRow]) -> Option<(Location, Location)> {
    let mut min_loc = (0, 0);
    let mut max_loc = (0, 0);
    let mut min_val = f64::INFINITY;
    let mut max_val = f64::NEG_INFINITY;

    if rows.is_empty() {
        return None;
    }

    for (i, row) in rows.iter().enumerate() {
        for (j, &value) in row.iter().enumerate() {
            if value > max_val {
                max_loc = (i, j);
                max_val = value;
            }
            if value < min_val {
                min_loc = (i, j);
                min_val = value;
            }
        }
    }
    Some((min_loc, max_loc))
}

fn min_max_block(report: &mut String, title: &str, entity: &str, rows: &[DofRow]) {
    let Some((min, max)) = find_min_max(rows) else {
        return;
    };
    report.push_str(&format!(
        "\n{title}\n\tMinimum : {entity} {}\tDOF {}\tValue {:.3}\n\tMaximum : {entity} {}\tDOF {}\tValue {:.3}\n",
        min.0, min.1, rows[min.0][min.1], max.0, max.1, rows[max.0][max.1]
    ));
}

/// The immutable record returned by a solve: model sizes, per-phase timings
/// in integer milliseconds, and the result matrices.
#[derive(Debug, Clone, Default)]
pub struct Summary {
    /// Total analysis wall time.
    pub total_time_ms: u64,
    /// Time to assemble the global stiffness matrix.
    pub assembly_time_ms: u64,
    /// Time to reorder the nonzeros ahead of factorization.
    pub preprocessing_time_ms: u64,
    /// Time to factor the coefficient matrix.
    pub factorization_time_ms: u64,
    /// Time to back-substitute the linear system.
    pub solve_time_ms: u64,
    /// Time to recover nodal forces.
    pub nodal_forces_time_ms: u64,
    /// Time to recover tie forces.
    pub tie_forces_time_ms: u64,
    /// Time to save the requested output files.
    pub file_save_time_ms: u64,

    /// Number of nodes in the analysis.
    pub num_nodes: usize,
    /// Number of elements in the analysis.
    pub num_elems: usize,
    /// Number of boundary conditions in the analysis.
    pub num_bcs: usize,
    /// Number of prescribed forces in the analysis.
    pub num_forces: usize,
    /// Number of tie constraints in the analysis.
    pub num_ties: usize,
    /// Number of equation constraints in the analysis.
    pub num_eqns: usize,

    /// Nodal displacements, one `[u_x, u_y, u_z, th_x, th_y, th_z]` row per node.
    pub nodal_displacements: Vec<DofRow>,
    /// Nodal forces, one `[f_x, f_y, f_z, m_x, m_y, m_z]` row per node.
    pub nodal_forces: Vec<DofRow>,
    /// Tie spring forces, one row per tie.
    pub tie_forces: Vec<DofRow>,
    /// Lagrange multiplier tail of the solution, in input order (BCs first,
    /// then equations). Each multiplier is the negated reaction of its
    /// constraint, since a constrained row reads `K*u + lambda = f`.
    pub multipliers: Vec<f64>,
}

impl Summary {
    /// Render the full textual report: model sizes, timings, and the min/max
    /// locations of each result matrix.
    pub fn full_report(&self) -> String {
        let mut report = String::from("\nFinite Element Analysis Summary\n\nModel parameters\n");

        let params = [
            ("Nodes", self.num_nodes),
            ("Elements", self.num_elems),
            ("BCs", self.num_bcs),
            ("Ties", self.num_ties),
            ("Forces", self.num_forces),
            ("Equations", self.num_eqns),
        ];
        for (name, count) in params {
            report.push_str(&format!("\t{name:<20} : {count}\n"));
        }

        report.push_str(&format!("\nTotal time {}ms\n", self.total_time_ms));

        let mut timings = vec![
            ("Assembly time", self.assembly_time_ms),
            ("Preprocessing time", self.preprocessing_time_ms),
            ("Factorization time", self.factorization_time_ms),
            ("Linear solve time", self.solve_time_ms),
            ("Forces solve time", self.nodal_forces_time_ms),
        ];
        if self.num_ties > 0 {
            timings.push(("Ties solve time", self.tie_forces_time_ms));
        }
        timings.push(("File save time", self.file_save_time_ms));

        for (name, ms) in timings {
            report.push_str(&format!("\t{name:<30} : {ms}ms\n"));
        }

        min_max_block(
            &mut report,
            "Nodal displacements",
            "Node",
            &self.nodal_displacements,
        );
        min_max_block(&mut report, "Nodal Forces", "Node", &self.nodal_forces);
        if self.num_ties > 0 {
            min_max_block(&mut report, "Tie Forces", "Tie", &self.tie_forces);
        }

        report
    }
}
