//! Global stiffness assembly.
//!
//! Scatters every element's rotated 12x12 stiffness into a sparse global
//! matrix of order `6*n_nodes + n_bcs + n_equations`, appends the tie spring
//! blocks, and borders the matrix with one Lagrange-multiplier row/column per
//! boundary condition and per equation constraint. Element matrices are
//! computed in parallel with Rayon and scattered serially, so the result is
//! deterministic.

use crate::element::{self, Matrix12};
use crate::error::{Error, Result};
use crate::model::{Equation, Force, Job, Tie, BC, DOFS_PER_NODE};
use crate::sparse::{CsrMatrix, TripletMatrix};
use rayon::prelude::*;
use std::collections::HashSet;

/// Assembled linear system, ready for factorization.
pub struct AssembledSystem {
    /// Global stiffness with Lagrange borders, compressed once.
    pub stiffness: CsrMatrix,
    /// Right-hand side of the same order.
    pub rhs: Vec<f64>,
    /// Number of physical DOFs (`6 * n_nodes`); the Lagrange rows start here.
    pub n_dofs: usize,
    /// Full system order, `n_dofs + n_bcs + n_equations`.
    pub n_system: usize,
}

fn global_dof(node: usize, dof: usize) -> usize {
    DOFS_PER_NODE * node + dof
}

fn check_addressed_dof(kind: &str, index: usize, node: usize, dof: usize, n_nodes: usize) -> Result<()> {
    if node >= n_nodes {
        return Err(Error::DomainViolation(format!(
            "{kind} {index} addresses node {node} but the mesh has {n_nodes} nodes"
        )));
    }
    if dof >= DOFS_PER_NODE {
        return Err(Error::DomainViolation(format!(
            "{kind} {index} addresses DOF {dof}, valid range is 0..{DOFS_PER_NODE}"
        )));
    }
    Ok(())
}

fn validate_inputs(
    job: &Job,
    bcs: &[BC],
    forces: &[Force],
    ties: &[Tie],
    equations: &[Equation],
) -> Result<()> {
    let n_nodes = job.n_nodes();

    let mut constrained = HashSet::new();
    for (i, bc) in bcs.iter().enumerate() {
        check_addressed_dof("boundary condition", i, bc.node, bc.dof, n_nodes)?;
        if !constrained.insert((bc.node, bc.dof)) {
            return Err(Error::DomainViolation(format!(
                "duplicate boundary condition on node {} DOF {}",
                bc.node, bc.dof
            )));
        }
    }

    for (i, force) in forces.iter().enumerate() {
        check_addressed_dof("force", i, force.node, force.dof, n_nodes)?;
    }

    for (i, tie) in ties.iter().enumerate() {
        let [n1, n2] = tie.nodes;
        if n1 >= n_nodes || n2 >= n_nodes {
            return Err(Error::DomainViolation(format!(
                "tie {i} addresses node {} but the mesh has {n_nodes} nodes",
                n1.max(n2)
            )));
        }
        if n1 == n2 {
            return Err(Error::DomainViolation(format!("tie {i} joins node {n1} to itself")));
        }
        if tie.k_lin < 0.0 || tie.k_rot < 0.0 {
            return Err(Error::DomainViolation(format!(
                "tie {i} has a negative spring constant"
            )));
        }
    }

    for (i, equation) in equations.iter().enumerate() {
        for term in &equation.terms {
            check_addressed_dof("equation", i, term.node, term.dof, n_nodes)?;
        }
        if !equation.terms.iter().any(|t| t.coefficient != 0.0) {
            return Err(Error::DomainViolation(format!(
                "equation {i} has no nonzero coefficient"
            )));
        }
    }

    Ok(())
}

/// Add the four +-k triplets of each tie's 2x2 spring block, per DOF.
fn load_ties(triplet: &mut TripletMatrix, ties: &[Tie]) {
    for tie in ties {
        let [n1, n2] = tie.nodes;
        for dof in 0..DOFS_PER_NODE {
            let k = tie.spring_constant(dof);
            let i = global_dof(n1, dof);
            let j = global_dof(n2, dof);
            triplet.add(i, i, k);
            triplet.add(j, j, k);
            triplet.add(i, j, -k);
            triplet.add(j, i, -k);
        }
    }
}

/// Border the matrix with one Lagrange row/column of coefficient 1 per BC and
/// place the prescribed value in the RHS. The border unknown is the negated
/// reaction enforcing the constraint (its row reads `K*u + lambda = f`).
fn load_bcs(triplet: &mut TripletMatrix, rhs: &mut [f64], bcs: &[BC], n_dofs: usize) {
    for (i, bc) in bcs.iter().enumerate() {
        let constrained = global_dof(bc.node, bc.dof);
        let border = n_dofs + i;
        triplet.add(constrained, border, 1.0);
        triplet.add(border, constrained, 1.0);
        rhs[border] = bc.value;
    }
}

/// Border the matrix with one Lagrange row/column per equation constraint,
/// carrying each term's coefficient. The RHS of these rows stays zero.
fn load_equations(
    triplet: &mut TripletMatrix,
    equations: &[Equation],
    n_dofs: usize,
    n_bcs: usize,
) {
    for (e, equation) in equations.iter().enumerate() {
        let border = n_dofs + n_bcs + e;
        for term in &equation.terms {
            let addressed = global_dof(term.node, term.dof);
            triplet.add(border, addressed, term.coefficient);
            triplet.add(addressed, border, term.coefficient);
        }
    }
}

/// Sum the prescribed forces into the RHS. Repeated (node, dof) entries add.
fn load_forces(rhs: &mut [f64], forces: &[Force]) {
    for force in forces {
        rhs[global_dof(force.node, force.dof)] += force.value;
    }
}

/// Assemble the bordered global stiffness matrix and right-hand side.
pub fn assemble(
    job: &Job,
    bcs: &[BC],
    forces: &[Force],
    ties: &[Tie],
    equations: &[Equation],
) -> Result<AssembledSystem> {
    validate_inputs(job, bcs, forces, ties, equations)?;

    let n_dofs = job.n_dofs();
    let n_system = n_dofs + bcs.len() + equations.len();

    // a straight beam element produces at most 40 distinct nonzeros
    let nnz_estimate = 40 * job.n_elems()
        + 4 * DOFS_PER_NODE * ties.len()
        + 2 * bcs.len()
        + 2 * equations.len();
    let mut triplet = TripletMatrix::with_capacity(n_system, n_system, nnz_estimate);

    let element_matrices: Vec<(Matrix12, Matrix12)> = (0..job.n_elems())
        .into_par_iter()
        .map(|i| element::element_stiffness(job, i))
        .collect::<Result<_>>()?;

    for (i, (k_global, _)) in element_matrices.iter().enumerate() {
        let [n1, n2] = job.elems[i];
        triplet.add_element_block(n1, n2, k_global);
    }

    load_ties(&mut triplet, ties);

    let mut rhs = vec![0.0; n_system];
    load_forces(&mut rhs, forces);
    load_bcs(&mut triplet, &mut rhs, bcs, n_dofs);
    load_equations(&mut triplet, equations, n_dofs, bcs.len());

    log::debug!(
        "assembled {} x {} system with {} triplets",
        n_system,
        n_system,
        triplet.nnz()
    );

    Ok(AssembledSystem {
        stiffness: triplet.to_csr(),
        rhs,
        n_dofs,
        n_system,
    })
}
