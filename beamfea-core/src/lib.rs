//! Linear static analysis of three-dimensional frames built from straight
//! Euler-Bernoulli beam elements.
//!
//! Given a mesh of nodes and two-node beam elements with per-element section
//! properties, prescribed nodal displacements, nodal point loads, optional
//! tie springs and optional linear equation constraints, the library solves
//! global equilibrium for the nodal displacements and recovers reaction and
//! tie-spring forces.
//!
//! # Architecture
//!
//! The pipeline is strictly linear:
//!
//! - [`model`]: passive input data ([`Job`], [`BC`], [`Force`], [`Tie`], [`Equation`])
//! - [`element`]: 12x12 local stiffness and rotation per beam
//! - [`assembly`]: sparse global stiffness with Lagrange-multiplier borders
//! - [`solver`]: sparse LU factorization and back-substitution (faer)
//! - [`postprocess`]: displacements, reactions `K_free * u`, tie forces
//! - [`summary`]: sizes, per-phase timings, result matrices, textual report
//!
//! Boundary conditions are enforced exactly through Lagrange multipliers
//! rather than penalties; the bordered system is symmetric indefinite, which
//! is why the direct solver is an LU and not a Cholesky factorization.
//!
//! # Example
//!
//! ```
//! use beamfea_core::{solve, Elem, Force, Job, Options, Point3, Props, BC};
//!
//! // a unit cantilever with a transverse tip load
//! let props = Props::new(1.0, 1.0, 1.0, 1.0, Point3::new(0.0, 0.0, 1.0));
//! let job = Job::new(
//!     vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)],
//!     vec![Elem::new(0, 1, props)],
//! )
//! .unwrap();
//!
//! let bcs: Vec<BC> = (0..6).map(|dof| BC::new(0, dof, 0.0)).collect();
//! let forces = vec![Force::new(1, 1, 0.1)];
//!
//! let summary = solve(&job, &bcs, &forces, &[], &[], &Options::default()).unwrap();
//! assert!((summary.nodal_displacements[1][1] - 0.1 / 3.0).abs() < 1e-12);
//! ```

pub mod analysis;
pub mod assembly;
pub mod csv;
pub mod element;
pub mod error;
pub mod model;
pub mod options;
pub mod postprocess;
pub mod setup;
pub mod solver;
pub mod sparse;
pub mod summary;

pub use analysis::solve;
pub use error::{Error, Phase, Result};
pub use model::{Dof, Elem, Equation, Force, Job, Point3, Props, Term, Tie, BC, DOFS_PER_NODE};
pub use options::Options;
pub use setup::{load_config, load_inputs, Config, ModelInputs};
pub use solver::{DirectSolver, FaerLuSolver};
pub use summary::Summary;
