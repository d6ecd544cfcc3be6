//! Passive data describing a frame analysis job.
//!
//! Nodes, beam elements with their section properties, boundary conditions,
//! nodal forces, tie springs, and linear equation constraints. All inputs are
//! owned by the caller and borrowed immutably during a solve.

use crate::error::{Error, Result};
use nalgebra::Vector3;

/// A point in 3D space.
pub type Point3 = Vector3<f64>;

/// Degrees of freedom per node: three translations then three rotations.
pub const DOFS_PER_NODE: usize = 6;

/// Named ordinals for the six nodal degrees of freedom.
///
/// The ordering `{u_x, u_y, u_z, theta_x, theta_y, theta_z}` is normative:
/// it fixes both the global DOF numbering (`DOFS_PER_NODE * node + dof`) and
/// the column order of every result matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Dof {
    /// Displacement along the global x-axis.
    DisplacementX = 0,
    /// Displacement along the global y-axis.
    DisplacementY = 1,
    /// Displacement along the global z-axis.
    DisplacementZ = 2,
    /// Rotation about the global x-axis.
    RotationX = 3,
    /// Rotation about the global y-axis.
    RotationY = 4,
    /// Rotation about the global z-axis.
    RotationZ = 5,
}

impl Dof {
    /// The six DOFs in canonical order.
    pub const ALL: [Dof; DOFS_PER_NODE] = [
        Dof::DisplacementX,
        Dof::DisplacementY,
        Dof::DisplacementZ,
        Dof::RotationX,
        Dof::RotationY,
        Dof::RotationZ,
    ];

    /// Ordinal of this DOF within a node's block.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<usize> for Dof {
    type Error = Error;

    fn try_from(value: usize) -> Result<Dof> {
        Dof::ALL
            .get(value)
            .copied()
            .ok_or_else(|| Error::DomainViolation(format!("DOF index {value} out of range 0..6")))
    }
}

/// Section properties of a beam element.
///
/// `normal` points along the element's local y-axis and must not be parallel
/// to the element axis. Zero stiffnesses are permitted; they simply leave the
/// corresponding rows of the local stiffness empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Props {
    /// Extensional stiffness EA.
    pub ea: f64,
    /// Bending stiffness about the local z-axis, EIz.
    pub eiz: f64,
    /// Bending stiffness about the local y-axis, EIy.
    pub eiy: f64,
    /// Torsional stiffness GJ.
    pub gj: f64,
    /// Reference normal defining the local y-axis.
    pub normal: Point3,
}

impl Props {
    /// Create a property set.
    pub fn new(ea: f64, eiz: f64, eiy: f64, gj: f64, normal: Point3) -> Self {
        Self {
            ea,
            eiz,
            eiy,
            gj,
            normal,
        }
    }
}

/// A two-node beam element: the node pair plus its section properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Elem {
    /// Indices into the node list.
    pub nodes: [usize; 2],
    /// Section properties of this element.
    pub props: Props,
}

impl Elem {
    /// Create an element connecting `node1` and `node2`.
    pub fn new(node1: usize, node2: usize, props: Props) -> Self {
        Self {
            nodes: [node1, node2],
            props,
        }
    }
}

/// A prescribed nodal displacement or rotation (Dirichlet condition).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BC {
    /// Index of the constrained node.
    pub node: usize,
    /// Constrained DOF ordinal, `0..6`.
    pub dof: usize,
    /// Value the DOF is held at.
    pub value: f64,
}

impl BC {
    /// Create a boundary condition.
    pub fn new(node: usize, dof: usize, value: f64) -> Self {
        Self { node, dof, value }
    }
}

/// A concentrated nodal force or moment.
///
/// Repeated forces on the same (node, dof) sum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Force {
    /// Index of the loaded node.
    pub node: usize,
    /// Loaded DOF ordinal, `0..6`.
    pub dof: usize,
    /// Force (dof < 3) or moment (dof >= 3) value.
    pub value: f64,
}

impl Force {
    /// Create a nodal force.
    pub fn new(node: usize, dof: usize, value: f64) -> Self {
        Self { node, dof, value }
    }
}

/// Six independent springs joining all DOFs of two nodes.
///
/// Translational DOFs share `k_lin`, rotational DOFs share `k_rot`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tie {
    /// The tied node pair.
    pub nodes: [usize; 2],
    /// Spring constant for the translational DOFs.
    pub k_lin: f64,
    /// Spring constant for the rotational DOFs.
    pub k_rot: f64,
}

impl Tie {
    /// Create a tie between `node1` and `node2`.
    pub fn new(node1: usize, node2: usize, k_lin: f64, k_rot: f64) -> Self {
        Self {
            nodes: [node1, node2],
            k_lin,
            k_rot,
        }
    }

    /// Spring constant acting on DOF ordinal `dof`.
    pub fn spring_constant(&self, dof: usize) -> f64 {
        if dof < 3 {
            self.k_lin
        } else {
            self.k_rot
        }
    }
}

/// One term of an equation constraint: `coefficient * u[node, dof]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Term {
    /// Index of the node the term addresses.
    pub node: usize,
    /// DOF ordinal of the nodal variable, `0..6`.
    pub dof: usize,
    /// Coefficient multiplying the nodal variable.
    pub coefficient: f64,
}

impl Term {
    /// Create an equation term.
    pub fn new(node: usize, dof: usize, coefficient: f64) -> Self {
        Self {
            node,
            dof,
            coefficient,
        }
    }
}

/// A linear multipoint constraint: the terms sum to zero.
///
/// To force two nodal variables to be equal, give them equal and opposite
/// coefficients.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Equation {
    /// Terms summing to zero. At least one coefficient must be nonzero.
    pub terms: Vec<Term>,
}

impl Equation {
    /// Create an equation constraint from its terms.
    pub fn new(terms: Vec<Term>) -> Self {
        Self { terms }
    }
}

/// The mesh of a job: node list plus connectivity and per-element properties.
///
/// Connectivity and properties are stored as parallel vectors aligned by
/// element index.
#[derive(Debug, Clone)]
pub struct Job {
    /// Nodal coordinates.
    pub nodes: Vec<Point3>,
    /// Element connectivity (pairs of node indices).
    pub elems: Vec<[usize; 2]>,
    /// Section properties, one entry per element.
    pub props: Vec<Props>,
}

impl Job {
    /// Build a job from a node list and an element list.
    ///
    /// Validates that every element references two distinct, existing nodes.
    pub fn new(nodes: Vec<Point3>, elems: Vec<Elem>) -> Result<Self> {
        for (i, elem) in elems.iter().enumerate() {
            let [n1, n2] = elem.nodes;
            if n1 >= nodes.len() || n2 >= nodes.len() {
                return Err(Error::DomainViolation(format!(
                    "element {i} references node {} but the mesh has {} nodes",
                    n1.max(n2),
                    nodes.len()
                )));
            }
            if n1 == n2 {
                return Err(Error::DomainViolation(format!(
                    "element {i} connects node {n1} to itself"
                )));
            }
        }

        let mut connectivity = Vec::with_capacity(elems.len());
        let mut props = Vec::with_capacity(elems.len());
        for elem in elems {
            connectivity.push(elem.nodes);
            props.push(elem.props);
        }

        Ok(Self {
            nodes,
            elems: connectivity,
            props,
        })
    }

    /// Number of nodes in the mesh.
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of elements in the mesh.
    pub fn n_elems(&self) -> usize {
        self.elems.len()
    }

    /// Total number of physical degrees of freedom (`6 * n_nodes`).
    pub fn n_dofs(&self) -> usize {
        DOFS_PER_NODE * self.nodes.len()
    }
}
