//! Spatial two-node Euler-Bernoulli beam element.
//!
//! Produces the 12x12 local stiffness matrix and the 12x12 block-diagonal
//! rotation that maps local to global degrees of freedom. Rows and columns
//! address the DOFs in the order
//! `(u_x1, u_y1, u_z1, th_x1, th_y1, th_z1, u_x2, ..., th_z2)`.

use crate::error::{Error, Result};
use crate::model::{Job, Props};
use nalgebra::{SMatrix, Vector3};

/// Dense 12x12 element matrix.
pub type Matrix12 = SMatrix<f64, 12, 12>;

/// Two unit cross products closer than this are treated as collinear.
const COLLINEAR_TOL: f64 = 1e-12;

/// Local stiffness matrix of a beam with the given section and length.
///
/// Couples axial stretch through EA, torsion through GJ, and the two bending
/// planes through EIz (transverse y) and EIy (transverse z). The caller
/// guarantees `length > 0`.
pub fn local_stiffness(props: &Props, length: f64) -> Matrix12 {
    let a = props.ea / length;
    let t = props.gj / length;

    let z3 = 12.0 * props.eiz / (length * length * length);
    let z2 = 6.0 * props.eiz / (length * length);
    let z1 = props.eiz / length;

    let y3 = 12.0 * props.eiy / (length * length * length);
    let y2 = 6.0 * props.eiy / (length * length);
    let y1 = props.eiy / length;

    let mut k = Matrix12::zeros();

    // axial
    k[(0, 0)] = a;
    k[(0, 6)] = -a;
    k[(6, 0)] = -a;
    k[(6, 6)] = a;

    // torsion
    k[(3, 3)] = t;
    k[(3, 9)] = -t;
    k[(9, 3)] = -t;
    k[(9, 9)] = t;

    // bending about local z (transverse y)
    k[(1, 1)] = z3;
    k[(1, 5)] = z2;
    k[(1, 7)] = -z3;
    k[(1, 11)] = z2;
    k[(5, 1)] = z2;
    k[(5, 5)] = 4.0 * z1;
    k[(5, 7)] = -z2;
    k[(5, 11)] = 2.0 * z1;
    k[(7, 1)] = -z3;
    k[(7, 5)] = -z2;
    k[(7, 7)] = z3;
    k[(7, 11)] = -z2;
    k[(11, 1)] = z2;
    k[(11, 5)] = 2.0 * z1;
    k[(11, 7)] = -z2;
    k[(11, 11)] = 4.0 * z1;

    // bending about local y (transverse z)
    k[(2, 2)] = y3;
    k[(2, 4)] = -y2;
    k[(2, 8)] = -y3;
    k[(2, 10)] = -y2;
    k[(4, 2)] = -y2;
    k[(4, 4)] = 4.0 * y1;
    k[(4, 8)] = y2;
    k[(4, 10)] = 2.0 * y1;
    k[(8, 2)] = -y3;
    k[(8, 4)] = y2;
    k[(8, 8)] = y3;
    k[(8, 10)] = y2;
    k[(10, 2)] = -y2;
    k[(10, 4)] = 2.0 * y1;
    k[(10, 8)] = y2;
    k[(10, 10)] = 4.0 * y1;

    k
}

/// Rotation matrix mapping local to global degrees of freedom.
///
/// `axis` is the unit vector along the element (local x); `normal` defines
/// the local y direction. The local z axis is their normalised cross product.
/// Block-diagonal with four identical 3x3 blocks whose rows are the local
/// axes.
///
/// The normal is normalised but not re-orthogonalised against the axis, so a
/// normal that is not exactly perpendicular to the element leaves the matrix
/// mildly non-orthogonal.
pub fn rotation(axis: Vector3<f64>, normal: Vector3<f64>) -> Result<Matrix12> {
    let nx = axis;
    let ny = normal;

    let cross = nx.cross(&ny);
    let cross_norm = cross.norm();
    if cross_norm < COLLINEAR_TOL {
        return Err(Error::DomainViolation(
            "reference normal is collinear with the element axis".to_string(),
        ));
    }
    let nz = cross / cross_norm;

    let mut r = Matrix12::zeros();
    for block in 0..4 {
        let offset = 3 * block;
        for j in 0..3 {
            r[(offset, offset + j)] = nx[j];
            r[(offset + 1, offset + j)] = ny[j];
            r[(offset + 2, offset + j)] = nz[j];
        }
    }
    Ok(r)
}

/// Element stiffness of element `index` in global coordinates,
/// `R^T * K_local * R`, together with the rotation used.
pub fn element_stiffness(job: &Job, index: usize) -> Result<(Matrix12, Matrix12)> {
    let props = &job.props[index];
    let [n1, n2] = job.elems[index];

    if props.ea < 0.0 || props.eiz < 0.0 || props.eiy < 0.0 || props.gj < 0.0 {
        return Err(Error::DomainViolation(format!(
            "element {index} has a negative stiffness"
        )));
    }

    let span = job.nodes[n2] - job.nodes[n1];
    let length = span.norm();
    if length <= 0.0 {
        return Err(Error::DomainViolation(format!(
            "element {index} has zero length"
        )));
    }

    let normal_norm = props.normal.norm();
    if normal_norm <= 0.0 {
        return Err(Error::DomainViolation(format!(
            "element {index} has a zero reference normal"
        )));
    }

    let r = rotation(span / length, props.normal / normal_norm).map_err(|_| {
        Error::DomainViolation(format!(
            "element {index}: reference normal is collinear with the element axis"
        ))
    })?;

    let k_local = local_stiffness(props, length);
    Ok((r.transpose() * k_local * r, r))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Elem, Point3};
    use approx::assert_relative_eq;

    fn unit_props(normal: Point3) -> Props {
        Props::new(1.0, 1.0, 1.0, 1.0, normal)
    }

    fn two_node_job(p1: Point3, p2: Point3, props: Props) -> Job {
        Job::new(vec![p1, p2], vec![Elem::new(0, 1, props)]).unwrap()
    }

    #[test]
    fn test_rotation_is_identity_for_global_axes() {
        let r = rotation(Vector3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 1.0, 0.0)).unwrap();
        assert_relative_eq!(r, Matrix12::identity(), epsilon = 1e-15);
    }

    #[test]
    fn test_rotation_is_orthogonal_for_perpendicular_normal() {
        let s = std::f64::consts::FRAC_1_SQRT_2;
        let r = rotation(Vector3::new(s, s, 0.0), Vector3::new(-s, s, 0.0)).unwrap();
        let rtr = r.transpose() * r;
        assert_relative_eq!(rtr, Matrix12::identity(), epsilon = 1e-14);
    }

    #[test]
    fn test_rotation_rejects_collinear_normal() {
        let result = rotation(Vector3::new(1.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
        assert!(matches!(result, Err(Error::DomainViolation(_))));
    }

    #[test]
    fn test_local_stiffness_unit_section() {
        let k = local_stiffness(&unit_props(Point3::new(0.0, 1.0, 0.0)), 1.0);

        #[rustfmt::skip]
        let expected = [
            [ 1.0,   0.0,   0.0,  0.0,  0.0,  0.0, -1.0,   0.0,   0.0,  0.0,  0.0,  0.0],
            [ 0.0,  12.0,   0.0,  0.0,  0.0,  6.0,  0.0, -12.0,   0.0,  0.0,  0.0,  6.0],
            [ 0.0,   0.0,  12.0,  0.0, -6.0,  0.0,  0.0,   0.0, -12.0,  0.0, -6.0,  0.0],
            [ 0.0,   0.0,   0.0,  1.0,  0.0,  0.0,  0.0,   0.0,   0.0, -1.0,  0.0,  0.0],
            [ 0.0,   0.0,  -6.0,  0.0,  4.0,  0.0,  0.0,   0.0,   6.0,  0.0,  2.0,  0.0],
            [ 0.0,   6.0,   0.0,  0.0,  0.0,  4.0,  0.0,  -6.0,   0.0,  0.0,  0.0,  2.0],
            [-1.0,   0.0,   0.0,  0.0,  0.0,  0.0,  1.0,   0.0,   0.0,  0.0,  0.0,  0.0],
            [ 0.0, -12.0,   0.0,  0.0,  0.0, -6.0,  0.0,  12.0,   0.0,  0.0,  0.0, -6.0],
            [ 0.0,   0.0, -12.0,  0.0,  6.0,  0.0,  0.0,   0.0,  12.0,  0.0,  6.0,  0.0],
            [ 0.0,   0.0,   0.0, -1.0,  0.0,  0.0,  0.0,   0.0,   0.0,  1.0,  0.0,  0.0],
            [ 0.0,   0.0,  -6.0,  0.0,  2.0,  0.0,  0.0,   0.0,   6.0,  0.0,  4.0,  0.0],
            [ 0.0,   6.0,   0.0,  0.0,  0.0,  2.0,  0.0,  -6.0,   0.0,  0.0,  0.0,  4.0],
        ];

        for i in 0..12 {
            for j in 0..12 {
                assert_relative_eq!(k[(i, j)], expected[i][j], epsilon = 1e-15);
            }
        }
    }

    #[test]
    fn test_local_stiffness_is_symmetric() {
        let props = Props::new(3.0, 7.0, 5.0, 2.0, Point3::new(0.0, 1.0, 0.0));
        let k = local_stiffness(&props, 2.5);
        for i in 0..12 {
            for j in 0..12 {
                assert_relative_eq!(k[(i, j)], k[(j, i)], epsilon = 1e-15);
            }
        }
    }

    #[test]
    fn test_local_stiffness_length_scaling() {
        let props = unit_props(Point3::new(0.0, 1.0, 0.0));
        let k = local_stiffness(&props, 2.0);
        assert_relative_eq!(k[(0, 0)], 0.5, epsilon = 1e-15); // EA / L
        assert_relative_eq!(k[(1, 1)], 1.5, epsilon = 1e-15); // 12 EIz / L^3
        assert_relative_eq!(k[(1, 5)], 1.5, epsilon = 1e-15); // 6 EIz / L^2
        assert_relative_eq!(k[(5, 5)], 2.0, epsilon = 1e-15); // 4 EIz / L
        assert_relative_eq!(k[(5, 11)], 1.0, epsilon = 1e-15); // 2 EIz / L
    }

    #[test]
    fn test_element_stiffness_axis_aligned_matches_local() {
        let job = two_node_job(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            unit_props(Point3::new(0.0, 1.0, 0.0)),
        );
        let (k_global, r) = element_stiffness(&job, 0).unwrap();
        let k_local = local_stiffness(&job.props[0], 1.0);

        assert_relative_eq!(r, Matrix12::identity(), epsilon = 1e-15);
        assert_relative_eq!(k_global, k_local, epsilon = 1e-14);
    }

    #[test]
    fn test_element_stiffness_is_rotation_invariant_in_energy() {
        // rotating a beam into the y-axis permutes the stiffness but keeps
        // its symmetry and its trace
        let along_x = two_node_job(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            unit_props(Point3::new(0.0, 1.0, 0.0)),
        );
        let along_y = two_node_job(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            unit_props(Point3::new(0.0, 0.0, 1.0)),
        );

        let (kx, _) = element_stiffness(&along_x, 0).unwrap();
        let (ky, _) = element_stiffness(&along_y, 0).unwrap();

        assert_relative_eq!(kx.trace(), ky.trace(), epsilon = 1e-12);
        for i in 0..12 {
            for j in 0..12 {
                assert_relative_eq!(ky[(i, j)], ky[(j, i)], epsilon = 1e-13);
            }
        }
    }

    #[test]
    fn test_zero_length_element_is_rejected() {
        let job = two_node_job(
            Point3::new(1.0, 2.0, 3.0),
            Point3::new(1.0, 2.0, 3.0),
            unit_props(Point3::new(0.0, 1.0, 0.0)),
        );
        assert!(matches!(
            element_stiffness(&job, 0),
            Err(Error::DomainViolation(_))
        ));
    }

    #[test]
    fn test_collinear_normal_is_rejected() {
        let job = two_node_job(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            unit_props(Point3::new(1.0, 0.0, 0.0)),
        );
        assert!(matches!(
            element_stiffness(&job, 0),
            Err(Error::DomainViolation(_))
        ));
    }

    #[test]
    fn test_negative_stiffness_is_rejected() {
        let job = two_node_job(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Props::new(-1.0, 1.0, 1.0, 1.0, Point3::new(0.0, 1.0, 0.0)),
        );
        assert!(matches!(
            element_stiffness(&job, 0),
            Err(Error::DomainViolation(_))
        ));
    }
}
