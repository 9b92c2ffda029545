//! Finite element assembly.
//!
//! Integrates element stiffness matrices with isoparametric mapping and
//! scatters them into a global triplet accumulator:
//!
//! 1. gather the element's nodal coordinates (`n × DIM`)
//! 2. per integration point, build the Jacobian `J = dN/dξ · X`, its
//!    determinant and inverse, and the physical gradients `J⁻¹ · dN/dξ`
//! 3. build the strain-displacement matrix B and accumulate
//!    `Ke += Bᵀ D B |J| w`
//! 4. scatter Ke by global DOF (`DIM * node + axis`)
//!
//! Lifted elements are membranes: their strains are the in-plane
//! `[ε_11, ε_22, γ_12]` of a tangent frame at each integration point, so
//! displacement along the surface normal carries no stiffness.

use crate::element::{Element, GaussPoint};
use crate::error::{Error, Result};
use crate::material::Material;
use crate::mesh::Mesh;
use crate::sparse::{CsrMatrix, TripletMatrix};
use crate::types::strain_components;
use nalgebra::{DMatrix, Matrix3, Vector3};
use tracing::debug;

/// Jacobian `J = dshape · coords` (DIM × DIM) of the isoparametric map.
///
/// Row `a` holds `∂x/∂ξ_a`. For a lifted element the zero third row is
/// replaced by the unit normal of the first two, so `det J` is the area
/// scale of the embedded surface.
pub fn jacobian(element: &Element, dshape: &DMatrix<f64>, coords: &DMatrix<f64>) -> DMatrix<f64> {
    let mut j = dshape * coords;

    if element.is_lifted() {
        let r0 = Vector3::new(j[(0, 0)], j[(0, 1)], j[(0, 2)]);
        let r1 = Vector3::new(j[(1, 0)], j[(1, 1)], j[(1, 2)]);
        let normal = r0.cross(&r1);
        let len = normal.norm();
        // A collapsed surface keeps its zero row and fails the determinant check
        if len > 0.0 {
            for c in 0..3 {
                j[(2, c)] = normal[c] / len;
            }
        }
    }

    j
}

/// Physical shape-function gradients and Jacobian determinant at one
/// integration point.
///
/// Returns `(G, det J)` where `G = J⁻¹ · dshape` has one row per spatial
/// axis and one column per node.
///
/// # Errors
///
/// Returns [`Error::DegenerateGeometry`] if `det J` is not positive and
/// finite.
pub fn shape_gradients(
    element: &Element,
    coords: &DMatrix<f64>,
    gp: &GaussPoint,
    elem_idx: usize,
    point_idx: usize,
) -> Result<(DMatrix<f64>, f64)> {
    let dshape = element.dshape(&gp.coords);
    let j = jacobian(element, &dshape, coords);

    let degenerate = |det: f64| Error::DegenerateGeometry {
        element: elem_idx,
        point: point_idx,
        det,
    };

    let det_j = j.determinant();
    if !(det_j.is_finite() && det_j > 0.0) {
        return Err(degenerate(det_j));
    }

    let j_inv = j.try_inverse().ok_or_else(|| degenerate(det_j))?;

    Ok((j_inv * dshape, det_j))
}

/// Orthonormal in-plane axes `(t1, t2)` of a lifted element's Jacobian.
///
/// `t1` follows `∂x/∂ξ` and `t2 = n × t1`, with `n` the unit normal held in
/// the third row. `j` must have passed the determinant check.
pub fn tangent_frame(j: &DMatrix<f64>) -> (Vector3<f64>, Vector3<f64>) {
    let r0 = Vector3::new(j[(0, 0)], j[(0, 1)], j[(0, 2)]);
    let normal = Vector3::new(j[(2, 0)], j[(2, 1)], j[(2, 2)]);
    let t1 = r0.normalize();
    let t2 = normal.cross(&t1);
    (t1, t2)
}

/// Strain-displacement matrix from physical gradients.
///
/// Columns are interleaved per node (`DIM * node + axis`). Rows follow
/// Voigt ordering: `[ε_xx, ε_yy, γ_xy]` in 2D and
/// `[ε_xx, ε_yy, ε_zz, γ_xy, γ_yz, γ_xz]` in 3D.
pub fn strain_displacement(gradients: &DMatrix<f64>) -> DMatrix<f64> {
    let dim = gradients.nrows();
    let n_nodes = gradients.ncols();
    let mut b = DMatrix::zeros(strain_components(dim), n_nodes * dim);

    for i in 0..n_nodes {
        let col = i * dim;
        let dn_dx = gradients[(0, i)];
        let dn_dy = gradients[(1, i)];

        if dim == 2 {
            b[(0, col)] = dn_dx;
            b[(1, col + 1)] = dn_dy;
            b[(2, col)] = dn_dy;
            b[(2, col + 1)] = dn_dx;
        } else {
            let dn_dz = gradients[(2, i)];

            // ε_xx, ε_yy, ε_zz
            b[(0, col)] = dn_dx;
            b[(1, col + 1)] = dn_dy;
            b[(2, col + 2)] = dn_dz;

            // γ_xy = ∂u/∂y + ∂v/∂x
            b[(3, col)] = dn_dy;
            b[(3, col + 1)] = dn_dx;

            // γ_yz = ∂v/∂z + ∂w/∂y
            b[(4, col + 1)] = dn_dz;
            b[(4, col + 2)] = dn_dy;

            // γ_xz = ∂u/∂z + ∂w/∂x
            b[(5, col)] = dn_dz;
            b[(5, col + 2)] = dn_dx;
        }
    }

    b
}

/// Membrane strain-displacement matrix of a lifted element.
///
/// `gradients` are the surface gradients (3 × n) and `(t1, t2)` the tangent
/// frame. Rows are `[ε_11, ε_22, γ_12]`, columns the global `(u, v, w)` of
/// each node, so only the tangential part of a nodal displacement strains
/// the element.
pub fn membrane_strain_displacement(
    gradients: &DMatrix<f64>,
    t1: &Vector3<f64>,
    t2: &Vector3<f64>,
) -> DMatrix<f64> {
    let n_nodes = gradients.ncols();
    let mut b = DMatrix::zeros(3, n_nodes * 3);

    for i in 0..n_nodes {
        let col = i * 3;
        let grad = Vector3::new(gradients[(0, i)], gradients[(1, i)], gradients[(2, i)]);
        let dn_ds1 = t1.dot(&grad);
        let dn_ds2 = t2.dot(&grad);

        for axis in 0..3 {
            b[(0, col + axis)] = dn_ds1 * t1[axis];
            b[(1, col + axis)] = dn_ds2 * t2[axis];
            b[(2, col + axis)] = dn_ds2 * t1[axis] + dn_ds1 * t2[axis];
        }
    }

    b
}

/// Constitutive matrix an element integrates with: plane stress for planar
/// elements, plane strain for lifted membranes and full 3D elasticity for
/// solids.
pub fn constitutive_matrix(element: &Element, material: &Material) -> Result<DMatrix<f64>> {
    if element.is_lifted() {
        let d: Matrix3<f64> = material.constitutive_plane_strain();
        return Ok(DMatrix::from_iterator(3, 3, d.iter().copied()));
    }
    material.stiffness_matrix(element.dim())
}

/// Element stiffness matrix `Ke = Σ Bᵀ D B |J| w` over the element's
/// quadrature rule.
///
/// `coords` is the `n × DIM` matrix of nodal coordinates and `d` the
/// element's [`constitutive_matrix`].
pub fn element_stiffness(
    element: &Element,
    coords: &DMatrix<f64>,
    d: &DMatrix<f64>,
    elem_idx: usize,
) -> Result<DMatrix<f64>> {
    let size = element.n_nodes() * element.dim();
    let mut k = DMatrix::zeros(size, size);

    for (point_idx, gp) in element.integration_points().iter().enumerate() {
        let (gradients, det_j) = shape_gradients(element, coords, gp, elem_idx, point_idx)?;
        let b = if element.is_lifted() {
            let j = jacobian(element, &element.dshape(&gp.coords), coords);
            let (t1, t2) = tangent_frame(&j);
            membrane_strain_displacement(&gradients, &t1, &t2)
        } else {
            strain_displacement(&gradients)
        };

        // K += B^T * D * B * |J| * w
        let db = d * &b;
        k += b.transpose() * db * (det_j * gp.weight);
    }

    Ok(k)
}

/// Length, area or volume of one element, `Σ |J| w`.
pub fn element_measure(element: &Element, coords: &DMatrix<f64>, elem_idx: usize) -> Result<f64> {
    element
        .integration_points()
        .iter()
        .enumerate()
        .map(|(point_idx, gp)| {
            shape_gradients(element, coords, gp, elem_idx, point_idx).map(|(_, det_j)| det_j * gp.weight)
        })
        .sum()
}

/// Global DOF indices of an element, interleaved per node.
pub fn element_dofs(connectivity: &[usize], dim: usize) -> Vec<usize> {
    connectivity
        .iter()
        .flat_map(|&node| (0..dim).map(move |axis| node * dim + axis))
        .collect()
}

/// Assemble the global stiffness matrix.
///
/// The result is `n_dofs × n_dofs` with `n_dofs = n_nodes * DIM`. Every
/// diagonal entry is present in the sparsity pattern, even for DOFs no
/// element touches.
pub fn assemble_stiffness(mesh: &Mesh, material: &Material) -> Result<CsrMatrix> {
    let element = mesh.element();
    let dim = element.dim();
    let n_dofs = mesh.n_nodes() * dim;
    let d = constitutive_matrix(&element, material)?;

    let element_size = element.n_nodes() * dim;
    let nnz_estimate = mesh.n_elements() * element_size * element_size + n_dofs;
    let mut triplet = TripletMatrix::with_capacity(n_dofs, n_dofs, nnz_estimate);

    for dof in 0..n_dofs {
        triplet.add(dof, dof, 0.0);
    }

    for (elem_idx, connectivity) in mesh.elements().enumerate() {
        let coords = mesh
            .element_coords(elem_idx)
            .ok_or_else(|| Error::Assembly(format!("element {} has no connectivity", elem_idx)))?;

        let ke = element_stiffness(&element, &coords, &d, elem_idx)?;
        triplet.add_submatrix(&element_dofs(connectivity, dim), &ke);
    }

    let n_triplets = triplet.nnz();
    let stiffness = triplet.to_csr()?;

    debug!(
        elements = mesh.n_elements(),
        dofs = n_dofs,
        triplets = n_triplets,
        nnz = stiffness.nnz(),
        "assembled global stiffness"
    );

    Ok(stiffness)
}
