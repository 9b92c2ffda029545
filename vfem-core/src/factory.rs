//! Canonical model fixtures.
//!
//! Small, fully constrained models used by tests, benchmarks and demos.
//! Unless noted otherwise the material is E = 2000, ν = 0.3.

use crate::boundary::{Axes, Constraint, Load};
use crate::element::{Element, ElementType};
use crate::error::{Error, Result};
use crate::model::Model;
use crate::types::Point3;
use nalgebra::Vector3;

/// Young's modulus of the fixtures.
pub const YOUNGS_MODULUS: f64 = 2000.0;
/// Poisson's ratio of the fixtures.
pub const POISSONS_RATIO: f64 = 0.3;

fn points(coords: &[[f64; 3]]) -> Vec<Point3> {
    coords.iter().map(|&[x, y, z]| Vector3::new(x, y, z)).collect()
}

fn unit_square() -> Vec<Point3> {
    points(&[
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
    ])
}

fn model(
    element: Element,
    vertices: Vec<Point3>,
    indices: Vec<usize>,
    constraints: Vec<Constraint>,
    loads: Vec<Load>,
) -> Result<Model> {
    Model::new(
        element,
        vertices,
        indices,
        constraints,
        loads,
        YOUNGS_MODULUS,
        POISSONS_RATIO,
    )
}

/// Two triangles on the unit square, pulled upwards at the top edge.
///
/// Node 0 is pinned and node 1 rests on a roller (fixed in Y).
pub fn rectangle() -> Result<Model> {
    model(
        Element::new(ElementType::Tri3),
        points(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, 1.0, 0.0],
        ]),
        vec![0, 1, 2, 1, 3, 2],
        vec![Constraint::new(0, Axes::XY), Constraint::new(1, Axes::Y)],
        vec![Load::new(2, [0.0, 1.0]), Load::new(3, [0.0, 1.0])],
    )
}

/// Unit square of two Tri3 elements clamped at x = 0 with a unit upward
/// load at the free top corner (node 2).
pub fn cantilever_tri3() -> Result<Model> {
    model(
        Element::new(ElementType::Tri3),
        unit_square(),
        vec![0, 1, 2, 0, 2, 3],
        vec![Constraint::new(0, Axes::XY), Constraint::new(3, Axes::XY)],
        vec![Load::new(2, [0.0, 1.0])],
    )
}

/// Same problem as [`cantilever_tri3`] with a single Quad4 element.
pub fn cantilever_quad4() -> Result<Model> {
    model(
        Element::new(ElementType::Quad4),
        unit_square(),
        vec![0, 1, 2, 3],
        vec![Constraint::new(0, Axes::XY), Constraint::new(3, Axes::XY)],
        vec![Load::new(2, [0.0, 1.0])],
    )
}

/// Same problem as [`cantilever_tri3`] with two Tri6 elements.
pub fn cantilever_tri6() -> Result<Model> {
    let mut vertices = unit_square();
    vertices.extend(points(&[
        [0.5, 0.0, 0.0], // 4: edge 0-1
        [1.0, 0.5, 0.0], // 5: edge 1-2
        [0.5, 0.5, 0.0], // 6: diagonal 0-2
        [0.0, 0.5, 0.0], // 7: edge 3-0
        [0.5, 1.0, 0.0], // 8: edge 2-3
    ]));

    model(
        Element::new(ElementType::Tri6),
        vertices,
        vec![0, 1, 2, 4, 5, 6, 0, 2, 3, 6, 8, 7],
        vec![
            Constraint::new(0, Axes::XY),
            Constraint::new(3, Axes::XY),
            Constraint::new(7, Axes::XY),
        ],
        vec![Load::new(2, [0.0, 1.0])],
    )
}

/// Same problem as [`cantilever_tri3`] with a single Quad8 element.
pub fn cantilever_quad8() -> Result<Model> {
    let mut vertices = unit_square();
    vertices.extend(points(&[
        [0.5, 0.0, 0.0],
        [1.0, 0.5, 0.0],
        [0.5, 1.0, 0.0],
        [0.0, 0.5, 0.0],
    ]));

    model(
        Element::new(ElementType::Quad8),
        vertices,
        (0..8).collect(),
        vec![
            Constraint::new(0, Axes::XY),
            Constraint::new(3, Axes::XY),
            Constraint::new(7, Axes::XY),
        ],
        vec![Load::new(2, [0.0, 1.0])],
    )
}

/// Unit tetrahedron with its base clamped and a unit +Z load at the apex.
pub fn tetrahedron() -> Result<Model> {
    model(
        Element::new(ElementType::Tet4),
        points(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ]),
        vec![0, 1, 2, 3],
        (0..3).map(|node| Constraint::new(node, Axes::XYZ)).collect(),
        vec![Load::new(3, [0.0, 0.0, 1.0])],
    )
}

/// The [`cantilever_tri3`] mesh with Tri3 elements lifted into 3D.
///
/// Every node is fixed in Z since the membrane has no out-of-plane stiffness.
pub fn lifted_rectangle() -> Result<Model> {
    model(
        Element::lifted(ElementType::Tri3)?,
        unit_square(),
        vec![0, 1, 2, 0, 2, 3],
        vec![
            Constraint::new(0, Axes::XYZ),
            Constraint::new(1, Axes::Z),
            Constraint::new(2, Axes::Z),
            Constraint::new(3, Axes::XYZ),
        ],
        vec![Load::new(2, [0.0, 1.0, 0.0])],
    )
}

/// Structured grid over `[0, width] × [0, height]` with `nx × ny` cells.
///
/// Nodes are numbered row by row from the origin; node `(i, j)` has index
/// `j * (nx + 1) + i`. Each cell becomes one Quad4 or two Tri3 elements.
///
/// # Errors
///
/// Returns an error for element types other than Tri3 and Quad4, or for a
/// grid with no cells.
pub fn rectangle_grid(
    width: f64,
    height: f64,
    nx: usize,
    ny: usize,
    element_type: ElementType,
) -> Result<(Vec<Point3>, Vec<usize>)> {
    if !matches!(element_type, ElementType::Tri3 | ElementType::Quad4) {
        return Err(Error::Element(format!(
            "grid generation supports Tri3 and Quad4, got {:?}",
            element_type
        )));
    }
    if nx == 0 || ny == 0 {
        return Err(Error::Mesh(format!(
            "grid needs at least one cell per direction, got {}x{}",
            nx, ny
        )));
    }

    let node = |i: usize, j: usize| j * (nx + 1) + i;

    let vertices: Vec<Point3> = (0..=ny)
        .flat_map(|j| {
            (0..=nx).map(move |i| {
                Vector3::new(
                    width * i as f64 / nx as f64,
                    height * j as f64 / ny as f64,
                    0.0,
                )
            })
        })
        .collect();

    let mut indices = Vec::with_capacity(nx * ny * 6);
    for j in 0..ny {
        for i in 0..nx {
            let (n00, n10, n11, n01) = (node(i, j), node(i + 1, j), node(i + 1, j + 1), node(i, j + 1));
            match element_type {
                ElementType::Quad4 => indices.extend([n00, n10, n11, n01]),
                _ => indices.extend([n00, n10, n11, n00, n11, n01]),
            }
        }
    }

    Ok((vertices, indices))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_build() {
        let cases = [
            (rectangle(), 4, 2),
            (cantilever_tri3(), 4, 2),
            (cantilever_quad4(), 4, 2),
            (cantilever_tri6(), 9, 2),
            (cantilever_quad8(), 8, 2),
            (tetrahedron(), 4, 3),
            (lifted_rectangle(), 4, 3),
        ];
        for (result, n_nodes, dim) in cases {
            let model = result.unwrap();
            assert_eq!(model.n_nodes(), n_nodes);
            assert_eq!(model.dim(), dim);
            assert!(!model.constrained_dofs().is_empty());
        }
    }

    #[test]
    fn test_rectangle_fixture() {
        let model = rectangle().unwrap();
        assert_eq!(model.indices(), &[0, 1, 2, 1, 3, 2]);
        assert_eq!(model.constrained_dofs(), &[0, 1, 3]);
        assert_eq!(model.load_vector(), &[0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_quadratic_midnodes_are_midpoints() {
        let model = cantilever_tri6().unwrap();
        let v = model.vertices();
        for conn in model.mesh().elements() {
            for (corner_a, corner_b, mid) in [(0, 1, 3), (1, 2, 4), (2, 0, 5)] {
                let expected = (v[conn[corner_a]] + v[conn[corner_b]]) / 2.0;
                assert_eq!(v[conn[mid]], expected);
            }
        }
    }

    #[test]
    fn test_rectangle_grid() {
        let (nodes, quads) = rectangle_grid(2.0, 1.0, 4, 2, ElementType::Quad4).unwrap();
        assert_eq!(nodes.len(), 15);
        assert_eq!(quads.len(), 4 * 8);
        assert_eq!(nodes[14], Vector3::new(2.0, 1.0, 0.0));
        assert_eq!(&quads[..4], &[0, 1, 6, 5]);

        let (_, tris) = rectangle_grid(2.0, 1.0, 4, 2, ElementType::Tri3).unwrap();
        assert_eq!(tris.len(), 3 * 16);
        assert_eq!(&tris[..6], &[0, 1, 6, 0, 6, 5]);
    }

    #[test]
    fn test_rectangle_grid_errors() {
        assert!(matches!(
            rectangle_grid(1.0, 1.0, 2, 2, ElementType::Quad8),
            Err(Error::Element(_))
        ));
        assert!(matches!(
            rectangle_grid(1.0, 1.0, 0, 2, ElementType::Tri3),
            Err(Error::Mesh(_))
        ));
    }
}
