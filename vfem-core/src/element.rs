//! Element library.
//!
//! Reference-element families are dispatched through the [`ElementType`] enum:
//! each variant forwards to a submodule holding its shape functions,
//! parametric derivatives and quadrature rule. An [`Element`] pairs a family
//! with the spatial dimension it is used in, which allows planar families to
//! be embedded in 3D space via [`Element::lifted`].
//!
//! # Submodules
//!
//! - [`gauss`] - Gauss quadrature rules for numerical integration
//! - `tri3`, `tri6`, `quad4`, `quad8`, `tet4` - per-family closed forms

use crate::error::{Error, Result};
use crate::types::NaturalCoords;
use nalgebra::{DMatrix, DVector};

pub mod gauss;
mod quad4;
mod quad8;
mod tet4;
mod tri3;
mod tri6;

pub use gauss::{gauss_1d, gauss_quad, gauss_tet, gauss_tri, GaussPoint};

/// Supported reference-element families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// 3-node triangle (linear).
    Tri3,
    /// 6-node triangle (quadratic).
    Tri6,
    /// 4-node quadrilateral (bilinear).
    Quad4,
    /// 8-node quadrilateral (quadratic serendipity).
    Quad8,
    /// 4-node tetrahedron (linear).
    Tet4,
}

impl ElementType {
    /// All families, in declaration order.
    pub const ALL: [ElementType; 5] = [
        ElementType::Tri3,
        ElementType::Tri6,
        ElementType::Quad4,
        ElementType::Quad8,
        ElementType::Tet4,
    ];

    /// Number of nodes (= local shape functions) for this element type.
    pub fn n_nodes(self) -> usize {
        match self {
            ElementType::Tri3 => tri3::N_NODES,
            ElementType::Tri6 => tri6::N_NODES,
            ElementType::Quad4 => quad4::N_NODES,
            ElementType::Quad8 => quad8::N_NODES,
            ElementType::Tet4 => tet4::N_NODES,
        }
    }

    /// Polynomial order of the shape functions.
    pub fn order(self) -> u32 {
        match self {
            ElementType::Tri3 | ElementType::Quad4 | ElementType::Tet4 => 1,
            ElementType::Tri6 | ElementType::Quad8 => 2,
        }
    }

    /// Natural spatial dimension of the reference domain (2D or 3D).
    pub fn dimension(self) -> usize {
        match self {
            ElementType::Tet4 => 3,
            ElementType::Tri3 | ElementType::Tri6 | ElementType::Quad4 | ElementType::Quad8 => 2,
        }
    }

    /// Node positions in natural coordinates.
    pub fn node_coords(self) -> &'static [NaturalCoords] {
        match self {
            ElementType::Tri3 => &tri3::NODE_COORDS,
            ElementType::Tri6 => &tri6::NODE_COORDS,
            ElementType::Quad4 => &quad4::NODE_COORDS,
            ElementType::Quad8 => &quad8::NODE_COORDS,
            ElementType::Tet4 => &tet4::NODE_COORDS,
        }
    }

    /// Quadrature rule of this family.
    pub fn integration_points(self) -> Vec<GaussPoint> {
        match self {
            ElementType::Tri3 => tri3::quadrature(),
            ElementType::Tri6 => tri6::quadrature(),
            ElementType::Quad4 => quad4::quadrature(),
            ElementType::Quad8 => quad8::quadrature(),
            ElementType::Tet4 => tet4::quadrature(),
        }
    }

    /// Shape function values at a parametric point.
    pub fn shape(self, point: &NaturalCoords) -> DVector<f64> {
        match self {
            ElementType::Tri3 => DVector::from_row_slice(&tri3::shape(point)),
            ElementType::Tri6 => DVector::from_row_slice(&tri6::shape(point)),
            ElementType::Quad4 => DVector::from_row_slice(&quad4::shape(point)),
            ElementType::Quad8 => DVector::from_row_slice(&quad8::shape(point)),
            ElementType::Tet4 => DVector::from_row_slice(&tet4::shape(point)),
        }
    }

    /// Parametric derivatives laid out as `dim` rows × `n_nodes` columns.
    ///
    /// Rows beyond the natural dimension are zero.
    fn dshape_padded(self, point: &NaturalCoords, dim: usize) -> DMatrix<f64> {
        match self {
            ElementType::Tri3 => rows_to_matrix(&tri3::dshape(point), dim),
            ElementType::Tri6 => rows_to_matrix(&tri6::dshape(point), dim),
            ElementType::Quad4 => rows_to_matrix(&quad4::dshape(point), dim),
            ElementType::Quad8 => rows_to_matrix(&quad8::dshape(point), dim),
            ElementType::Tet4 => rows_to_matrix(&tet4::dshape(point), dim),
        }
    }

    /// Triangles a renderer draws for one element.
    ///
    /// `connectivity` holds the element's global node indices in local
    /// order. Quadrilaterals are split along the diagonal from the first to
    /// the third corner, quadratic families are reduced to their corner nodes
    /// and tetrahedra yield their four outward-facing faces.
    ///
    /// # Panics
    ///
    /// Panics if `connectivity` does not hold exactly one index per node.
    /// Connectivity taken from a [`Mesh`](crate::mesh::Mesh) always does.
    pub fn display_triangles(self, connectivity: &[usize]) -> Vec<[usize; 3]> {
        assert_eq!(
            connectivity.len(),
            self.n_nodes(),
            "{:?} connectivity needs {} indices",
            self,
            self.n_nodes()
        );
        let c = connectivity;
        match self {
            ElementType::Tri3 | ElementType::Tri6 => vec![[c[0], c[1], c[2]]],
            ElementType::Quad4 | ElementType::Quad8 => {
                vec![[c[0], c[1], c[2]], [c[2], c[3], c[0]]]
            }
            ElementType::Tet4 => vec![
                [c[0], c[2], c[1]],
                [c[0], c[1], c[3]],
                [c[1], c[2], c[3]],
                [c[0], c[3], c[2]],
            ],
        }
    }
}

fn rows_to_matrix<const N: usize>(rows: &[[f64; N]], dim: usize) -> DMatrix<f64> {
    DMatrix::from_fn(dim, N, |r, c| rows.get(r).map_or(0.0, |row| row[c]))
}

/// Reference-element descriptor used by a model.
///
/// Stateless and `Copy`: one value describes every element of a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Element {
    element_type: ElementType,
    dim: usize,
}

impl Element {
    /// Element used in its natural dimension.
    pub fn new(element_type: ElementType) -> Self {
        Self {
            element_type,
            dim: element_type.dimension(),
        }
    }

    /// Planar element embedded in 3D space.
    ///
    /// Derivatives gain a zero ζ row; the assembler completes the Jacobian
    /// with the element's unit normal and integrates in-plane membrane
    /// strains only.
    ///
    /// # Errors
    ///
    /// Returns an error if the family is already three-dimensional.
    pub fn lifted(element_type: ElementType) -> Result<Self> {
        if element_type.dimension() != 2 {
            return Err(Error::Element(format!(
                "only planar element types can be lifted to 3D, got {:?}",
                element_type
            )));
        }
        Ok(Self {
            element_type,
            dim: 3,
        })
    }

    /// Underlying reference-element family.
    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    /// Spatial dimension (DIM) the element is used in.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Whether a planar family is embedded in 3D.
    pub fn is_lifted(&self) -> bool {
        self.dim != self.element_type.dimension()
    }

    /// Number of local shape functions (nodes per element).
    pub fn n_nodes(&self) -> usize {
        self.element_type.n_nodes()
    }

    /// Polynomial order.
    pub fn order(&self) -> u32 {
        self.element_type.order()
    }

    /// Quadrature points; ordering matches [`Element::integration_weight`].
    pub fn integration_points(&self) -> Vec<GaussPoint> {
        self.element_type.integration_points()
    }

    /// Weight of the integration point at `index`.
    pub fn integration_weight(&self, index: usize) -> Result<f64> {
        let points = self.integration_points();
        points.get(index).map(|gp| gp.weight).ok_or_else(|| {
            Error::Element(format!(
                "integration point {} out of range for {:?} ({} points)",
                index,
                self.element_type,
                points.len()
            ))
        })
    }

    /// Shape function values `N_i` at a parametric point.
    pub fn shape(&self, point: &NaturalCoords) -> DVector<f64> {
        self.element_type.shape(point)
    }

    /// Parametric derivatives `∂N_i/∂ξ_a`, DIM rows × n columns.
    pub fn dshape(&self, point: &NaturalCoords) -> DMatrix<f64> {
        self.element_type.dshape_padded(point, self.dim)
    }
}

impl From<ElementType> for Element {
    fn from(element_type: ElementType) -> Self {
        Self::new(element_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_points(element_type: ElementType) -> Vec<NaturalCoords> {
        match element_type {
            ElementType::Tri3 | ElementType::Tri6 => vec![
                [1.0 / 3.0, 1.0 / 3.0, 0.0],
                [0.1, 0.2, 0.0],
                [0.7, 0.15, 0.0],
                [0.05, 0.9, 0.0],
            ],
            ElementType::Quad4 | ElementType::Quad8 => vec![
                [0.0, 0.0, 0.0],
                [0.5, 0.5, 0.0],
                [-0.5, 0.25, 0.0],
                [0.9, -0.7, 0.0],
            ],
            ElementType::Tet4 => vec![
                [0.25, 0.25, 0.25],
                [0.1, 0.2, 0.3],
                [0.6, 0.1, 0.1],
            ],
        }
    }

    #[test]
    fn test_partition_of_unity() {
        for element_type in ElementType::ALL {
            for p in sample_points(element_type) {
                let sum: f64 = element_type.shape(&p).iter().sum();
                assert_relative_eq!(sum, 1.0, epsilon = 1e-14);
            }
            for gp in element_type.integration_points() {
                let sum: f64 = element_type.shape(&gp.coords).iter().sum();
                assert_relative_eq!(sum, 1.0, epsilon = 1e-14);
            }
        }
    }

    #[test]
    fn test_dshape_matches_finite_differences() {
        let h = 1e-6;
        for element_type in ElementType::ALL {
            let element = Element::new(element_type);
            for p in sample_points(element_type) {
                let analytic = element.dshape(&p);
                assert_eq!(analytic.nrows(), element_type.dimension());
                assert_eq!(analytic.ncols(), element_type.n_nodes());

                for axis in 0..element_type.dimension() {
                    let mut forward = p;
                    let mut backward = p;
                    forward[axis] += h;
                    backward[axis] -= h;
                    let numeric = (element.shape(&forward) - element.shape(&backward)) / (2.0 * h);

                    for i in 0..element_type.n_nodes() {
                        assert_relative_eq!(analytic[(axis, i)], numeric[i], epsilon = 1e-8);
                    }
                }
            }
        }
    }

    #[test]
    fn test_node_counts_and_orders() {
        assert_eq!(ElementType::Tri3.n_nodes(), 3);
        assert_eq!(ElementType::Tri6.n_nodes(), 6);
        assert_eq!(ElementType::Quad4.n_nodes(), 4);
        assert_eq!(ElementType::Quad8.n_nodes(), 8);
        assert_eq!(ElementType::Tet4.n_nodes(), 4);

        assert_eq!(ElementType::Tri6.order(), 2);
        assert_eq!(ElementType::Quad4.order(), 1);
        for element_type in ElementType::ALL {
            assert_eq!(element_type.node_coords().len(), element_type.n_nodes());
        }
    }

    #[test]
    fn test_integration_weights_match_points() {
        for element_type in ElementType::ALL {
            let element = Element::new(element_type);
            let points = element.integration_points();
            for (i, gp) in points.iter().enumerate() {
                assert_eq!(element.integration_weight(i).unwrap(), gp.weight);
            }
            assert!(element.integration_weight(points.len()).is_err());
        }
    }

    #[test]
    fn test_reference_measure() {
        let expected = |t: ElementType| match t {
            ElementType::Tri3 | ElementType::Tri6 => 0.5,
            ElementType::Quad4 | ElementType::Quad8 => 4.0,
            ElementType::Tet4 => 1.0 / 6.0,
        };
        for element_type in ElementType::ALL {
            let sum: f64 = element_type.integration_points().iter().map(|gp| gp.weight).sum();
            assert_relative_eq!(sum, expected(element_type), epsilon = 1e-14);
        }
    }

    #[test]
    fn test_lifted_element_pads_dshape() {
        let element = Element::lifted(ElementType::Quad4).unwrap();
        assert!(element.is_lifted());
        assert_eq!(element.dim(), 3);

        let d = element.dshape(&[0.2, -0.3, 0.0]);
        assert_eq!(d.nrows(), 3);
        assert_eq!(d.ncols(), 4);
        for i in 0..4 {
            assert_eq!(d[(2, i)], 0.0);
        }

        let natural = Element::new(ElementType::Quad4).dshape(&[0.2, -0.3, 0.0]);
        assert_eq!(d.rows(0, 2).into_owned(), natural);
    }

    #[test]
    fn test_lifting_tetrahedron_fails() {
        assert!(Element::lifted(ElementType::Tet4).is_err());
        assert!(!Element::new(ElementType::Tet4).is_lifted());
    }

    #[test]
    fn test_display_triangles() {
        assert_eq!(
            ElementType::Quad4.display_triangles(&[10, 11, 12, 13]),
            vec![[10, 11, 12], [12, 13, 10]]
        );
        assert_eq!(
            ElementType::Tri6.display_triangles(&[0, 1, 2, 3, 4, 5]),
            vec![[0, 1, 2]]
        );
        assert_eq!(
            ElementType::Quad8.display_triangles(&[0, 1, 2, 3, 4, 5, 6, 7]).len(),
            2
        );
        assert_eq!(ElementType::Tet4.display_triangles(&[0, 1, 2, 3]).len(), 4);
    }

    #[test]
    #[should_panic(expected = "connectivity needs 4 indices")]
    fn test_display_triangles_short_connectivity() {
        ElementType::Quad4.display_triangles(&[0, 1, 2]);
    }
}
