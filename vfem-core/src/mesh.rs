//! Mesh data structure.
//!
//! Stores nodal coordinates and flattened element connectivity for a single
//! element family.

use crate::element::Element;
use crate::error::{Error, Result};
use crate::types::Point3;
use nalgebra::DMatrix;

/// Finite element mesh with one element family.
#[derive(Debug, Clone)]
pub struct Mesh {
    element: Element,
    /// Nodal coordinates.
    nodes: Vec<Point3>,
    /// Connectivity, `element.n_nodes()` indices per element.
    indices: Vec<usize>,
}

impl Mesh {
    /// Create a mesh, validating its connectivity.
    ///
    /// # Errors
    ///
    /// Returns an error if the connectivity length is not a multiple of the
    /// element size or references a node that does not exist.
    pub fn new(element: Element, nodes: Vec<Point3>, indices: Vec<usize>) -> Result<Self> {
        let per_element = element.n_nodes();
        if indices.len() % per_element != 0 {
            return Err(Error::Mesh(format!(
                "connectivity length {} is not a multiple of {} nodes per {:?} element",
                indices.len(),
                per_element,
                element.element_type()
            )));
        }

        if let Some(&node) = indices.iter().find(|&&i| i >= nodes.len()) {
            return Err(Error::InvalidNodeReference {
                node,
                n_nodes: nodes.len(),
                context: "connectivity",
            });
        }

        Ok(Self {
            element,
            nodes,
            indices,
        })
    }

    /// Element descriptor shared by every element.
    pub fn element(&self) -> Element {
        self.element
    }

    /// Number of nodes in the mesh.
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of elements in the mesh.
    pub fn n_elements(&self) -> usize {
        self.indices.len() / self.element.n_nodes()
    }

    /// Get nodal coordinates.
    pub fn nodes(&self) -> &[Point3] {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [Point3] {
        &mut self.nodes
    }

    /// Get a specific node's coordinates.
    pub fn node(&self, idx: usize) -> Option<&Point3> {
        self.nodes.get(idx)
    }

    /// Flattened connectivity.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Iterate over the connectivity of each element.
    pub fn elements(&self) -> impl Iterator<Item = &[usize]> {
        self.indices.chunks_exact(self.element.n_nodes())
    }

    /// Node indices of one element.
    pub fn connectivity(&self, elem_idx: usize) -> Option<&[usize]> {
        let n = self.element.n_nodes();
        self.indices.get(elem_idx * n..(elem_idx + 1) * n)
    }

    /// Coordinates of an element's nodes as an `n × DIM` matrix, one row
    /// per node.
    pub fn element_coords(&self, elem_idx: usize) -> Option<DMatrix<f64>> {
        let conn = self.connectivity(elem_idx)?;
        let dim = self.element.dim();
        Some(DMatrix::from_fn(conn.len(), dim, |r, c| {
            self.nodes[conn[r]][c]
        }))
    }

    /// Flattened triangle list for renderers.
    pub fn display_indices(&self) -> Vec<usize> {
        let element_type = self.element.element_type();
        self.elements()
            .flat_map(|conn| element_type.display_triangles(conn))
            .flatten()
            .collect()
    }

    /// Compute mesh bounding box.
    pub fn bounds(&self) -> Option<(Point3, Point3)> {
        let first = *self.nodes.first()?;
        Some(self.nodes[1..].iter().fold((first, first), |(min, max), node| {
            (min.inf(node), max.sup(node))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementType;
    use nalgebra::Vector3;

    fn unit_square() -> Vec<Point3> {
        vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(1.0, 1.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn test_mesh_creation() {
        let mesh = Mesh::new(
            Element::new(ElementType::Tri3),
            unit_square(),
            vec![0, 1, 2, 0, 2, 3],
        )
        .unwrap();

        assert_eq!(mesh.n_nodes(), 4);
        assert_eq!(mesh.n_elements(), 2);
        assert_eq!(mesh.connectivity(1), Some(&[0, 2, 3][..]));
        assert_eq!(mesh.connectivity(2), None);
        assert_eq!(mesh.elements().count(), 2);
    }

    #[test]
    fn test_invalid_connectivity_length() {
        let result = Mesh::new(Element::new(ElementType::Tri3), unit_square(), vec![0, 1]);
        assert!(matches!(result, Err(Error::Mesh(_))));
    }

    #[test]
    fn test_invalid_node_index() {
        let result = Mesh::new(
            Element::new(ElementType::Quad4),
            unit_square(),
            vec![0, 1, 2, 7],
        );
        assert!(matches!(
            result,
            Err(Error::InvalidNodeReference { node: 7, n_nodes: 4, .. })
        ));
    }

    #[test]
    fn test_element_coords() {
        let mesh = Mesh::new(
            Element::new(ElementType::Tri3),
            unit_square(),
            vec![0, 1, 2, 0, 2, 3],
        )
        .unwrap();

        let x = mesh.element_coords(1).unwrap();
        assert_eq!(x.shape(), (3, 2));
        assert_eq!(x[(1, 0)], 1.0);
        assert_eq!(x[(2, 1)], 1.0);
        assert_eq!(x[(2, 0)], 0.0);

        let lifted = Mesh::new(
            Element::lifted(ElementType::Tri3).unwrap(),
            unit_square(),
            vec![0, 1, 2],
        )
        .unwrap();
        assert_eq!(lifted.element_coords(0).unwrap().shape(), (3, 3));
    }

    #[test]
    fn test_display_indices() {
        let mesh = Mesh::new(
            Element::new(ElementType::Quad4),
            unit_square(),
            vec![0, 1, 2, 3],
        )
        .unwrap();
        assert_eq!(mesh.display_indices(), vec![0, 1, 2, 2, 3, 0]);
    }

    #[test]
    fn test_bounds() {
        let nodes = vec![
            Vector3::new(-1.0, -2.0, -3.0),
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(0.0, 0.0, 0.0),
        ];
        let mesh = Mesh::new(Element::new(ElementType::Tri3), nodes, vec![0, 1, 2]).unwrap();

        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min, Vector3::new(-1.0, -2.0, -3.0));
        assert_eq!(max, Vector3::new(1.0, 2.0, 3.0));
    }
}
