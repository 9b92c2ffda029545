//! Linear-elastic model.
//!
//! A [`Model`] owns the mesh, the material, the boundary conditions and the
//! load vector. Solving follows a fixed lifecycle:
//!
//! 1. [`Model::build_global_stiffness`] assembles K from the current
//!    coordinates
//! 2. [`Model::apply_constraints`] eliminates the fixed DOFs in place
//! 3. a linear solve of `K u = f` with [`Model::constrained_loads`]
//! 4. [`Model::account_displacements`] moves the nodes by `u`
//!
//! [`crate::solver::Solver`] drives the whole sequence.

use crate::assembly::assemble_stiffness;
use crate::boundary::{assemble_loads, Constraint, Load};
use crate::element::Element;
use crate::error::{Error, Result};
use crate::material::Material;
use crate::mesh::Mesh;
use crate::sparse::{eliminate_dofs, CsrMatrix};
use crate::types::Point3;
use tracing::debug;

/// Geometric state of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Configuration {
    /// Nodes at their initial positions.
    Reference,
    /// Displacements have been added onto the nodes.
    Deformed,
}

/// Mesh, material, boundary conditions and loads of one analysis.
#[derive(Debug, Clone)]
pub struct Model {
    mesh: Mesh,
    material: Material,
    constraints: Vec<Constraint>,
    loads: Vec<Load>,
    load_vector: Vec<f64>,
    fixed_dofs: Vec<usize>,
    configuration: Configuration,
}

impl Model {
    /// Build a model.
    ///
    /// The spatial dimension is taken from `element`. `indices` holds
    /// `element.n_nodes()` node indices per element.
    ///
    /// # Errors
    ///
    /// Returns an error if the connectivity is malformed, a constraint or
    /// load references a missing node, a constraint fixes an axis outside
    /// the model's dimension, or a load has the wrong number of components.
    pub fn new(
        element: Element,
        vertices: Vec<Point3>,
        indices: Vec<usize>,
        constraints: Vec<Constraint>,
        loads: Vec<Load>,
        youngs_modulus: f64,
        poissons_ratio: f64,
    ) -> Result<Self> {
        let mesh = Mesh::new(element, vertices, indices)?;
        let n_nodes = mesh.n_nodes();
        let dim = element.dim();

        let mut fixed_dofs = Vec::new();
        for constraint in &constraints {
            if constraint.node >= n_nodes {
                return Err(Error::InvalidNodeReference {
                    node: constraint.node,
                    n_nodes,
                    context: "constraint",
                });
            }
            fixed_dofs.extend(constraint.dofs(dim)?);
        }
        fixed_dofs.sort_unstable();
        fixed_dofs.dedup();

        let load_vector = assemble_loads(&loads, n_nodes, dim)?;

        Ok(Self {
            mesh,
            material: Material::new(youngs_modulus, poissons_ratio),
            constraints,
            loads,
            load_vector,
            fixed_dofs,
            configuration: Configuration::Reference,
        })
    }

    /// Assemble the global stiffness matrix from the current node positions.
    pub fn build_global_stiffness(&self) -> Result<CsrMatrix> {
        assemble_stiffness(&self.mesh, &self.material)
    }

    /// Eliminate the constrained DOFs of `stiffness` in place.
    ///
    /// Rows and columns of fixed DOFs are zeroed and their diagonal set to
    /// one, so pairing the matrix with [`Model::constrained_loads`] yields a
    /// zero displacement there. A fixed diagonal absent from the sparsity
    /// pattern is added.
    ///
    /// # Errors
    ///
    /// Returns an error if the matrix is not `n_dofs × n_dofs`.
    pub fn apply_constraints(&self, stiffness: &mut CsrMatrix) -> Result<()> {
        let n_dofs = self.n_dofs();
        if stiffness.nrows() != n_dofs || stiffness.ncols() != n_dofs {
            return Err(Error::DimensionMismatch(format!(
                "stiffness matrix is {}x{}, model has {} DOFs",
                stiffness.nrows(),
                stiffness.ncols(),
                n_dofs
            )));
        }

        let mut fixed = vec![false; n_dofs];
        for &dof in &self.fixed_dofs {
            fixed[dof] = true;
        }
        eliminate_dofs(stiffness, &fixed)?;

        debug!(
            constrained = self.fixed_dofs.len(),
            free = n_dofs - self.fixed_dofs.len(),
            "applied constraints"
        );

        Ok(())
    }

    /// Load vector with every constrained DOF set to zero.
    pub fn constrained_loads(&self) -> Vec<f64> {
        let mut f = self.load_vector.clone();
        for &dof in &self.fixed_dofs {
            f[dof] = 0.0;
        }
        f
    }

    /// Add a displacement vector onto the node coordinates.
    ///
    /// `displacements` is ordered by node then axis and must have
    /// `n_nodes * DIM` entries.
    pub fn account_displacements(&mut self, displacements: &[f64]) -> Result<()> {
        let n_dofs = self.n_dofs();
        if displacements.len() != n_dofs {
            return Err(Error::DimensionMismatch(format!(
                "displacement vector has {} entries, model has {} DOFs",
                displacements.len(),
                n_dofs
            )));
        }

        let dim = self.dim();
        for (node, u) in self
            .mesh
            .nodes_mut()
            .iter_mut()
            .zip(displacements.chunks_exact(dim))
        {
            for (axis, value) in u.iter().enumerate() {
                node[axis] += value;
            }
        }

        self.configuration = Configuration::Deformed;
        Ok(())
    }

    /// Underlying mesh.
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Current node positions.
    pub fn vertices(&self) -> &[Point3] {
        self.mesh.nodes()
    }

    /// Flattened element connectivity.
    pub fn indices(&self) -> &[usize] {
        self.mesh.indices()
    }

    /// Flattened triangle list for renderers.
    pub fn display_indices(&self) -> Vec<usize> {
        self.mesh.display_indices()
    }

    /// Element descriptor shared by every cell.
    pub fn element(&self) -> Element {
        self.mesh.element()
    }

    /// Material of the whole model.
    pub fn material(&self) -> &Material {
        &self.material
    }

    /// Constraints as supplied at construction.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Nodal loads as supplied at construction.
    pub fn loads(&self) -> &[Load] {
        &self.loads
    }

    /// Global load vector before constraint elimination.
    pub fn load_vector(&self) -> &[f64] {
        &self.load_vector
    }

    /// Spatial dimension (DOFs per node).
    pub fn dim(&self) -> usize {
        self.mesh.element().dim()
    }

    /// Number of nodes.
    pub fn n_nodes(&self) -> usize {
        self.mesh.n_nodes()
    }

    /// Total number of DOFs, `n_nodes * DIM`.
    pub fn n_dofs(&self) -> usize {
        self.n_nodes() * self.dim()
    }

    /// Sorted global indices of the constrained DOFs.
    pub fn constrained_dofs(&self) -> &[usize] {
        &self.fixed_dofs
    }

    /// Whether displacements have been applied to the nodes.
    pub fn configuration(&self) -> Configuration {
        self.configuration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::Axes;
    use crate::element::ElementType;
    use nalgebra::{DMatrix, Vector3};

    fn square() -> Vec<Point3> {
        vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(1.0, 1.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        ]
    }

    fn tri_model(constraints: Vec<Constraint>, loads: Vec<Load>) -> Result<Model> {
        Model::new(
            Element::new(ElementType::Tri3),
            square(),
            vec![0, 1, 2, 0, 2, 3],
            constraints,
            loads,
            2000.0,
            0.3,
        )
    }

    #[test]
    fn test_model_accessors() {
        let model = tri_model(
            vec![Constraint::new(0, Axes::XY), Constraint::new(3, Axes::X)],
            vec![Load::new(2, [0.0, 1.0])],
        )
        .unwrap();

        assert_eq!(model.dim(), 2);
        assert_eq!(model.n_dofs(), 8);
        assert_eq!(model.constrained_dofs(), &[0, 1, 6]);
        assert_eq!(model.load_vector()[5], 1.0);
        assert_eq!(model.configuration(), Configuration::Reference);
        assert_eq!(model.indices().len(), 6);
        assert_eq!(model.display_indices(), vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(model.material().youngs_modulus, 2000.0);
    }

    #[test]
    fn test_invalid_references() {
        assert!(matches!(
            tri_model(vec![Constraint::new(9, Axes::X)], vec![]),
            Err(Error::InvalidNodeReference { node: 9, context: "constraint", .. })
        ));
        assert!(matches!(
            tri_model(vec![], vec![Load::new(4, [1.0, 0.0])]),
            Err(Error::InvalidNodeReference { node: 4, context: "load", .. })
        ));
        assert!(matches!(
            tri_model(vec![Constraint::new(0, Axes::Z)], vec![]),
            Err(Error::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_constrained_loads_zero_fixed_dofs() {
        let model = tri_model(
            vec![Constraint::new(2, Axes::Y)],
            vec![Load::new(2, [3.0, 1.0])],
        )
        .unwrap();

        let f = model.constrained_loads();
        assert_eq!(f[4], 3.0);
        assert_eq!(f[5], 0.0);
        // The unconstrained vector is untouched
        assert_eq!(model.load_vector()[5], 1.0);
    }

    #[test]
    fn test_apply_constraints() {
        let model = tri_model(vec![Constraint::new(0, Axes::XY)], vec![]).unwrap();
        let mut k = model.build_global_stiffness().unwrap();
        model.apply_constraints(&mut k).unwrap();

        let dense = DMatrix::from(&k);
        for dof in [0, 1] {
            for other in 0..8 {
                let expected = if other == dof { 1.0 } else { 0.0 };
                assert_eq!(dense[(dof, other)], expected);
                assert_eq!(dense[(other, dof)], expected);
            }
        }
        assert!(dense[(4, 4)] > 0.0);
    }

    #[test]
    fn test_apply_constraints_without_stored_diagonal() {
        let model = tri_model(vec![Constraint::new(0, Axes::X)], vec![]).unwrap();

        // Only the off-diagonal coupling of DOF 0 is stored
        let mut triplet = crate::sparse::TripletMatrix::new(8, 8);
        triplet.add(0, 2, -1.0);
        triplet.add(2, 0, -1.0);
        for dof in 1..8 {
            triplet.add(dof, dof, 2.0);
        }
        let mut k = triplet.to_csr().unwrap();
        model.apply_constraints(&mut k).unwrap();

        let dense = DMatrix::from(&k);
        assert_eq!(dense[(0, 0)], 1.0);
        assert_eq!(dense[(0, 2)], 0.0);
        assert_eq!(dense[(2, 0)], 0.0);
        assert_eq!(dense[(2, 2)], 2.0);
    }

    #[test]
    fn test_apply_constraints_size_mismatch() {
        let model = tri_model(vec![], vec![]).unwrap();
        let mut k = CsrMatrix::identity(3);
        assert!(matches!(
            model.apply_constraints(&mut k),
            Err(Error::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_account_displacements() {
        let mut model = tri_model(vec![], vec![]).unwrap();
        let u = [0.1, 0.0, 0.0, 0.2, 0.0, 0.0, -0.5, 0.5];
        model.account_displacements(&u).unwrap();

        assert_eq!(model.configuration(), Configuration::Deformed);
        assert_eq!(model.vertices()[0], Vector3::new(0.1, 0.0, 0.0));
        assert_eq!(model.vertices()[1], Vector3::new(1.0, 0.2, 0.0));
        assert_eq!(model.vertices()[3], Vector3::new(-0.5, 1.5, 0.0));
    }

    #[test]
    fn test_account_displacements_length_mismatch() {
        let mut model = tri_model(vec![], vec![]).unwrap();
        assert!(matches!(
            model.account_displacements(&[0.0; 7]),
            Err(Error::DimensionMismatch(_))
        ));
        assert_eq!(model.configuration(), Configuration::Reference);
        assert_eq!(model.vertices()[1], Vector3::new(1.0, 0.0, 0.0));
    }
}
