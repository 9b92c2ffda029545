//! vfem core - linear-elasticity finite element engine
//!
//! Assembles and solves small-strain linear elastic problems in 2D (plane
//! stress) and 3D:
//! - Isoparametric element library (Tri3, Tri6, Quad4, Quad8, Tet4) with
//!   Gauss quadrature, plus planar elements lifted into 3D
//! - Sparse global assembly through triplet accumulation into CSR
//! - Constraint elimination and sparse Cholesky solve via faer
//! - In-place displacement of the mesh after solving
//!
//! # Architecture
//!
//! - [`Element`]: stateless reference-element descriptor dispatching on
//!   [`ElementType`]
//! - [`Mesh`]: node coordinates and flattened connectivity
//! - [`Material`]: constitutive matrices
//! - [`Model`]: mesh, material, constraints and loads, with the
//!   build / constrain / account-displacements lifecycle
//! - [`Solver`]: drives a model through a [`LinearSolver`] backend
//!
//! # Example
//!
//! ```
//! use vfem_core::{factory, Solver, SolverConfig};
//!
//! let mut model = factory::cantilever_tri3().unwrap();
//! let solution = Solver::new(SolverConfig::default()).solve(&mut model).unwrap();
//!
//! // Node 2 carries the upward load
//! assert!(solution.displacements[5] > 0.0);
//! ```

pub mod assembly;
pub mod boundary;
pub mod element;
pub mod error;
pub mod factory;
pub mod material;
pub mod mesh;
pub mod model;
pub mod solver;
pub mod sparse;
pub mod types;

pub use boundary::{Axes, Constraint, Load};
pub use element::{Element, ElementType, GaussPoint};
pub use error::{Error, Result};
pub use material::Material;
pub use mesh::Mesh;
pub use model::{Configuration, Model};
pub use solver::{
    DenseLuSolver, FaerCholeskySolver, LinearSolver, Solution, SolveStats, Solver, SolverConfig,
    SolverType,
};
pub use sparse::CsrMatrix;
pub use types::{NaturalCoords, Point3};
