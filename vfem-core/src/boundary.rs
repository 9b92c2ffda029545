//! Essential boundary conditions and nodal loads.

use crate::error::{Error, Result};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Set of displacement axes, stored as a bitmask over {X, Y, Z}.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Axes(u8);

impl Axes {
    /// No axis.
    pub const NONE: Axes = Axes(0);
    /// X displacement.
    pub const X: Axes = Axes(1 << 0);
    /// Y displacement.
    pub const Y: Axes = Axes(1 << 1);
    /// Z displacement.
    pub const Z: Axes = Axes(1 << 2);
    /// In-plane displacements.
    pub const XY: Axes = Axes(Self::X.0 | Self::Y.0);
    /// Every displacement component.
    pub const XYZ: Axes = Axes(Self::X.0 | Self::Y.0 | Self::Z.0);

    /// Single axis by index (0 = X, 1 = Y, 2 = Z).
    pub fn axis(index: usize) -> Result<Axes> {
        match index {
            0..=2 => Ok(Axes(1 << index)),
            _ => Err(Error::DimensionMismatch(format!(
                "axis index {} outside 0..3",
                index
            ))),
        }
    }

    /// Whether every axis of `other` is in this set.
    pub fn contains(self, other: Axes) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether the set is empty.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Axis indices in ascending order.
    pub fn indices(self) -> impl Iterator<Item = usize> {
        (0..3).filter(move |&i| self.0 & (1u8 << i) != 0)
    }
}

impl BitOr for Axes {
    type Output = Axes;

    fn bitor(self, rhs: Axes) -> Axes {
        Axes(self.0 | rhs.0)
    }
}

impl BitOrAssign for Axes {
    fn bitor_assign(&mut self, rhs: Axes) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for Axes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [char; 3] = ['X', 'Y', 'Z'];
        let names: String = self.indices().map(|i| NAMES[i]).collect();
        if names.is_empty() {
            write!(f, "Axes(NONE)")
        } else {
            write!(f, "Axes({})", names)
        }
    }
}

/// Fixes the flagged displacement components of one node to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constraint {
    /// Node index.
    pub node: usize,
    /// Constrained axes.
    pub axes: Axes,
}

impl Constraint {
    pub fn new(node: usize, axes: Axes) -> Self {
        Self { node, axes }
    }

    /// Global DOF indices fixed by this constraint in a `dim`-dimensional
    /// model (`dim * node + axis`).
    ///
    /// # Errors
    ///
    /// Returns an error if an axis does not exist in `dim` dimensions.
    pub fn dofs(&self, dim: usize) -> Result<Vec<usize>> {
        self.axes
            .indices()
            .map(|axis| {
                if axis < dim {
                    Ok(dim * self.node + axis)
                } else {
                    Err(Error::DimensionMismatch(format!(
                        "constraint on node {} fixes axis {} in a {}D model",
                        self.node, axis, dim
                    )))
                }
            })
            .collect()
    }
}

/// Concentrated force applied at a node.
#[derive(Debug, Clone, PartialEq)]
pub struct Load {
    /// Node index.
    pub node: usize,
    /// Force components, one per spatial dimension.
    pub forces: Vec<f64>,
}

impl Load {
    pub fn new(node: usize, forces: impl Into<Vec<f64>>) -> Self {
        Self {
            node,
            forces: forces.into(),
        }
    }
}

/// Assemble the global load vector.
///
/// Loads on the same node accumulate.
///
/// # Errors
///
/// Returns an error if a load references a missing node or its force vector
/// length differs from `dim`.
pub fn assemble_loads(loads: &[Load], n_nodes: usize, dim: usize) -> Result<Vec<f64>> {
    let mut f = vec![0.0; n_nodes * dim];
    for load in loads {
        if load.node >= n_nodes {
            return Err(Error::InvalidNodeReference {
                node: load.node,
                n_nodes,
                context: "load",
            });
        }
        if load.forces.len() != dim {
            return Err(Error::DimensionMismatch(format!(
                "load on node {} has {} components, expected {}",
                load.node,
                load.forces.len(),
                dim
            )));
        }
        for (axis, value) in load.forces.iter().enumerate() {
            f[dim * load.node + axis] += value;
        }
    }
    Ok(f)
}
