//! # Force Field Module
//!
//! Electrostatics with topological scaling. Pairs of atoms that are close in the
//! bond graph are excluded or down-weighted instead of interacting with the full
//! Coulomb term.
//!
//! - [`potentials`] - the Coulomb pair term and its constant
//! - [`params`] - the [`params::ScalingScheme`] (per-shell scales and the default)
//! - [`scale_matrix`] - bounded breadth-first search producing the dense
//!   [`scale_matrix::ScaleMatrix`]
//!
//! ```ignore
//! use qscale::core::forcefield::{params::ScalingScheme, scale_matrix::ScaleMatrix};
//!
//! let scale = ScaleMatrix::build(molecule.bonds(), &ScalingScheme::default());
//! assert_eq!(scale.get(0, 0), 0.0);
//! ```

pub mod params;
pub mod potentials;
pub mod scale_matrix;
