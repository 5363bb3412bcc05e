//! # Core Models Module
//!
//! Plain data structures describing the molecule the energy engine works on.
//!
//! - [`atom`] - a charged point particle
//! - [`graph`] - the undirected bond graph in fixed-stride table form
//! - [`molecule`] - positions, charges and bonds bundled together
//!
//! ```ignore
//! use qscale::core::models::{graph::BondGraph, molecule::Molecule};
//!
//! let bonds = BondGraph::from_bonds(3, &[(0, 1), (1, 2)])?;
//! let molecule = Molecule::new(positions, charges, bonds)?;
//! ```

pub mod atom;
pub mod graph;
pub mod molecule;
