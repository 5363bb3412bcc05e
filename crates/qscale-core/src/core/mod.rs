//! # Core Module
//!
//! Stateless building blocks of the energy engine.
//!
//! - **Molecular Representation** ([`models`]) - atoms, the bond graph and the molecule
//! - **Electrostatics** ([`forcefield`]) - the Coulomb term, scaling scheme and scale matrix
//! - **File I/O** ([`io`]) - loaders for positions, charges and bonds

pub mod forcefield;
pub mod io;
pub mod models;
