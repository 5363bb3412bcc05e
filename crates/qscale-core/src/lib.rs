//! # qscale Core Library
//!
//! Computes the total electrostatic energy of a finite molecule as a sum of
//! Coulomb terms over all atom pairs, each scaled by how far apart the two
//! atoms are in the bond graph.
//!
//! The sum is computed twice: once on data-parallel compute devices and once by
//! a sequential reference loop, so the two results can be compared directly.
//!
//! ## Architectural Philosophy
//!
//! - **[`core`]: The Foundation.** Stateless data models (`BondGraph`, `Molecule`),
//!   the Coulomb potential, the scale-matrix builder and text loaders.
//!
//! - **[`engine`]: The Logic Core.** Compute devices, the `bfs` and `coulomb`
//!   kernels, buffer dispatch and the sequential reference accumulator.
//!
//! - **[`workflows`]: The Public API.** [`workflows::evaluate::run`] evaluates a
//!   molecule on every device plus the reference path and returns an
//!   [`engine::state::EnergyReport`].

pub mod core;
pub mod engine;
pub mod workflows;
