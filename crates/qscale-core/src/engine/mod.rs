//! # Engine Module
//!
//! Runs the bond-scaled Coulomb energy computation, both on compute devices and
//! on the sequential reference path.
//!
//! ## Overview
//!
//! A device computation has two stages. The `bfs` stage writes one scale-matrix
//! row per atom; the `coulomb` stage splits the pair space into square tiles,
//! reduces each tile to a partial energy, and the host sums the partials. The
//! reference path builds the same scale matrix on the host and sums the pairs
//! in a plain double loop.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - scaling scheme, Coulomb constant, tile size and failure policy
//! - **Devices** ([`device`]) - the [`device::ComputeDevice`] trait, kernel argument contract and the rayon-backed CPU device
//! - **Kernels** ([`kernels`]) - per-work-item bodies of `bfs` and `coulomb`
//! - **Dispatch** ([`dispatch`]) - buffer preparation and the two-stage launch sequence
//! - **Reference Path** ([`reference`]) - the sequential accumulator
//! - **State Tracking** ([`state`]) - per-device outcomes and the final report
//! - **Progress Monitoring** ([`progress`]) - callback-based progress events
//! - **Error Handling** ([`error`]) - engine-level error types

pub mod config;
pub mod device;
pub mod dispatch;
pub mod error;
pub mod kernels;
pub mod progress;
pub mod reference;
pub mod state;
