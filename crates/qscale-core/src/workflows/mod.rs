//! # Workflows Module
//!
//! Top-level entry points that tie [`crate::core`] and [`crate::engine`]
//! together.
//!
//! - **Energy Evaluation** ([`evaluate`]) - runs every enumerated device and the
//!   reference path over one molecule and collects the results into an
//!   [`EnergyReport`](crate::engine::state::EnergyReport).

pub mod evaluate;
