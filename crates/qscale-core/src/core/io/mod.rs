//! Provides input functionality for the plain-text molecule description.
//!
//! A molecule is read from three files: atom positions, partial charges and
//! bond connectivity. The loaders are the trust boundary for the energy engine;
//! they reject malformed records and out-of-range bond indices so that the
//! scale-matrix builder never has to.

pub mod text;
pub mod traits;
