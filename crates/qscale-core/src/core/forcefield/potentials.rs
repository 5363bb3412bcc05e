/// Coulomb constant in kcal·Å/(mol·e²).
pub const COULOMB_CONSTANT: f64 = 332.0637;

/// Unscaled Coulomb pair energy `k · q1 · q2 / dist`.
///
/// There is no short-range guard: coincident atoms yield a non-finite value.
#[inline]
pub fn coulomb(dist: f64, q1: f64, q2: f64, constant: f64) -> f64 {
    constant * q1 * q2 / dist
}

/// Coulomb pair energy multiplied by a topological scale factor.
#[inline]
pub fn scaled_coulomb(dist: f64, q1: f64, q2: f64, scale: f64, constant: f64) -> f64 {
    scale * coulomb(dist, q1, q2, constant)
}
