/// Scale factors for the first three bond-graph shells: 1-2 and 1-3 pairs are
/// excluded, 1-4 pairs are halved.
pub const DEFAULT_DEPTH_SCALES: [f64; 3] = [0.0, 0.0, 0.5];

/// Scale applied to every pair the bounded search does not reach.
pub const DEFAULT_UNSCALED: f64 = 1.0;

/// Topological scaling of pairwise interactions.
///
/// `depth_scales[k]` is applied to atoms first reached at bond-graph distance
/// `k + 1`. The search depth is the length of `depth_scales`; everything beyond
/// it, including disconnected atoms, keeps `default_scale`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalingScheme {
    pub depth_scales: Vec<f64>,
    pub default_scale: f64,
}

impl ScalingScheme {
    pub fn new(depth_scales: Vec<f64>, default_scale: f64) -> Self {
        Self {
            depth_scales,
            default_scale,
        }
    }

    /// Number of breadth-first expansion rounds.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth_scales.len()
    }

    /// Scale for a pair at bond-graph distance `distance`, where `None` means unreachable.
    pub fn scale_at(&self, distance: Option<usize>) -> f64 {
        match distance {
            Some(0) => 0.0,
            Some(d) if d <= self.depth() => self.depth_scales[d - 1],
            _ => self.default_scale,
        }
    }
}

impl Default for ScalingScheme {
    fn default() -> Self {
        Self {
            depth_scales: DEFAULT_DEPTH_SCALES.to_vec(),
            default_scale: DEFAULT_UNSCALED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scheme_excludes_first_two_shells_and_halves_third() {
        let scheme = ScalingScheme::default();
        assert_eq!(scheme.depth(), 3);
        assert_eq!(scheme.scale_at(Some(0)), 0.0);
        assert_eq!(scheme.scale_at(Some(1)), 0.0);
        assert_eq!(scheme.scale_at(Some(2)), 0.0);
        assert_eq!(scheme.scale_at(Some(3)), 0.5);
        assert_eq!(scheme.scale_at(Some(4)), 1.0);
        assert_eq!(scheme.scale_at(None), 1.0);
    }

    #[test]
    fn custom_scheme_changes_depth() {
        let scheme = ScalingScheme::new(vec![0.0, 0.25], 0.9);
        assert_eq!(scheme.depth(), 2);
        assert_eq!(scheme.scale_at(Some(2)), 0.25);
        assert_eq!(scheme.scale_at(Some(3)), 0.9);
    }
}
