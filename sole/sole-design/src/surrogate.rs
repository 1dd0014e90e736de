//! Inverse-distance-weighted nearest-neighbour regression.
//!
//! Maps a `(comfort score, body weight)` query to the design parameters of
//! nearby simulated samples. Features are min-max normalised over the
//! training set so score and weight contribute on the same scale.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use sole_contact::DesignParams;

use crate::error::{DesignError, DesignResult};

/// Distance below which a query is treated as an exact hit.
const EXACT_MATCH_DISTANCE: f64 = 1e-12;

/// One simulated design and its outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SurrogateSample {
    /// Comfort score the design achieved.
    pub score: f64,
    /// Body weight it was loaded with (kg).
    pub weight_kg: f64,
    /// The sampled design.
    pub design: DesignParams,
}

/// Raw regression output, before clipping to the sampling ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DesignEstimate {
    /// Heel stack height (mm).
    pub heel_mm: f64,
    /// Forefoot stack height (mm).
    pub fore_mm: f64,
    /// Arch stiffness multiplier.
    pub arch_factor: f64,
    /// Foundation modulus.
    pub modulus: f64,
}

impl DesignEstimate {
    fn of(design: &DesignParams) -> [f64; 4] {
        [
            design.heel_mm,
            design.fore_mm,
            design.arch_factor,
            design.modulus,
        ]
    }

    const fn from_array(v: [f64; 4]) -> Self {
        Self {
            heel_mm: v[0],
            fore_mm: v[1],
            arch_factor: v[2],
            modulus: v[3],
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Axis {
    min: f64,
    span: f64,
}

impl Axis {
    fn fit(values: impl Iterator<Item = f64> + Clone) -> Self {
        let min = values.clone().fold(f64::INFINITY, f64::min);
        let max = values.fold(f64::NEG_INFINITY, f64::max);
        let span = max - min;
        Self {
            min,
            span: if span > 0.0 { span } else { 1.0 },
        }
    }

    fn normalise(self, v: f64) -> f64 {
        (v - self.min) / self.span
    }
}

/// Fitted k-nearest-neighbour surrogate.
///
/// # Example
///
/// ```
/// use sole_contact::DesignParams;
/// use sole_design::{SurrogateModel, SurrogateSample};
///
/// let samples = [
///     SurrogateSample { score: 40.0, weight_kg: 60.0, design: DesignParams::default().with_stack(10.0, 10.0) },
///     SurrogateSample { score: 80.0, weight_kg: 60.0, design: DesignParams::default().with_stack(40.0, 30.0) },
/// ];
/// let model = SurrogateModel::fit(&samples, 1).unwrap();
/// let estimate = model.predict(75.0, 60.0);
/// assert!((estimate.heel_mm - 40.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct SurrogateModel {
    features: Vec<[f64; 2]>,
    targets: Vec<[f64; 4]>,
    score_axis: Axis,
    weight_axis: Axis,
    neighbours: usize,
}

impl SurrogateModel {
    /// Fit the model to `samples`, using `neighbours` nearest points per query.
    ///
    /// # Errors
    ///
    /// Returns [`DesignError::InvalidConfig`] if there are no samples or
    /// `neighbours` is zero.
    pub fn fit(samples: &[SurrogateSample], neighbours: usize) -> DesignResult<Self> {
        if samples.is_empty() {
            return Err(DesignError::invalid_config(
                "surrogate needs at least one sample",
            ));
        }
        if neighbours == 0 {
            return Err(DesignError::invalid_config(
                "surrogate needs at least one neighbour",
            ));
        }

        let score_axis = Axis::fit(samples.iter().map(|s| s.score));
        let weight_axis = Axis::fit(samples.iter().map(|s| s.weight_kg));

        Ok(Self {
            features: samples
                .iter()
                .map(|s| [score_axis.normalise(s.score), weight_axis.normalise(s.weight_kg)])
                .collect(),
            targets: samples.iter().map(|s| DesignEstimate::of(&s.design)).collect(),
            score_axis,
            weight_axis,
            neighbours: neighbours.min(samples.len()),
        })
    }

    /// Number of training samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the model has no training samples. Always false once fitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Estimate the design that yields `score` at `weight_kg`.
    #[must_use]
    pub fn predict(&self, score: f64, weight_kg: f64) -> DesignEstimate {
        let query = [
            self.score_axis.normalise(score),
            self.weight_axis.normalise(weight_kg),
        ];

        let mut ranked: Vec<(f64, usize)> = self
            .features
            .iter()
            .enumerate()
            .map(|(i, f)| ((f[0] - query[0]).hypot(f[1] - query[1]), i))
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
        ranked.truncate(self.neighbours);

        let exact: Vec<usize> = ranked
            .iter()
            .filter(|(d, _)| *d < EXACT_MATCH_DISTANCE)
            .map(|&(_, i)| i)
            .collect();

        let weighted: Vec<(f64, usize)> = if exact.is_empty() {
            ranked.iter().map(|&(d, i)| (1.0 / d, i)).collect()
        } else {
            exact.into_iter().map(|i| (1.0, i)).collect()
        };

        let total: f64 = weighted.iter().map(|(w, _)| w).sum();
        let mut estimate = [0.0; 4];
        for (w, i) in weighted {
            for (acc, t) in estimate.iter_mut().zip(self.targets[i]) {
                *acc += w / total * t;
            }
        }
        DesignEstimate::from_array(estimate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample(score: f64, weight_kg: f64, heel: f64) -> SurrogateSample {
        SurrogateSample {
            score,
            weight_kg,
            design: DesignParams::default()
                .with_stack(heel, heel / 2.0)
                .with_arch_factor(heel / 10.0)
                .with_modulus(heel * 2.0),
        }
    }

    #[test]
    fn test_fit_rejects_empty() {
        assert!(SurrogateModel::fit(&[], 5).is_err());
        assert!(SurrogateModel::fit(&[sample(50.0, 70.0, 20.0)], 0).is_err());
    }

    #[test]
    fn test_exact_hit_returns_sample() {
        let samples = [
            sample(30.0, 60.0, 10.0),
            sample(60.0, 80.0, 20.0),
            sample(90.0, 100.0, 40.0),
        ];
        let model = SurrogateModel::fit(&samples, 3).unwrap();
        let estimate = model.predict(60.0, 80.0);
        assert_relative_eq!(estimate.heel_mm, 20.0);
        assert_relative_eq!(estimate.fore_mm, 10.0);
        assert_relative_eq!(estimate.arch_factor, 2.0);
        assert_relative_eq!(estimate.modulus, 40.0);
    }

    #[test]
    fn test_midpoint_averages_neighbours() {
        let samples = [sample(0.0, 70.0, 10.0), sample(100.0, 70.0, 30.0)];
        let model = SurrogateModel::fit(&samples, 2).unwrap();
        let estimate = model.predict(50.0, 70.0);
        assert_relative_eq!(estimate.heel_mm, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_closer_neighbour_dominates() {
        let samples = [sample(0.0, 70.0, 10.0), sample(100.0, 70.0, 30.0)];
        let model = SurrogateModel::fit(&samples, 2).unwrap();
        let estimate = model.predict(25.0, 70.0);
        // Weights 1/0.25 and 1/0.75.
        assert_relative_eq!(estimate.heel_mm, 0.75 * 10.0 + 0.25 * 30.0, epsilon = 1e-9);
    }

    #[test]
    fn test_neighbours_capped_at_sample_count() {
        let samples = [sample(10.0, 50.0, 12.0)];
        let model = SurrogateModel::fit(&samples, 5).unwrap();
        assert_eq!(model.len(), 1);
        assert_relative_eq!(model.predict(95.0, 110.0).heel_mm, 12.0);
    }
}
