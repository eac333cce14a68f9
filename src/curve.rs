//! Gradation curve projection.
//!
//! The chart is a pure function of the current `ParameterSet`. Callers recompute
//! it on every draw instead of keeping a derived copy around.

use crate::domain::{Field, ParameterSet, SIEVES};

/// Number of sieves on the gradation curve.
pub const SIEVE_COUNT: usize = Field::GRADATION.len();

/// One point of the gradation curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    pub field: Field,
    /// Sieve label, e.g. `"0.6mm"`.
    pub label: &'static str,
    pub size_mm: f64,
    pub percent_passing: f64,
}

/// The ten-point gradation curve, coarsest sieve first.
#[derive(Debug, Clone, PartialEq)]
pub struct GradationCurve {
    pub points: [CurvePoint; SIEVE_COUNT],
}

impl GradationCurve {
    pub fn iter(&self) -> impl Iterator<Item = &CurvePoint> {
        self.points.iter()
    }

    /// `(label, percent passing)` pairs in chart order.
    pub fn labeled(&self) -> Vec<(&'static str, f64)> {
        self.points.iter().map(|p| (p.label, p.percent_passing)).collect()
    }

    /// Pairs of adjacent sieves where the finer one passes more than the coarser one.
    ///
    /// A physical gradation is non-increasing coarse to fine. The client does not
    /// reject such input; this is only used to annotate the display.
    pub fn non_monotone_pairs(&self) -> Vec<(Field, Field)> {
        self.points
            .windows(2)
            .filter(|w| w[1].percent_passing > w[0].percent_passing)
            .map(|w| (w[0].field, w[1].field))
            .collect()
    }
}

/// Project the gradation fields of `params` onto the fixed sieve order.
pub fn project_curve(params: &ParameterSet) -> GradationCurve {
    let points = std::array::from_fn(|i| {
        let (field, sieve) = (Field::GRADATION[i], SIEVES[i]);
        CurvePoint {
            field,
            label: sieve.label,
            size_mm: sieve.size_mm,
            percent_passing: params.get(field),
        }
    });
    GradationCurve { points }
}
