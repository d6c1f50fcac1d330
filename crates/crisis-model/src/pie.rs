//! Pie slice angles for the factor breakdown.

use crisis_core::{Factor, FactorWeights};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use std::f64::consts::{PI, TAU};

/// Drawing order of the slices. The legend colors are assigned in this
/// order, so it must not follow declaration or alphabetical order.
pub const PIE_ORDER: [Factor; 4] = [
    Factor::Economic,
    Factor::Political,
    Factor::Gdp,
    Factor::Disaster,
];

/// Fill color of a factor's slice and legend swatch.
pub fn factor_color(factor: Factor) -> &'static str {
    match factor {
        Factor::Economic => "#1e40af",
        Factor::Political => "#dc2626",
        Factor::Gdp => "#059669",
        Factor::Disaster => "#f59e0b",
    }
}

/// One slice, with angles in radians measured from the positive x axis.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PieSlice {
    pub factor: Factor,
    pub start_angle: f64,
    pub end_angle: f64,
    pub color: &'static str,
}

impl PieSlice {
    pub fn span(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// SVG large-arc flag: set only when the slice spans more than half the circle.
    pub fn is_large_arc(&self) -> bool {
        self.span() > PI
    }
}

/// Slices in [`PIE_ORDER`]. Zero-weight factors produce no slice.
///
/// Each boundary is derived from the exact running total of the weights
/// processed so far, so the last slice ends at exactly 2π.
pub fn build_pie_slices(weights: &FactorWeights) -> Vec<PieSlice> {
    let positive = |f: &Factor| weights.get(*f).max(Decimal::ZERO);
    let total: Decimal = PIE_ORDER.iter().map(positive).sum();
    if total <= Decimal::ZERO {
        return Vec::new();
    }

    let mut slices = Vec::with_capacity(PIE_ORDER.len());
    let mut running = Decimal::ZERO;
    let mut start = 0.0;
    for factor in PIE_ORDER {
        let weight = positive(&factor);
        if weight.is_zero() {
            continue;
        }
        running += weight;
        let end = if running == total {
            TAU
        } else {
            TAU * (running / total).to_f64().unwrap_or(0.0)
        };
        slices.push(PieSlice {
            factor,
            start_angle: start,
            end_angle: end,
            color: factor_color(factor),
        });
        start = end;
    }
    slices
}
