//! User-adjustable factor mix.

use crate::ModelError;
use crisis_core::{Factor, FactorWeights};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::str::FromStr;
use tracing::debug;

/// Factor weights edited through the factor sliders. Always sums to 100
/// after [`FactorMix::set`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FactorMix {
    weights: FactorWeights,
}

impl Default for FactorMix {
    /// The factor sliders' reset position.
    fn default() -> Self {
        Self {
            weights: FactorWeights::new(
                Decimal::new(65, 0),
                Decimal::new(20, 0),
                Decimal::new(5, 0),
                Decimal::new(10, 0),
            ),
        }
    }
}

impl FactorMix {
    pub fn new(weights: FactorWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &FactorWeights {
        &self.weights
    }

    pub fn get(&self, factor: Factor) -> Decimal {
        self.weights.get(factor)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Set one factor and redistribute the difference across the others.
    ///
    /// `percentage` is clamped to [0, 100]. The other factors, in declaration
    /// order, each receive an equal share of the deficit truncated to two
    /// decimals; the last one of a round takes what the truncation left over.
    /// A factor that hits 0 or 100 is clamped and drops out, and the amount it
    /// could not absorb is shared again among the rest. Returns the value
    /// actually assigned to `factor`.
    pub fn set(&mut self, factor: Factor, percentage: Decimal) -> Decimal {
        let value = percentage.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
        self.weights.set(factor, value);

        let mut adjustable: Vec<Factor> = Factor::ALL.into_iter().filter(|f| *f != factor).collect();
        let others: Decimal = adjustable.iter().map(|f| self.weights.get(*f)).sum();
        let mut deficit = Decimal::ONE_HUNDRED - value - others;
        let mut rounds = 0;

        while !deficit.is_zero() && !adjustable.is_empty() {
            rounds += 1;
            let n = adjustable.len();
            let share = (deficit / Decimal::from(n)).round_dp_with_strategy(2, RoundingStrategy::ToZero);
            let last_share = deficit - share * Decimal::from(n - 1);

            let mut applied_total = Decimal::ZERO;
            let mut still_adjustable = Vec::with_capacity(n);
            for (i, f) in adjustable.iter().enumerate() {
                let wanted = if i + 1 == n { last_share } else { share };
                let current = self.weights.get(*f);
                let next = (current + wanted).clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
                let applied = next - current;
                self.weights.set(*f, next);
                applied_total += applied;
                if applied == wanted {
                    still_adjustable.push(*f);
                }
            }
            deficit -= applied_total;
            adjustable = still_adjustable;
        }

        debug!(%factor, %value, rounds, "factor mix renormalized");
        value
    }
}

/// Parse a `name=percentage` setting such as `economic=85`.
pub fn parse_factor_setting(s: &str) -> Result<(Factor, Decimal), ModelError> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| ModelError::InvalidFactorSetting(s.to_string()))?;
    let factor = Factor::from_str(name)?;
    let value = Decimal::from_str(value.trim())
        .map_err(|_| ModelError::InvalidFactorSetting(s.to_string()))?;
    Ok((factor, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn d(units: i64, scale: u32) -> Decimal {
        Decimal::new(units, scale)
    }

    #[test]
    fn raising_economic_clamps_then_redistributes() {
        let mut mix = FactorMix::default();
        let applied = mix.set(Factor::Economic, d(85, 0));
        assert_eq!(applied, d(85, 0));
        assert_eq!(mix.get(Factor::Economic), d(85, 0));
        assert_eq!(mix.get(Factor::Political), d(1251, 2));
        assert_eq!(mix.get(Factor::Disaster), Decimal::ZERO);
        assert_eq!(mix.get(Factor::Gdp), d(249, 2));
        assert_eq!(mix.weights().total(), Decimal::ONE_HUNDRED);
    }

    #[test]
    fn lowering_spreads_surplus_evenly() {
        let mut mix = FactorMix::default();
        mix.set(Factor::Economic, d(35, 0));
        assert_eq!(mix.get(Factor::Political), d(30, 0));
        assert_eq!(mix.get(Factor::Disaster), d(15, 0));
        assert_eq!(mix.get(Factor::Gdp), d(20, 0));
    }

    #[test]
    fn out_of_range_input_is_clamped() {
        let mut mix = FactorMix::default();
        assert_eq!(mix.set(Factor::Gdp, d(150, 0)), Decimal::ONE_HUNDRED);
        assert_eq!(mix.get(Factor::Gdp), Decimal::ONE_HUNDRED);
        for f in [Factor::Economic, Factor::Political, Factor::Disaster] {
            assert_eq!(mix.get(f), Decimal::ZERO);
        }
        assert_eq!(mix.set(Factor::Gdp, d(-5, 0)), Decimal::ZERO);
        assert_eq!(mix.weights().total(), Decimal::ONE_HUNDRED);
    }

    #[test]
    fn unchanged_value_is_a_no_op() {
        let mut mix = FactorMix::default();
        mix.set(Factor::Political, d(20, 0));
        assert_eq!(mix, FactorMix::default());
    }

    #[test]
    fn reset_restores_defaults() {
        let mut mix = FactorMix::default();
        mix.set(Factor::Disaster, d(90, 0));
        mix.reset();
        assert_eq!(mix, FactorMix::default());
    }

    #[test]
    fn parses_settings() {
        assert_eq!(
            parse_factor_setting("economic=85"),
            Ok((Factor::Economic, d(85, 0)))
        );
        assert_eq!(
            parse_factor_setting("gdp= 12.5"),
            Ok((Factor::Gdp, d(125, 1)))
        );
        assert!(parse_factor_setting("economic").is_err());
        assert!(parse_factor_setting("economic=lots").is_err());
        assert!(matches!(
            parse_factor_setting("weather=10"),
            Err(ModelError::UnknownName(_))
        ));
    }

    fn factor_strategy() -> impl Strategy<Value = Factor> {
        prop::sample::select(Factor::ALL.to_vec())
    }

    /// Four non-negative parts summing to `total`, built directly so no case
    /// is rejected.
    fn split_of(total: i64) -> impl Strategy<Value = [i64; 4]> {
        (0..=total)
            .prop_flat_map(move |a| (Just(a), 0..=total - a))
            .prop_flat_map(move |(a, b)| (Just(a), Just(b), 0..=total - a - b))
            .prop_map(move |(a, b, c)| [a, b, c, total - a - b - c])
    }

    proptest! {
        #[test]
        fn always_sums_to_hundred([a, b, c, g] in split_of(100),
                                  factor in factor_strategy(),
                                  cents in -2_000i64..12_000) {
            let mut mix = FactorMix::new(FactorWeights::new(d(a, 0), d(b, 0), d(c, 0), d(g, 0)));
            let applied = mix.set(factor, d(cents, 2));
            prop_assert_eq!(mix.get(factor), applied);
            prop_assert_eq!(mix.weights().total(), Decimal::ONE_HUNDRED);
            for (_, w) in mix.weights().iter() {
                prop_assert!(w >= Decimal::ZERO && w <= Decimal::ONE_HUNDRED);
            }
        }

        #[test]
        fn repeated_edits_stay_at_rest(edits in proptest::collection::vec((factor_strategy(), 0i64..=100), 1..12)) {
            let mut mix = FactorMix::default();
            for (factor, value) in edits {
                mix.set(factor, d(value, 0));
                prop_assert_eq!(mix.weights().total(), Decimal::ONE_HUNDRED);
            }
        }
    }
}
