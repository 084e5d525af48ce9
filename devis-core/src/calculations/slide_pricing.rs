//! Cumulative tiered pricing of slides.
//!
//! Each slide is billed at the unit price of the tier it falls into. Lower
//! tiers are always billed in full at their own rate, so crossing a tier
//! boundary never reprices the slides already counted.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use devis_core::Tariff;
//! use devis_core::calculations::SlidePricingCalculator;
//!
//! let tariff = Tariff::default();
//! let calculator = SlidePricingCalculator::new(&tariff.slide_tiers);
//!
//! let pricing = calculator.calculate(250);
//!
//! // 100 × 11 + 100 × 10 + 50 × 8
//! assert_eq!(pricing.total_price, dec!(2500));
//! assert_eq!(pricing.tiers.len(), 3);
//! assert_eq!(pricing.tiers[2].range_label, "201 - 400");
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::SlideTier;
use crate::calculations::common::cent_scale;

/// One line of the tier breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierLine {
    /// Tier bounds, e.g. `"101 - 200"` or `"5001+"`.
    pub range_label: String,

    /// Slides billed inside this tier.
    pub units_in_tier: u64,

    pub unit_price: Decimal,

    /// `units_in_tier × unit_price`.
    pub tier_amount: Decimal,
}

/// Price of a slide count with its per-tier breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlidePricing {
    pub total_price: Decimal,

    /// Tiers reached by the slide count, in ascending order.
    pub tiers: Vec<TierLine>,
}

impl SlidePricing {
    /// The zero case: no slides, no tiers.
    pub fn empty() -> Self {
        Self {
            total_price: cent_scale(Decimal::ZERO),
            tiers: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}

/// Calculator over a validated tier schedule.
///
/// Tiers must be sorted by `min_units`, contiguous, and closed by one
/// open-ended tier (see [`crate::Tariff::validate`]).
#[derive(Debug, Clone)]
pub struct SlidePricingCalculator<'a> {
    tiers: &'a [SlideTier],
}

impl<'a> SlidePricingCalculator<'a> {
    pub fn new(tiers: &'a [SlideTier]) -> Self {
        Self { tiers }
    }

    /// Prices `slide_count` slides across the tier schedule.
    ///
    /// Tiers entirely above `slide_count` contribute nothing and are left out
    /// of the breakdown. Zero slides yields [`SlidePricing::empty`].
    pub fn calculate(
        &self,
        slide_count: u64,
    ) -> SlidePricing {
        if slide_count == 0 {
            return SlidePricing::empty();
        }

        let mut pricing = SlidePricing::empty();

        for tier in self.tiers {
            if slide_count < tier.min_units {
                break;
            }

            let units = self.units_in_tier(tier, slide_count);
            if units == 0 {
                continue;
            }

            let tier_amount = cent_scale(Decimal::from(units) * tier.unit_price);
            pricing.total_price += tier_amount;
            pricing.tiers.push(TierLine {
                range_label: tier.label(),
                units_in_tier: units,
                unit_price: cent_scale(tier.unit_price),
                tier_amount,
            });
        }

        pricing
    }

    /// Number of slides falling strictly inside `tier`.
    fn units_in_tier(
        &self,
        tier: &SlideTier,
        slide_count: u64,
    ) -> u64 {
        let upper = tier
            .max_units
            .map_or(slide_count, |max| max.min(slide_count));

        (upper + 1).saturating_sub(tier.min_units)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::Tariff;

    fn price(slide_count: u64) -> SlidePricing {
        let tariff = Tariff::default();
        SlidePricingCalculator::new(&tariff.slide_tiers).calculate(slide_count)
    }

    fn line(
        label: &str,
        units: u64,
        unit_price: Decimal,
        amount: Decimal,
    ) -> TierLine {
        TierLine {
            range_label: label.to_string(),
            units_in_tier: units,
            unit_price,
            tier_amount: amount,
        }
    }

    // =========================================================================
    // zero case
    // =========================================================================

    #[test]
    fn zero_slides_is_free_with_empty_breakdown() {
        let result = price(0);

        assert_eq!(result.total_price, dec!(0));
        assert!(result.is_empty());
    }

    // =========================================================================
    // boundary tests
    // =========================================================================

    #[test]
    fn one_slide_uses_first_tier() {
        let result = price(1);

        assert_eq!(result.tiers, vec![line("1 - 100", 1, dec!(11), dec!(11))]);
        assert_eq!(result.total_price, dec!(11));
    }

    #[test]
    fn exactly_one_hundred_stays_in_first_tier() {
        let result = price(100);

        assert_eq!(
            result.tiers,
            vec![line("1 - 100", 100, dec!(11), dec!(1100))]
        );
        assert_eq!(result.total_price, dec!(1100));
    }

    #[test]
    fn one_hundred_and_one_spills_one_unit_into_second_tier() {
        let result = price(101);

        assert_eq!(
            result.tiers,
            vec![
                line("1 - 100", 100, dec!(11), dec!(1100)),
                line("101 - 200", 1, dec!(10), dec!(10)),
            ]
        );
        assert_eq!(result.total_price, dec!(1110));
    }

    #[test]
    fn last_bounded_tier_boundary() {
        let result = price(5000);

        // 1100 + 1000 + 1600 + 2800 + 4200 + 17500
        assert_eq!(result.total_price, dec!(28200));
        assert_eq!(result.tiers.len(), 6);
    }

    #[test]
    fn open_ended_tier_is_labelled_with_plus() {
        let result = price(5001);

        let last = result.tiers.last().unwrap();
        assert_eq!(last, &line("5001+", 1, dec!(3), dec!(3)));
        assert_eq!(result.total_price, dec!(28203));
    }

    #[test]
    fn large_volume_bills_every_tier() {
        let result = price(10_000);

        // 28200 + 5000 × 3
        assert_eq!(result.total_price, dec!(43200));
        assert_eq!(result.tiers.len(), 7);
    }

    #[test]
    fn units_across_tiers_sum_to_slide_count() {
        for count in [1_u64, 99, 100, 101, 200, 201, 799, 1500, 1501, 4999, 5001, 12_345] {
            let total_units: u64 = price(count).tiers.iter().map(|t| t.units_in_tier).sum();

            assert_eq!(total_units, count, "slide count {count}");
        }
    }

    #[test]
    fn tier_amounts_sum_to_total_price() {
        let result = price(2_345);

        let sum: Decimal = result.tiers.iter().map(|t| t.tier_amount).sum();

        assert_eq!(sum, result.total_price);
    }

    // =========================================================================
    // monotonicity
    // =========================================================================

    #[test]
    fn price_never_decreases_with_volume() {
        let mut previous = Decimal::ZERO;

        for count in 0..=6_000_u64 {
            let current = price(count).total_price;
            assert!(
                current >= previous,
                "price dropped from {previous} to {current} at {count} slides"
            );
            previous = current;
        }
    }

    // =========================================================================
    // custom schedules
    // =========================================================================

    #[test]
    fn calculator_uses_the_schedule_it_is_given() {
        let tiers = vec![
            SlideTier::new(1, Some(10), dec!(2.5)),
            SlideTier::new(11, None, dec!(1)),
        ];
        let calculator = SlidePricingCalculator::new(&tiers);

        let result = calculator.calculate(12);

        assert_eq!(result.total_price, dec!(27));
        assert_eq!(result.tiers[1].range_label, "11+");
    }
}
