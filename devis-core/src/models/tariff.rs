//! Price list used by the quote engine.
//!
//! [`Tariff::default`] is the published price list. Every rate is a fraction
//! (`0.10` means +10%) applied multiplicatively by the engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{DeliveryFormat, SlideTier, Urgency};

/// Errors raised when a tariff is internally inconsistent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TariffError {
    #[error("slide tier schedule is empty")]
    EmptyTierSchedule,

    #[error("first slide tier must start at 1, got {0}")]
    FirstTierNotAtOne(u64),

    #[error("slide tier starting at {found} should start at {expected}")]
    TierGap { expected: u64, found: u64 },

    #[error("slide tier {min}..{max} has an upper bound below its lower bound")]
    InvertedTier { min: u64, max: u64 },

    #[error("open-ended slide tier starting at {0} must be the last tier")]
    OpenTierNotLast(u64),

    #[error("last slide tier starting at {0} must be open-ended")]
    LastTierBounded(u64),

    #[error("{what} must be non-negative, got {value}")]
    NegativeAmount { what: &'static str, value: Decimal },

    #[error("{what} must be between 0 and 1, got {value}")]
    RateOutOfRange { what: &'static str, value: Decimal },

    #[error("slides per hour must be positive")]
    ZeroSlidesPerHour,

    #[error("installment presets must be positive month counts")]
    ZeroInstallmentPreset,
}

/// Unit prices, surcharges and rates applied by the quote engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tariff {
    /// Price of one program module.
    pub module_price: Decimal,

    /// Price of one evaluation.
    pub evaluation_price: Decimal,

    /// Slides produced per hour of course content.
    pub slides_per_hour: u32,

    /// Cumulative slide price schedule, ascending and contiguous.
    pub slide_tiers: Vec<SlideTier>,

    /// Surcharge when deliverables are handed over in both formats.
    pub both_formats_rate: Decimal,

    pub express_rate: Decimal,
    pub urgent_rate: Decimal,

    /// Surcharge for the yearly content revision.
    pub annual_update_rate: Decimal,

    /// VAT rate.
    pub tax_rate: Decimal,

    /// Discount on the pre-tax amount when paid upfront in one go.
    pub upfront_discount_rate: Decimal,

    /// Month counts printed in the document's installment schedule.
    pub installment_presets: Vec<u32>,
}

impl Default for Tariff {
    fn default() -> Self {
        Self {
            module_price: Decimal::new(500, 0),
            evaluation_price: Decimal::new(80, 0),
            slides_per_hour: 5,
            slide_tiers: vec![
                SlideTier::new(1, Some(100), Decimal::new(11, 0)),
                SlideTier::new(101, Some(200), Decimal::new(10, 0)),
                SlideTier::new(201, Some(400), Decimal::new(8, 0)),
                SlideTier::new(401, Some(800), Decimal::new(7, 0)),
                SlideTier::new(801, Some(1500), Decimal::new(6, 0)),
                SlideTier::new(1501, Some(5000), Decimal::new(5, 0)),
                SlideTier::new(5001, None, Decimal::new(3, 0)),
            ],
            both_formats_rate: Decimal::new(10, 2),
            express_rate: Decimal::new(25, 2),
            urgent_rate: Decimal::new(50, 2),
            annual_update_rate: Decimal::new(20, 2),
            tax_rate: Decimal::new(20, 2),
            upfront_discount_rate: Decimal::new(15, 2),
            installment_presets: vec![4, 6, 10],
        }
    }
}

impl Tariff {
    /// Surcharge rate for a delivery format.
    pub fn format_rate(
        &self,
        format: DeliveryFormat,
    ) -> Decimal {
        match format {
            DeliveryFormat::Ppt | DeliveryFormat::Pdf => Decimal::ZERO,
            DeliveryFormat::Both => self.both_formats_rate,
        }
    }

    /// Surcharge rate for a delivery lead time.
    pub fn urgency_rate(
        &self,
        urgency: Urgency,
    ) -> Decimal {
        match urgency {
            Urgency::Standard => Decimal::ZERO,
            Urgency::Express => self.express_rate,
            Urgency::Urgent => self.urgent_rate,
        }
    }

    /// Surcharge rate for the annual update option.
    pub fn annual_update_rate(
        &self,
        annual_update: bool,
    ) -> Decimal {
        if annual_update {
            self.annual_update_rate
        } else {
            Decimal::ZERO
        }
    }

    /// Validates the tariff.
    ///
    /// # Errors
    ///
    /// Returns [`TariffError`] if:
    /// - a unit price or surcharge is negative
    /// - `tax_rate` or `upfront_discount_rate` is not in [0, 1]
    /// - `slides_per_hour` is zero or an installment preset is zero
    /// - the slide tiers are empty, do not start at 1, overlap, leave a gap,
    ///   or are not closed by exactly one open-ended tier
    ///
    /// # Example
    ///
    /// ```
    /// use devis_core::{Tariff, TariffError};
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(Tariff::default().validate(), Ok(()));
    ///
    /// let tariff = Tariff {
    ///     tax_rate: Decimal::new(12, 1),
    ///     ..Tariff::default()
    /// };
    /// assert_eq!(
    ///     tariff.validate(),
    ///     Err(TariffError::RateOutOfRange { what: "tax rate", value: Decimal::new(12, 1) })
    /// );
    /// ```
    pub fn validate(&self) -> Result<(), TariffError> {
        non_negative("module price", self.module_price)?;
        non_negative("evaluation price", self.evaluation_price)?;
        non_negative("both formats surcharge", self.both_formats_rate)?;
        non_negative("express surcharge", self.express_rate)?;
        non_negative("urgent surcharge", self.urgent_rate)?;
        non_negative("annual update surcharge", self.annual_update_rate)?;
        unit_interval("tax rate", self.tax_rate)?;
        unit_interval("upfront discount rate", self.upfront_discount_rate)?;

        if self.slides_per_hour == 0 {
            return Err(TariffError::ZeroSlidesPerHour);
        }
        if self.installment_presets.contains(&0) {
            return Err(TariffError::ZeroInstallmentPreset);
        }

        self.validate_tiers()
    }

    fn validate_tiers(&self) -> Result<(), TariffError> {
        let (first, last) = match (self.slide_tiers.first(), self.slide_tiers.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(TariffError::EmptyTierSchedule),
        };

        if first.min_units != 1 {
            return Err(TariffError::FirstTierNotAtOne(first.min_units));
        }
        if !last.is_open_ended() {
            return Err(TariffError::LastTierBounded(last.min_units));
        }

        let mut expected_min = 1;
        for (index, tier) in self.slide_tiers.iter().enumerate() {
            non_negative("slide unit price", tier.unit_price)?;

            if tier.min_units != expected_min {
                return Err(TariffError::TierGap {
                    expected: expected_min,
                    found: tier.min_units,
                });
            }

            match tier.max_units {
                Some(max) if max < tier.min_units => {
                    return Err(TariffError::InvertedTier {
                        min: tier.min_units,
                        max,
                    });
                }
                Some(max) => expected_min = max + 1,
                None if index + 1 != self.slide_tiers.len() => {
                    return Err(TariffError::OpenTierNotLast(tier.min_units));
                }
                None => {}
            }
        }

        Ok(())
    }
}

fn non_negative(
    what: &'static str,
    value: Decimal,
) -> Result<(), TariffError> {
    if value < Decimal::ZERO {
        return Err(TariffError::NegativeAmount { what, value });
    }
    Ok(())
}

fn unit_interval(
    what: &'static str,
    value: Decimal,
) -> Result<(), TariffError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(TariffError::RateOutOfRange { what, value });
    }
    Ok(())
}
