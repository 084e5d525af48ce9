//! Aggregate pricing engine for training-material quotes.
//!
//! The engine turns a [`ServiceConfiguration`] into a [`Quote`]: component
//! costs for the selected service, the surcharges applied on top, tax, and the
//! two payment scenarios. It keeps no state between calls; the same
//! configuration always produces the same quote.
//!
//! # Calculation Steps
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Module cost: modules × module price (program, full service) |
//! | 2    | Slide cost: tiered price of hours × slides per hour (slides, full service) |
//! | 3    | Evaluation cost: evaluations × evaluation price (evaluations, full service) |
//! | 4    | Base excluding tax: sum of the applicable steps 1–3 |
//! | 5    | Format surcharge (+10% for both formats) |
//! | 6    | Urgency surcharge (+25% express, +50% urgent) |
//! | 7    | Annual update surcharge (+20%) |
//! | 8    | Total excluding tax, rounded to cents |
//! | 9    | Total including tax: line 8 × (1 + VAT) |
//! | 10   | Upfront discount scenario: line 8 × 85%, then VAT |
//! | 11   | Installments: lines 8 and 9 ÷ months |
//!
//! Surcharges compound in the order of steps 5–7. No intermediate step is
//! rounded; monetary results are rounded half-up to cents once, at step 8
//! and after.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use devis_core::{DeliveryFormat, QuoteEngine, ServiceConfiguration, ServiceType, Tariff};
//!
//! let engine = QuoteEngine::new(Tariff::default());
//! let config = ServiceConfiguration {
//!     service_type: ServiceType::SlideCreation,
//!     course_hours: 20,
//!     delivery_format: DeliveryFormat::Both,
//!     ..Default::default()
//! };
//!
//! let quote = engine.calculate(&config).unwrap();
//!
//! assert_eq!(quote.slide_count, 100);
//! assert_eq!(quote.total_excluding_tax, dec!(1210));
//! assert_eq!(quote.total_including_tax, dec!(1452));
//! assert_eq!(quote.discount.excluding_tax, dec!(1028.5));
//! ```

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculations::common::{apply_rate, cent_scale, round_half_up, round_half_up_dp};
use crate::calculations::{
    DiscountScenario, InstallmentPlan, PaymentPlan, SlidePricing, SlidePricingCalculator,
};
use crate::{DeliveryFormat, ServiceConfiguration, ServiceScope, ServiceType, Tariff, TariffError, Urgency};

/// Errors that can occur while pricing a quote.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// The tariff failed validation.
    #[error("invalid tariff: {0}")]
    InvalidTariff(#[from] TariffError),

    /// An installment plan was requested over zero months.
    #[error("installment plan needs at least one month")]
    ZeroInstallmentMonths,
}

/// A priced quantity of a flat-rate component (modules, evaluations).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub quantity: u32,
    pub unit_price: Decimal,
    pub amount: Decimal,
}

impl LineItem {
    fn priced(
        quantity: u32,
        unit_price: Decimal,
    ) -> Self {
        Self {
            quantity,
            unit_price: cent_scale(unit_price),
            amount: cent_scale(Decimal::from(quantity) * unit_price),
        }
    }
}

/// Which option a surcharge comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "option", rename_all = "kebab-case")]
pub enum SurchargeKind {
    Format(DeliveryFormat),
    Urgency(Urgency),
    AnnualUpdate,
}

impl SurchargeKind {
    pub fn label(&self) -> String {
        match self {
            Self::Format(format) => format!("Format : {}", format.label()),
            Self::Urgency(urgency) => {
                format!("Délai {} ({})", urgency.label(), urgency.lead_time())
            }
            Self::AnnualUpdate => "Mise à jour annuelle".to_string(),
        }
    }
}

/// A surcharge that changed the total, in application order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedSurcharge {
    pub kind: SurchargeKind,
    pub rate: Decimal,
}

/// Everything the live display and the quote document show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub service_type: ServiceType,

    /// Course hours, when the service includes slides.
    pub course_hours: Option<u32>,

    pub slide_count: u64,
    pub module_split_count: u32,

    /// Course hours per module, to one decimal place.
    pub hours_per_module: Decimal,

    /// Slides in one module, rounded to the nearest slide.
    pub slides_per_module: u64,

    /// Tiered slide price; empty when the service has no slides.
    pub slide_pricing: SlidePricing,

    pub modules: Option<LineItem>,
    pub evaluations: Option<LineItem>,

    /// Sum of the component costs before surcharges.
    pub base_excluding_tax: Decimal,

    pub surcharges: Vec<AppliedSurcharge>,

    pub total_excluding_tax: Decimal,
    pub tax_rate: Decimal,

    /// `total_including_tax - total_excluding_tax`.
    pub tax_amount: Decimal,

    pub total_including_tax: Decimal,

    pub discount: DiscountScenario,

    /// Installments over the months selected in the configuration.
    pub installment: InstallmentPlan,

    /// Installments over each preset month count, for the document.
    pub installment_presets: Vec<InstallmentPlan>,

    pub payment_plan: PaymentPlan,
}

/// The aggregate pricing engine.
#[derive(Debug, Clone)]
pub struct QuoteEngine {
    tariff: Tariff,
}

impl Default for QuoteEngine {
    fn default() -> Self {
        Self::new(Tariff::default())
    }
}

impl QuoteEngine {
    pub fn new(tariff: Tariff) -> Self {
        Self { tariff }
    }

    /// Prices a configuration.
    ///
    /// This is the main entry point. It validates the tariff, computes every
    /// step listed in the module documentation and returns the full quote.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError`] if:
    /// - the tariff is invalid
    /// - `installment_months` is zero
    pub fn calculate(
        &self,
        config: &ServiceConfiguration,
    ) -> Result<Quote, PricingError> {
        self.tariff.validate()?;

        let scope = config.scope();

        let course_hours = scope.course_hours();
        let slide_count = course_hours.map_or(0, |hours| self.slide_count(hours));
        let slide_pricing = SlidePricingCalculator::new(&self.tariff.slide_tiers).calculate(slide_count);

        let modules = scope
            .module_count()
            .map(|count| LineItem::priced(count, self.tariff.module_price));
        let evaluations = scope
            .evaluation_count()
            .map(|count| LineItem::priced(count, self.tariff.evaluation_price));

        let hours_per_module = self.hours_per_module(config.course_hours, config.module_split_count);
        let base_excluding_tax = self.base_excluding_tax(&scope, &slide_pricing, &modules, &evaluations);

        let surcharges = self.surcharges(config);
        let total_excluding_tax = self.total_excluding_tax(base_excluding_tax, &surcharges);
        let total_including_tax = self.total_including_tax(total_excluding_tax);

        let discount = DiscountScenario::from_total(
            total_excluding_tax,
            self.tariff.upfront_discount_rate,
            self.tariff.tax_rate,
        );
        let installment = InstallmentPlan::split(
            total_excluding_tax,
            total_including_tax,
            config.installment_months,
        )?;
        let installment_presets = self
            .tariff
            .installment_presets
            .iter()
            .map(|&months| InstallmentPlan::split(total_excluding_tax, total_including_tax, months))
            .collect::<Result<Vec<_>, _>>()?;

        let payment_plan = if config.installment_payment {
            PaymentPlan::Installments {
                months: config.installment_months,
            }
        } else {
            PaymentPlan::Upfront
        };

        debug!(
            service = %config.service_type,
            slide_count,
            %base_excluding_tax,
            %total_excluding_tax,
            %total_including_tax,
            "quote recomputed"
        );

        Ok(Quote {
            service_type: config.service_type,
            course_hours,
            slide_count,
            module_split_count: config.module_split_count,
            hours_per_module,
            slides_per_module: self.slides_per_module(hours_per_module),
            slide_pricing,
            modules,
            evaluations,
            base_excluding_tax,
            surcharges,
            total_excluding_tax,
            tax_rate: self.tariff.tax_rate,
            tax_amount: total_including_tax - total_excluding_tax,
            total_including_tax,
            discount,
            installment,
            installment_presets,
            payment_plan,
        })
    }

    /// Converts course hours into slides.
    pub fn slide_count(
        &self,
        course_hours: u32,
    ) -> u64 {
        u64::from(course_hours) * u64::from(self.tariff.slides_per_hour)
    }

    /// Course hours per module to one decimal place.
    ///
    /// A split count of zero falls back to the full course hours.
    pub fn hours_per_module(
        &self,
        course_hours: u32,
        module_split_count: u32,
    ) -> Decimal {
        if module_split_count == 0 {
            return Decimal::from(course_hours);
        }
        round_half_up_dp(
            Decimal::from(course_hours) / Decimal::from(module_split_count),
            1,
        )
    }

    /// Slides in a module of `hours_per_module` hours, rounded half-up.
    pub fn slides_per_module(
        &self,
        hours_per_module: Decimal,
    ) -> u64 {
        round_half_up_dp(hours_per_module * Decimal::from(self.tariff.slides_per_hour), 0)
            .to_u64()
            .unwrap_or_default()
    }

    /// Sums the component costs the service scope bills.
    fn base_excluding_tax(
        &self,
        scope: &ServiceScope,
        slide_pricing: &SlidePricing,
        modules: &Option<LineItem>,
        evaluations: &Option<LineItem>,
    ) -> Decimal {
        let module_cost = modules.as_ref().map_or(Decimal::ZERO, |m| m.amount);
        let evaluation_cost = evaluations.as_ref().map_or(Decimal::ZERO, |e| e.amount);

        let base = match scope {
            ServiceScope::Program { .. } => module_cost,
            ServiceScope::Slides { .. } => slide_pricing.total_price,
            ServiceScope::Evaluations { .. } => evaluation_cost,
            ServiceScope::Full { .. } => module_cost + slide_pricing.total_price + evaluation_cost,
        };
        cent_scale(base)
    }

    /// Lists the non-zero surcharges in application order.
    fn surcharges(
        &self,
        config: &ServiceConfiguration,
    ) -> Vec<AppliedSurcharge> {
        [
            (
                SurchargeKind::Format(config.delivery_format),
                self.tariff.format_rate(config.delivery_format),
            ),
            (
                SurchargeKind::Urgency(config.urgency),
                self.tariff.urgency_rate(config.urgency),
            ),
            (
                SurchargeKind::AnnualUpdate,
                self.tariff.annual_update_rate(config.annual_update),
            ),
        ]
        .into_iter()
        .filter(|(_, rate)| !rate.is_zero())
        .map(|(kind, rate)| AppliedSurcharge { kind, rate })
        .collect()
    }

    /// Compounds the surcharges onto the base.
    fn total_excluding_tax(
        &self,
        base: Decimal,
        surcharges: &[AppliedSurcharge],
    ) -> Decimal {
        let total = surcharges
            .iter()
            .fold(base, |amount, surcharge| apply_rate(amount, surcharge.rate));
        round_half_up(total)
    }

    fn total_including_tax(
        &self,
        total_excluding_tax: Decimal,
    ) -> Decimal {
        round_half_up(apply_rate(total_excluding_tax, self.tariff.tax_rate))
    }
}
