//! Payment scenarios derived from a quote's totals.
//!
//! Two scenarios always exist side by side: a single upfront payment with a
//! discount on the pre-tax amount, and an installment plan without discount.
//! Installments are always computed from the full totals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::PricingError;
use crate::calculations::common::{apply_rate, round_half_up};

/// Single upfront payment with discount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountScenario {
    pub discount_rate: Decimal,
    pub excluding_tax: Decimal,
    pub including_tax: Decimal,
}

impl DiscountScenario {
    /// Applies the discount to the pre-tax total, then adds tax on the
    /// discounted base.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use devis_core::calculations::DiscountScenario;
    ///
    /// let scenario = DiscountScenario::from_total(dec!(1210), dec!(0.15), dec!(0.20));
    ///
    /// assert_eq!(scenario.excluding_tax, dec!(1028.50));
    /// assert_eq!(scenario.including_tax, dec!(1234.20));
    /// ```
    pub fn from_total(
        total_excluding_tax: Decimal,
        discount_rate: Decimal,
        tax_rate: Decimal,
    ) -> Self {
        let excluding_tax = round_half_up(total_excluding_tax * (Decimal::ONE - discount_rate));
        let including_tax = round_half_up(apply_rate(excluding_tax, tax_rate));

        Self {
            discount_rate,
            excluding_tax,
            including_tax,
        }
    }

    /// Amount saved on the pre-tax total.
    pub fn savings(
        &self,
        total_excluding_tax: Decimal,
    ) -> Decimal {
        total_excluding_tax - self.excluding_tax
    }
}

/// Equal monthly payments of the full totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentPlan {
    pub months: u32,
    pub excluding_tax_per_month: Decimal,
    pub including_tax_per_month: Decimal,
}

impl InstallmentPlan {
    /// Splits both totals into `months` equal payments.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::ZeroInstallmentMonths`] when `months` is zero.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use devis_core::PricingError;
    /// use devis_core::calculations::InstallmentPlan;
    ///
    /// let plan = InstallmentPlan::split(dec!(1210), dec!(1452), 4).unwrap();
    /// assert_eq!(plan.excluding_tax_per_month, dec!(302.50));
    /// assert_eq!(plan.including_tax_per_month, dec!(363.00));
    ///
    /// assert_eq!(
    ///     InstallmentPlan::split(dec!(1210), dec!(1452), 0),
    ///     Err(PricingError::ZeroInstallmentMonths)
    /// );
    /// ```
    pub fn split(
        total_excluding_tax: Decimal,
        total_including_tax: Decimal,
        months: u32,
    ) -> Result<Self, PricingError> {
        if months == 0 {
            return Err(PricingError::ZeroInstallmentMonths);
        }

        let divisor = Decimal::from(months);
        Ok(Self {
            months,
            excluding_tax_per_month: round_half_up(total_excluding_tax / divisor),
            including_tax_per_month: round_half_up(total_including_tax / divisor),
        })
    }
}

/// Payment mode selected by the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum PaymentPlan {
    Upfront,
    Installments { months: u32 },
}

impl PaymentPlan {
    pub fn is_installments(&self) -> bool {
        matches!(self, Self::Installments { .. })
    }
}
