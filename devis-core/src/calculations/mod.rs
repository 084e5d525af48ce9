//! Pricing calculations for training-material quotes.
//!
//! [`QuoteEngine`] is the entry point; the other modules hold the building
//! blocks it composes.

pub mod common;
mod payment;
mod quote_engine;
mod slide_pricing;

pub use payment::{DiscountScenario, InstallmentPlan, PaymentPlan};
pub use quote_engine::{AppliedSurcharge, LineItem, PricingError, Quote, QuoteEngine, SurchargeKind};
pub use slide_pricing::{SlidePricing, SlidePricingCalculator, TierLine};
