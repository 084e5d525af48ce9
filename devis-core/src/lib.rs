pub mod calculations;
pub mod format;
pub mod models;

pub use calculations::{
    AppliedSurcharge, DiscountScenario, InstallmentPlan, LineItem, PaymentPlan, PricingError, Quote,
    QuoteEngine, SlidePricing, SurchargeKind, TierLine,
};
pub use format::{format_eur, format_percent, format_rate};
pub use models::*;
