//! Estimator state for the command-line front end.
//!
//! The state owns the live configuration and the quote computed from it.
//! Every setter changes one field and recomputes the quote immediately, so the
//! quote is never stale with respect to the configuration.

use chrono::NaiveDate;
use devis_core::{
    DeliveryFormat, PricingError, Quote, QuoteEngine, ServiceConfiguration, ServiceType, Urgency,
};
use devis_pdf::{Branding, QuoteDocument};
use tracing::debug;

/// Live estimator session.
#[derive(Debug, Clone)]
pub struct EstimatorState {
    engine: QuoteEngine,
    config: ServiceConfiguration,
    quote: Quote,

    /// Number of recomputations since the state was created.
    revision: u64,
}

impl EstimatorState {
    /// Starts a session with the default configuration.
    pub fn new(engine: QuoteEngine) -> Result<Self, PricingError> {
        let config = ServiceConfiguration::default();
        let quote = engine.calculate(&config)?;

        Ok(Self {
            engine,
            config,
            quote,
            revision: 0,
        })
    }

    pub fn config(&self) -> &ServiceConfiguration {
        &self.config
    }

    pub fn quote(&self) -> &Quote {
        &self.quote
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Document view of the current quote.
    pub fn document<'a>(
        &'a self,
        branding: &'a Branding,
        date: NaiveDate,
    ) -> QuoteDocument<'a> {
        QuoteDocument::new(&self.quote, &self.config, branding, date)
    }

    pub fn set_service_type(
        &mut self,
        service_type: ServiceType,
    ) -> Result<(), PricingError> {
        self.update(|config| config.service_type = service_type)
    }

    pub fn set_course_hours(
        &mut self,
        hours: u32,
    ) -> Result<(), PricingError> {
        self.update(|config| config.course_hours = hours)
    }

    pub fn set_module_split_count(
        &mut self,
        count: u32,
    ) -> Result<(), PricingError> {
        self.update(|config| config.set_module_split_count(count))
    }

    pub fn set_module_count(
        &mut self,
        count: u32,
    ) -> Result<(), PricingError> {
        self.update(|config| config.module_count = count)
    }

    pub fn set_evaluation_count(
        &mut self,
        count: u32,
    ) -> Result<(), PricingError> {
        self.update(|config| config.evaluation_count = count)
    }

    pub fn set_annual_update(
        &mut self,
        enabled: bool,
    ) -> Result<(), PricingError> {
        self.update(|config| config.annual_update = enabled)
    }

    pub fn set_delivery_format(
        &mut self,
        format: DeliveryFormat,
    ) -> Result<(), PricingError> {
        self.update(|config| config.delivery_format = format)
    }

    pub fn set_urgency(
        &mut self,
        urgency: Urgency,
    ) -> Result<(), PricingError> {
        self.update(|config| config.urgency = urgency)
    }

    pub fn set_installment_payment(
        &mut self,
        enabled: bool,
    ) -> Result<(), PricingError> {
        self.update(|config| config.installment_payment = enabled)
    }

    pub fn set_installment_months(
        &mut self,
        months: u32,
    ) -> Result<(), PricingError> {
        self.update(|config| config.set_installment_months(months))
    }

    /// Applies one mutation and recomputes.
    ///
    /// On error the previous configuration and quote are kept.
    fn update(
        &mut self,
        mutate: impl FnOnce(&mut ServiceConfiguration),
    ) -> Result<(), PricingError> {
        let mut config = self.config.clone();
        mutate(&mut config);

        let quote = self.engine.calculate(&config)?;
        self.config = config;
        self.quote = quote;
        self.revision += 1;

        debug!(revision = self.revision, "estimator state updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn state() -> EstimatorState {
        EstimatorState::new(QuoteEngine::default()).unwrap()
    }

    // =========================================================================
    // recomputation
    // =========================================================================

    #[test]
    fn new_state_prices_the_defaults() {
        let state = state();

        assert_eq!(state.revision(), 0);
        assert_eq!(state.quote().total_excluding_tax, dec!(1210));
    }

    #[test]
    fn every_mutation_recomputes() {
        let mut state = state();

        state.set_course_hours(40).unwrap();
        assert_eq!(state.quote().slide_count, 200);
        assert_eq!(state.quote().total_excluding_tax, dec!(2310));

        state.set_delivery_format(DeliveryFormat::Ppt).unwrap();
        assert_eq!(state.quote().total_excluding_tax, dec!(2100));

        assert_eq!(state.revision(), 2);
    }

    #[test]
    fn switching_service_type_reprices_immediately() {
        let mut state = state();

        state.set_module_count(3).unwrap();
        state.set_service_type(ServiceType::ProgramCreation).unwrap();

        // 3 × 500 × 1.10
        assert_eq!(state.quote().total_excluding_tax, dec!(1650));
    }

    #[test]
    fn payment_selection_changes_plan_not_totals() {
        let mut state = state();
        let before = state.quote().total_including_tax;

        state.set_installment_payment(true).unwrap();
        state.set_installment_months(6).unwrap();

        assert_eq!(state.quote().total_including_tax, before);
        assert!(state.quote().payment_plan.is_installments());
        assert_eq!(state.quote().installment.months, 6);
    }

    // =========================================================================
    // clamping
    // =========================================================================

    #[test]
    fn installment_months_are_clamped() {
        let mut state = state();

        state.set_installment_months(0).unwrap();
        assert_eq!(state.config().installment_months, 2);

        state.set_installment_months(60).unwrap();
        assert_eq!(state.config().installment_months, 24);
    }

    #[test]
    fn module_split_zero_becomes_one() {
        let mut state = state();

        state.set_module_split_count(0).unwrap();

        assert_eq!(state.config().module_split_count, 1);
        assert_eq!(state.quote().hours_per_module, dec!(20));
    }
}
