//! Optional TOML configuration file.
//!
//! ```toml
//! [estimate]
//! service = "full-service"
//! course_hours = 40
//! urgency = "express"
//!
//! [branding]
//! company_name = "Creatio"
//! product = "creatio"
//! ```
//!
//! Every key is optional. Command-line flags override the file.

use std::fs;
use std::path::{Path, PathBuf};

use devis_core::{DeliveryFormat, PricingError, ServiceType, Urgency};
use devis_pdf::Branding;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::state::EstimatorState;

/// Errors raised while loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read configuration file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Contents of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub estimate: EstimateOverrides,
    pub branding: Branding,
}

impl FileConfig {
    /// Reads and parses `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), "configuration file loaded");
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

/// Initial values for the estimator; unset fields keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EstimateOverrides {
    pub service: Option<ServiceType>,
    pub course_hours: Option<u32>,
    pub module_split_count: Option<u32>,
    pub module_count: Option<u32>,
    pub evaluation_count: Option<u32>,
    pub annual_update: Option<bool>,
    pub delivery_format: Option<DeliveryFormat>,
    pub urgency: Option<Urgency>,
    pub installment_payment: Option<bool>,
    pub installment_months: Option<u32>,
}

impl EstimateOverrides {
    /// Layers `other` on top of `self`; values set in `other` win.
    pub fn merge(
        self,
        other: Self,
    ) -> Self {
        Self {
            service: other.service.or(self.service),
            course_hours: other.course_hours.or(self.course_hours),
            module_split_count: other.module_split_count.or(self.module_split_count),
            module_count: other.module_count.or(self.module_count),
            evaluation_count: other.evaluation_count.or(self.evaluation_count),
            annual_update: other.annual_update.or(self.annual_update),
            delivery_format: other.delivery_format.or(self.delivery_format),
            urgency: other.urgency.or(self.urgency),
            installment_payment: other.installment_payment.or(self.installment_payment),
            installment_months: other.installment_months.or(self.installment_months),
        }
    }

    /// Applies each set value to `state` as its own mutation.
    pub fn apply(
        &self,
        state: &mut EstimatorState,
    ) -> Result<(), PricingError> {
        if let Some(service) = self.service {
            state.set_service_type(service)?;
        }
        if let Some(hours) = self.course_hours {
            state.set_course_hours(hours)?;
        }
        if let Some(split) = self.module_split_count {
            state.set_module_split_count(split)?;
        }
        if let Some(count) = self.module_count {
            state.set_module_count(count)?;
        }
        if let Some(count) = self.evaluation_count {
            state.set_evaluation_count(count)?;
        }
        if let Some(enabled) = self.annual_update {
            state.set_annual_update(enabled)?;
        }
        if let Some(format) = self.delivery_format {
            state.set_delivery_format(format)?;
        }
        if let Some(urgency) = self.urgency {
            state.set_urgency(urgency)?;
        }
        if let Some(enabled) = self.installment_payment {
            state.set_installment_payment(enabled)?;
        }
        if let Some(months) = self.installment_months {
            state.set_installment_months(months)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use devis_core::QuoteEngine;
    use pretty_assertions::assert_eq;

    use super::*;

    // =========================================================================
    // parsing
    // =========================================================================

    #[test]
    fn empty_file_gives_defaults() {
        let config = FileConfig::parse("").unwrap();

        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn estimate_table_uses_kebab_case_options() {
        let config = FileConfig::parse(
            r#"
            [estimate]
            service = "evaluation-creation"
            evaluation_count = 12
            delivery_format = "pdf"
            urgency = "urgent"
            "#,
        )
        .unwrap();

        assert_eq!(config.estimate.service, Some(ServiceType::EvaluationCreation));
        assert_eq!(config.estimate.evaluation_count, Some(12));
        assert_eq!(config.estimate.delivery_format, Some(DeliveryFormat::Pdf));
        assert_eq!(config.estimate.urgency, Some(Urgency::Urgent));
        assert_eq!(config.branding, Branding::default());
    }

    #[test]
    fn partial_branding_keeps_other_defaults() {
        let config = FileConfig::parse(
            r#"
            [branding]
            company_name = "Atelier Nova"
            "#,
        )
        .unwrap();

        assert_eq!(config.branding.company_name, "Atelier Nova");
        assert_eq!(config.branding.product, "creatio");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = FileConfig::parse(
            r#"
            [estimate]
            hours = 10
            "#,
        );

        assert!(result.is_err());
    }

    // =========================================================================
    // merge and apply
    // =========================================================================

    #[test]
    fn later_overrides_win() {
        let file = EstimateOverrides {
            course_hours: Some(10),
            urgency: Some(Urgency::Express),
            ..Default::default()
        };
        let flags = EstimateOverrides {
            course_hours: Some(30),
            ..Default::default()
        };

        let merged = file.merge(flags);

        assert_eq!(merged.course_hours, Some(30));
        assert_eq!(merged.urgency, Some(Urgency::Express));
    }

    #[test]
    fn apply_mutates_only_set_fields() {
        let mut state = EstimatorState::new(QuoteEngine::default()).unwrap();
        let overrides = EstimateOverrides {
            course_hours: Some(40),
            installment_months: Some(99),
            ..Default::default()
        };

        overrides.apply(&mut state).unwrap();

        assert_eq!(state.config().course_hours, 40);
        assert_eq!(state.config().installment_months, 24);
        assert_eq!(state.config().service_type, ServiceType::SlideCreation);
        assert_eq!(state.revision(), 2);
    }
}
