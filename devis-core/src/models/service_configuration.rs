//! Estimator configuration: the single mutable input of the pricing engine.
//!
//! A [`ServiceConfiguration`] is created with [`Default`] values when an
//! estimate starts, mutated one field at a time by the form layer and thrown
//! away at the end of the session. Every field is kept whatever the selected
//! [`ServiceType`]; [`ServiceConfiguration::scope`] narrows it down to the
//! quantities the selected service actually bills.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Error returned when a textual option does not name a known variant.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct UnknownOptionError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

/// Category of deliverable being quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceType {
    ProgramCreation,
    #[default]
    SlideCreation,
    EvaluationCreation,
    FullService,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProgramCreation => "program-creation",
            Self::SlideCreation => "slide-creation",
            Self::EvaluationCreation => "evaluation-creation",
            Self::FullService => "full-service",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::ProgramCreation => "Création de programme",
            Self::SlideCreation => "Création de slides",
            Self::EvaluationCreation => "Création d'évaluations",
            Self::FullService => "Service complet",
        }
    }
}

impl FromStr for ServiceType {
    type Err = UnknownOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "program-creation" | "program" | "programme" => Ok(Self::ProgramCreation),
            "slide-creation" | "slides" => Ok(Self::SlideCreation),
            "evaluation-creation" | "evaluations" | "evaluation" => Ok(Self::EvaluationCreation),
            "full-service" | "full" | "complet" => Ok(Self::FullService),
            _ => Err(UnknownOptionError {
                kind: "service type",
                value: s.to_string(),
                expected: "program-creation, slide-creation, evaluation-creation, full-service",
            }),
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File format(s) the deliverables are handed over in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeliveryFormat {
    Ppt,
    Pdf,
    #[default]
    Both,
}

impl DeliveryFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ppt => "ppt",
            Self::Pdf => "pdf",
            Self::Both => "both",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Ppt => "PowerPoint (PPT)",
            Self::Pdf => "PDF",
            Self::Both => "Les deux formats",
        }
    }
}

impl FromStr for DeliveryFormat {
    type Err = UnknownOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ppt" | "pptx" => Ok(Self::Ppt),
            "pdf" => Ok(Self::Pdf),
            "both" | "les-deux" => Ok(Self::Both),
            _ => Err(UnknownOptionError {
                kind: "delivery format",
                value: s.to_string(),
                expected: "ppt, pdf, both",
            }),
        }
    }
}

impl fmt::Display for DeliveryFormat {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery lead time requested by the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Urgency {
    #[default]
    Standard,
    Express,
    Urgent,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Express => "express",
            Self::Urgent => "urgent",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Express => "Express",
            Self::Urgent => "Urgent",
        }
    }

    pub fn lead_time(&self) -> &'static str {
        match self {
            Self::Standard => "4-6 semaines",
            Self::Express => "2-3 semaines",
            Self::Urgent => "1-2 semaines",
        }
    }
}

impl FromStr for Urgency {
    type Err = UnknownOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "express" => Ok(Self::Express),
            "urgent" => Ok(Self::Urgent),
            _ => Err(UnknownOptionError {
                kind: "urgency",
                value: s.to_string(),
                expected: "standard, express, urgent",
            }),
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Billable quantities of the selected service, and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceScope {
    Program {
        module_count: u32,
    },
    Slides {
        course_hours: u32,
    },
    Evaluations {
        evaluation_count: u32,
    },
    Full {
        module_count: u32,
        course_hours: u32,
        evaluation_count: u32,
    },
}

impl ServiceScope {
    pub fn module_count(&self) -> Option<u32> {
        match *self {
            Self::Program { module_count } | Self::Full { module_count, .. } => Some(module_count),
            _ => None,
        }
    }

    pub fn course_hours(&self) -> Option<u32> {
        match *self {
            Self::Slides { course_hours } | Self::Full { course_hours, .. } => Some(course_hours),
            _ => None,
        }
    }

    pub fn evaluation_count(&self) -> Option<u32> {
        match *self {
            Self::Evaluations { evaluation_count } | Self::Full { evaluation_count, .. } => {
                Some(evaluation_count)
            }
            _ => None,
        }
    }
}

/// Options selected in the estimator form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfiguration {
    pub service_type: ServiceType,

    /// Hours of course content; one hour converts to a fixed number of slides.
    pub course_hours: u32,

    /// Number of modules the course hours are split into. Display only.
    pub module_split_count: u32,

    pub module_count: u32,
    pub evaluation_count: u32,
    pub annual_update: bool,
    pub delivery_format: DeliveryFormat,
    pub urgency: Urgency,

    /// `false` selects a single upfront payment with discount.
    pub installment_payment: bool,
    pub installment_months: u32,
}

impl Default for ServiceConfiguration {
    fn default() -> Self {
        Self {
            service_type: ServiceType::SlideCreation,
            course_hours: 20,
            module_split_count: 1,
            module_count: 1,
            evaluation_count: 0,
            annual_update: false,
            delivery_format: DeliveryFormat::Both,
            urgency: Urgency::Standard,
            installment_payment: false,
            installment_months: 4,
        }
    }
}

impl ServiceConfiguration {
    pub const MIN_MODULE_SPLIT: u32 = 1;
    pub const MIN_INSTALLMENT_MONTHS: u32 = 2;
    pub const MAX_INSTALLMENT_MONTHS: u32 = 24;

    /// Narrows the configuration to the quantities billed for its service type.
    pub fn scope(&self) -> ServiceScope {
        match self.service_type {
            ServiceType::ProgramCreation => ServiceScope::Program {
                module_count: self.module_count,
            },
            ServiceType::SlideCreation => ServiceScope::Slides {
                course_hours: self.course_hours,
            },
            ServiceType::EvaluationCreation => ServiceScope::Evaluations {
                evaluation_count: self.evaluation_count,
            },
            ServiceType::FullService => ServiceScope::Full {
                module_count: self.module_count,
                course_hours: self.course_hours,
                evaluation_count: self.evaluation_count,
            },
        }
    }

    /// Sets the module split count, raising zero to the minimum of one.
    pub fn set_module_split_count(
        &mut self,
        count: u32,
    ) {
        let clamped = count.max(Self::MIN_MODULE_SPLIT);
        if clamped != count {
            warn!(requested = count, applied = clamped, "module split count clamped");
        }
        self.module_split_count = clamped;
    }

    /// Sets the installment duration, clamped to the accepted month range.
    pub fn set_installment_months(
        &mut self,
        months: u32,
    ) {
        let clamped = months.clamp(Self::MIN_INSTALLMENT_MONTHS, Self::MAX_INSTALLMENT_MONTHS);
        if clamped != months {
            warn!(requested = months, applied = clamped, "installment months clamped");
        }
        self.installment_months = clamped;
    }

    /// Re-applies the clamping rules to every bounded field.
    ///
    /// Used after bulk loading (e.g. from a configuration file) where the
    /// individual setters were bypassed.
    pub fn normalized(mut self) -> Self {
        self.set_module_split_count(self.module_split_count);
        self.set_installment_months(self.installment_months);
        self
    }
}
