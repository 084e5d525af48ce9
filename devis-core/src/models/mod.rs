mod service_configuration;
mod slide_tier;
mod tariff;

pub use service_configuration::{
    DeliveryFormat, ServiceConfiguration, ServiceScope, ServiceType, UnknownOptionError, Urgency,
};
pub use slide_tier::SlideTier;
pub use tariff::{Tariff, TariffError};
