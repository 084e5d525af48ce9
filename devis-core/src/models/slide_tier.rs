use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of the cumulative slide price schedule.
///
/// Units `min_units..=max_units` are billed at `unit_price`. The last tier of a
/// schedule is open-ended (`max_units` is `None`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideTier {
    pub min_units: u64,
    pub max_units: Option<u64>,
    pub unit_price: Decimal,
}

impl SlideTier {
    pub fn new(
        min_units: u64,
        max_units: Option<u64>,
        unit_price: Decimal,
    ) -> Self {
        Self {
            min_units,
            max_units,
            unit_price,
        }
    }

    /// Range label as printed in breakdowns: `"101 - 200"` or `"5001+"`.
    pub fn label(&self) -> String {
        match self.max_units {
            Some(max) => format!("{} - {}", self.min_units, max),
            None => format!("{}+", self.min_units),
        }
    }

    pub fn is_open_ended(&self) -> bool {
        self.max_units.is_none()
    }
}
