//! Limit parsing and the over-limit comparison.

use crate::units::{TempUnit, Temperature};

/// User-entered limit: the raw text plus the unit it was entered in.
///
/// The text is kept verbatim so presentation can echo it back; it is parsed
/// on every evaluation. Text that is not a finite number is "no limit".
#[derive(Debug, Clone, PartialEq)]
pub struct Limit {
    text: String,
    unit: TempUnit,
}

impl Limit {
    pub fn new(text: impl Into<String>, unit: TempUnit) -> Self {
        Self {
            text: text.into(),
            unit,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn unit(&self) -> TempUnit {
        self.unit
    }

    pub fn value(&self) -> Option<f64> {
        thermo_config::parse_limit_text(&self.text)
    }

    pub fn is_valid(&self) -> bool {
        self.value().is_some()
    }

    pub fn as_temperature(&self) -> Option<Temperature> {
        self.value().map(|v| Temperature::new(v, self.unit))
    }
}

/// Tri-state comparison: `None` when the limit does not parse.
pub fn evaluate(reading: &Temperature, limit: &Limit) -> Option<bool> {
    let limit = limit.as_temperature()?;
    Some(reading.as_celsius() > limit.as_celsius())
}

/// Strictly above the limit, both sides in Celsius. An invalid limit never
/// reports an exceedance.
pub fn exceeds(reading: &Temperature, limit: &Limit) -> bool {
    evaluate(reading, limit).unwrap_or(false)
}
