//! Celsius/Fahrenheit conversion.
//!
//! Pure and total: NaN in, NaN out. Nothing here rounds; display rounding
//! belongs to the presentation layer.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TempUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TempUnit {
    /// The other unit.
    pub fn toggled(self) -> Self {
        match self {
            Self::Celsius => Self::Fahrenheit,
            Self::Fahrenheit => Self::Celsius,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Celsius => "Celsius",
            Self::Fahrenheit => "Fahrenheit",
        }
    }
}

impl fmt::Display for TempUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[inline]
pub fn to_celsius(value: f64, unit: TempUnit) -> f64 {
    match unit {
        TempUnit::Celsius => value,
        TempUnit::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
    }
}

#[inline]
pub fn from_celsius(celsius: f64, unit: TempUnit) -> f64 {
    match unit {
        TempUnit::Celsius => celsius,
        TempUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
    }
}

/// A single reading: a value tagged with the unit it is expressed in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Temperature {
    value: f64,
    unit: TempUnit,
}

impl Temperature {
    pub fn new(value: f64, unit: TempUnit) -> Self {
        Self { value, unit }
    }

    pub fn celsius(value: f64) -> Self {
        Self::new(value, TempUnit::Celsius)
    }

    pub fn fahrenheit(value: f64) -> Self {
        Self::new(value, TempUnit::Fahrenheit)
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> TempUnit {
        self.unit
    }

    /// Value normalized to Celsius, the unit all comparisons happen in.
    pub fn as_celsius(&self) -> f64 {
        to_celsius(self.value, self.unit)
    }

    /// Same reading re-expressed in `unit`.
    pub fn in_unit(&self, unit: TempUnit) -> Self {
        if unit == self.unit {
            return *self;
        }
        Self::new(from_celsius(self.as_celsius(), unit), unit)
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}{}", self.value, self.unit.symbol())
    }
}
