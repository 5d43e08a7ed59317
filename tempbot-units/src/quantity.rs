//! UnitValue - a numeric value paired with the unit it is expressed in

use std::fmt;
use std::sync::Arc;

use crate::numeric::{doubles_are_equal, format_number};
use crate::Unit;

/// A value in a specific unit
#[derive(Debug, Clone)]
pub struct UnitValue {
    /// The unit of measurement, shared with the dimension that owns it
    pub unit: Arc<Unit>,
    /// The numeric value in `unit`
    pub value: f64,
}

impl UnitValue {
    pub fn new(unit: Arc<Unit>, value: f64) -> Self {
        UnitValue { unit, value }
    }

    /// Duplicate detection: same unit and values within `COMPARISON_EPSILON`.
    ///
    /// Deliberately not `PartialEq`: the relation is not transitive, and
    /// NaN or infinite values never compare equal.
    pub fn approx_eq(&self, other: &UnitValue) -> bool {
        *self.unit == *other.unit && doubles_are_equal(self.value, other.value)
    }

    /// Base-scale value of this quantity
    pub fn to_base(&self) -> f64 {
        self.unit.to_base(self.value)
    }
}

impl fmt::Display for UnitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", format_number(self.value), self.unit.short_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Conversion;

    fn fahrenheit() -> Arc<Unit> {
        Arc::new(Unit::new("degrees Fahrenheit", "°F", Conversion::identity()))
    }

    fn celsius() -> Arc<Unit> {
        Arc::new(Unit::new("degrees Celsius", "°C", Conversion::identity()))
    }

    #[test]
    fn test_approx_eq_same_unit() {
        let a = UnitValue::new(fahrenheit(), 32.0);
        let b = UnitValue::new(fahrenheit(), 32.00001);
        assert!(a.approx_eq(&b));
    }

    #[test]
    fn test_approx_eq_different_unit() {
        let a = UnitValue::new(fahrenheit(), 32.0);
        let b = UnitValue::new(celsius(), 32.0);
        assert!(!a.approx_eq(&b));
    }

    #[test]
    fn test_nan_not_equal_to_itself() {
        let a = UnitValue::new(fahrenheit(), f64::NAN);
        assert!(!a.approx_eq(&a.clone()));
    }

    #[test]
    fn test_display() {
        let v = UnitValue::new(celsius(), 1234.5);
        assert_eq!(v.to_string(), "1,234.5 °C");
    }
}
