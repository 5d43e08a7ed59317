//! Unit representation with conversion to and from a dimension's base scale

use std::fmt;

/// How a unit maps onto its dimension's base scale
#[derive(Clone, Copy)]
pub enum Conversion {
    /// `base = value * factor + offset`
    Linear { factor: f64, offset: f64 },
    /// Arbitrary formula pair; `to_unit` maps base -> unit, `from_unit` maps unit -> base
    Function {
        to_unit: fn(f64) -> f64,
        from_unit: fn(f64) -> f64,
    },
}

impl Conversion {
    /// Proportional conversion with no offset
    pub const fn scale(factor: f64) -> Self {
        Conversion::Linear { factor, offset: 0.0 }
    }

    /// The dimension's own base unit
    pub const fn identity() -> Self {
        Conversion::scale(1.0)
    }
}

impl fmt::Debug for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conversion::Linear { factor, offset } => f
                .debug_struct("Linear")
                .field("factor", factor)
                .field("offset", offset)
                .finish(),
            Conversion::Function { .. } => f.write_str("Function"),
        }
    }
}

/// A named unit of measure within a dimension.
///
/// Immutable once built. `to_base` and `from_base` must be mutual inverses
/// and monotonic over the dimension's valid range; this is not checked.
#[derive(Debug, Clone)]
pub struct Unit {
    full_name: String,
    short_name: String,
    detectable_names: Vec<String>,
    is_default_conversion_source: bool,
    is_default_conversion_result: bool,
    conversion: Conversion,
}

impl Unit {
    /// Create a unit detectable by its full and short names only
    pub fn new(full_name: &str, short_name: &str, conversion: Conversion) -> Self {
        let mut unit = Unit {
            full_name: full_name.to_string(),
            short_name: short_name.to_string(),
            detectable_names: Vec::new(),
            is_default_conversion_source: false,
            is_default_conversion_result: false,
            conversion,
        };
        unit.add_detectable_name(full_name);
        unit.add_detectable_name(short_name);
        unit
    }

    /// Add extra aliases recognized in text
    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        for alias in aliases {
            self.add_detectable_name(alias);
        }
        self
    }

    /// Mark the unit as triggering automatic conversion when seen in free text
    pub fn as_default_source(mut self) -> Self {
        self.is_default_conversion_source = true;
        self
    }

    /// Include the unit in automatically produced conversion outputs
    pub fn as_default_result(mut self) -> Self {
        self.is_default_conversion_result = true;
        self
    }

    fn add_detectable_name(&mut self, name: &str) {
        if !name.is_empty() && !self.detectable_names.iter().any(|n| n == name) {
            self.detectable_names.push(name.to_string());
        }
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    /// Every alias recognized in text, full and short name first
    pub fn detectable_names(&self) -> &[String] {
        &self.detectable_names
    }

    pub fn is_default_conversion_source(&self) -> bool {
        self.is_default_conversion_source
    }

    pub fn is_default_conversion_result(&self) -> bool {
        self.is_default_conversion_result
    }

    /// Convert a value expressed in this unit to the base scale
    pub fn to_base(&self, value: f64) -> f64 {
        match self.conversion {
            Conversion::Linear { factor, offset } => value * factor + offset,
            Conversion::Function { from_unit, .. } => from_unit(value),
        }
    }

    /// Convert a base-scale value into this unit
    pub fn from_base(&self, base: f64) -> f64 {
        match self.conversion {
            Conversion::Linear { factor, offset } => (base - offset) / factor,
            Conversion::Function { to_unit, .. } => to_unit(base),
        }
    }
}

/// Units are identified by full and short name; aliases and formulas are not compared
impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.full_name == other.full_name && self.short_name == other.short_name
    }
}

impl Eq for Unit {}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn celsius() -> Unit {
        Unit::new("degrees Celsius", "°C", Conversion::Linear { factor: 1.0, offset: 273.15 })
            .with_aliases(&["C", "c", "Celsius"])
            .as_default_source()
            .as_default_result()
    }

    #[test]
    fn test_full_and_short_names_detectable() {
        let unit = Unit::new("meters", "m", Conversion::identity());
        assert_eq!(unit.detectable_names(), &["meters".to_string(), "m".to_string()]);
        assert!(!unit.is_default_conversion_source());
        assert!(!unit.is_default_conversion_result());
    }

    #[test]
    fn test_aliases_deduplicated_in_order() {
        let unit = Unit::new("kilograms", "kg", Conversion::identity())
            .with_aliases(&["kg", "kilo", "kilo"]);
        assert_eq!(unit.detectable_names(), &["kilograms", "kg", "kilo"]);
    }

    #[test]
    fn test_flags() {
        let unit = celsius();
        assert!(unit.is_default_conversion_source());
        assert!(unit.is_default_conversion_result());
    }

    #[test]
    fn test_linear_conversion() {
        let unit = celsius();
        assert!((unit.to_base(5.0) - 278.15).abs() < 1e-9);
        assert!((unit.from_base(273.15)).abs() < 1e-9);
    }

    #[test]
    fn test_function_conversion() {
        let fahrenheit = Unit::new(
            "degrees Fahrenheit",
            "°F",
            Conversion::Function {
                to_unit: |k| (k - 273.15) * 9.0 / 5.0 + 32.0,
                from_unit: |f| (f - 32.0) * 5.0 / 9.0 + 273.15,
            },
        );
        assert!((fahrenheit.to_base(32.0) - 273.15).abs() < 1e-9);
        assert!((fahrenheit.from_base(373.15) - 212.0).abs() < 1e-9);
    }

    #[test]
    fn test_equality_by_names() {
        let a = Unit::new("meters", "m", Conversion::identity());
        let b = Unit::new("meters", "m", Conversion::scale(2.0)).with_aliases(&["metres"]);
        let c = Unit::new("meters", "mtr", Conversion::identity());
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
