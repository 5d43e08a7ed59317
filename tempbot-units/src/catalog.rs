//! Standard dimension catalog
//!
//! Base scales:
//! - Temperature: kelvin
//! - Speed: meters per second
//! - Blood sugar: millimols per liter
//! - Weight: kilograms
//! - Distance: meters

use crate::error::CatalogError;
use crate::{Conversion, Dimension, Unit, UnitProcessor};

/// Every standard dimension, in display order
pub fn standard_dimensions() -> Vec<Dimension> {
    vec![temperature(), speed(), blood_sugar(), weight(), distance()]
}

/// A processor over the standard catalog
pub fn standard_processor() -> Result<UnitProcessor, CatalogError> {
    UnitProcessor::new(standard_dimensions())
}

pub fn temperature() -> Dimension {
    let celsius = Unit::new(
        "degrees Celsius",
        "°C",
        Conversion::Linear { factor: 1.0, offset: 273.15 },
    )
    .with_aliases(&["C", "c", "Celsius", "celsius"])
    .as_default_source()
    .as_default_result();

    let fahrenheit = Unit::new(
        "degrees Fahrenheit",
        "°F",
        Conversion::Function {
            to_unit: |k| (k - 273.15) * (9.0 / 5.0) + 32.0,
            from_unit: |f| (f - 32.0) * (5.0 / 9.0) + 273.15,
        },
    )
    .with_aliases(&["F", "f", "Fahrenheit", "fahrenheit"])
    .as_default_source()
    .as_default_result();

    // no lowercase "k": "100k" usually means thousands
    let kelvin = Unit::new("degrees Kelvin", "K", Conversion::identity())
        .with_aliases(&["Kelvin", "kelvin"]);

    Dimension::new("Temperature", vec![celsius, fahrenheit, kelvin]).with_min(0.0)
}

pub fn speed() -> Dimension {
    Dimension::new(
        "Speed",
        vec![
            Unit::new("miles per hour", "mph", Conversion::scale(0.44704))
                .with_aliases(&["mi/hr"])
                .as_default_result(),
            Unit::new("kilometers per hour", "kph", Conversion::scale(1.0 / 3.6))
                .with_aliases(&["km/hr"])
                .as_default_result(),
            Unit::new("meters per second", "m/s", Conversion::identity()),
            Unit::new("feet per second", "fps", Conversion::scale(0.3048)).with_aliases(&["ft/s"]),
            Unit::new("nautical miles per hour", "knots", Conversion::scale(0.51444)),
        ],
    )
    .with_min(0.0)
}

pub fn blood_sugar() -> Dimension {
    Dimension::new(
        "Blood sugar",
        vec![
            Unit::new("milligrams per deciliter", "mg/dL", Conversion::scale(1.0 / 18.0))
                .with_aliases(&["mg/dl"])
                .as_default_source()
                .as_default_result(),
            Unit::new("millimols per liter", "mmol/L", Conversion::identity())
                .with_aliases(&["mmol/l"])
                .as_default_source()
                .as_default_result(),
        ],
    )
    .with_min(0.0)
}

pub fn weight() -> Dimension {
    Dimension::new(
        "Weight",
        vec![
            Unit::new("kilograms", "kg", Conversion::identity()).as_default_result(),
            Unit::new("pounds", "lbs", Conversion::scale(1.0 / 2.2046))
                .with_aliases(&["lb"])
                .as_default_result(),
        ],
    )
    .with_min(0.0)
}

pub fn distance() -> Dimension {
    Dimension::new(
        "Distance",
        vec![
            Unit::new("meters", "m", Conversion::identity()).with_aliases(&["metres"]),
            Unit::new("kilometers", "km", Conversion::scale(1000.0)).with_aliases(&["kilometres"]),
            Unit::new("miles", "mi", Conversion::scale(1609.34)),
            Unit::new("nautical miles", "nmi", Conversion::scale(1852.0)),
        ],
    )
    .with_min(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::doubles_are_equal;
    use crate::ProcessingResult;
    use proptest::prelude::*;

    fn converted_value(result: &ProcessingResult, short_name: &str) -> f64 {
        match result {
            ProcessingResult::ConvertedValues { values, .. } => values
                .iter()
                .find(|v| v.unit.short_name() == short_name)
                .map(|v| v.value)
                .unwrap(),
            other => panic!("expected converted values, got {other:?}"),
        }
    }

    #[test]
    fn test_standard_processor_builds() {
        let processor = standard_processor().unwrap();
        let names: Vec<&str> = processor.dimensions().iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["Temperature", "Speed", "Blood sugar", "Weight", "Distance"]);
        assert_eq!(processor.eager_dimensions(), vec!["Temperature", "Blood sugar"]);
        assert_eq!(processor.non_eager_dimensions(), vec!["Speed", "Weight", "Distance"]);
    }

    #[test]
    fn test_lowercase_k_is_not_kelvin() {
        let processor = standard_processor().unwrap();
        assert!(processor.process_message("I make 100k a year").is_empty());
    }

    #[test]
    fn test_blood_sugar_auto_converts() {
        let processor = standard_processor().unwrap();
        let results = processor.process_message("my reading was 90 mg/dL");
        assert_eq!(results.len(), 1);
        assert!(doubles_are_equal(5.0, converted_value(&results[0], "mmol/L")));
    }

    #[test]
    fn test_speed_requires_request() {
        let processor = standard_processor().unwrap();
        let results = processor.process_message("doing 100 km/hr");
        assert!(matches!(results[0], ProcessingResult::ValueNotConverted { .. }));

        let result = processor.process_conversion_request("100 km/hr to mph");
        let mph = converted_value(&result, "mph");
        assert!((mph - 62.137).abs() < 1e-3);
    }

    #[test]
    fn test_longer_alias_preferred() {
        let processor = standard_processor().unwrap();
        let result = processor.process_specific_conversion_request("10 m/s", "kph");
        assert!(doubles_are_equal(36.0, converted_value(&result, "kph")));
    }

    #[test]
    fn test_distance_and_weight() {
        let processor = standard_processor().unwrap();
        let result = processor.process_conversion_request("5 km in m");
        assert!(doubles_are_equal(5000.0, converted_value(&result, "m")));

        let result = processor.process_conversion_request("10 kg -> lb");
        assert!(doubles_are_equal(22.046, converted_value(&result, "lbs")));
    }

    #[test]
    fn test_boiling_point() {
        let processor = standard_processor().unwrap();
        let results = processor.process_message("water boils at 212 F");
        assert!(doubles_are_equal(100.0, converted_value(&results[0], "°C")));
    }

    proptest! {
        #[test]
        fn prop_every_unit_round_trips(x in -1.0e4f64..1.0e4) {
            for dimension in standard_dimensions() {
                for unit in dimension.units() {
                    let back = unit.from_base(unit.to_base(x));
                    prop_assert!(
                        doubles_are_equal(x, back),
                        "{} did not round-trip {}: {}", unit.full_name(), x, back
                    );
                }
            }
        }
    }
}
