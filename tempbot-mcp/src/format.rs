//! Rendering processing results as chat-style markdown and as JSON

use serde_json::{json, Value as JsonValue};
use tempbot_units::{format_number, ProcessingError, ProcessingResult, UnitValue};

/// Render results in order, one newline-terminated block per visible result
pub fn format_results(results: &[ProcessingResult]) -> String {
    let mut output = String::new();
    for result in results {
        format_result(result, &mut output);
    }
    output
}

fn format_result(result: &ProcessingResult, output: &mut String) {
    match result {
        ProcessingResult::ConvertedValues { source_value, values } => match values.as_slice() {
            [] => {}
            [single] => {
                output.push_str(&format!("{} = {}\n", bold(source_value), bold(single)));
            }
            many => {
                output.push_str(&format!("{} = \n", bold(source_value)));
                for value in many {
                    output.push_str(&format!("> {}\n", bold(value)));
                }
            }
        },
        ProcessingResult::ValueNotConverted { .. } => {}
        ProcessingResult::Error(err) => {
            output.push_str(&format_error(err));
            output.push('\n');
        }
    }
}

fn format_error(err: &ProcessingError) -> String {
    match err {
        ProcessingError::UnitOutOfRange(violation) => format!("{}.", violation.describe(bold)),
        ProcessingError::DimensionMismatch {
            source_dimension,
            destination_dimension,
            ..
        } => format!("Can't convert units from {source_dimension} to {destination_dimension}."),
        ProcessingError::UnknownUnitType { bad_label } => format!("Unknown unit type: {bad_label}."),
        ProcessingError::UnparseableNumber { bad_text } => {
            format!("Could not get a numeric value from: {bad_text}.")
        }
        ProcessingError::SystemError => {
            "A system error occurred while processing a unit conversion.".to_string()
        }
    }
}

fn bold(value: &UnitValue) -> String {
    format!("**{}**", value)
}

// ============ JSON ============

/// Structured form for tool clients, tagged by `kind`
pub fn result_to_json(result: &ProcessingResult) -> JsonValue {
    match result {
        ProcessingResult::ConvertedValues { source_value, values } => json!({
            "kind": "converted_values",
            "source": unit_value_to_json(source_value),
            "values": values.iter().map(unit_value_to_json).collect::<Vec<_>>(),
        }),
        ProcessingResult::ValueNotConverted { source_value } => json!({
            "kind": "value_not_converted",
            "source": unit_value_to_json(source_value),
        }),
        ProcessingResult::Error(err) => error_to_json(err),
    }
}

fn error_to_json(err: &ProcessingError) -> JsonValue {
    match err {
        ProcessingError::UnitOutOfRange(violation) => json!({
            "kind": "unit_out_of_range",
            "source": unit_value_to_json(&violation.source_value),
            "limit": unit_value_to_json(&violation.range_limiting_value),
            "limit_type": violation.limit_type().as_str(),
            "message": format_error(err),
        }),
        ProcessingError::DimensionMismatch {
            source_value,
            source_dimension,
            destination_dimension,
        } => json!({
            "kind": "dimension_mismatch",
            "source": unit_value_to_json(source_value),
            "source_dimension": source_dimension,
            "destination_dimension": destination_dimension,
            "message": format_error(err),
        }),
        ProcessingError::UnknownUnitType { bad_label } => json!({
            "kind": "unknown_unit_type",
            "label": bad_label,
            "message": format_error(err),
        }),
        ProcessingError::UnparseableNumber { bad_text } => json!({
            "kind": "unparseable_number",
            "text": bad_text,
            "message": format_error(err),
        }),
        ProcessingError::SystemError => json!({
            "kind": "system_error",
            "message": format_error(err),
        }),
    }
}

fn unit_value_to_json(value: &UnitValue) -> JsonValue {
    json!({
        "value": value.value,
        "unit": value.unit.short_name(),
        "unit_name": value.unit.full_name(),
        "display": format!("{} {}", format_number(value.value), value.unit.short_name()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempbot_units::{standard_processor, UnitProcessor};

    fn processor() -> UnitProcessor {
        standard_processor().unwrap()
    }

    #[test]
    fn test_single_conversion() {
        let results = processor().process_message("it's 32F outside");
        assert_eq!(format_results(&results), "**32 °F** = **0 °C**\n");
    }

    #[test]
    fn test_multiple_results_in_order() {
        let results = processor().process_message("212F or 100 mg/dL");
        assert_eq!(
            format_results(&results),
            "**212 °F** = **100 °C**\n**100 mg/dL** = **5.556 mmol/L**\n"
        );
    }

    #[test]
    fn test_value_not_converted_renders_nothing() {
        let results = processor().process_message("500K and 5 km");
        assert_eq!(results.len(), 2);
        assert_eq!(format_results(&results), "");
    }

    #[test]
    fn test_out_of_range() {
        let results = processor().process_message("-300 C");
        assert_eq!(
            format_results(&results),
            "**-300 °C** is less than **-273.15 °C**, the minimum.\n"
        );
    }

    #[test]
    fn test_error_messages() {
        let p = processor();
        let mismatch = p.process_specific_conversion_request("5C", "kg");
        assert_eq!(
            format_results(&[mismatch]),
            "Can't convert units from Temperature to Weight.\n"
        );

        let unknown = p.process_specific_conversion_request("5C", "asdf");
        assert_eq!(format_results(&[unknown]), "Unknown unit type: asdf.\n");

        let system: ProcessingResult = ProcessingError::SystemError.into();
        assert_eq!(
            format_results(&[system]),
            "A system error occurred while processing a unit conversion.\n"
        );

        let unparseable: ProcessingResult = ProcessingError::UnparseableNumber {
            bad_text: "x".to_string(),
        }
        .into();
        assert_eq!(format_results(&[unparseable]), "Could not get a numeric value from: x.\n");
    }

    #[test]
    fn test_several_values_block() {
        let p = processor();
        let kelvin = p.unit_by_name("K").unwrap().1.clone();
        let celsius = p.unit_by_name("C").unwrap().1.clone();
        let fahrenheit = p.unit_by_name("F").unwrap().1.clone();
        let result = ProcessingResult::ConvertedValues {
            source_value: UnitValue::new(kelvin, 1000.0),
            values: vec![
                UnitValue::new(celsius, 726.85),
                UnitValue::new(fahrenheit, 1340.33),
            ],
        };
        assert_eq!(
            format_results(&[result]),
            "**1,000 K** = \n> **726.85 °C**\n> **1,340.33 °F**\n"
        );
    }

    #[test]
    fn test_json_kinds() {
        let p = processor();
        let converted = result_to_json(&p.process_specific_conversion_request("5C", "Kelvin"));
        assert_eq!(converted["kind"], "converted_values");
        assert_eq!(converted["source"]["unit"], "°C");
        assert_eq!(converted["values"][0]["display"], "278.15 K");

        let range = result_to_json(&p.process_specific_conversion_request("-20 K", "Celsius"));
        assert_eq!(range["kind"], "unit_out_of_range");
        assert_eq!(range["limit_type"], "minimum");

        let mismatch = result_to_json(&p.process_specific_conversion_request("5C", "mph"));
        assert_eq!(mismatch["kind"], "dimension_mismatch");
        assert_eq!(mismatch["destination_dimension"], "Speed");

        let unknown = result_to_json(&p.process_conversion_request("nonsense"));
        assert_eq!(unknown["kind"], "unknown_unit_type");
        assert_eq!(unknown["label"], "nonsense");
    }
}
