//! Help text built from the loaded catalog

use tempbot_units::{Dimension, UnitProcessor};

/// Help for `unit_type` when it names a dimension, otherwise general help
pub fn help_text(processor: &UnitProcessor, unit_type: Option<&str>) -> String {
    unit_type
        .and_then(|name| processor.dimension_by_name(name))
        .map(|dimension| dimension_help(dimension))
        .unwrap_or_else(|| general_help(processor))
}

pub fn general_help(processor: &UnitProcessor) -> String {
    let mut text = String::from(
        "TempBot is a unit-conversion bot. It can convert a variety of units to make your \
         conversations easier with friends who might use different temperature units from you, \
         or just satisfy your curiosity.\n\n\
         TempBot will automatically convert units of the following types if it sees them in a \
         message:\n",
    );
    for name in processor.eager_dimensions() {
        text.push_str(&format!("- {name}\n"));
    }

    text.push_str("\nTempBot can also convert units of the following types when asked:\n");
    for name in processor.non_eager_dimensions() {
        text.push_str(&format!("- {name}\n"));
    }

    text.push_str(
        "\nTo see what units TempBot knows about for each type, ask for help and include \
         the name of one of these unit types.",
    );
    text
}

pub fn dimension_help(dimension: &Dimension) -> String {
    let lines: Vec<String> = dimension
        .units()
        .iter()
        .map(|unit| format!("> **{}** ({})", unit.full_name(), unit.detectable_names().join(", ")))
        .collect();
    format!(
        "These are the {} units I can convert:\n{}",
        dimension.name(),
        lines.join("\n")
    )
}
