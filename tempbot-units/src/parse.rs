//! Text scanning - locate "<number><unit label>" occurrences in free-form text
//!
//! Two patterns cooperate:
//! - the label pattern finds a known unit label preceded by a digit and an
//!   optional space; it consumes that digit
//! - the number pattern finds the signed decimal numeral that ends exactly
//!   where the consumed digit ends

use std::sync::LazyLock;

use regex::Regex;

/// Signed decimal numeral anchored to the end of the searched region.
/// "123", "-1.5", "+.5" match; "100." does not.
static NUMBER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[+-]?(?:[0-9]+(?:\.[0-9]+)?|\.[0-9]+)$").expect("number pattern is valid")
});

/// Separators accepted between the source quantity and the destination unit
const REQUEST_SEPARATORS: [&str; 4] = [" to ", " in ", "->", "→"];

/// Compiled label grammar over a fixed alias vocabulary
#[derive(Debug, Clone)]
pub struct UnitGrammar {
    label_pattern: Option<Regex>,
}

/// A unit label found in text
#[derive(Debug, Clone, PartialEq)]
pub struct LabelMatch<'t> {
    /// The alias text as written
    pub label: &'t str,
    /// Text from the scan cursor through the digit before the label
    pub number_region: &'t str,
    /// Byte offset just past the label
    pub end: usize,
}

impl UnitGrammar {
    /// Build the label pattern from every detectable name.
    ///
    /// Longer aliases are tried first so "m/s" wins over "m".
    pub fn new<'a>(aliases: impl IntoIterator<Item = &'a str>) -> Result<Self, regex::Error> {
        let mut aliases: Vec<&str> = aliases.into_iter().filter(|a| !a.is_empty()).collect();
        aliases.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        aliases.dedup();

        if aliases.is_empty() {
            return Ok(UnitGrammar { label_pattern: None });
        }

        let alternatives: Vec<String> = aliases.iter().map(|a| regex::escape(a)).collect();
        let pattern = format!(r"[0-9] ?(?P<label>{})\b", alternatives.join("|"));
        Ok(UnitGrammar {
            label_pattern: Some(Regex::new(&pattern)?),
        })
    }

    /// Find the next label at or after `cursor`.
    ///
    /// Word boundaries are evaluated against the whole text, not the suffix.
    pub fn find_label<'t>(&self, text: &'t str, cursor: usize) -> Option<LabelMatch<'t>> {
        let pattern = self.label_pattern.as_ref()?;
        let caps = pattern.captures_at(text, cursor)?;
        let whole = caps.get(0)?;
        let label = caps.name("label")?;
        // the leading digit is ASCII, so start + 1 is a char boundary
        Some(LabelMatch {
            label: label.as_str(),
            number_region: &text[cursor..whole.start() + 1],
            end: whole.end(),
        })
    }
}

/// The numeral ending exactly at the end of `region`, if any
pub fn trailing_number(region: &str) -> Option<&str> {
    NUMBER_PATTERN.find(region).map(|m| m.as_str())
}

/// Split "5 C to F" style requests into source text and destination label.
///
/// The last separator wins; " to " and " in " match case-insensitively.
pub fn split_conversion_request(text: &str) -> Option<(&str, &str)> {
    let lowered = text.to_ascii_lowercase();
    let (pos, sep) = REQUEST_SEPARATORS
        .iter()
        .filter_map(|sep| lowered.rfind(sep).map(|pos| (pos, *sep)))
        .max_by_key(|(pos, _)| *pos)?;

    let source = text[..pos].trim();
    let destination = text[pos + sep.len()..].trim();
    if source.is_empty() || destination.is_empty() {
        return None;
    }
    Some((source, destination))
}
