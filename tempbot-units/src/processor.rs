//! Request processing - free-text scanning and explicit conversion requests

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, error};

use crate::error::CatalogError;
use crate::numeric::MAX_CONVERSIONS;
use crate::parse::{split_conversion_request, trailing_number, LabelMatch, UnitGrammar};
use crate::result::{ProcessingError, ProcessingResult};
use crate::{Dimension, Unit, UnitValue};

/// Read-only conversion engine built once from a fixed set of dimensions.
///
/// Holds no per-call state, so a single instance can serve concurrent callers.
#[derive(Debug)]
pub struct UnitProcessor {
    dimensions: Vec<Arc<Dimension>>,
    /// Every detectable name across all dimensions
    units_by_name: HashMap<String, (Arc<Dimension>, Arc<Unit>)>,
    grammar: UnitGrammar,
}

impl UnitProcessor {
    /// Validate the catalog and compile the scanner.
    ///
    /// Fails on duplicate dimension names, aliases claimed by more than one
    /// unit, empty dimensions and inverted or non-finite ranges.
    pub fn new(dimensions: Vec<Dimension>) -> Result<Self, CatalogError> {
        let mut dimension_names = HashSet::new();
        let mut units_by_name: HashMap<String, (Arc<Dimension>, Arc<Unit>)> = HashMap::new();
        let mut registered = Vec::with_capacity(dimensions.len());

        for dimension in dimensions {
            dimension.validate()?;
            if !dimension_names.insert(dimension.name().to_ascii_lowercase()) {
                return Err(CatalogError::DuplicateDimension {
                    name: dimension.name().to_string(),
                });
            }

            let dimension = Arc::new(dimension);
            for unit in dimension.units() {
                for alias in unit.detectable_names() {
                    if let Some((_, existing)) = units_by_name.get(alias) {
                        return Err(CatalogError::AliasCollision {
                            alias: alias.clone(),
                            first: existing.full_name().to_string(),
                            second: unit.full_name().to_string(),
                        });
                    }
                    units_by_name.insert(alias.clone(), (Arc::clone(&dimension), Arc::clone(unit)));
                }
            }
            registered.push(dimension);
        }

        let grammar = UnitGrammar::new(units_by_name.keys().map(String::as_str))?;

        Ok(UnitProcessor {
            dimensions: registered,
            units_by_name,
            grammar,
        })
    }

    // ============ Catalog queries ============

    /// Dimensions in declaration order
    pub fn dimensions(&self) -> &[Arc<Dimension>] {
        &self.dimensions
    }

    /// Case-insensitive dimension lookup
    pub fn dimension_by_name(&self, name: &str) -> Option<&Arc<Dimension>> {
        let name = name.trim();
        self.dimensions
            .iter()
            .find(|d| d.name().eq_ignore_ascii_case(name))
    }

    /// Resolve a detectable name (case-sensitive) to its dimension and unit
    pub fn unit_by_name(&self, label: &str) -> Option<(&Arc<Dimension>, &Arc<Unit>)> {
        self.units_by_name
            .get(label)
            .map(|(dimension, unit)| (dimension, unit))
    }

    /// Names of dimensions that convert automatically from free text
    pub fn eager_dimensions(&self) -> Vec<&str> {
        self.dimension_names_where(|d| d.has_eager_conversions())
    }

    /// Names of dimensions that only convert on request
    pub fn non_eager_dimensions(&self) -> Vec<&str> {
        self.dimension_names_where(|d| !d.has_eager_conversions())
    }

    fn dimension_names_where(&self, predicate: impl Fn(&Dimension) -> bool) -> Vec<&str> {
        self.dimensions
            .iter()
            .filter(|d| predicate(d))
            .map(|d| d.name())
            .collect()
    }

    // ============ Processing ============

    /// Scan free text for quantities and convert each one.
    ///
    /// Results follow source order, repeated values are dropped and at most
    /// `MAX_CONVERSIONS` results are returned. Per-occurrence failures are
    /// returned as results; the scan always continues.
    pub fn process_message(&self, text: &str) -> Vec<ProcessingResult> {
        let mut results = Vec::new();
        if text.trim().is_empty() {
            return results;
        }

        let mut seen: Vec<UnitValue> = Vec::new();
        let mut cursor = 0;
        while results.len() < MAX_CONVERSIONS {
            let Some(found) = self.grammar.find_label(text, cursor) else {
                break;
            };
            cursor = found.end;

            match self.extract_value(&found) {
                Ok((dimension, value)) => {
                    if seen.iter().any(|s| s.approx_eq(&value)) {
                        continue;
                    }
                    seen.push(value.clone());

                    if value.unit.is_default_conversion_source() {
                        results.push(dimension.convert_unit(&value));
                    } else {
                        results.push(ProcessingResult::ValueNotConverted { source_value: value });
                    }
                }
                Err(err) => {
                    if let ProcessingError::UnknownUnitType { bad_label } = &err {
                        error!(label = %bad_label, "scanned label is missing from the unit index");
                    }
                    results.push(err.into());
                }
            }
        }

        debug!(results = results.len(), "processed message");
        results
    }

    /// Convert the first quantity in `source_text` into `destination_label`.
    ///
    /// The destination may be any unit of the source's dimension, whether or
    /// not it is a default conversion result.
    pub fn process_specific_conversion_request(
        &self,
        source_text: &str,
        destination_label: &str,
    ) -> ProcessingResult {
        let destination_label = destination_label.trim();

        let Some(found) = self.grammar.find_label(source_text, 0) else {
            return ProcessingError::UnknownUnitType {
                bad_label: source_text.trim().to_string(),
            }
            .into();
        };

        let (dimension, source_value) = match self.extract_value(&found) {
            Ok(extracted) => extracted,
            Err(err) => return err.into(),
        };

        let Some((destination_dimension, destination)) = self.unit_by_name(destination_label) else {
            return ProcessingError::UnknownUnitType {
                bad_label: destination_label.to_string(),
            }
            .into();
        };

        if destination_dimension.name() != dimension.name() {
            return ProcessingError::DimensionMismatch {
                source_value,
                source_dimension: dimension.name().to_string(),
                destination_dimension: destination_dimension.name().to_string(),
            }
            .into();
        }

        dimension.convert_specific_units(&source_value, destination)
    }

    /// Handle a one-line request such as "5 C to F" or "10 mph -> kph"
    pub fn process_conversion_request(&self, text: &str) -> ProcessingResult {
        match split_conversion_request(text) {
            Some((source, destination)) => {
                self.process_specific_conversion_request(source, destination)
            }
            None => ProcessingError::UnknownUnitType {
                bad_label: text.trim().to_string(),
            }
            .into(),
        }
    }

    /// Numeral and unit for one label occurrence
    fn extract_value(
        &self,
        found: &LabelMatch<'_>,
    ) -> Result<(&Arc<Dimension>, UnitValue), ProcessingError> {
        let unparseable = || ProcessingError::UnparseableNumber {
            bad_text: found.number_region.trim().to_string(),
        };

        let numeral = trailing_number(found.number_region).ok_or_else(unparseable)?;
        let value = match numeral.parse::<f64>() {
            Ok(value) if value.is_finite() => value,
            Ok(_) | Err(_) => {
                error!(numeral, "matched numeral could not be parsed to a finite value");
                return Err(ProcessingError::UnparseableNumber {
                    bad_text: numeral.to_string(),
                });
            }
        };

        let (dimension, unit) =
            self.unit_by_name(found.label)
                .ok_or_else(|| ProcessingError::UnknownUnitType {
                    bad_label: found.label.to_string(),
                })?;

        Ok((dimension, UnitValue::new(Arc::clone(unit), value)))
    }
}
