//! Dimensions: named groups of mutually convertible units

use std::collections::HashMap;
use std::sync::Arc;

use tracing::error;

use crate::error::CatalogError;
use crate::result::{ProcessingError, ProcessingResult, RangeViolation};
use crate::{Unit, UnitValue};

/// A category of units sharing one base scale, with an optional valid range
#[derive(Debug, Clone)]
pub struct Dimension {
    name: String,
    units: Vec<Arc<Unit>>,
    /// Every detectable name of every member unit
    unit_name_index: HashMap<String, Arc<Unit>>,
    /// Bounds on the base scale
    min_value: Option<f64>,
    max_value: Option<f64>,
    has_eager_conversions: bool,
}

impl Dimension {
    /// Create a dimension from its units in display order.
    ///
    /// Alias uniqueness is checked when the dimension is handed to a
    /// `UnitProcessor`; here the first unit to claim a name keeps it.
    pub fn new(name: &str, units: Vec<Unit>) -> Self {
        let units: Vec<Arc<Unit>> = units.into_iter().map(Arc::new).collect();
        let mut unit_name_index = HashMap::new();
        for unit in &units {
            for alias in unit.detectable_names() {
                unit_name_index
                    .entry(alias.clone())
                    .or_insert_with(|| Arc::clone(unit));
            }
        }
        let has_eager_conversions = units.iter().any(|u| u.is_default_conversion_source());

        Dimension {
            name: name.to_string(),
            units,
            unit_name_index,
            min_value: None,
            max_value: None,
            has_eager_conversions,
        }
    }

    /// Set the lowest valid base-scale value
    pub fn with_min(mut self, min: f64) -> Self {
        self.min_value = Some(min);
        self
    }

    /// Set the highest valid base-scale value
    pub fn with_max(mut self, max: f64) -> Self {
        self.max_value = Some(max);
        self
    }

    /// Check the declaration is usable
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.units.is_empty() {
            return Err(CatalogError::EmptyDimension {
                name: self.name.clone(),
            });
        }
        let non_finite = |bound: Option<f64>| bound.is_some_and(|b| !b.is_finite());
        let inverted = matches!((self.min_value, self.max_value), (Some(min), Some(max)) if min > max);
        if non_finite(self.min_value) || non_finite(self.max_value) || inverted {
            return Err(CatalogError::InvalidRange {
                name: self.name.clone(),
                min: self.min_value,
                max: self.max_value,
            });
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Member units in declaration order
    pub fn units(&self) -> &[Arc<Unit>] {
        &self.units
    }

    /// Lower bound on the base scale, if any
    pub fn min_value(&self) -> Option<f64> {
        self.min_value
    }

    pub fn max_value(&self) -> Option<f64> {
        self.max_value
    }

    /// True when any member unit converts automatically from free text
    pub fn has_eager_conversions(&self) -> bool {
        self.has_eager_conversions
    }

    /// Look up a member unit by any detectable name (case-sensitive)
    pub fn unit_by_name(&self, name: &str) -> Option<&Arc<Unit>> {
        self.unit_name_index.get(name)
    }

    /// All detectable names of all member units
    pub fn unit_names(&self) -> impl Iterator<Item = &str> {
        self.units
            .iter()
            .flat_map(|u| u.detectable_names().iter().map(String::as_str))
    }

    pub fn contains_unit(&self, unit: &Unit) -> bool {
        self.units.iter().any(|u| **u == *unit)
    }

    /// Convert to every default-result unit other than the source.
    ///
    /// Out-of-range values yield `UnitOutOfRange` instead.
    pub fn convert_unit(&self, value: &UnitValue) -> ProcessingResult {
        if let Some(violation) = self.check_range(value) {
            return ProcessingError::UnitOutOfRange(violation).into();
        }

        let base = value.to_base();
        let values = self
            .units
            .iter()
            .filter(|unit| unit.is_default_conversion_result() && ***unit != *value.unit)
            .map(|unit| UnitValue::new(Arc::clone(unit), unit.from_base(base)))
            .collect();

        ProcessingResult::ConvertedValues {
            source_value: value.clone(),
            values,
        }
    }

    /// Convert to exactly `destination`, ignoring its default-result flag.
    ///
    /// The caller guarantees `destination` belongs to this dimension; a
    /// foreign unit is logged and reported as `SystemError`.
    pub fn convert_specific_units(
        &self,
        value: &UnitValue,
        destination: &Arc<Unit>,
    ) -> ProcessingResult {
        if let Some(violation) = self.check_range(value) {
            return ProcessingError::UnitOutOfRange(violation).into();
        }

        if !self.contains_unit(destination) {
            error!(
                dimension = %self.name,
                unit = %destination.full_name(),
                "destination unit is not a member of the source dimension"
            );
            return ProcessingError::SystemError.into();
        }

        let converted = UnitValue::new(
            Arc::clone(destination),
            destination.from_base(value.to_base()),
        );
        ProcessingResult::ConvertedValues {
            source_value: value.clone(),
            values: vec![converted],
        }
    }

    /// The violated bound, re-expressed in the source's own unit
    pub fn check_range(&self, value: &UnitValue) -> Option<RangeViolation> {
        let base = value.to_base();
        let limit = match (self.min_value, self.max_value) {
            (Some(min), _) if base < min => min,
            (_, Some(max)) if base > max => max,
            _ => return None,
        };

        Some(RangeViolation {
            source_value: value.clone(),
            range_limiting_value: UnitValue::new(Arc::clone(&value.unit), value.unit.from_base(limit)),
        })
    }
}
