//! Outcome of processing a single detected or requested quantity

use thiserror::Error;

use crate::UnitValue;

/// One result per accepted occurrence (scan mode) or per request
#[derive(Debug, Clone)]
pub enum ProcessingResult {
    /// Successful conversion; `values` never contains the source unit
    ConvertedValues {
        source_value: UnitValue,
        values: Vec<UnitValue>,
    },
    /// Recognized in free text, but the unit does not auto-convert
    ValueNotConverted { source_value: UnitValue },
    Error(ProcessingError),
}

impl ProcessingResult {
    /// The detected source value, when one was resolved
    pub fn source_value(&self) -> Option<&UnitValue> {
        match self {
            ProcessingResult::ConvertedValues { source_value, .. }
            | ProcessingResult::ValueNotConverted { source_value } => Some(source_value),
            ProcessingResult::Error(err) => err.source_value(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ProcessingResult::Error(_))
    }
}

impl From<ProcessingError> for ProcessingResult {
    fn from(err: ProcessingError) -> Self {
        ProcessingResult::Error(err)
    }
}

/// Per-occurrence failures, reported as values rather than aborting a scan
#[derive(Error, Debug, Clone)]
pub enum ProcessingError {
    #[error("{0}")]
    UnitOutOfRange(RangeViolation),

    #[error("can't convert units from {source_dimension} to {destination_dimension}")]
    DimensionMismatch {
        source_value: UnitValue,
        source_dimension: String,
        destination_dimension: String,
    },

    #[error("unknown unit type: {bad_label}")]
    UnknownUnitType { bad_label: String },

    #[error("could not get a numeric value from: {bad_text}")]
    UnparseableNumber { bad_text: String },

    #[error("a system error occurred while processing a unit conversion")]
    SystemError,
}

impl ProcessingError {
    pub fn source_value(&self) -> Option<&UnitValue> {
        match self {
            ProcessingError::UnitOutOfRange(violation) => Some(&violation.source_value),
            ProcessingError::DimensionMismatch { source_value, .. } => Some(source_value),
            _ => None,
        }
    }
}

/// Which bound a value violated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitType {
    Maximum,
    Minimum,
}

impl LimitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LimitType::Maximum => "maximum",
            LimitType::Minimum => "minimum",
        }
    }
}

/// A value outside its dimension's range, with the bound expressed in the source's unit
#[derive(Debug, Clone)]
pub struct RangeViolation {
    pub source_value: UnitValue,
    pub range_limiting_value: UnitValue,
}

impl RangeViolation {
    /// Derived by comparing the offending value to the limit, not by which bound tripped
    pub fn limit_type(&self) -> LimitType {
        if self.source_value.value > self.range_limiting_value.value {
            LimitType::Maximum
        } else {
            LimitType::Minimum
        }
    }

    /// Sentence naming both values and the bound, with each value rendered by `render`
    pub fn describe(&self, render: impl Fn(&UnitValue) -> String) -> String {
        let limit_type = self.limit_type();
        let comparison = match limit_type {
            LimitType::Maximum => "greater",
            LimitType::Minimum => "less",
        };
        format!(
            "{} is {} than {}, the {}",
            render(&self.source_value),
            comparison,
            render(&self.range_limiting_value),
            limit_type.as_str()
        )
    }
}

impl std::fmt::Display for RangeViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.describe(|value| value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Conversion, Unit};
    use std::sync::Arc;

    fn celsius() -> Arc<Unit> {
        Arc::new(Unit::new("degrees Celsius", "°C", Conversion::identity()))
    }

    #[test]
    fn test_limit_type_minimum() {
        let violation = RangeViolation {
            source_value: UnitValue::new(celsius(), -300.0),
            range_limiting_value: UnitValue::new(celsius(), -273.15),
        };
        assert_eq!(violation.limit_type(), LimitType::Minimum);
        assert_eq!(violation.to_string(), "-300 °C is less than -273.15 °C, the minimum");
    }

    #[test]
    fn test_limit_type_maximum() {
        let violation = RangeViolation {
            source_value: UnitValue::new(celsius(), 200.0),
            range_limiting_value: UnitValue::new(celsius(), 100.0),
        };
        assert_eq!(violation.limit_type(), LimitType::Maximum);
        assert_eq!(violation.to_string(), "200 °C is greater than 100 °C, the maximum");
    }

    #[test]
    fn test_describe_with_custom_rendering() {
        let violation = RangeViolation {
            source_value: UnitValue::new(celsius(), -300.0),
            range_limiting_value: UnitValue::new(celsius(), -273.15),
        };
        assert_eq!(
            violation.describe(|v| format!("<{}>", v.value)),
            "<-300> is less than <-273.15>, the minimum"
        );
    }

    #[test]
    fn test_source_value_accessor() {
        let value = UnitValue::new(celsius(), 5.0);
        let result = ProcessingResult::ValueNotConverted { source_value: value };
        assert_eq!(result.source_value().map(|v| v.value), Some(5.0));
        assert!(!result.is_error());

        let err: ProcessingResult = ProcessingError::UnknownUnitType {
            bad_label: "asdf".to_string(),
        }
        .into();
        assert!(err.source_value().is_none());
        assert!(err.is_error());
    }

    #[test]
    fn test_error_messages() {
        let err = ProcessingError::UnparseableNumber { bad_text: "x F".to_string() };
        assert_eq!(err.to_string(), "could not get a numeric value from: x F");
        assert_eq!(
            ProcessingError::SystemError.to_string(),
            "a system error occurred while processing a unit conversion"
        );
    }
}
