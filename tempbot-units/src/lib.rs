//! TempBot Units - Detect and convert quantities in free-form text
//!
//! Finds mentions such as "32F", "-40 C" or "100 km/hr" in a message and
//! converts them to the other units of the same dimension.
//!
//! Two entry points on [`UnitProcessor`]:
//! - `process_message`: scan free text, auto-convert eligible units
//! - `process_specific_conversion_request`: convert one quantity to a named unit
//!
//! The engine is immutable after construction and safe to share across threads.

mod catalog;
mod dimension;
mod error;
mod numeric;
mod parse;
mod processor;
mod quantity;
mod result;
mod unit;

pub use catalog::{
    blood_sugar, distance, speed, standard_dimensions, standard_processor, temperature, weight,
};
pub use dimension::Dimension;
pub use error::CatalogError;
pub use numeric::{doubles_are_equal, format_number, COMPARISON_EPSILON, MAX_CONVERSIONS, PRECISION};
pub use parse::{split_conversion_request, trailing_number, LabelMatch, UnitGrammar};
pub use processor::UnitProcessor;
pub use quantity::UnitValue;
pub use result::{LimitType, ProcessingError, ProcessingResult, RangeViolation};
pub use unit::{Conversion, Unit};
