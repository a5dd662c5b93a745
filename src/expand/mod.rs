//! Pattern-driven model expansion
//!
//! Bottom-up:
//! - [`range`]: pattern strings to lazy string sequences
//! - [`value`]: any model value to a lazy value stream
//! - [`list`]: one model to a list of concrete records, fields in lock-step
//! - [`keyed`]: a mapping whose keys are patterns to one flat mapping

pub mod keyed;
pub mod list;
pub mod range;
pub mod value;

pub use keyed::expand_keyed;
pub use list::expand_list;
pub use range::{expand_pattern, expand_range, is_range_pattern, PatternSeq, RangeIter};
pub use value::{expand_value, Record, ValueStream};
