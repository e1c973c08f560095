//! # naturaltime
//!
//! Deterministic natural-language time parsing.
//!
//! Informal phrases such as "tomorrow 9am-5pm", "next Monday 10:00-11:30" or
//! "January 20" are resolved against a caller-supplied reference instant into
//! half-open [`Range`]s. The engine is stateless: every call is a pure function
//! of the phrase, the reference instant and the [`ResolveOptions`].
//!
//! ## Modules
//!
//! - [`range`] — Half-open interval algebra (contains, overlaps, intersection, union)
//! - [`parse`] — `parse_date`, `parse_range`, `parse_multi`
//! - [`interchange`] — RFC 3339 reference strings and JSON range arrays for embedding hosts
//! - [`error`] — Error types
//!
//! ## Example
//!
//! ```
//! use chrono::{DateTime, Duration};
//! use naturaltime::parse_range;
//!
//! let reference = DateTime::parse_from_rfc3339("2023-01-15T12:00:00Z").unwrap();
//! let range = parse_range("next Monday 10:00-11:30", &reference).unwrap();
//! assert_eq!(range.to_string(), "[2023-01-16T10:00:00+00:00, 2023-01-16T11:30:00+00:00)");
//! assert_eq!(range.duration(), Duration::minutes(90));
//! ```

mod assemble;
pub mod error;
pub mod interchange;
pub mod parse;
pub mod range;
mod resolve;
mod rules;
mod token;

pub use error::{NaturalTimeError, Result};
pub use interchange::{
    decode_ranges, encode_ranges, parse_multi_json, parse_reference, reference_in_timezone,
};
pub use parse::{
    parse_date, parse_date_with_options, parse_multi, parse_multi_with_options, parse_range,
    parse_range_with_options,
};
pub use range::Range;
pub use resolve::{CrossMidnight, ResolveOptions, WeekStartDay};
