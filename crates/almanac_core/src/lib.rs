//! Almanac Core
//!
//! This crate provides the foundational primitives for the almanac
//! date/time picker widgets:
//!
//! - **Clock**: precision truncation, inclusive bounds, pluggable "now"
//! - **Codec**: strict text parsing and formatting for picker fields
//! - **Observable**: change-notification cells with a propagation guard
//!
//! # Example
//!
//! ```rust
//! use almanac_core::{Precision, TextCodec};
//!
//! let codec = TextCodec::new(Precision::Minutes);
//!
//! // Strict parse: the text must match the precision's pattern exactly.
//! let value = codec.parse_value("2024-03-07 08:30").unwrap();
//! assert_eq!(codec.format_value(value), "2024-03-07 08:30");
//!
//! // Blank input is "leave the value alone", not an error.
//! assert_eq!(codec.parse_value("   ").unwrap(), None);
//! ```

pub mod clock;
pub mod codec;
pub mod observable;

pub use clock::{system_now, Bounds, NowFn, Precision};
pub use codec::{FieldParseError, TextCodec};
pub use observable::{ChangeListener, ObservedValue, PropagationGuard};
