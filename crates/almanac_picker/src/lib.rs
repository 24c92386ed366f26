//! # Almanac Picker
//!
//! The embeddable date/time picker core. This crate holds everything a
//! host toolkit needs short of pixels:
//!
//! - **Selection state machine** - composite value, decomposed date and
//!   time parts, and two-way synchronization that settles in one round
//! - **Calendar grid** - a fixed 42-cell month grid with per-cell
//!   display flags, rebuilt or re-flagged as interactions demand
//! - **Popup coordination** - calendar and time popup open state, the
//!   pending time edit, and outside-pointer dismissal wiring
//!
//! ## Example
//!
//! ```
//! use almanac_core::Precision;
//! use almanac_picker::{DateTimePicker, PickerConfig};
//!
//! let mut picker = DateTimePicker::new(PickerConfig::new(Precision::Minutes));
//!
//! // Typed text commits through parse and clamp, then echoes back in
//! // canonical form.
//! let shown = picker.commit_value_text("2024-06-01 09:30");
//! assert_eq!(shown, "2024-06-01 09:30");
//! assert_eq!(picker.date_text(), "2024-06-01");
//!
//! // The grid followed the new selection into June.
//! assert!(picker.grid().iter().any(|cell| cell.selected));
//! ```

pub mod grid;
pub mod picker;
pub mod popup;

pub use grid::{first_of_month, month_grid, GridCell, GridRefresh, GRID_CELLS};
pub use picker::{hour_labels, minute_labels, DateTimePicker, PickerConfig};
pub use popup::{
    mount_dismissal, shared, PointerWatch, PointerWatchRegistry, PopupController, PopupSurface,
    SharedPicker, WatchId,
};
