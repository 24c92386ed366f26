//! Fixed 6x7 month grid generation.
//!
//! The calendar popup always renders 42 day cells: the tail of the
//! previous month up to the first weekday, the displayed month itself,
//! and the head of the next month as filler. [`month_grid`] is a pure
//! function of its inputs and holds no state, so a full rebuild and a
//! flags-only refresh cannot disagree.

use almanac_core::Bounds;
use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};

/// Cells in the calendar grid: six rows of seven weekdays.
pub const GRID_CELLS: usize = 42;

/// One day slot in the calendar grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridCell {
    /// Calendar date backing the cell.
    pub date: NaiveDate,
    /// False for the dimmed spillover days of the adjacent months.
    pub in_displayed_month: bool,
    /// Within the date span of the bounds.
    pub enabled: bool,
    /// Carries the selection highlight.
    pub selected: bool,
    /// Carries the today highlight.
    pub today: bool,
}

/// How much of a previously rendered grid a change invalidated.
///
/// Advice for renderers only; the cells themselves always come from
/// the same builder either way.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridRefresh {
    /// The displayed month changed; every cell is new.
    Full,
    /// Same month; only selection and today highlights moved.
    FlagsOnly,
}

/// First day of the month containing `date`.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

/// Build the 42-cell grid for the month containing `displayed`.
///
/// Weeks start on Sunday: the grid leads with as many previous-month
/// days as the first of the month has preceding weekdays. `selected`
/// and `today` land only on enabled cells of the displayed month, with
/// selection winning when both would mark the same date.
pub fn month_grid(
    displayed: NaiveDate,
    selected: Option<NaiveDateTime>,
    bounds: Bounds,
    today: NaiveDate,
) -> Vec<GridCell> {
    let first = first_of_month(displayed);
    let lead = u64::from(first.weekday().num_days_from_sunday());
    let start = first - Days::new(lead);

    let mut cells = Vec::with_capacity(GRID_CELLS);
    for offset in 0..GRID_CELLS as u64 {
        let date = start + Days::new(offset);
        let in_month = date.year() == first.year() && date.month() == first.month();
        let enabled = bounds.contains_date(date);
        let is_selected =
            in_month && enabled && selected.is_some_and(|value| value.date() == date);
        cells.push(GridCell {
            date,
            in_displayed_month: in_month,
            enabled,
            selected: is_selected,
            today: !is_selected && in_month && enabled && date == today,
        });
    }
    cells
}
