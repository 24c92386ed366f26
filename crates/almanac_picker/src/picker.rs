//! The date/time picker state core.
//!
//! [`DateTimePicker`] owns the composite selection and everything
//! derived from it:
//!
//! - Decomposed date and time parts, kept in sync both ways behind a
//!   propagation guard
//! - The displayed month and its 42-cell grid
//! - Open state of the calendar and time popups, plus the uncommitted
//!   time edit while the time popup is up
//! - The three field texts, committed with strict parsing and clamping
//!
//! Rendering is the host's job: it draws from the accessors here and
//! feeds pointer and text events back into the methods. All methods
//! run to completion synchronously; the host calls them from its event
//! loop one at a time.

use chrono::{Months, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use almanac_core::{
    system_now, Bounds, NowFn, ObservedValue, Precision, PropagationGuard, TextCodec,
};

use crate::grid::{first_of_month, month_grid, GridCell, GridRefresh};
use crate::popup::{PopupController, PopupSurface};

/// Row labels for the hour list (`00` through `23`).
pub fn hour_labels() -> Vec<String> {
    (0..24).map(|n| format!("{n:02}")).collect()
}

/// Row labels for the minute list and the second list (`00` through
/// `59`).
pub fn minute_labels() -> Vec<String> {
    (0..60).map(|n| format!("{n:02}")).collect()
}

/// Construction-time picker settings.
pub struct PickerConfig {
    /// Time-of-day precision of produced values.
    pub precision: Precision,
    /// Initial selection.
    pub value: Option<NaiveDateTime>,
    /// Inclusive selectable range.
    pub bounds: Bounds,
    /// Wall-clock source for "today" and for seeding edits when
    /// nothing is selected.
    pub now: NowFn,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            precision: Precision::default(),
            value: None,
            bounds: Bounds::UNBOUNDED,
            now: Box::new(system_now),
        }
    }
}

impl PickerConfig {
    /// Create a config at the given precision.
    pub fn new(precision: Precision) -> Self {
        Self {
            precision,
            ..Default::default()
        }
    }

    /// Set the initial selection.
    pub fn value(mut self, value: NaiveDateTime) -> Self {
        self.value = Some(value);
        self
    }

    /// Set the selectable range.
    pub fn bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Replace the wall-clock source. Tests pin time with this.
    pub fn now<F: Fn() -> NaiveDateTime + Send + 'static>(mut self, now: F) -> Self {
        self.now = Box::new(now);
        self
    }
}

/// Date/time picker state machine.
pub struct DateTimePicker {
    precision: Precision,
    codec: TextCodec,
    now: NowFn,
    value: ObservedValue<Option<NaiveDateTime>>,
    date_part: ObservedValue<Option<NaiveDate>>,
    time_part: ObservedValue<Option<NaiveTime>>,
    displayed_month: ObservedValue<NaiveDate>,
    bounds: ObservedValue<Bounds>,
    guard: PropagationGuard,
    grid: Vec<GridCell>,
    popups: PopupController,
    /// Uncommitted time edit; `Some` exactly while the time popup is
    /// open.
    pending_time: Option<NaiveDateTime>,
}

impl DateTimePicker {
    pub fn new(config: PickerConfig) -> Self {
        let PickerConfig {
            precision,
            value,
            bounds,
            now,
        } = config;
        let value = value.map(|dt| precision.truncate(dt));
        let today = now().date();
        let displayed = first_of_month(value.map(|dt| dt.date()).unwrap_or(today));
        let grid = month_grid(displayed, value, bounds, today);
        Self {
            precision,
            codec: TextCodec::new(precision),
            now,
            value: ObservedValue::new(value),
            date_part: ObservedValue::new(value.map(|dt| dt.date())),
            time_part: ObservedValue::new(value.map(|dt| dt.time())),
            displayed_month: ObservedValue::new(displayed),
            bounds: ObservedValue::new(bounds),
            guard: PropagationGuard::new(),
            grid,
            popups: PopupController::new(),
            pending_time: None,
        }
    }

    // ========== Accessors ==========

    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// The codec for this picker's field texts; patterns and
    /// placeholders come from here.
    pub fn codec(&self) -> &TextCodec {
        &self.codec
    }

    /// The committed selection.
    pub fn value(&self) -> Option<NaiveDateTime> {
        *self.value.get()
    }

    pub fn date_part(&self) -> Option<NaiveDate> {
        *self.date_part.get()
    }

    pub fn time_part(&self) -> Option<NaiveTime> {
        *self.time_part.get()
    }

    /// First day of the month the calendar shows.
    pub fn displayed_month(&self) -> NaiveDate {
        *self.displayed_month.get()
    }

    pub fn bounds(&self) -> Bounds {
        *self.bounds.get()
    }

    /// The current 42-cell calendar grid.
    pub fn grid(&self) -> &[GridCell] {
        &self.grid
    }

    pub fn calendar_open(&self) -> bool {
        self.popups.calendar_open()
    }

    pub fn time_open(&self) -> bool {
        self.popups.time_open()
    }

    /// The uncommitted time edit, `Some` while the time popup is open.
    pub fn pending_time(&self) -> Option<NaiveDateTime> {
        self.pending_time
    }

    /// Selected rows of the hour, minute and second lists for the
    /// pending edit; `None` while the time popup is closed. Hosts
    /// scroll their lists to these rows.
    pub fn time_list_selection(&self) -> Option<(usize, usize, usize)> {
        self.pending_time
            .map(|dt| (dt.hour() as usize, dt.minute() as usize, dt.second() as usize))
    }

    /// Canonical text of the full-value field.
    pub fn value_text(&self) -> String {
        self.codec.format_value(self.value())
    }

    /// Canonical text of the date field, derived from the date part.
    pub fn date_text(&self) -> String {
        self.codec.format_date(self.date_part())
    }

    /// Canonical text of the time field, derived from the time part.
    pub fn time_text(&self) -> String {
        self.codec.format_time(self.time_part())
    }

    // ========== Change subscriptions ==========

    /// Run `listener` after every committed selection change. Fires
    /// exactly once per externally visible change.
    pub fn on_value_change<F: FnMut(&Option<NaiveDateTime>) + Send + 'static>(&mut self, listener: F) {
        self.value.subscribe(listener);
    }

    pub fn on_date_part_change<F: FnMut(&Option<NaiveDate>) + Send + 'static>(&mut self, listener: F) {
        self.date_part.subscribe(listener);
    }

    pub fn on_time_part_change<F: FnMut(&Option<NaiveTime>) + Send + 'static>(&mut self, listener: F) {
        self.time_part.subscribe(listener);
    }

    pub fn on_month_change<F: FnMut(&NaiveDate) + Send + 'static>(&mut self, listener: F) {
        self.displayed_month.subscribe(listener);
    }

    pub fn on_bounds_change<F: FnMut(&Bounds) + Send + 'static>(&mut self, listener: F) {
        self.bounds.subscribe(listener);
    }

    // ========== Value synchronization ==========

    /// Set the selection. The value is truncated to the precision; an
    /// actual change resets the displayed month, rebuilds the grid,
    /// re-derives the parts and then notifies value listeners.
    pub fn set_value(&mut self, value: Option<NaiveDateTime>) {
        self.apply_value(value);
    }

    fn apply_value(&mut self, value: Option<NaiveDateTime>) {
        let value = value.map(|dt| self.precision.truncate(dt));
        if !self.value.set_silent(value) {
            return;
        }
        tracing::debug!("DateTimePicker::apply_value - {:?}", value);
        if let Some(dt) = value {
            self.displayed_month.set(first_of_month(dt.date()));
        }
        self.rebuild_grid();
        // Guarded: a part-driven update already holds the right parts,
        // deriving again would ping-pong forever.
        if self.guard.enter() {
            self.date_part.set(value.map(|dt| dt.date()));
            self.time_part.set(value.map(|dt| dt.time()));
            self.guard.exit();
        }
        self.value.notify();
    }

    /// Set the date part directly. Recombines into the selection
    /// unless a value-driven derive is already running.
    pub fn set_date_part(&mut self, date: Option<NaiveDate>) {
        if !self.date_part.set(date) {
            return;
        }
        self.recombine_parts();
    }

    /// Set the time part directly. Recombines into the selection
    /// unless a value-driven derive is already running.
    pub fn set_time_part(&mut self, time: Option<NaiveTime>) {
        let time = time.map(|t| self.precision.truncate_time(t));
        if !self.time_part.set(time) {
            return;
        }
        self.recombine_parts();
    }

    fn recombine_parts(&mut self) {
        if !self.guard.enter() {
            return;
        }
        let combined = match (*self.date_part.get(), *self.time_part.get()) {
            (Some(date), Some(time)) => Some(date.and_time(time)),
            (Some(date), None) => Some(date.and_time(NaiveTime::MIN)),
            (None, Some(time)) => Some((self.now)().date().and_time(time)),
            (None, None) => None,
        };
        self.apply_value(combined);
        self.guard.exit();
    }

    // ========== Calendar interactions ==========

    /// Handle a day-cell click. Clicks on out-of-range dates are
    /// ignored; otherwise the date is committed with the current
    /// time-of-day kept (midnight at date-only precision), clamped
    /// into bounds, and the time popup closes.
    ///
    /// Returns the grid refresh the click warrants, `None` when the
    /// click was ignored.
    pub fn click_day(&mut self, date: NaiveDate) -> Option<GridRefresh> {
        if !self.bounds().contains_date(date) {
            tracing::debug!("DateTimePicker::click_day - {} out of range", date);
            return None;
        }
        let candidate = date.and_time(self.current_or_now().time());
        let committed = self.bounds().clamp(candidate);
        let before = self.displayed_month();
        self.cancel_time();
        self.apply_value(Some(committed));
        if self.displayed_month() == before {
            Some(GridRefresh::FlagsOnly)
        } else {
            Some(GridRefresh::Full)
        }
    }

    /// Show the previous month. The selection is untouched.
    pub fn prev_month(&mut self) {
        self.shift_displayed(-1);
    }

    /// Show the next month. The selection is untouched.
    pub fn next_month(&mut self) {
        self.shift_displayed(1);
    }

    /// Show the same month one year back.
    pub fn prev_year(&mut self) {
        self.shift_displayed(-12);
    }

    /// Show the same month one year ahead.
    pub fn next_year(&mut self) {
        self.shift_displayed(12);
    }

    fn shift_displayed(&mut self, months: i32) {
        let current = self.displayed_month();
        let shifted = if months < 0 {
            current - Months::new(months.unsigned_abs())
        } else {
            current + Months::new(months as u32)
        };
        self.show_month(shifted);
    }

    fn show_month(&mut self, date: NaiveDate) {
        if self.displayed_month.set(first_of_month(date)) {
            self.rebuild_grid();
        }
    }

    /// Select "now": clamped into bounds, truncated to the precision
    /// (midnight at date-only precision), committed, and the calendar
    /// popup closes. The calendar snaps back to the current month even
    /// when the value itself did not move.
    pub fn jump_to_now(&mut self) {
        let committed = self.precision.truncate(self.bounds().clamp((self.now)()));
        tracing::debug!("DateTimePicker::jump_to_now - {}", committed);
        self.apply_value(Some(committed));
        self.show_month(committed.date());
        self.popups.close_calendar();
    }

    /// Replace the selectable range. The current selection is never
    /// re-clamped; cells that fell out of the new range merely become
    /// disabled.
    pub fn set_bounds(&mut self, bounds: Bounds) {
        if !self.bounds.set(bounds) {
            return;
        }
        tracing::debug!("DateTimePicker::set_bounds - {:?}", bounds);
        self.rebuild_grid();
    }

    fn rebuild_grid(&mut self) {
        self.grid = month_grid(
            self.displayed_month(),
            self.value(),
            self.bounds(),
            (self.now)().date(),
        );
    }

    // ========== Popups and the pending time edit ==========

    /// Field-trigger click: the time popup closes (discarding any
    /// pending edit) and the calendar toggles. Returns the calendar's
    /// new state.
    pub fn toggle_calendar_popup(&mut self) -> bool {
        self.pending_time = None;
        self.popups.toggle_calendar()
    }

    /// Time-trigger click: toggle the time popup. Opening seeds the
    /// pending edit from the selection, or from "now" when nothing is
    /// selected; closing without confirming discards it. Ignored at
    /// date-only precision. Returns the popup's new state.
    pub fn toggle_time_popup(&mut self) -> bool {
        if !self.precision.has_time() {
            return false;
        }
        if self.popups.toggle_time() {
            self.pending_time = Some(self.current_or_now());
            true
        } else {
            self.pending_time = None;
            false
        }
    }

    /// Move the pending edit to another hour. Ignored while the time
    /// popup is closed.
    pub fn select_hour(&mut self, hour: u32) {
        if hour >= 24 {
            return;
        }
        if let Some(pending) = self.pending_time {
            let time = NaiveTime::from_hms_opt(hour, pending.minute(), pending.second())
                .unwrap_or_else(|| pending.time());
            self.pending_time = Some(pending.date().and_time(time));
        }
    }

    /// Move the pending edit to another minute. Ignored while the time
    /// popup is closed.
    pub fn select_minute(&mut self, minute: u32) {
        if minute >= 60 {
            return;
        }
        if let Some(pending) = self.pending_time {
            let time = NaiveTime::from_hms_opt(pending.hour(), minute, pending.second())
                .unwrap_or_else(|| pending.time());
            self.pending_time = Some(pending.date().and_time(time));
        }
    }

    /// Move the pending edit to another second. Meaningful only at
    /// seconds precision; ignored otherwise.
    pub fn select_second(&mut self, second: u32) {
        if second >= 60 || !self.precision.has_seconds() {
            return;
        }
        if let Some(pending) = self.pending_time {
            let time = NaiveTime::from_hms_opt(pending.hour(), pending.minute(), second)
                .unwrap_or_else(|| pending.time());
            self.pending_time = Some(pending.date().and_time(time));
        }
    }

    /// Commit the pending edit as the selection, clamped into bounds,
    /// and close the time popup. A no-op while the popup is closed.
    pub fn confirm_time(&mut self) {
        let Some(pending) = self.pending_time.take() else {
            return;
        };
        self.popups.close_time();
        let committed = self.bounds().clamp(pending);
        tracing::debug!("DateTimePicker::confirm_time - {}", committed);
        self.apply_value(Some(committed));
    }

    /// Discard the pending edit and close the time popup; the
    /// selection stays as it was.
    pub fn cancel_time(&mut self) {
        self.pending_time = None;
        self.popups.close_time();
    }

    /// A window pointer-down landed at a point the host has already
    /// hit-tested per surface: close every open popup the pointer is
    /// not over. Closing the time popup this way discards the pending
    /// edit. Returns whether anything closed.
    pub fn dismiss_outside<F: Fn(PopupSurface) -> bool>(&mut self, hit: F) -> bool {
        let closed = self.popups.dismiss_outside(hit);
        if !self.popups.time_open() {
            self.pending_time = None;
        }
        closed
    }

    // ========== Text commits ==========

    /// Commit typed text from the full-value field.
    ///
    /// Returns the text the field must show afterwards: the input
    /// itself when blank (the value stays untouched), the formatted
    /// current value after a failed parse, or the canonical formatting
    /// of the merged and clamped result.
    pub fn commit_value_text(&mut self, input: &str) -> String {
        match self.codec.parse_value(input) {
            Ok(None) => input.to_string(),
            Err(_) => self.codec.format_value(Some(self.current_or_now())),
            Ok(Some(parsed)) => {
                let committed = self.clamp_typed(parsed);
                self.apply_value(Some(committed));
                self.codec.format_value(Some(committed))
            }
        }
    }

    /// Commit typed text from the date field; the prior time-of-day is
    /// kept. Returns the text the field must show afterwards.
    pub fn commit_date_text(&mut self, input: &str) -> String {
        match self.codec.parse_date(input) {
            Ok(None) => input.to_string(),
            Err(_) => self.codec.format_date(Some(self.current_or_now().date())),
            Ok(Some(parsed)) => {
                let seed = self.current_or_now();
                let committed = self.clamp_typed(parsed.and_time(seed.time()));
                self.apply_value(Some(committed));
                self.codec.format_date(Some(committed.date()))
            }
        }
    }

    /// Commit typed text from the time field; the prior date is kept.
    /// Returns the text the field must show afterwards.
    pub fn commit_time_text(&mut self, input: &str) -> String {
        match self.codec.parse_time(input) {
            Ok(None) => input.to_string(),
            Err(_) => self.codec.format_time(Some(self.current_or_now().time())),
            Ok(Some(parsed)) => {
                let seed = self.current_or_now();
                let committed = self.clamp_typed(seed.date().and_time(parsed));
                self.apply_value(Some(committed));
                self.codec.format_time(Some(committed.time()))
            }
        }
    }

    /// Date-field confirm button: commit the text, then close the
    /// calendar popup whatever the outcome.
    pub fn confirm_date_text(&mut self, input: &str) -> String {
        let text = self.commit_date_text(input);
        self.popups.close_calendar();
        text
    }

    // The date component clamps first so a typed date past the range
    // keeps its typed time-of-day; the full clamp after that still
    // honors time-of-day bounds on the edge dates.
    fn clamp_typed(&self, value: NaiveDateTime) -> NaiveDateTime {
        let bounds = self.bounds();
        bounds.clamp(bounds.clamp_date(value.date()).and_time(value.time()))
    }

    fn current_or_now(&self) -> NaiveDateTime {
        self.precision
            .truncate(self.value().unwrap_or_else(|| (self.now)()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn d(y: i32, mo: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, mo, day).unwrap()
    }

    fn dt(y: i32, mo: u32, day: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        d(y, mo, day).and_hms_opt(h, mi, s).unwrap()
    }

    fn t(h: u32, mi: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, mi, s).unwrap()
    }

    // Pinned clock: Friday 2024-03-15, 10:30:45.
    fn test_now() -> NaiveDateTime {
        dt(2024, 3, 15, 10, 30, 45)
    }

    fn picker(precision: Precision) -> DateTimePicker {
        DateTimePicker::new(PickerConfig::new(precision).now(test_now))
    }

    fn january_bounds() -> Bounds {
        Bounds::new(Some(dt(2024, 1, 10, 0, 0, 0)), Some(dt(2024, 1, 20, 23, 59, 59)))
    }

    #[test]
    fn new_picker_shows_the_current_month() {
        let p = picker(Precision::Seconds);
        assert_eq!(p.value(), None);
        assert_eq!(p.displayed_month(), d(2024, 3, 1));
        assert_eq!(p.grid().len(), 42);
        assert_eq!(p.value_text(), "");
    }

    #[test]
    fn initial_value_anchors_the_month() {
        let p = DateTimePicker::new(
            PickerConfig::new(Precision::Seconds)
                .now(test_now)
                .value(dt(2023, 11, 7, 8, 0, 0)),
        );
        assert_eq!(p.displayed_month(), d(2023, 11, 1));
        assert_eq!(p.date_part(), Some(d(2023, 11, 7)));
        assert_eq!(p.time_part(), Some(t(8, 0, 0)));
    }

    #[test]
    fn set_value_derives_both_parts() {
        let mut p = picker(Precision::Seconds);
        p.set_value(Some(dt(2024, 1, 15, 8, 30, 0)));
        assert_eq!(p.value(), Some(dt(2024, 1, 15, 8, 30, 0)));
        assert_eq!(p.date_part(), Some(d(2024, 1, 15)));
        assert_eq!(p.time_part(), Some(t(8, 30, 0)));
        assert_eq!(p.displayed_month(), d(2024, 1, 1));
    }

    #[test]
    fn clearing_the_value_clears_both_parts() {
        let mut p = picker(Precision::Seconds);
        p.set_value(Some(dt(2024, 1, 15, 8, 30, 0)));
        p.set_value(None);
        assert_eq!(p.value(), None);
        assert_eq!(p.date_part(), None);
        assert_eq!(p.time_part(), None);
        // The month stays where it was; it is never null.
        assert_eq!(p.displayed_month(), d(2024, 1, 1));
        assert!(p.grid().iter().all(|c| !c.selected));
    }

    #[test]
    fn minutes_precision_truncates_committed_values() {
        let mut p = picker(Precision::Minutes);
        p.set_value(Some(dt(2024, 1, 15, 8, 30, 45)));
        assert_eq!(p.value(), Some(dt(2024, 1, 15, 8, 30, 0)));
        assert_eq!(p.value_text(), "2024-01-15 08:30");
    }

    #[test]
    fn both_parts_combine_into_the_value() {
        let mut p = picker(Precision::Seconds);
        p.set_date_part(Some(d(2024, 1, 15)));
        p.set_time_part(Some(t(8, 30, 0)));
        assert_eq!(p.value(), Some(dt(2024, 1, 15, 8, 30, 0)));
    }

    #[test]
    fn date_part_alone_selects_midnight() {
        let mut p = picker(Precision::Seconds);
        p.set_date_part(Some(d(2024, 1, 15)));
        assert_eq!(p.value(), Some(dt(2024, 1, 15, 0, 0, 0)));
        // The time part stays unset; midnight was borrowed, not chosen.
        assert_eq!(p.time_part(), None);
    }

    #[test]
    fn time_part_alone_borrows_todays_date() {
        let mut p = picker(Precision::Seconds);
        p.set_time_part(Some(t(8, 30, 0)));
        assert_eq!(p.value(), Some(dt(2024, 3, 15, 8, 30, 0)));
        assert_eq!(p.date_part(), None);
    }

    #[test]
    fn clearing_both_parts_clears_the_value() {
        let mut p = picker(Precision::Seconds);
        p.set_value(Some(dt(2024, 1, 15, 8, 30, 0)));
        p.set_date_part(None);
        p.set_time_part(None);
        assert_eq!(p.value(), None);
    }

    #[test]
    fn propagation_settles_in_one_round() {
        let mut p = picker(Precision::Seconds);
        let value_fires = Arc::new(AtomicUsize::new(0));
        let date_fires = Arc::new(AtomicUsize::new(0));
        let time_fires = Arc::new(AtomicUsize::new(0));
        let (v, dp, tp) = (value_fires.clone(), date_fires.clone(), time_fires.clone());
        p.on_value_change(move |_| {
            v.fetch_add(1, Ordering::SeqCst);
        });
        p.on_date_part_change(move |_| {
            dp.fetch_add(1, Ordering::SeqCst);
        });
        p.on_time_part_change(move |_| {
            tp.fetch_add(1, Ordering::SeqCst);
        });

        p.set_value(Some(dt(2024, 1, 15, 8, 30, 0)));
        assert_eq!(value_fires.load(Ordering::SeqCst), 1);
        assert_eq!(date_fires.load(Ordering::SeqCst), 1);
        assert_eq!(time_fires.load(Ordering::SeqCst), 1);

        // Part-driven: one more write per cell, no echo after that.
        p.set_date_part(Some(d(2024, 1, 16)));
        assert_eq!(value_fires.load(Ordering::SeqCst), 2);
        assert_eq!(date_fires.load(Ordering::SeqCst), 2);
        assert_eq!(time_fires.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn day_click_keeps_the_time_of_day() {
        let mut p = picker(Precision::Seconds);
        p.set_value(Some(dt(2024, 1, 15, 8, 30, 15)));
        let refresh = p.click_day(d(2024, 1, 18));
        assert_eq!(refresh, Some(GridRefresh::FlagsOnly));
        assert_eq!(p.value(), Some(dt(2024, 1, 18, 8, 30, 15)));
    }

    #[test]
    fn day_click_without_a_selection_seeds_the_clock_time() {
        let mut p = picker(Precision::Seconds);
        p.click_day(d(2024, 3, 20));
        assert_eq!(p.value(), Some(dt(2024, 3, 20, 10, 30, 45)));
    }

    #[test]
    fn day_click_at_date_only_precision_selects_midnight() {
        let mut p = picker(Precision::DateOnly);
        p.click_day(d(2024, 3, 20));
        assert_eq!(p.value(), Some(dt(2024, 3, 20, 0, 0, 0)));
    }

    #[test]
    fn out_of_range_day_click_is_ignored() {
        let mut p = DateTimePicker::new(
            PickerConfig::new(Precision::Seconds)
                .now(test_now)
                .bounds(january_bounds())
                .value(dt(2024, 1, 15, 8, 30, 0)),
        );
        // 2023-12-05 renders as a disabled spillover cell of January.
        assert_eq!(p.click_day(d(2023, 12, 5)), None);
        assert_eq!(p.value(), Some(dt(2024, 1, 15, 8, 30, 0)));
        assert_eq!(p.displayed_month(), d(2024, 1, 1));
    }

    #[test]
    fn out_of_range_day_click_leaves_the_time_popup_open() {
        let mut p = DateTimePicker::new(
            PickerConfig::new(Precision::Seconds)
                .now(test_now)
                .bounds(january_bounds())
                .value(dt(2024, 1, 15, 8, 30, 0)),
        );
        p.toggle_time_popup();
        p.click_day(d(2023, 12, 5));
        assert!(p.time_open());
    }

    #[test]
    fn spillover_day_click_switches_the_month() {
        let mut p = picker(Precision::Seconds);
        p.set_value(Some(dt(2024, 3, 15, 8, 30, 0)));
        // 2024-04-02 sits on the March grid as a spillover cell.
        let refresh = p.click_day(d(2024, 4, 2));
        assert_eq!(refresh, Some(GridRefresh::Full));
        assert_eq!(p.displayed_month(), d(2024, 4, 1));
        assert_eq!(p.value(), Some(dt(2024, 4, 2, 8, 30, 0)));
        let cell = p.grid().iter().find(|c| c.date == d(2024, 4, 2)).unwrap();
        assert!(cell.selected && cell.in_displayed_month);
    }

    #[test]
    fn day_click_closes_the_time_popup() {
        let mut p = picker(Precision::Seconds);
        p.toggle_time_popup();
        assert!(p.time_open());
        p.click_day(d(2024, 3, 20));
        assert!(!p.time_open());
        assert_eq!(p.pending_time(), None);
    }

    #[test]
    fn day_click_clamps_the_combined_value() {
        let bounds = Bounds::new(Some(dt(2024, 1, 10, 9, 0, 0)), None);
        let mut p = DateTimePicker::new(
            PickerConfig::new(Precision::Seconds)
                .now(test_now)
                .bounds(bounds)
                .value(dt(2024, 1, 15, 8, 30, 0)),
        );
        // The edge date is in range, but 08:30 on it is before the min.
        p.click_day(d(2024, 1, 10));
        assert_eq!(p.value(), Some(dt(2024, 1, 10, 9, 0, 0)));
    }

    #[test]
    fn month_navigation_moves_the_grid_not_the_value() {
        let mut p = picker(Precision::Seconds);
        p.set_value(Some(dt(2024, 3, 15, 8, 0, 0)));
        p.next_month();
        assert_eq!(p.displayed_month(), d(2024, 4, 1));
        p.prev_month();
        p.prev_month();
        assert_eq!(p.displayed_month(), d(2024, 2, 1));
        p.next_year();
        assert_eq!(p.displayed_month(), d(2025, 2, 1));
        p.prev_year();
        assert_eq!(p.displayed_month(), d(2024, 2, 1));
        assert_eq!(p.value(), Some(dt(2024, 3, 15, 8, 0, 0)));
        // No cell of February carries the March selection.
        assert!(p.grid().iter().all(|c| !c.selected));
    }

    #[test]
    fn year_navigation_from_january_and_december() {
        let mut p = picker(Precision::Seconds);
        p.set_value(Some(dt(2024, 1, 15, 0, 0, 0)));
        p.prev_year();
        assert_eq!(p.displayed_month(), d(2023, 1, 1));
        p.set_value(Some(dt(2024, 12, 15, 0, 0, 0)));
        p.next_year();
        assert_eq!(p.displayed_month(), d(2025, 12, 1));
    }

    #[test]
    fn jump_to_now_commits_the_clamped_clock() {
        let mut p = picker(Precision::Seconds);
        p.jump_to_now();
        assert_eq!(p.value(), Some(dt(2024, 3, 15, 10, 30, 45)));

        let mut bounded = DateTimePicker::new(
            PickerConfig::new(Precision::Seconds)
                .now(test_now)
                .bounds(january_bounds()),
        );
        bounded.jump_to_now();
        assert_eq!(bounded.value(), Some(dt(2024, 1, 20, 23, 59, 59)));
    }

    #[test]
    fn jump_to_now_at_date_only_precision_is_midnight() {
        let mut p = picker(Precision::DateOnly);
        p.jump_to_now();
        assert_eq!(p.value(), Some(dt(2024, 3, 15, 0, 0, 0)));
    }

    #[test]
    fn jump_to_now_snaps_the_month_back_and_closes_the_calendar() {
        let mut p = picker(Precision::Seconds);
        p.jump_to_now();
        p.toggle_calendar_popup();
        p.next_month();
        p.next_month();
        assert_eq!(p.displayed_month(), d(2024, 5, 1));

        // The value is already "now": only the month and popup move.
        p.jump_to_now();
        assert_eq!(p.displayed_month(), d(2024, 3, 1));
        assert!(!p.calendar_open());
    }

    #[test]
    fn bounds_change_never_rewrites_the_selection() {
        let mut p = picker(Precision::Seconds);
        p.set_value(Some(dt(2024, 1, 25, 8, 30, 0)));
        p.set_bounds(january_bounds());
        assert_eq!(p.value(), Some(dt(2024, 1, 25, 8, 30, 0)));
        // The cell disables instead.
        let cell = p.grid().iter().find(|c| c.date == d(2024, 1, 25)).unwrap();
        assert!(!cell.enabled && !cell.selected);
    }

    #[test]
    fn time_popup_seeds_from_the_selection() {
        let mut p = picker(Precision::Seconds);
        p.set_value(Some(dt(2024, 1, 15, 8, 30, 15)));
        assert!(p.toggle_time_popup());
        assert_eq!(p.pending_time(), Some(dt(2024, 1, 15, 8, 30, 15)));
        assert_eq!(p.time_list_selection(), Some((8, 30, 15)));
    }

    #[test]
    fn time_popup_seeds_from_the_clock_when_unset() {
        let mut p = picker(Precision::Seconds);
        p.toggle_time_popup();
        assert_eq!(p.pending_time(), Some(test_now()));
        assert_eq!(p.time_list_selection(), Some((10, 30, 45)));
    }

    #[test]
    fn time_popup_never_opens_at_date_only_precision() {
        let mut p = picker(Precision::DateOnly);
        assert!(!p.toggle_time_popup());
        assert!(!p.time_open());
        assert_eq!(p.pending_time(), None);
    }

    #[test]
    fn list_selections_edit_only_the_pending_time() {
        let mut p = picker(Precision::Seconds);
        p.set_value(Some(dt(2024, 1, 15, 8, 30, 15)));
        p.toggle_time_popup();
        p.select_hour(14);
        p.select_minute(5);
        p.select_second(59);
        assert_eq!(p.pending_time(), Some(dt(2024, 1, 15, 14, 5, 59)));
        assert_eq!(p.value(), Some(dt(2024, 1, 15, 8, 30, 15)));
    }

    #[test]
    fn list_selections_without_the_popup_are_ignored() {
        let mut p = picker(Precision::Seconds);
        p.set_value(Some(dt(2024, 1, 15, 8, 30, 15)));
        p.select_hour(14);
        assert_eq!(p.value(), Some(dt(2024, 1, 15, 8, 30, 15)));
        assert_eq!(p.pending_time(), None);
    }

    #[test]
    fn second_selection_is_ignored_at_minutes_precision() {
        let mut p = picker(Precision::Minutes);
        p.set_value(Some(dt(2024, 1, 15, 8, 30, 0)));
        p.toggle_time_popup();
        p.select_second(45);
        assert_eq!(p.pending_time(), Some(dt(2024, 1, 15, 8, 30, 0)));
    }

    #[test]
    fn confirm_commits_the_pending_time() {
        let mut p = picker(Precision::Seconds);
        p.set_value(Some(dt(2024, 1, 15, 8, 30, 15)));
        p.toggle_time_popup();
        p.select_hour(14);
        p.confirm_time();
        assert_eq!(p.value(), Some(dt(2024, 1, 15, 14, 30, 15)));
        assert!(!p.time_open());
        assert_eq!(p.pending_time(), None);
    }

    #[test]
    fn confirm_clamps_into_bounds() {
        let bounds = Bounds::new(None, Some(dt(2024, 1, 15, 12, 0, 0)));
        let mut p = DateTimePicker::new(
            PickerConfig::new(Precision::Seconds)
                .now(test_now)
                .bounds(bounds)
                .value(dt(2024, 1, 15, 8, 30, 0)),
        );
        p.toggle_time_popup();
        p.select_hour(15);
        p.confirm_time();
        assert_eq!(p.value(), Some(dt(2024, 1, 15, 12, 0, 0)));
    }

    #[test]
    fn cancel_discards_the_pending_time() {
        let mut p = picker(Precision::Seconds);
        p.toggle_time_popup();
        p.select_hour(14);
        p.cancel_time();
        assert_eq!(p.value(), None);
        assert!(!p.time_open());
        assert_eq!(p.pending_time(), None);
    }

    #[test]
    fn calendar_toggle_discards_the_pending_time() {
        let mut p = picker(Precision::Seconds);
        p.toggle_time_popup();
        assert!(p.pending_time().is_some());
        assert!(p.toggle_calendar_popup());
        assert!(!p.time_open());
        assert_eq!(p.pending_time(), None);
        assert!(p.calendar_open());
    }

    #[test]
    fn blank_text_commit_changes_nothing() {
        let mut p = picker(Precision::Seconds);
        p.set_value(Some(dt(2024, 1, 15, 8, 30, 0)));
        assert_eq!(p.commit_value_text("   "), "   ");
        assert_eq!(p.value(), Some(dt(2024, 1, 15, 8, 30, 0)));
    }

    #[test]
    fn unparseable_text_reverts_to_the_current_value() {
        let mut p = picker(Precision::Seconds);
        p.set_value(Some(dt(2024, 1, 15, 8, 30, 0)));
        assert_eq!(p.commit_value_text("hello"), "2024-01-15 08:30:00");
        assert_eq!(p.value(), Some(dt(2024, 1, 15, 8, 30, 0)));
        assert_eq!(p.commit_date_text("2024-13-40"), "2024-01-15");
        assert_eq!(p.commit_time_text("25:61:00"), "08:30:00");
    }

    #[test]
    fn unparseable_text_reverts_to_now_when_unset() {
        let mut p = picker(Precision::Seconds);
        assert_eq!(p.commit_value_text("hello"), "2024-03-15 10:30:45");
        assert_eq!(p.value(), None);
    }

    #[test]
    fn value_text_commit_merges_and_clamps_date_first() {
        let mut p = DateTimePicker::new(
            PickerConfig::new(Precision::Seconds)
                .now(test_now)
                .bounds(january_bounds())
                .value(dt(2024, 1, 15, 8, 30, 0)),
        );
        let shown = p.commit_value_text("2024-01-25 09:00:00");
        assert_eq!(p.value(), Some(dt(2024, 1, 20, 9, 0, 0)));
        assert_eq!(shown, "2024-01-20 09:00:00");
    }

    #[test]
    fn value_text_commit_honors_time_bounds_on_edge_dates() {
        let bounds = Bounds::new(None, Some(dt(2024, 1, 20, 12, 0, 0)));
        let mut p = DateTimePicker::new(
            PickerConfig::new(Precision::Seconds)
                .now(test_now)
                .bounds(bounds),
        );
        let shown = p.commit_value_text("2024-01-20 15:00:00");
        assert_eq!(p.value(), Some(dt(2024, 1, 20, 12, 0, 0)));
        assert_eq!(shown, "2024-01-20 12:00:00");
    }

    #[test]
    fn date_text_commit_keeps_the_time_of_day() {
        let mut p = picker(Precision::Seconds);
        p.set_value(Some(dt(2024, 1, 15, 8, 30, 15)));
        let shown = p.commit_date_text("2024-02-03");
        assert_eq!(p.value(), Some(dt(2024, 2, 3, 8, 30, 15)));
        assert_eq!(shown, "2024-02-03");
        assert_eq!(p.displayed_month(), d(2024, 2, 1));
    }

    #[test]
    fn date_text_commit_clamps_and_echoes_the_clamped_date() {
        let mut p = DateTimePicker::new(
            PickerConfig::new(Precision::Seconds)
                .now(test_now)
                .bounds(january_bounds())
                .value(dt(2024, 1, 15, 8, 30, 0)),
        );
        let shown = p.commit_date_text("2024-03-01");
        assert_eq!(shown, "2024-01-20");
        assert_eq!(p.value(), Some(dt(2024, 1, 20, 8, 30, 0)));
    }

    #[test]
    fn time_text_commit_keeps_the_date() {
        let mut p = picker(Precision::Seconds);
        p.set_value(Some(dt(2024, 1, 15, 8, 30, 0)));
        let shown = p.commit_time_text("14:05:59");
        assert_eq!(p.value(), Some(dt(2024, 1, 15, 14, 5, 59)));
        assert_eq!(shown, "14:05:59");
    }

    #[test]
    fn time_text_commit_borrows_today_when_unset() {
        let mut p = picker(Precision::Seconds);
        let shown = p.commit_time_text("14:00:00");
        assert_eq!(p.value(), Some(dt(2024, 3, 15, 14, 0, 0)));
        assert_eq!(shown, "14:00:00");
    }

    #[test]
    fn confirm_date_text_closes_the_calendar() {
        let mut p = picker(Precision::Seconds);
        p.toggle_calendar_popup();
        let shown = p.confirm_date_text("2024-02-03");
        assert_eq!(shown, "2024-02-03");
        assert!(!p.calendar_open());

        // Even a failed parse closes it.
        p.toggle_calendar_popup();
        p.confirm_date_text("nope");
        assert!(!p.calendar_open());
    }

    #[test]
    fn dismissal_discards_a_pending_edit() {
        let mut p = picker(Precision::Seconds);
        p.toggle_time_popup();
        p.select_hour(14);
        assert!(p.dismiss_outside(|_| false));
        assert!(!p.time_open());
        assert_eq!(p.pending_time(), None);
        assert_eq!(p.value(), None);
    }

    #[test]
    fn field_texts_follow_the_parts() {
        let mut p = picker(Precision::Seconds);
        p.set_value(Some(dt(2024, 1, 15, 8, 30, 5)));
        assert_eq!(p.value_text(), "2024-01-15 08:30:05");
        assert_eq!(p.date_text(), "2024-01-15");
        assert_eq!(p.time_text(), "08:30:05");

        p.set_value(None);
        assert_eq!(p.value_text(), "");
        assert_eq!(p.date_text(), "");
        assert_eq!(p.time_text(), "");
    }

    #[test]
    fn list_labels_are_two_digit() {
        let hours = hour_labels();
        assert_eq!(hours.len(), 24);
        assert_eq!(hours[0], "00");
        assert_eq!(hours[23], "23");

        let minutes = minute_labels();
        assert_eq!(minutes.len(), 60);
        assert_eq!(minutes[5], "05");
        assert_eq!(minutes[59], "59");
    }
}
