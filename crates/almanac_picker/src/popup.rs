//! Popup visibility and outside-pointer dismissal.
//!
//! A picker owns two popups: the calendar and the hour/minute/second
//! lists. [`PopupController`] tracks their open state and the rule that
//! a click on the field trigger leaves at most one of them open.
//! Outside-click dismissal is split between the host and the core: the
//! host owns a [`PointerWatchRegistry`] per window and feeds it every
//! pointer-down, widgets subscribe on mount with their own hit test and
//! unsubscribe on teardown.

use std::sync::{Arc, Mutex};

use slotmap::{new_key_type, SlotMap};

use crate::picker::DateTimePicker;

/// The pointer-interactive regions of a picker, as the host lays them
/// out. The core never sees coordinates, only hit-test answers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PopupSurface {
    /// The collapsed field with the calendar trigger.
    Trigger,
    /// The calendar popup.
    Calendar,
    /// The hour/minute/second list popup.
    TimeList,
}

/// Open/closed state of the two picker popups.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PopupController {
    calendar_open: bool,
    time_open: bool,
}

impl PopupController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calendar_open(&self) -> bool {
        self.calendar_open
    }

    pub fn time_open(&self) -> bool {
        self.time_open
    }

    /// Field-trigger click: the time popup gives way, then the calendar
    /// toggles. At most one popup stays open afterwards. Returns the
    /// calendar's new state.
    pub fn toggle_calendar(&mut self) -> bool {
        self.time_open = false;
        self.calendar_open = !self.calendar_open;
        self.calendar_open
    }

    /// Time-trigger click: toggles the time popup and leaves the
    /// calendar alone. Returns the time popup's new state.
    pub fn toggle_time(&mut self) -> bool {
        self.time_open = !self.time_open;
        self.time_open
    }

    pub fn close_calendar(&mut self) {
        self.calendar_open = false;
    }

    pub fn close_time(&mut self) {
        self.time_open = false;
    }

    /// Close every open popup the pointer is not over. `hit` is the
    /// host's hit test per surface; a pointer on the trigger never
    /// dismisses, its own click handler decides. Returns whether
    /// anything closed.
    pub fn dismiss_outside<F: Fn(PopupSurface) -> bool>(&mut self, hit: F) -> bool {
        if hit(PopupSurface::Trigger) {
            return false;
        }
        let mut closed = false;
        if self.calendar_open && !hit(PopupSurface::Calendar) {
            self.calendar_open = false;
            closed = true;
        }
        if self.time_open && !hit(PopupSurface::TimeList) {
            self.time_open = false;
            closed = true;
        }
        if closed {
            tracing::debug!("PopupController::dismiss_outside - pointer left popups");
        }
        closed
    }
}

new_key_type! {
    /// Handle for one pointer-watch subscription.
    pub struct WatchId;
}

/// Callback receiving window pointer-down coordinates.
pub type PointerWatch = Box<dyn FnMut(f32, f32) + Send>;

/// Window-level pointer-down fan-out.
///
/// The host owns one per window and calls [`dispatch`] for every
/// pointer-down it sees. A widget that subscribed on mount must call
/// [`unsubscribe`] on teardown, otherwise the window keeps a callback
/// into a widget that no longer exists.
///
/// [`dispatch`]: PointerWatchRegistry::dispatch
/// [`unsubscribe`]: PointerWatchRegistry::unsubscribe
#[derive(Default)]
pub struct PointerWatchRegistry {
    watches: SlotMap<WatchId, PointerWatch>,
}

impl PointerWatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a watch and return its handle.
    pub fn subscribe<F: FnMut(f32, f32) + Send + 'static>(&mut self, watch: F) -> WatchId {
        self.watches.insert(Box::new(watch))
    }

    /// Drop a watch. Stale handles are ignored.
    pub fn unsubscribe(&mut self, id: WatchId) {
        self.watches.remove(id);
    }

    /// Number of live watches.
    pub fn len(&self) -> usize {
        self.watches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.watches.is_empty()
    }

    /// Fan a pointer-down out to every live watch.
    pub fn dispatch(&mut self, x: f32, y: f32) {
        for (_, watch) in self.watches.iter_mut() {
            watch(x, y);
        }
    }
}

/// A picker shared between the host's event plumbing and its views.
pub type SharedPicker = Arc<Mutex<DateTimePicker>>;

/// Wrap a picker for sharing with a pointer watch.
pub fn shared(picker: DateTimePicker) -> SharedPicker {
    Arc::new(Mutex::new(picker))
}

/// Subscribe a picker's outside-click dismissal to a window registry.
///
/// `hit` maps a window point to "is it inside this surface" for the
/// picker's layout. The watch holds only a weak handle, so dropping
/// the picker leaves it inert, but the returned id must still be
/// passed to [`PointerWatchRegistry::unsubscribe`] on teardown.
pub fn mount_dismissal<F>(
    registry: &mut PointerWatchRegistry,
    picker: &SharedPicker,
    hit: F,
) -> WatchId
where
    F: Fn(f32, f32, PopupSurface) -> bool + Send + 'static,
{
    let weak = Arc::downgrade(picker);
    registry.subscribe(move |x, y| {
        let Some(strong) = weak.upgrade() else {
            return;
        };
        let mut picker = strong.lock().unwrap();
        picker.dismiss_outside(|surface| hit(x, y, surface));
    })
}
