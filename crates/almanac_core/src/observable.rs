//! Change-notification cells and the propagation guard.
//!
//! [`ObservedValue`] pairs a plain value with the listeners to run when
//! it changes, so picker state can notify a host without depending on
//! any particular binding framework. [`PropagationGuard`] is the
//! re-entrancy flag that keeps the two synchronization directions of a
//! picker (composite value to parts, parts to composite value) from
//! feeding each other forever: whichever direction enters first wins,
//! and the echo from its derived writes dies at the guard.

use smallvec::SmallVec;

/// Callback run with the new value after a change.
pub type ChangeListener<T> = Box<dyn FnMut(&T) + Send>;

/// A value plus the listeners to run when it changes.
pub struct ObservedValue<T> {
    value: T,
    listeners: SmallVec<[ChangeListener<T>; 2]>,
}

impl<T: PartialEq> ObservedValue<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            listeners: SmallVec::new(),
        }
    }

    /// The current value.
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Store a new value and notify when it differs from the current
    /// one. Returns whether it differed.
    pub fn set(&mut self, value: T) -> bool {
        if !self.set_silent(value) {
            return false;
        }
        self.notify();
        true
    }

    /// Store a new value without notifying. Pair with [`notify`] when
    /// listeners must only run after other bookkeeping is done.
    ///
    /// [`notify`]: ObservedValue::notify
    pub fn set_silent(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        true
    }

    /// Run every listener with the current value.
    pub fn notify(&mut self) {
        for listener in &mut self.listeners {
            listener(&self.value);
        }
    }

    /// Register a change listener. Listeners stay for the cell's
    /// lifetime and run in registration order.
    pub fn subscribe<F: FnMut(&T) + Send + 'static>(&mut self, listener: F) {
        self.listeners.push(Box::new(listener));
    }
}

/// Re-entrancy flag around bidirectional value synchronization.
#[derive(Debug, Default)]
pub struct PropagationGuard {
    active: bool,
}

impl PropagationGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the guard. Refused while a propagation is already running.
    pub fn enter(&mut self) -> bool {
        if self.active {
            return false;
        }
        self.active = true;
        true
    }

    /// Release after a successful [`enter`]. Every `enter` that
    /// returned true must be paired with exactly one `exit`.
    ///
    /// [`enter`]: PropagationGuard::enter
    pub fn exit(&mut self) {
        self.active = false;
    }

    /// Whether a propagation is currently running.
    pub fn is_active(&self) -> bool {
        self.active
    }
}
