//! Viewport scroll notifications
//!
//! The host viewport owns a [`ScrollSource`] and emits a [`ScrollPosition`]
//! every time the page scrolls. Listeners are held by the source and removed
//! when the [`Subscription`] returned from `subscribe` is dropped, so a view
//! that goes away cannot leave a dangling listener behind.
//!
//! Everything here runs on the single UI timeline. A handler must not
//! subscribe, unsubscribe, or emit on the same source while it is running.

use slotmap::{new_key_type, SlotMap};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::debug;

new_key_type! {
    /// Unique identifier for a scroll listener
    pub struct ListenerId;
}

/// Vertical scroll distance from the top of the viewport, in logical pixels.
///
/// Always finite and non-negative.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct ScrollPosition(f64);

impl ScrollPosition {
    pub const TOP: ScrollPosition = ScrollPosition(0.0);

    /// Create a position, clamping overscroll (negative) and non-finite input to the top.
    pub fn new(y: f64) -> Self {
        if y.is_finite() && y > 0.0 {
            Self(y)
        } else {
            Self::TOP
        }
    }

    pub fn y(self) -> f64 {
        self.0
    }
}

impl From<f64> for ScrollPosition {
    fn from(y: f64) -> Self {
        Self::new(y)
    }
}

/// Scroll handler function type
pub type ScrollHandler = Box<dyn FnMut(ScrollPosition)>;

type Registry = RefCell<SlotMap<ListenerId, ScrollHandler>>;

/// Host-side registry of scroll listeners.
///
/// Cloning yields another handle to the same registry.
#[derive(Clone, Default)]
pub struct ScrollSource {
    listeners: Rc<Registry>,
}

impl ScrollSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. It stays live until the returned guard is dropped.
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: FnMut(ScrollPosition) + 'static,
    {
        let id = self.listeners.borrow_mut().insert(Box::new(handler));
        debug!(?id, "scroll listener subscribed");
        Subscription {
            registry: Rc::downgrade(&self.listeners),
            id,
        }
    }

    /// Deliver one notification to every live listener
    pub fn emit(&self, position: ScrollPosition) {
        let mut listeners = self.listeners.borrow_mut();
        for handler in listeners.values_mut() {
            handler(position);
        }
    }

    /// Number of live listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl fmt::Debug for ScrollSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollSource")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Guard for one registered scroll listener.
///
/// Dropping it unsubscribes exactly that listener. Outliving the source is fine.
#[must_use = "dropping a Subscription immediately unsubscribes the listener"]
pub struct Subscription {
    registry: Weak<Registry>,
    id: ListenerId,
}

impl Subscription {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Whether the listener is still registered with a live source
    pub fn is_active(&self) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        let live = registry.borrow().contains_key(self.id);
        live
    }

    /// Unsubscribe now
    pub fn cancel(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            if registry.borrow_mut().remove(self.id).is_some() {
                debug!(id = ?self.id, "scroll listener unsubscribed");
            }
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
