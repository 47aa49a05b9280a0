//! Scroll-linked hero offset
//!
//! [`ScrollOffsetController`] turns viewport scroll notifications into the
//! vertical translation applied to the hero background. The offset is always
//! `position * damping` for the last observed position; nothing else is kept.

use crate::events::{ScrollPosition, ScrollSource, Subscription};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use tracing::debug;

/// Damping factor applied to the scroll position
pub const DEFAULT_DAMPING: f64 = 0.8;

new_key_type! {
    /// Unique identifier for an offset observer
    pub struct ObserverId;
}

/// Vertical translation of the hero background, in logical pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct VisualOffset(f64);

impl VisualOffset {
    pub fn px(self) -> f64 {
        self.0
    }

    /// CSS transform for the hero background
    pub fn css_transform(self) -> String {
        format!("translateY({}px)", self.0)
    }
}

/// Offset observer function type
pub type OffsetObserver = Box<dyn FnMut(VisualOffset)>;

type SharedObserver = Rc<RefCell<OffsetObserver>>;

struct OffsetState {
    damping: f64,
    offset: Cell<VisualOffset>,
    recomputations: Cell<u64>,
    observers: RefCell<SlotMap<ObserverId, SharedObserver>>,
}

impl OffsetState {
    fn apply(&self, position: ScrollPosition) {
        let offset = VisualOffset(position.y() * self.damping);
        self.offset.set(offset);
        self.recomputations.set(self.recomputations.get() + 1);

        // Registry is not borrowed while observers run; they may observe or unobserve.
        let snapshot: SmallVec<[(ObserverId, SharedObserver); 4]> = self
            .observers
            .borrow()
            .iter()
            .map(|(id, observer)| (id, Rc::clone(observer)))
            .collect();

        for (id, observer) in snapshot {
            if !self.observers.borrow().contains_key(id) {
                continue;
            }
            let mut observer = observer.borrow_mut();
            (*observer)(offset);
        }
    }
}

/// Derives the hero offset from the page scroll position.
///
/// Holds at most one scroll subscription. It is released on
/// [`deactivate`](Self::deactivate) or when the controller is dropped.
pub struct ScrollOffsetController {
    state: Rc<OffsetState>,
    binding: Option<Subscription>,
}

impl ScrollOffsetController {
    pub fn new(damping: f64) -> Self {
        debug_assert!(damping.is_finite(), "damping must be finite");
        Self {
            state: Rc::new(OffsetState {
                damping,
                offset: Cell::new(VisualOffset::default()),
                recomputations: Cell::new(0),
                observers: RefCell::new(SlotMap::with_key()),
            }),
            binding: None,
        }
    }

    pub fn with_default_damping() -> Self {
        Self::new(DEFAULT_DAMPING)
    }

    pub fn damping(&self) -> f64 {
        self.state.damping
    }

    /// Offset derived from the last observed scroll position
    pub fn offset(&self) -> VisualOffset {
        self.state.offset.get()
    }

    /// Number of notifications processed so far
    pub fn recomputations(&self) -> u64 {
        self.state.recomputations.get()
    }

    pub fn is_active(&self) -> bool {
        self.binding.is_some()
    }

    /// Start listening to `source`. A no-op if already active.
    pub fn activate(&mut self, source: &ScrollSource) {
        if self.binding.is_some() {
            debug!("scroll offset controller already active");
            return;
        }

        let state = Rc::clone(&self.state);
        self.binding = Some(source.subscribe(move |position| state.apply(position)));
    }

    /// Stop listening. A no-op if not active.
    pub fn deactivate(&mut self) {
        if let Some(binding) = self.binding.take() {
            binding.cancel();
        }
    }

    /// Recompute from a position delivered outside the subscription
    pub fn handle_scroll(&self, position: ScrollPosition) {
        self.state.apply(position);
    }

    /// Register an observer notified with every recomputed offset.
    ///
    /// An observer added while offsets are being delivered first hears the
    /// next recomputation.
    pub fn observe<F>(&self, observer: F) -> ObserverId
    where
        F: FnMut(VisualOffset) + 'static,
    {
        let observer: OffsetObserver = Box::new(observer);
        self.state
            .observers
            .borrow_mut()
            .insert(Rc::new(RefCell::new(observer)))
    }

    pub fn unobserve(&self, id: ObserverId) -> bool {
        self.state.observers.borrow_mut().remove(id).is_some()
    }
}

impl Default for ScrollOffsetController {
    fn default() -> Self {
        Self::with_default_damping()
    }
}

impl fmt::Debug for ScrollOffsetController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollOffsetController")
            .field("damping", &self.damping())
            .field("offset", &self.offset())
            .field("active", &self.is_active())
            .finish()
    }
}
