//! CashCached Site Core
//!
//! The interactive parts of the marketing site, independent of any renderer:
//!
//! - **Scroll offset**: hero background translation derived from the page scroll position
//! - **Disclosure list**: FAQ items that expand and collapse independently
//! - **Submission**: form field values through dispatch to an outcome the user can see
//!
//! All controllers run on the single UI timeline. The only deferred work is
//! the dispatch of a submitted form, returned as a future.
//!
//! # Example
//!
//! ```rust
//! use cashcached_core::{ScrollOffsetController, ScrollPosition, ScrollSource};
//!
//! let source = ScrollSource::new();
//! let mut hero = ScrollOffsetController::with_default_damping();
//! hero.activate(&source);
//!
//! source.emit(ScrollPosition::new(100.0));
//! assert_eq!(hero.offset().css_transform(), "translateY(80px)");
//! ```

pub mod disclosure;
pub mod dispatch;
pub mod events;
pub mod form;
pub mod fsm;
pub mod scroll;
pub mod submission;

pub use disclosure::{Chevron, DisclosureError, DisclosureItem, DisclosureList};
pub use dispatch::{
    Credential, DispatchFailure, DispatchFuture, DispatchOutcome, DispatchRequest, DispatchTarget,
    Dispatcher, ManualDispatcher,
};
pub use events::{ListenerId, ScrollPosition, ScrollSource, Subscription};
pub use form::{FieldKind, FieldSpec, FormError, FormFields, FormSchema};
pub use fsm::{StateMachine, Transition};
pub use scroll::{ObserverId, ScrollOffsetController, VisualOffset, DEFAULT_DAMPING};
pub use submission::{
    InFlight, Submission, SubmissionController, SubmissionCopy, SubmissionEvent, SubmissionState,
    Ticket,
};
