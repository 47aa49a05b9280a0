//! State Machine Runtime
//!
//! A small flat state machine used by the form controllers.
//! Supports:
//! - Typed states and events
//! - Guards (conditional transitions)
//! - Entry actions
//! - Transition history
//!
//! An event with no matching transition from the current state is ignored,
//! which is how "submit while sending" is suppressed.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::fmt::Debug;
use std::hash::Hash;

/// Bound shared by state and event types
pub trait FsmKey: Copy + Eq + Hash + Debug + 'static {}

impl<T: Copy + Eq + Hash + Debug + 'static> FsmKey for T {}

/// A guard function that determines if a transition should occur
pub type Guard = Box<dyn Fn() -> bool>;

/// An action executed when a state is entered
pub type Action = Box<dyn FnMut()>;

/// A transition in the state machine
pub struct Transition<S, E> {
    pub from_state: S,
    pub event: E,
    pub to_state: S,
    pub guard: Option<Guard>,
}

impl<S: FsmKey, E: FsmKey> Transition<S, E> {
    /// Create a simple transition without a guard
    pub fn new(from: S, event: E, to: S) -> Self {
        Self {
            from_state: from,
            event,
            to_state: to,
            guard: None,
        }
    }

    /// Add a guard condition
    pub fn with_guard<F: Fn() -> bool + 'static>(mut self, guard: F) -> Self {
        self.guard = Some(Box::new(guard));
        self
    }

    fn matches(&self, state: S, event: E) -> bool {
        self.from_state == state
            && self.event == event
            && self.guard.as_ref().map_or(true, |guard| guard())
    }
}

/// Builder for creating state machines
pub struct StateMachineBuilder<S, E> {
    initial_state: S,
    transitions: Vec<Transition<S, E>>,
    entry_callbacks: FxHashMap<S, SmallVec<[Action; 2]>>,
}

impl<S: FsmKey, E: FsmKey> StateMachineBuilder<S, E> {
    pub fn new(initial_state: S) -> Self {
        Self {
            initial_state,
            transitions: Vec::new(),
            entry_callbacks: FxHashMap::default(),
        }
    }

    /// Add a transition
    pub fn transition(mut self, transition: Transition<S, E>) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add a simple transition (from, event, to)
    pub fn on(mut self, from: S, event: E, to: S) -> Self {
        self.transitions.push(Transition::new(from, event, to));
        self
    }

    /// Add the same event transition from several source states
    pub fn on_any(mut self, from: &[S], event: E, to: S) -> Self {
        for state in from {
            self.transitions.push(Transition::new(*state, event, to));
        }
        self
    }

    /// Add an entry action for a state
    pub fn on_enter<F: FnMut() + 'static>(mut self, state: S, action: F) -> Self {
        self.entry_callbacks
            .entry(state)
            .or_default()
            .push(Box::new(action));
        self
    }

    /// Build the state machine
    pub fn build(self) -> StateMachine<S, E> {
        StateMachine {
            current_state: self.initial_state,
            transitions: self.transitions,
            entry_callbacks: self.entry_callbacks,
            history: Vec::new(),
        }
    }
}

/// A state machine instance
pub struct StateMachine<S, E> {
    current_state: S,
    transitions: Vec<Transition<S, E>>,
    entry_callbacks: FxHashMap<S, SmallVec<[Action; 2]>>,
    /// History of state transitions (for debugging)
    history: Vec<(S, E, S)>,
}

impl<S: FsmKey, E: FsmKey> StateMachine<S, E> {
    /// Create a builder for a state machine
    pub fn builder(initial_state: S) -> StateMachineBuilder<S, E> {
        StateMachineBuilder::new(initial_state)
    }

    /// Get the current state
    pub fn current_state(&self) -> S {
        self.current_state
    }

    /// Check if we're in a specific state
    pub fn is_in(&self, state: S) -> bool {
        self.current_state == state
    }

    /// Get transition history
    pub fn history(&self) -> &[(S, E, S)] {
        &self.history
    }

    /// Clear transition history
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Check if an event can trigger a transition from current state
    pub fn can_send(&self, event: E) -> bool {
        let current = self.current_state;
        self.transitions.iter().any(|t| t.matches(current, event))
    }

    /// Send an event to the state machine.
    ///
    /// Returns the new state if a transition fired, `None` if the event was
    /// ignored in the current state.
    pub fn send(&mut self, event: E) -> Option<S> {
        let current = self.current_state;
        let to_state = self
            .transitions
            .iter()
            .find(|t| t.matches(current, event))?
            .to_state;

        self.current_state = to_state;
        self.history.push((current, event, to_state));

        if let Some(callbacks) = self.entry_callbacks.get_mut(&to_state) {
            for callback in callbacks.iter_mut() {
                callback();
            }
        }

        Some(to_state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Light {
        Off,
        On,
        Broken,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Switch {
        Flip,
        Smash,
    }

    fn lamp() -> StateMachine<Light, Switch> {
        StateMachine::builder(Light::Off)
            .on(Light::Off, Switch::Flip, Light::On)
            .on(Light::On, Switch::Flip, Light::Off)
            .on_any(&[Light::Off, Light::On], Switch::Smash, Light::Broken)
            .build()
    }

    #[test]
    fn test_simple_transitions() {
        let mut fsm = lamp();
        assert_eq!(fsm.current_state(), Light::Off);

        assert_eq!(fsm.send(Switch::Flip), Some(Light::On));
        assert_eq!(fsm.send(Switch::Flip), Some(Light::Off));
        assert!(fsm.is_in(Light::Off));
    }

    #[test]
    fn test_unmatched_event_is_ignored() {
        let mut fsm = lamp();
        fsm.send(Switch::Smash);

        assert_eq!(fsm.send(Switch::Flip), None);
        assert_eq!(fsm.current_state(), Light::Broken);
        assert!(!fsm.can_send(Switch::Flip));
    }

    #[test]
    fn test_guard_conditions() {
        let enabled = Rc::new(Cell::new(false));
        let enabled_clone = enabled.clone();

        let mut fsm = StateMachine::builder(Light::Off)
            .transition(
                Transition::new(Light::Off, Switch::Flip, Light::On)
                    .with_guard(move || enabled_clone.get()),
            )
            .build();

        assert_eq!(fsm.send(Switch::Flip), None);
        assert_eq!(fsm.current_state(), Light::Off);

        enabled.set(true);
        assert!(fsm.can_send(Switch::Flip));
        assert_eq!(fsm.send(Switch::Flip), Some(Light::On));
    }

    #[test]
    fn test_entry_callbacks() {
        let entered = Rc::new(Cell::new(0));
        let entered_clone = entered.clone();

        let mut fsm = StateMachine::builder(Light::Off)
            .on(Light::Off, Switch::Flip, Light::On)
            .on(Light::On, Switch::Flip, Light::Off)
            .on_enter(Light::On, move || entered_clone.set(entered_clone.get() + 1))
            .build();

        fsm.send(Switch::Flip);
        fsm.send(Switch::Flip);
        fsm.send(Switch::Flip);
        assert_eq!(entered.get(), 2);
    }

    #[test]
    fn test_history() {
        let mut fsm = lamp();
        fsm.send(Switch::Flip);
        fsm.send(Switch::Smash);
        fsm.send(Switch::Flip);

        assert_eq!(
            fsm.history(),
            &[
                (Light::Off, Switch::Flip, Light::On),
                (Light::On, Switch::Smash, Light::Broken),
            ]
        );

        fsm.clear_history();
        assert!(fsm.history().is_empty());
    }
}
