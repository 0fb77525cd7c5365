//! Interactive state machines layered over playback.
//!
//! The machine owns states, transitions and a typed context. It never touches
//! the player directly: the player asks it which state to enter and applies
//! that state's playback settings itself.

pub mod context;
pub mod listener;
pub mod parser;

pub use context::{Condition, Context, ContextValue, Guard};
pub use listener::{ListenerType, ListenerTypeParseError};
pub use parser::{StateDef, StateMachineDocument, Trigger};

use crate::error::PlayerError;

/// Lifecycle of a loaded machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MachineStatus {
    #[default]
    Stopped,
    Running,
    /// A final state was entered.
    Finished,
}

/// A transition that fired: indices into the document's states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fired {
    pub from: usize,
    pub to: usize,
}

#[derive(Clone, Debug)]
pub struct StateMachine {
    doc: StateMachineDocument,
    listeners: ListenerType,
    context: Context,
    current: Option<usize>,
    status: MachineStatus,
}

impl StateMachine {
    pub fn from_json(s: &str) -> Result<Self, PlayerError> {
        Self::new(StateMachineDocument::from_json(s)?)
    }

    pub fn new(doc: StateMachineDocument) -> Result<Self, PlayerError> {
        doc.validate()?;
        let listeners = doc.listener_types()?;
        let mut machine = Self {
            doc,
            listeners,
            context: Context::default(),
            current: None,
            status: MachineStatus::Stopped,
        };
        machine.reset_context();
        Ok(machine)
    }

    fn reset_context(&mut self) {
        let mut context = Context::default();
        for var in &self.doc.context_variables {
            context.declare(var.key(), var.initial_value());
        }
        self.context = context;
    }

    pub fn id(&self) -> &str {
        &self.doc.descriptor.id
    }

    pub fn status(&self) -> MachineStatus {
        self.status
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.status == MachineStatus::Running
    }

    pub fn state(&self, index: usize) -> Option<&StateDef> {
        self.doc.states.get(index)
    }

    pub fn current_state(&self) -> Option<&StateDef> {
        self.current.and_then(|i| self.state(i))
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn listener_types(&self) -> ListenerType {
        self.listeners
    }

    /// Enter the initial state with a fresh context. Returns the entered index.
    pub fn start(&mut self) -> usize {
        self.reset_context();
        let initial = self.doc.descriptor.initial;
        self.enter(initial);
        log::debug!(
            "state machine {} started in {:?}",
            self.id(),
            self.doc.states[initial].name()
        );
        initial
    }

    /// Leave the current state. Returns the index that was left.
    pub fn stop(&mut self) -> Result<Option<usize>, PlayerError> {
        if self.status == MachineStatus::Stopped {
            return Err(PlayerError::StateMachineNotRunning);
        }
        self.status = MachineStatus::Stopped;
        Ok(self.current.take())
    }

    pub fn set_context(&mut self, key: &str, value: ContextValue) -> Result<(), PlayerError> {
        self.context.set(key, value)
    }

    /// Fire the first transition out of the current state that listens to
    /// `trigger` and whose guards all hold.
    pub fn fire(&mut self, trigger: Trigger) -> Option<Fired> {
        if !self.is_running() {
            return None;
        }
        let from = self.current?;
        let to = self
            .doc
            .transitions
            .iter()
            .filter(|t| t.from_state == from && t.trigger == trigger)
            .find(|t| t.guards.iter().all(|g| g.holds(&self.context)))
            .map(|t| t.to_state)?;
        self.enter(to);
        log::debug!(
            "state machine {}: {:?} -> {:?} on {trigger:?}",
            self.id(),
            self.doc.states[from].name(),
            self.doc.states[to].name()
        );
        Some(Fired { from, to })
    }

    fn enter(&mut self, index: usize) {
        self.current = Some(index);
        self.status = if self.doc.states[index].is_final() {
            MachineStatus::Finished
        } else {
            MachineStatus::Running
        };
    }
}
