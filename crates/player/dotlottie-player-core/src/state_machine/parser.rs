//! State machine JSON documents.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::context::{ContextValue, Guard};
use super::listener::ListenerType;
use crate::config::Mode;
use crate::error::PlayerError;

fn default_true() -> bool {
    true
}

fn default_speed() -> f32 {
    1.0
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    pub id: String,
    /// Index into `states`.
    #[serde(default)]
    pub initial: usize,
}

/// Playback settings applied on entry, or a terminal state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StateDef {
    PlaybackState {
        name: String,
        /// Bundle animation to switch to; empty keeps the current one.
        #[serde(default)]
        animation_id: String,
        #[serde(default, rename = "loop")]
        loop_animation: bool,
        #[serde(default)]
        autoplay: bool,
        #[serde(default)]
        mode: Mode,
        #[serde(default = "default_speed")]
        speed: f32,
        #[serde(default)]
        marker: String,
        #[serde(default)]
        segment: Vec<f32>,
        #[serde(default = "default_true")]
        use_frame_interpolation: bool,
    },
    FinalState {
        name: String,
    },
}

impl StateDef {
    pub fn name(&self) -> &str {
        match self {
            Self::PlaybackState { name, .. } | Self::FinalState { name } => name,
        }
    }

    #[inline]
    pub fn is_final(&self) -> bool {
        matches!(self, Self::FinalState { .. })
    }
}

/// What makes a transition eligible for evaluation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trigger {
    /// Any context setter call.
    #[default]
    ContextChange,
    /// A non-looping playback cycle completed.
    Complete,
    PointerDown,
    PointerUp,
    PointerEnter,
    PointerExit,
    PointerMove,
}

impl Trigger {
    pub fn listener(&self) -> Option<ListenerType> {
        match self {
            Self::PointerDown => Some(ListenerType::POINTER_DOWN),
            Self::PointerUp => Some(ListenerType::POINTER_UP),
            Self::PointerEnter => Some(ListenerType::POINTER_ENTER),
            Self::PointerExit => Some(ListenerType::POINTER_EXIT),
            Self::PointerMove => Some(ListenerType::POINTER_MOVE),
            Self::ContextChange | Self::Complete => None,
        }
    }

    /// Trigger for a single pointer event kind.
    pub fn from_listener(event: ListenerType) -> Option<Self> {
        [
            Self::PointerDown,
            Self::PointerUp,
            Self::PointerEnter,
            Self::PointerExit,
            Self::PointerMove,
        ]
        .into_iter()
        .find(|t| t.listener() == Some(event))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionDef {
    pub from_state: usize,
    pub to_state: usize,
    #[serde(default)]
    pub trigger: Trigger,
    #[serde(default)]
    pub guards: Vec<Guard>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ListenerDef {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContextVariableDef {
    Numeric {
        key: String,
        value: f32,
    },
    #[serde(rename = "String")]
    Text {
        key: String,
        value: String,
    },
    Boolean {
        key: String,
        value: bool,
    },
}

impl ContextVariableDef {
    pub fn key(&self) -> &str {
        match self {
            Self::Numeric { key, .. } | Self::Text { key, .. } | Self::Boolean { key, .. } => key,
        }
    }

    pub fn initial_value(&self) -> ContextValue {
        match self {
            Self::Numeric { value, .. } => ContextValue::Numeric(*value),
            Self::Text { value, .. } => ContextValue::Text(value.clone()),
            Self::Boolean { value, .. } => ContextValue::Boolean(*value),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateMachineDocument {
    pub descriptor: Descriptor,
    pub states: Vec<StateDef>,
    #[serde(default)]
    pub transitions: Vec<TransitionDef>,
    #[serde(default)]
    pub listeners: Vec<ListenerDef>,
    #[serde(default)]
    pub context_variables: Vec<ContextVariableDef>,
}

fn invalid(reason: impl Into<String>) -> PlayerError {
    PlayerError::InvalidStateMachine {
        reason: reason.into(),
    }
}

impl StateMachineDocument {
    /// Parse and validate.
    pub fn from_json(s: &str) -> Result<Self, PlayerError> {
        let doc: StateMachineDocument =
            serde_json::from_str(s).map_err(|e| invalid(format!("parse error: {e}")))?;
        doc.validate()?;
        Ok(doc)
    }

    pub fn validate(&self) -> Result<(), PlayerError> {
        if self.states.is_empty() {
            return Err(invalid("at least one state is required"));
        }
        let n = self.states.len();
        if self.descriptor.initial >= n {
            return Err(invalid(format!(
                "initial state {} out of range (0..{n})",
                self.descriptor.initial
            )));
        }
        let mut names = HashSet::new();
        for s in &self.states {
            if !names.insert(s.name()) {
                return Err(invalid(format!("duplicate state name {:?}", s.name())));
            }
        }
        for (i, t) in self.transitions.iter().enumerate() {
            if t.from_state >= n || t.to_state >= n {
                return Err(invalid(format!(
                    "transition {i} references a state out of range (0..{n})"
                )));
            }
            for g in &t.guards {
                g.validate()?;
            }
        }
        self.listener_types()?;
        Ok(())
    }

    /// Listeners named by the document plus pointer triggers used by transitions.
    pub fn listener_types(&self) -> Result<ListenerType, PlayerError> {
        let names: Vec<&str> = self.listeners.iter().map(|l| l.kind.as_str()).collect();
        let listed = ListenerType::from_names(&names).map_err(|e| invalid(e.to_string()))?;
        Ok(self
            .transitions
            .iter()
            .filter_map(|t| t.trigger.listener())
            .fold(listed, |acc, l| acc | l))
    }
}
