//! Typed context variables and guard evaluation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::PlayerError;

/// A context value set by the host or declared by the document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ContextValue {
    Numeric(f32),
    Text(String),
    Boolean(bool),
}

impl ContextValue {
    #[inline]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Numeric(_) => "Numeric",
            Self::Text(_) => "String",
            Self::Boolean(_) => "Boolean",
        }
    }
}

/// Comparison a guard applies between the context value and `compare_to`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

impl Condition {
    #[inline]
    pub fn is_ordering(&self) -> bool {
        !matches!(self, Self::Equal | Self::NotEqual)
    }
}

/// Guard on a single context key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Guard {
    Numeric {
        context_key: String,
        condition_type: Condition,
        compare_to: f32,
    },
    #[serde(rename = "String")]
    Text {
        context_key: String,
        condition_type: Condition,
        compare_to: String,
    },
    Boolean {
        context_key: String,
        condition_type: Condition,
        compare_to: bool,
    },
}

impl Guard {
    pub fn context_key(&self) -> &str {
        match self {
            Self::Numeric { context_key, .. }
            | Self::Text { context_key, .. }
            | Self::Boolean { context_key, .. } => context_key,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), PlayerError> {
        match self {
            Self::Text { condition_type, .. } | Self::Boolean { condition_type, .. }
                if condition_type.is_ordering() =>
            {
                Err(PlayerError::InvalidStateMachine {
                    reason: format!(
                        "{condition_type:?} is only valid for numeric guards (key {})",
                        self.context_key()
                    ),
                })
            }
            _ => Ok(()),
        }
    }

    /// Missing keys and type mismatches never pass.
    pub fn holds(&self, context: &Context) -> bool {
        let Some(value) = context.get(self.context_key()) else {
            return false;
        };
        match (self, value) {
            (
                Self::Numeric {
                    condition_type,
                    compare_to,
                    ..
                },
                ContextValue::Numeric(v),
            ) => match condition_type {
                Condition::Equal => v == compare_to,
                Condition::NotEqual => v != compare_to,
                Condition::GreaterThan => v > compare_to,
                Condition::GreaterThanOrEqual => v >= compare_to,
                Condition::LessThan => v < compare_to,
                Condition::LessThanOrEqual => v <= compare_to,
            },
            (
                Self::Text {
                    condition_type,
                    compare_to,
                    ..
                },
                ContextValue::Text(v),
            ) => match condition_type {
                Condition::Equal => v == compare_to,
                Condition::NotEqual => v != compare_to,
                _ => false,
            },
            (
                Self::Boolean {
                    condition_type,
                    compare_to,
                    ..
                },
                ContextValue::Boolean(v),
            ) => match condition_type {
                Condition::Equal => v == compare_to,
                Condition::NotEqual => v != compare_to,
                _ => false,
            },
            _ => false,
        }
    }
}

/// Context store. Declared variables keep their type for the machine's lifetime.
#[derive(Clone, Debug, Default)]
pub struct Context {
    values: HashMap<String, ContextValue>,
    declared: HashMap<String, &'static str>,
}

impl Context {
    pub fn declare(&mut self, key: &str, value: ContextValue) {
        self.declared.insert(key.to_string(), value.type_name());
        self.values.insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: &str, value: ContextValue) -> Result<(), PlayerError> {
        if let Some(&expected) = self.declared.get(key) {
            if expected != value.type_name() {
                return Err(PlayerError::ContextTypeMismatch {
                    key: key.to_string(),
                    expected,
                    actual: value.type_name(),
                });
            }
        }
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}
