//! Pointer listeners a host must wire up for a state machine.

use core::str::FromStr;

use bitflags::bitflags;

bitflags! {
    /// Union of pointer event kinds. Bit values are part of the C ABI.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
    #[repr(transparent)]
    pub struct ListenerType: u16 {
        const POINTER_UP    = 1 << 0;
        const POINTER_DOWN  = 1 << 1;
        const POINTER_ENTER = 1 << 2;
        const POINTER_EXIT  = 1 << 3;
        const POINTER_MOVE  = 1 << 4;
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown listener type {0:?}")]
pub struct ListenerTypeParseError(pub String);

impl FromStr for ListenerType {
    type Err = ListenerTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PointerUp" => Ok(ListenerType::POINTER_UP),
            "PointerDown" => Ok(ListenerType::POINTER_DOWN),
            "PointerEnter" => Ok(ListenerType::POINTER_ENTER),
            "PointerExit" => Ok(ListenerType::POINTER_EXIT),
            "PointerMove" => Ok(ListenerType::POINTER_MOVE),
            _ => Err(ListenerTypeParseError(s.to_string())),
        }
    }
}

impl ListenerType {
    /// Union of every named listener kind.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<ListenerType, ListenerTypeParseError> {
        names.iter().try_fold(ListenerType::empty(), |acc, name| {
            Ok(acc | ListenerType::from_str(name.as_ref())?)
        })
    }
}
