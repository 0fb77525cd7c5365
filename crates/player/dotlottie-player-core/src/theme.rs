//! Themes: JSON documents forwarded to the renderer.

use crate::error::PlayerError;

/// A validated theme document.
#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
    /// Bundle id, empty for inline data.
    pub id: String,
    pub data: String,
}

impl Theme {
    /// Validate `data` as a JSON object; `rules`, when present, must be an array.
    pub fn parse(id: impl Into<String>, data: &str) -> Result<Self, PlayerError> {
        let value: serde_json::Value =
            serde_json::from_str(data).map_err(|e| PlayerError::InvalidTheme {
                reason: format!("parse error: {e}"),
            })?;
        let obj = value.as_object().ok_or_else(|| PlayerError::InvalidTheme {
            reason: "theme must be a JSON object".into(),
        })?;
        if let Some(rules) = obj.get("rules") {
            if !rules.is_array() {
                return Err(PlayerError::InvalidTheme {
                    reason: "rules must be an array".into(),
                });
            }
        }
        Ok(Self {
            id: id.into(),
            data: data.to_string(),
        })
    }
}
