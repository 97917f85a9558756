use crate::action::Action;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Errors from loading key bindings.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("failed to read bindings {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("key {key:?} is bound to nothing")]
    EmptyKey { key: String },
}

/// Maps physical key names to actions.
///
/// Key names are the platform layer's code names (`"KeyW"`, `"ArrowUp"`,
/// `"Escape"`, …), so the same table works for any window backend that can
/// name its keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBindings {
    keys: BTreeMap<String, Action>,
}

impl Default for KeyBindings {
    /// WASD and arrows to move, `M`/`Tab` for the minimap, `R` to respawn,
    /// `Escape` to quit.
    fn default() -> Self {
        let keys = [
            ("KeyW", Action::MoveForward),
            ("ArrowUp", Action::MoveForward),
            ("KeyS", Action::MoveBackward),
            ("ArrowDown", Action::MoveBackward),
            ("KeyA", Action::TurnLeft),
            ("ArrowLeft", Action::TurnLeft),
            ("KeyD", Action::TurnRight),
            ("ArrowRight", Action::TurnRight),
            ("KeyM", Action::ToggleMinimap),
            ("Tab", Action::ToggleMinimap),
            ("KeyR", Action::Respawn),
            ("Escape", Action::Quit),
        ];
        Self {
            keys: keys
                .into_iter()
                .map(|(k, a)| (k.to_string(), a))
                .collect(),
        }
    }
}

impl KeyBindings {
    /// A table with nothing bound.
    pub fn empty() -> Self {
        Self {
            keys: BTreeMap::new(),
        }
    }

    /// Defaults overridden by the entries of a YAML mapping.
    pub fn from_yaml_str(text: &str) -> Result<Self, InputError> {
        let overrides: Self = serde_yaml::from_str(text)?;
        if let Some(key) = overrides.keys.keys().find(|k| k.trim().is_empty()) {
            return Err(InputError::EmptyKey { key: key.clone() });
        }
        let mut bindings = Self::default();
        bindings.keys.extend(overrides.keys);
        Ok(bindings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| InputError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let bindings = Self::from_yaml_str(&text)?;
        tracing::debug!(path = %path.display(), keys = bindings.len(), "loaded key bindings");
        Ok(bindings)
    }

    pub fn bind(&mut self, key: impl Into<String>, action: Action) {
        self.keys.insert(key.into(), action);
    }

    pub fn unbind(&mut self, key: &str) -> Option<Action> {
        self.keys.remove(key)
    }

    pub fn action_for(&self, key: &str) -> Option<Action> {
        self.keys.get(key).copied()
    }

    /// Keys bound to `action`, sorted.
    pub fn keys_for(&self, action: Action) -> Vec<&str> {
        self.keys
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|(k, _)| k.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
