use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tilecast_common::MoveIntent;

/// A high-level action produced by the input layer.
///
/// The simulation consumes [`MoveIntent`]s and the driver consumes the rest;
/// neither ever sees raw key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    MoveForward,
    MoveBackward,
    TurnLeft,
    TurnRight,
    /// Show or hide the minimap overlay.
    ToggleMinimap,
    /// Reset the player to the spawn pose.
    Respawn,
    Quit,
}

impl Action {
    /// Held actions feed the per-tick intent; the others fire once on press.
    pub fn is_held(self) -> bool {
        matches!(
            self,
            Self::MoveForward | Self::MoveBackward | Self::TurnLeft | Self::TurnRight
        )
    }
}

/// Which held actions are currently down, plus one-shot presses not yet taken.
///
/// Held actions count their presses, so an action bound to several keys stays
/// down until every one of those keys is released.
#[derive(Debug, Clone, Default)]
pub struct ActionState {
    held: BTreeMap<Action, u32>,
    pressed: Vec<Action>,
}

impl ActionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key going down. Callers filter out platform key repeats.
    pub fn press(&mut self, action: Action) {
        if action.is_held() {
            *self.held.entry(action).or_insert(0) += 1;
        } else {
            self.pressed.push(action);
        }
    }

    /// Record a key going up. Releasing an action that is not down is a no-op.
    pub fn release(&mut self, action: Action) {
        if let Some(count) = self.held.get_mut(&action) {
            *count -= 1;
            if *count == 0 {
                self.held.remove(&action);
            }
        }
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains_key(&action)
    }

    /// Drop everything held, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    /// Snapshot of the held movement actions for one tick.
    pub fn intent(&self) -> MoveIntent {
        MoveIntent {
            forward: self.is_held(Action::MoveForward),
            backward: self.is_held(Action::MoveBackward),
            turn_left: self.is_held(Action::TurnLeft),
            turn_right: self.is_held(Action::TurnRight),
        }
    }

    /// Take the one-shot actions pressed since the last call, in press order.
    pub fn take_pressed(&mut self) -> Vec<Action> {
        std::mem::take(&mut self.pressed)
    }
}
