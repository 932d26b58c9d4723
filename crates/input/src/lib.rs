//! Keyboard input for the drone: key bindings, press/release tracking, and the
//! plain per-frame [`InputState`] record the game core reads.

use std::collections::{HashMap, HashSet};

/// Every action the game core reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
    Restart,
    ConfirmContinue,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::Forward,
        Action::Backward,
        Action::Left,
        Action::Right,
        Action::Up,
        Action::Down,
        Action::Restart,
        Action::ConfirmContinue,
    ];
}

/// Actions currently held. The core only ever reads this.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub restart: bool,
    pub confirm_continue: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot with exactly the given actions held.
    pub fn holding(actions: &[Action]) -> Self {
        let mut state = Self::default();
        for &action in actions {
            state.set(action, true);
        }
        state
    }

    pub fn is_held(&self, action: Action) -> bool {
        match action {
            Action::Forward => self.forward,
            Action::Backward => self.backward,
            Action::Left => self.left,
            Action::Right => self.right,
            Action::Up => self.up,
            Action::Down => self.down,
            Action::Restart => self.restart,
            Action::ConfirmContinue => self.confirm_continue,
        }
    }

    pub fn set(&mut self, action: Action, held: bool) {
        let flag = match action {
            Action::Forward => &mut self.forward,
            Action::Backward => &mut self.backward,
            Action::Left => &mut self.left,
            Action::Right => &mut self.right,
            Action::Up => &mut self.up,
            Action::Down => &mut self.down,
            Action::Restart => &mut self.restart,
            Action::ConfirmContinue => &mut self.confirm_continue,
        };
        *flag = held;
    }

    /// True when any directional action is held.
    pub fn has_directional_input(&self) -> bool {
        self.forward || self.backward || self.left || self.right || self.up || self.down
    }
}

/// Maps physical keys to actions and keeps the held-state snapshot current.
///
/// An action stays held while any key bound to it is down, so releasing one of
/// two bound keys does not drop the action.
#[derive(Debug)]
pub struct KeyboardListener {
    bindings: HashMap<KeyCode, Vec<Action>>,
    keys_held: HashSet<KeyCode>,
    state: InputState,
}

impl Default for KeyboardListener {
    fn default() -> Self {
        Self::new(default_bindings())
    }
}

impl KeyboardListener {
    pub fn new(bindings: HashMap<KeyCode, Vec<Action>>) -> Self {
        Self {
            bindings,
            keys_held: HashSet::new(),
            state: InputState::default(),
        }
    }

    /// Process a keyboard event.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        let Some(actions) = self.bindings.get(&key).cloned() else {
            log::trace!("Ignoring unbound key {:?}", key);
            return;
        };
        match state {
            ElementState::Pressed => {
                self.keys_held.insert(key);
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
            }
        }
        for action in actions {
            let held = self.is_action_bound_to_held_key(action);
            self.state.set(action, held);
        }
    }

    /// Release everything (window lost focus, so no key-up will arrive).
    pub fn release_all(&mut self) {
        self.keys_held.clear();
        self.state = InputState::default();
    }

    /// Current held-state snapshot.
    pub fn snapshot(&self) -> InputState {
        self.state
    }

    fn is_action_bound_to_held_key(&self, action: Action) -> bool {
        self.keys_held.iter().any(|key| {
            self.bindings
                .get(key)
                .is_some_and(|actions| actions.contains(&action))
        })
    }
}

/// W/S forward/back, A/D strafe, Space climb, Shift descend, R restart/confirm.
pub fn default_bindings() -> HashMap<KeyCode, Vec<Action>> {
    HashMap::from([
        (KeyCode::KeyW, vec![Action::Forward]),
        (KeyCode::KeyS, vec![Action::Backward]),
        (KeyCode::KeyA, vec![Action::Left]),
        (KeyCode::KeyD, vec![Action::Right]),
        (KeyCode::Space, vec![Action::Up]),
        (KeyCode::ShiftLeft, vec![Action::Down]),
        (KeyCode::ShiftRight, vec![Action::Down]),
        (KeyCode::KeyR, vec![Action::Restart, Action::ConfirmContinue]),
    ])
}

// Re-export for convenience
pub use winit::event::ElementState;
pub use winit::keyboard::KeyCode;
