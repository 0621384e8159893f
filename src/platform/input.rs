//! Keyboard and touch input
//!
//! Events arrive whenever the browser delivers them; the state is recorded
//! immediately and sampled once per tick. Jump and menu are edge-triggered:
//! a press counts once no matter how long it is held or how often the key
//! auto-repeats.

use crate::sim::TickInput;

/// A named input intent shared by keyboard and touch buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    Jump,
    Menu,
    /// Start/retry from the menu or game-over screen
    Confirm,
}

impl Intent {
    /// Map a `KeyboardEvent.key` value to an intent
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(Intent::MoveLeft),
            "ArrowRight" | "d" | "D" => Some(Intent::MoveRight),
            "ArrowUp" | " " | "w" | "W" => Some(Intent::Jump),
            "Escape" => Some(Intent::Menu),
            "Enter" => Some(Intent::Confirm),
            _ => None,
        }
    }

    /// Map a touch button's `data-intent` attribute to an intent
    pub fn from_button(name: &str) -> Option<Self> {
        match name {
            "left" => Some(Intent::MoveLeft),
            "right" => Some(Intent::MoveRight),
            "jump" => Some(Intent::Jump),
            "menu" => Some(Intent::Menu),
            "start" => Some(Intent::Confirm),
            _ => None,
        }
    }
}

/// Recorded input between ticks
#[derive(Debug, Clone, Default)]
pub struct InputState {
    left: bool,
    right: bool,
    jump_held: bool,
    jump_pressed: bool,
    menu_pressed: bool,
    confirm_pressed: bool,
    /// Demo mode, sticky until toggled
    pub idle_mode: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key went down. Returns true if the key is a game key (caller should
    /// prevent the browser default, e.g. page scroll on space).
    pub fn key_down(&mut self, key: &str) -> bool {
        match Intent::from_key(key) {
            Some(intent) => {
                self.press(intent);
                true
            }
            None => false,
        }
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        match Intent::from_key(key) {
            Some(intent) => {
                self.release(intent);
                true
            }
            None => false,
        }
    }

    pub fn press(&mut self, intent: Intent) {
        match intent {
            Intent::MoveLeft => self.left = true,
            Intent::MoveRight => self.right = true,
            Intent::Jump => {
                if !self.jump_held {
                    self.jump_pressed = true;
                    // Space/Up double as "start" outside of play
                    self.confirm_pressed = true;
                }
                self.jump_held = true;
            }
            Intent::Menu => self.menu_pressed = true,
            Intent::Confirm => self.confirm_pressed = true,
        }
    }

    pub fn release(&mut self, intent: Intent) {
        match intent {
            Intent::MoveLeft => self.left = false,
            Intent::MoveRight => self.right = false,
            Intent::Jump => self.jump_held = false,
            Intent::Menu | Intent::Confirm => {}
        }
    }

    /// Window lost focus: drop every held key so the player doesn't run off
    pub fn release_all(&mut self) {
        let idle_mode = self.idle_mode;
        *self = Self {
            idle_mode,
            ..Self::default()
        };
    }

    /// Intents for the next tick. Consumes pending edges.
    pub fn sample(&mut self) -> TickInput {
        let input = TickInput {
            move_left: self.left,
            move_right: self.right,
            jump: self.jump_pressed,
            menu: self.menu_pressed,
            idle_mode: self.idle_mode,
        };
        self.jump_pressed = false;
        self.menu_pressed = false;
        self.confirm_pressed = false;
        input
    }

    /// Consume a pending start/retry request
    pub fn take_confirm(&mut self) -> bool {
        std::mem::take(&mut self.confirm_pressed)
    }

    /// Consume a pending menu request
    pub fn take_menu(&mut self) -> bool {
        std::mem::take(&mut self.menu_pressed)
    }

    /// Forget edges recorded before a state change
    pub fn clear_edges(&mut self) {
        self.jump_pressed = false;
        self.menu_pressed = false;
        self.confirm_pressed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(Intent::from_key("ArrowLeft"), Some(Intent::MoveLeft));
        assert_eq!(Intent::from_key("D"), Some(Intent::MoveRight));
        assert_eq!(Intent::from_key(" "), Some(Intent::Jump));
        assert_eq!(Intent::from_key("Escape"), Some(Intent::Menu));
        assert_eq!(Intent::from_key("q"), None);
        assert_eq!(Intent::from_button("jump"), Some(Intent::Jump));
    }

    #[test]
    fn test_held_movement_is_level_triggered() {
        let mut input = InputState::new();
        input.key_down("ArrowRight");
        assert!(input.sample().move_right);
        assert!(input.sample().move_right);
        input.key_up("ArrowRight");
        assert!(!input.sample().move_right);
    }

    #[test]
    fn test_jump_counts_once_per_press() {
        let mut input = InputState::new();
        input.key_down(" ");
        input.key_down(" "); // auto-repeat
        assert!(input.sample().jump);
        assert!(!input.sample().jump);
        input.key_up(" ");
        input.key_down("w");
        assert!(input.sample().jump);
    }

    #[test]
    fn test_quick_tap_between_ticks_is_seen() {
        let mut input = InputState::new();
        input.press(Intent::Jump);
        input.release(Intent::Jump);
        assert!(input.sample().jump);
    }

    #[test]
    fn test_release_all_keeps_demo_mode() {
        let mut input = InputState::new();
        input.idle_mode = true;
        input.key_down("a");
        input.release_all();
        let tick = input.sample();
        assert!(!tick.move_left);
        assert!(tick.idle_mode);
    }

    #[test]
    fn test_auto_repeat_does_not_confirm() {
        let mut input = InputState::new();
        input.key_down(" ");
        assert!(input.take_confirm());
        input.key_down(" ");
        assert!(!input.take_confirm());
        input.key_up(" ");
        input.key_down(" ");
        assert!(input.take_confirm());
    }

    #[test]
    fn test_menu_edge() {
        let mut input = InputState::new();
        input.key_down("Escape");
        assert!(input.take_menu());
        assert!(!input.take_menu());
    }
}
