use crate::browser::{self, KeyEventKind};
use anyhow::Result;
use futures::channel::mpsc::{unbounded, UnboundedReceiver};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPress {
    KeyDown(String),
    KeyUp(String),
}

/// Forward document keydown/keyup events into a channel the game loop drains
/// once per frame
pub fn prepare_input() -> Result<UnboundedReceiver<KeyPress>> {
    let (keydown_sender, keyevent_receiver) = unbounded();
    let keyup_sender = keydown_sender.clone();

    browser::add_key_listener(KeyEventKind::Down, move |event: web_sys::KeyboardEvent| {
        // receiver only drops with the page
        let _ = keydown_sender.unbounded_send(KeyPress::KeyDown(event.code()));
    })?;
    browser::add_key_listener(KeyEventKind::Up, move |event: web_sys::KeyboardEvent| {
        let _ = keyup_sender.unbounded_send(KeyPress::KeyUp(event.code()));
    })?;

    Ok(keyevent_receiver)
}

/// Keys currently held down, in the order they were pressed.
/// A code appears at most once.
#[derive(Debug, Default, Clone)]
pub struct PressedKeys {
    codes: Vec<String>,
}

impl PressedKeys {
    pub fn new() -> Self {
        PressedKeys::default()
    }

    /// Returns false if the key was already held (browser key repeat)
    pub fn press(&mut self, code: &str) -> bool {
        if self.is_pressed(code) {
            return false;
        }
        self.codes.push(code.to_string());
        true
    }

    /// Returns false if the key was not held
    pub fn release(&mut self, code: &str) -> bool {
        match self.codes.iter().position(|held| held == code) {
            Some(index) => {
                self.codes.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn is_pressed(&self, code: &str) -> bool {
        self.codes.iter().any(|held| held == code)
    }

    /// First held key (oldest press first) matching `accept`
    pub fn find<T>(&self, accept: impl Fn(&str) -> Option<T>) -> Option<T> {
        self.codes.iter().find_map(|code| accept(code))
    }

    pub fn codes(&self) -> &[String] {
        &self.codes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_press_is_deduplicated() {
        let mut keys = PressedKeys::new();
        assert!(keys.press("ArrowUp"));
        assert!(!keys.press("ArrowUp"));
        assert_eq!(keys.codes(), ["ArrowUp".to_string()]);
    }

    #[test]
    fn releasing_unheld_key_leaves_buffer_unchanged() {
        let mut keys = PressedKeys::new();
        keys.press("ArrowLeft");
        keys.press("Space");

        assert!(!keys.release("ArrowDown"));
        assert!(!keys.release("ArrowDown"));
        assert_eq!(keys.codes(), ["ArrowLeft".to_string(), "Space".to_string()]);
    }

    #[test]
    fn release_removes_only_that_key() {
        let mut keys = PressedKeys::new();
        keys.press("ArrowLeft");
        keys.press("Space");
        keys.press("ArrowUp");

        assert!(keys.release("Space"));
        assert_eq!(
            keys.codes(),
            ["ArrowLeft".to_string(), "ArrowUp".to_string()]
        );
        assert!(!keys.is_pressed("Space"));
    }

    #[test]
    fn find_returns_oldest_match() {
        let mut keys = PressedKeys::new();
        keys.press("Space");
        keys.press("ArrowRight");
        keys.press("ArrowUp");

        let arrow = keys.find(|code| code.strip_prefix("Arrow").map(str::to_string));
        assert_eq!(arrow.as_deref(), Some("Right"));
    }
}
