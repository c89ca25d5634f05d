use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::config::KeyBindings;
use crate::direction::Direction;

/// High-level input events consumed by the game loop.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameInput {
    Direction(Direction),
    /// Start over from configuration after a session has ended.
    Restart,
    /// The terminal changed size and the screen must be repainted.
    Redraw,
    Quit,
}

/// Translates terminal key events through a configurable binding table.
#[derive(Debug, Clone)]
pub struct InputMapper {
    bindings: KeyBindings,
}

impl InputMapper {
    #[must_use]
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }

    /// Waits up to `timeout` for a terminal event and maps it.
    ///
    /// Returns `Ok(None)` on timeout and for events that map to nothing.
    pub fn poll_input(&self, timeout: Duration) -> io::Result<Option<GameInput>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }

        Ok(self.map_event(event::read()?))
    }

    #[must_use]
    pub fn map_event(&self, event: Event) -> Option<GameInput> {
        match event {
            Event::Key(key) => self.map_key(key),
            Event::Resize(_, _) => Some(GameInput::Redraw),
            _ => None,
        }
    }

    /// Maps one key event. Releases and unbound keys are ignored.
    #[must_use]
    pub fn map_key(&self, key: KeyEvent) -> Option<GameInput> {
        if key.kind == KeyEventKind::Release {
            return None;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(GameInput::Quit);
        }

        let name = key_name(key.code)?;
        if let Some(direction) = self.bindings.lookup(&name) {
            return Some(GameInput::Direction(direction));
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(GameInput::Quit),
            KeyCode::Enter | KeyCode::Char('r') | KeyCode::Char('R') => Some(GameInput::Restart),
            _ => None,
        }
    }
}

/// Returns the binding-table name for a key code.
#[must_use]
pub fn key_name(code: KeyCode) -> Option<String> {
    let name = match code {
        KeyCode::Up => "ArrowUp".to_owned(),
        KeyCode::Down => "ArrowDown".to_owned(),
        KeyCode::Left => "ArrowLeft".to_owned(),
        KeyCode::Right => "ArrowRight".to_owned(),
        KeyCode::Enter => "Enter".to_owned(),
        KeyCode::Esc => "Escape".to_owned(),
        KeyCode::Char(c) => c.to_string(),
        _ => return None,
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

    use crate::config::KeyBindings;
    use crate::direction::Direction;

    use super::{GameInput, InputMapper};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn default_table_maps_arrow_keys() {
        let mapper = InputMapper::new(KeyBindings::default());

        let cases = [
            (KeyCode::Up, Direction::Up),
            (KeyCode::Down, Direction::Down),
            (KeyCode::Left, Direction::Left),
            (KeyCode::Right, Direction::Right),
        ];
        for (code, direction) in cases {
            assert_eq!(mapper.map_key(press(code)), Some(GameInput::Direction(direction)));
        }
    }

    #[test]
    fn custom_table_replaces_defaults() {
        let mapper = InputMapper::new(KeyBindings(BTreeMap::from([
            ("w".to_owned(), Direction::Up),
            ("a".to_owned(), Direction::Left),
        ])));

        assert_eq!(
            mapper.map_key(press(KeyCode::Char('w'))),
            Some(GameInput::Direction(Direction::Up))
        );
        assert_eq!(
            mapper.map_key(press(KeyCode::Char('a'))),
            Some(GameInput::Direction(Direction::Left))
        );
        assert_eq!(mapper.map_key(press(KeyCode::Up)), None);
    }

    #[test]
    fn unmapped_keys_and_releases_are_ignored() {
        let mapper = InputMapper::new(KeyBindings::default());

        assert_eq!(mapper.map_key(press(KeyCode::Char('x'))), None);
        assert_eq!(mapper.map_key(press(KeyCode::F(5))), None);

        let release = KeyEvent {
            code: KeyCode::Up,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(mapper.map_key(release), None);
    }

    #[test]
    fn control_keys_quit_and_restart() {
        let mapper = InputMapper::new(KeyBindings::default());

        assert_eq!(mapper.map_key(press(KeyCode::Char('q'))), Some(GameInput::Quit));
        assert_eq!(mapper.map_key(press(KeyCode::Esc)), Some(GameInput::Quit));
        assert_eq!(
            mapper.map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(GameInput::Quit)
        );
        assert_eq!(mapper.map_key(press(KeyCode::Enter)), Some(GameInput::Restart));
    }

    #[test]
    fn resize_requests_a_redraw() {
        let mapper = InputMapper::new(KeyBindings::default());

        assert_eq!(mapper.map_event(Event::Resize(80, 24)), Some(GameInput::Redraw));
        assert_eq!(
            mapper.map_event(Event::Key(press(KeyCode::Left))),
            Some(GameInput::Direction(Direction::Left))
        );
        assert_eq!(mapper.map_event(Event::FocusGained), None);
    }
}
