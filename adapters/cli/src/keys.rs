//! Keyboard mapping for the terminal player.

use log::debug;
use reef_core::{Direction, Input};

/// Action requested by a single key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Key {
    /// Run one update cycle with the given input.
    Play(Input),
    /// Reload the current level.
    Restart,
    /// Leave the session.
    Quit,
}

/// Maps one key to its action; unmapped keys yield `None`.
pub(crate) fn parse_key(key: char) -> Option<Key> {
    let action = match key {
        'w' | 'k' => Key::Play(Input::Step(Direction::North)),
        'a' | 'h' => Key::Play(Input::Step(Direction::West)),
        's' | 'j' => Key::Play(Input::Step(Direction::South)),
        'd' | 'l' => Key::Play(Input::Step(Direction::East)),
        ' ' => Key::Play(Input::SwitchCharacter),
        '.' => Key::Play(Input::Idle),
        'r' => Key::Restart,
        'q' => Key::Quit,
        _ => return None,
    };
    Some(action)
}

/// Maps a line of keys; an empty line lets the clock advance once.
pub(crate) fn parse_line(line: &str) -> Vec<Key> {
    if line.is_empty() {
        return vec![Key::Play(Input::Idle)];
    }
    line.chars()
        .filter_map(|key| {
            let action = parse_key(key);
            if action.is_none() {
                debug!("ignoring unmapped key {key:?}");
            }
            action
        })
        .collect()
}
