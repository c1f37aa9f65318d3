//! Input mapping
//!
//! The whole game is played with one control surface. Hosts translate raw
//! events into a [`Command`] and hand it to `Engine::dispatch`.

/// Abstract input command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Flap while playing, start a new episode otherwise
    Primary,
}

/// Map a `KeyboardEvent.key` value to a command
pub fn command_for_key(key: &str) -> Option<Command> {
    match key {
        " " | "Spacebar" | "Enter" | "ArrowUp" | "w" | "W" => Some(Command::Primary),
        _ => None,
    }
}

/// Pointer and touch presses always map to the primary command
pub fn command_for_pointer() -> Command {
    Command::Primary
}
