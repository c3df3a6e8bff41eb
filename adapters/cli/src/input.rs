//! Mapping from script characters to player intents.
//!
//! Inputs resolve through a closed lookup into [`Direction`] and the two
//! interaction intents; the world never sees raw input, only the positions
//! and commands the adapter derives from it.

use tokenfield_core::Direction;

/// Intent expressed by a single script character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PlayerInput {
    /// Step one cell in the given direction.
    Step(Direction),
    /// Attempt to collect the token in the player's current cell.
    Collect,
    /// Attempt to double the token in the player's current cell.
    Double,
}

/// Resolves a script character to an intent; whitespace yields `None`.
pub(crate) fn parse(input: char) -> Option<PlayerInput> {
    match input.to_ascii_lowercase() {
        'n' => Some(PlayerInput::Step(Direction::North)),
        'e' => Some(PlayerInput::Step(Direction::East)),
        's' => Some(PlayerInput::Step(Direction::South)),
        'w' => Some(PlayerInput::Step(Direction::West)),
        'c' => Some(PlayerInput::Collect),
        'd' => Some(PlayerInput::Double),
        _ => None,
    }
}
