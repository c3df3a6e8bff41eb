#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tokenfield engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Tokenfield.";

/// Number of raw generator values; raw values fall in `0..RAW_VALUE_MODULUS`.
pub const RAW_VALUE_MODULUS: u8 = 10;

/// Smallest raw generator value that denotes a token-bearing cell.
pub const TOKEN_BAND_MIN: u8 = 1;

/// Largest raw generator value that denotes a token-bearing cell.
pub const TOKEN_BAND_MAX: u8 = 4;

/// Raw generator value remapped to an empty cell to create sparsity.
pub const DEAD_RAW_VALUE: u8 = 3;

/// Token value that, once reached, triggers the one-time win signal.
pub const WIN_THRESHOLD: u32 = 2048;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the world's grid geometry and evicts every live cell.
    ConfigureGeometry {
        /// Geometry the world should adopt.
        geometry: GridGeometry,
    },
    /// Moves the player to the provided continuous position.
    MovePlayer {
        /// Destination expressed in world units.
        position: WorldPosition,
    },
    /// Requests that a cell become live, resolving its state on first need.
    MaterializeCell {
        /// Coordinate of the cell entering the view window.
        cell: GridCoord,
    },
    /// Requests that a live cell be dropped after snapshotting its state.
    EvictCell {
        /// Coordinate of the cell leaving the view window.
        cell: GridCoord,
    },
    /// Attempts to lift the token held by the provided cell.
    CollectToken {
        /// Coordinate of the cell targeted by the collection attempt.
        cell: GridCoord,
    },
    /// Attempts to double the provided cell's token using the held token.
    DoubleToken {
        /// Coordinate of the cell targeted by the doubling attempt.
        cell: GridCoord,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces that the world adopted a new grid geometry.
    GeometryChanged {
        /// Geometry that became active after processing commands.
        geometry: GridGeometry,
    },
    /// Confirms that the player moved to a new continuous position.
    PlayerMoved {
        /// Position the player now occupies.
        position: WorldPosition,
        /// Grid cell derived from the new position.
        cell: GridCoord,
    },
    /// Confirms that a cell became live within the view window.
    CellMaterialized {
        /// Coordinate of the materialized cell.
        cell: GridCoord,
        /// State the cell holds on materialization.
        state: CellState,
    },
    /// Reports that a live cell's state changed.
    CellUpdated {
        /// Coordinate of the mutated cell.
        cell: GridCoord,
        /// State the cell holds after the mutation.
        state: CellState,
    },
    /// Confirms that a cell left the view window and was dropped.
    CellEvicted {
        /// Coordinate of the evicted cell.
        cell: GridCoord,
    },
    /// Confirms that the player lifted a token from a cell.
    TokenCollected {
        /// Coordinate the token was lifted from.
        cell: GridCoord,
        /// Token now carried by the player.
        token: HeldToken,
        /// Previously held token returned to its origin, if any.
        returned: Option<(GridCoord, TokenValue)>,
    },
    /// Confirms that a cell's token doubled and consumed the held token.
    TokenDoubled {
        /// Coordinate of the doubled cell.
        cell: GridCoord,
        /// Value the cell holds after doubling.
        value: TokenValue,
    },
    /// Reports that a collection or doubling attempt was rejected.
    InteractionRejected {
        /// Coordinate targeted by the rejected attempt.
        cell: GridCoord,
        /// Kind of interaction that was attempted.
        action: InteractionAction,
        /// Specific reason the attempt failed.
        reason: RejectReason,
    },
    /// Announces a new process-wide maximum token value.
    HighestValueChanged {
        /// Largest token value observed so far.
        value: u32,
    },
    /// One-time signal emitted when the win threshold is first crossed.
    ThresholdReached,
}

/// Kinds of token interaction a player may attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InteractionAction {
    /// Lifting a token out of a cell.
    Collect,
    /// Doubling a cell's token with the held token.
    Double,
}

/// Reasons an interaction attempt may be rejected by the world.
///
/// Rejections are first-class gameplay outcomes, not errors: they mutate
/// nothing and carry enough context for an adapter to explain the refusal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RejectReason {
    /// The player stood farther from the cell center than the allowed radius.
    OutOfRange {
        /// Measured distance from the player to the cell center.
        distance: f64,
        /// Maximum distance at which interactions are permitted.
        limit: f64,
    },
    /// The targeted coordinate has no live cell in the current view window.
    CellNotVisible,
    /// The targeted cell holds no token to collect or double.
    NothingToCollect,
    /// Doubling requires a held token and the player carries none.
    NoHeldToken,
    /// The held token's value does not match the targeted cell's value.
    ValueMismatch {
        /// Value of the token the player carries.
        held: TokenValue,
        /// Value found in the targeted cell.
        found: TokenValue,
    },
}

/// Location of a single cell in the unbounded grid lattice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    i: i64,
    j: i64,
}

impl GridCoord {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(i: i64, j: i64) -> Self {
        Self { i, j }
    }

    /// Index of the cell along the horizontal axis.
    #[must_use]
    pub const fn i(&self) -> i64 {
        self.i
    }

    /// Index of the cell along the vertical axis.
    #[must_use]
    pub const fn j(&self) -> i64 {
        self.j
    }

    /// Derives the cell containing the provided continuous position.
    ///
    /// Cells tile the plane in squares of `cell_length` world units; the
    /// division floors, so negative positions resolve to negative indices
    /// rather than clustering around the origin.
    #[must_use]
    pub fn from_position(position: WorldPosition, cell_length: f64) -> Self {
        let length = sanitize_cell_length(cell_length);
        Self {
            i: (position.x() / length).floor() as i64,
            j: (position.y() / length).floor() as i64,
        }
    }

    /// Continuous position of the cell's center.
    #[must_use]
    pub fn center(&self, cell_length: f64) -> WorldPosition {
        let length = sanitize_cell_length(cell_length);
        WorldPosition::new(
            (self.i as f64 + 0.5) * length,
            (self.j as f64 + 0.5) * length,
        )
    }
}

/// Continuous player position expressed in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldPosition {
    x: f64,
    y: f64,
}

impl WorldPosition {
    /// Creates a new continuous position.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Horizontal component of the position.
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// Vertical component of the position.
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.y
    }

    /// Euclidean distance between two continuous positions.
    #[must_use]
    pub fn distance_to(&self, other: WorldPosition) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns the position offset by the provided deltas.
    #[must_use]
    pub fn offset_by(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Positive value carried by a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenValue(NonZeroU32);

impl TokenValue {
    /// Wraps a non-zero value as a token value.
    #[must_use]
    pub const fn new(value: NonZeroU32) -> Self {
        Self(value)
    }

    /// Converts a raw integer into a token value, rejecting zero.
    #[must_use]
    pub fn from_u32(value: u32) -> Option<Self> {
        NonZeroU32::new(value).map(Self)
    }

    /// Retrieves the numeric value of the token.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0.get()
    }

    /// Returns the token value doubled, saturating at `u32::MAX`.
    #[must_use]
    pub fn doubled(&self) -> Self {
        match NonZeroU32::new(self.0.get().saturating_mul(2)) {
            Some(value) => Self(value),
            None => *self,
        }
    }
}

/// Mutable gameplay payload of a single cell.
///
/// A cell either holds a token with a positive value or holds nothing; the
/// representation leaves no room for a present token with value zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellState {
    token: Option<TokenValue>,
}

impl CellState {
    /// Creates the state of a cell holding no token.
    #[must_use]
    pub const fn empty() -> Self {
        Self { token: None }
    }

    /// Creates the state of a cell holding a token with the provided value.
    #[must_use]
    pub const fn with_token(value: TokenValue) -> Self {
        Self { token: Some(value) }
    }

    /// Reports whether the cell currently holds a token.
    #[must_use]
    pub const fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Value of the token held by the cell, if any.
    #[must_use]
    pub const fn token(&self) -> Option<TokenValue> {
        self.token
    }
}

/// Token lifted from a cell and carried by the player.
///
/// At most one exists per world; while it is held, the origin cell holds no
/// token of its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HeldToken {
    value: TokenValue,
    origin: GridCoord,
}

impl HeldToken {
    /// Creates a held token lifted from the provided origin cell.
    #[must_use]
    pub const fn new(value: TokenValue, origin: GridCoord) -> Self {
        Self { value, origin }
    }

    /// Value carried by the token.
    #[must_use]
    pub const fn value(&self) -> TokenValue {
        self.value
    }

    /// Cell the token was lifted from.
    #[must_use]
    pub const fn origin(&self) -> GridCoord {
        self.origin
    }
}

/// Spatial configuration shared by the world and the viewport system.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridGeometry {
    cell_length: f64,
    view_radius: u32,
    interaction_radius: f64,
}

impl GridGeometry {
    /// Creates a new geometry, sanitizing degenerate inputs.
    ///
    /// A non-finite or non-positive cell length falls back to the default so
    /// floor division stays well defined; a negative interaction radius is
    /// clamped to zero.
    #[must_use]
    pub fn new(cell_length: f64, view_radius: u32, interaction_radius: f64) -> Self {
        Self {
            cell_length: sanitize_cell_length(cell_length),
            view_radius,
            interaction_radius: if interaction_radius.is_finite() && interaction_radius > 0.0 {
                interaction_radius
            } else {
                0.0
            },
        }
    }

    /// Side length of a square cell expressed in world units.
    #[must_use]
    pub const fn cell_length(&self) -> f64 {
        self.cell_length
    }

    /// Number of cells visible in each direction from the player's cell.
    #[must_use]
    pub const fn view_radius(&self) -> u32 {
        self.view_radius
    }

    /// Maximum distance at which token interactions are permitted.
    #[must_use]
    pub const fn interaction_radius(&self) -> f64 {
        self.interaction_radius
    }
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self {
            cell_length: DEFAULT_CELL_LENGTH,
            view_radius: DEFAULT_VIEW_RADIUS,
            interaction_radius: DEFAULT_INTERACTION_RADIUS,
        }
    }
}

const DEFAULT_CELL_LENGTH: f64 = 10.0;
const DEFAULT_VIEW_RADIUS: u32 = 8;
const DEFAULT_INTERACTION_RADIUS: f64 = 50.0;

fn sanitize_cell_length(cell_length: f64) -> f64 {
    if cell_length.is_finite() && cell_length > 0.0 {
        cell_length
    } else {
        DEFAULT_CELL_LENGTH
    }
}

/// Cardinal movement directions available to the player.
///
/// Input adapters map their own keys or buttons onto this closed set; the
/// world only ever observes the resulting positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward increasing vertical coordinates.
    North,
    /// Movement toward increasing horizontal coordinates.
    East,
    /// Movement toward decreasing vertical coordinates.
    South,
    /// Movement toward decreasing horizontal coordinates.
    West,
}

impl Direction {
    /// Grid-axis deltas for one step in this direction.
    #[must_use]
    pub const fn offsets(&self) -> (i64, i64) {
        match self {
            Self::North => (0, 1),
            Self::East => (1, 0),
            Self::South => (0, -1),
            Self::West => (-1, 0),
        }
    }
}
