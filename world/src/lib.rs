#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Tokenfield.
//!
//! The world owns the only mutable copy of the game state: the player, the
//! window of live cells, the mutation ledger that preserves every observed
//! cell state across eviction, the single held token, and the monotone
//! highest-value record. Adapters and systems drive it exclusively through
//! [`apply`] and read it back through [`query`].

mod cells;
mod ledger;
pub mod snapshot;

use tokenfield_core::{
    CellState, Command, Event, GridCoord, GridGeometry, HeldToken, InteractionAction,
    RejectReason, WorldPosition, WELCOME_BANNER, WIN_THRESHOLD,
};
use tokenfield_system_generation as generation;

use crate::{cells::CellRegistry, ledger::MutationLedger};

/// Represents the authoritative Tokenfield world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    seed: u64,
    geometry: GridGeometry,
    player: WorldPosition,
    cells: CellRegistry,
    ledger: MutationLedger,
    held: Option<HeldToken>,
    highest_value: u32,
    threshold_reached: bool,
}

impl World {
    /// Creates a new world with the default seed and geometry.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(generation::DEFAULT_WORLD_SEED)
    }

    /// Creates a new world whose generator derives from the provided seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            banner: WELCOME_BANNER,
            seed,
            geometry: GridGeometry::default(),
            player: WorldPosition::new(0.0, 0.0),
            cells: CellRegistry::new(),
            ledger: MutationLedger::new(),
            held: None,
            highest_value: 0,
            threshold_reached: false,
        }
    }

    fn configure_geometry(&mut self, geometry: GridGeometry, out_events: &mut Vec<Event>) {
        for (cell, state) in self.cells.drain_all() {
            self.ledger.save(cell, state);
            out_events.push(Event::CellEvicted { cell });
        }
        self.geometry = geometry;
        out_events.push(Event::GeometryChanged { geometry });
    }

    fn move_player(&mut self, position: WorldPosition, out_events: &mut Vec<Event>) {
        self.player = position;
        out_events.push(Event::PlayerMoved {
            position,
            cell: GridCoord::from_position(position, self.geometry.cell_length()),
        });
    }

    fn materialize_cell(&mut self, cell: GridCoord, out_events: &mut Vec<Event>) {
        if self.cells.is_live(cell) {
            return;
        }

        let state = match self.ledger.restore(cell) {
            Some(remembered) => remembered,
            None => generation::generate(self.seed, cell),
        };

        self.cells.insert(cell, state);
        out_events.push(Event::CellMaterialized { cell, state });
        self.record_state(state, out_events);
    }

    fn evict_cell(&mut self, cell: GridCoord, out_events: &mut Vec<Event>) {
        if let Some(state) = self.cells.remove(cell) {
            // Snapshot unconditionally; regeneration is never relied on for
            // a cell the player has already observed.
            self.ledger.save(cell, state);
            out_events.push(Event::CellEvicted { cell });
        }
    }

    fn collect_token(&mut self, cell: GridCoord, out_events: &mut Vec<Event>) {
        let Some(state) = self.cells.state(cell) else {
            self.reject(cell, InteractionAction::Collect, RejectReason::CellNotVisible, out_events);
            return;
        };
        let Some(found) = state.token() else {
            self.reject(
                cell,
                InteractionAction::Collect,
                RejectReason::NothingToCollect,
                out_events,
            );
            return;
        };
        if let Some(reason) = self.range_violation(cell) {
            self.reject(cell, InteractionAction::Collect, reason, out_events);
            return;
        }

        let mut returned = None;
        if let Some(previous) = self.held.take() {
            self.restore_origin(previous, out_events);
            returned = Some((previous.origin(), previous.value()));
        }

        let token = HeldToken::new(found, cell);
        self.held = Some(token);
        self.set_cell_state(cell, CellState::empty(), out_events);
        out_events.push(Event::TokenCollected {
            cell,
            token,
            returned,
        });
    }

    fn double_token(&mut self, cell: GridCoord, out_events: &mut Vec<Event>) {
        let Some(state) = self.cells.state(cell) else {
            self.reject(cell, InteractionAction::Double, RejectReason::CellNotVisible, out_events);
            return;
        };
        let Some(found) = state.token() else {
            self.reject(
                cell,
                InteractionAction::Double,
                RejectReason::NothingToCollect,
                out_events,
            );
            return;
        };
        let Some(held) = self.held else {
            self.reject(cell, InteractionAction::Double, RejectReason::NoHeldToken, out_events);
            return;
        };
        if held.value() != found {
            self.reject(
                cell,
                InteractionAction::Double,
                RejectReason::ValueMismatch {
                    held: held.value(),
                    found,
                },
                out_events,
            );
            return;
        }
        if let Some(reason) = self.range_violation(cell) {
            self.reject(cell, InteractionAction::Double, reason, out_events);
            return;
        }

        let value = found.doubled();
        self.held = None;
        self.set_cell_state(cell, CellState::with_token(value), out_events);
        out_events.push(Event::TokenDoubled { cell, value });
    }

    /// Returns the held token to its origin cell.
    ///
    /// The origin may have left the view window since the token was lifted;
    /// in that case the state is written straight through the ledger and no
    /// live cell exists to update.
    fn restore_origin(&mut self, held: HeldToken, out_events: &mut Vec<Event>) {
        let origin = held.origin();
        let state = CellState::with_token(held.value());
        if self.cells.is_live(origin) {
            self.set_cell_state(origin, state, out_events);
        } else {
            self.ledger.save(origin, state);
        }
    }

    /// Replaces the state of a live cell, mirroring the mutation into the
    /// ledger immediately so an unexpected eviction never loses it.
    ///
    /// Calling this for a coordinate without a live cell is a sequencing bug
    /// in the world itself; interaction commands validate liveness first.
    fn set_cell_state(&mut self, cell: GridCoord, state: CellState, out_events: &mut Vec<Event>) {
        let updated = self.cells.set_state(cell, state);
        debug_assert!(updated, "set_cell_state requires a live cell at {cell:?}");
        if !updated {
            return;
        }

        self.ledger.save(cell, state);
        out_events.push(Event::CellUpdated { cell, state });
        self.record_state(state, out_events);
    }

    fn record_state(&mut self, state: CellState, out_events: &mut Vec<Event>) {
        if let Some(token) = state.token() {
            self.record_value(token.get(), out_events);
        }
    }

    fn record_value(&mut self, value: u32, out_events: &mut Vec<Event>) {
        if value <= self.highest_value {
            return;
        }

        self.highest_value = value;
        out_events.push(Event::HighestValueChanged { value });

        if !self.threshold_reached && value >= WIN_THRESHOLD {
            self.threshold_reached = true;
            out_events.push(Event::ThresholdReached);
        }
    }

    fn range_violation(&self, cell: GridCoord) -> Option<RejectReason> {
        let center = cell.center(self.geometry.cell_length());
        let distance = self.player.distance_to(center);
        let limit = self.geometry.interaction_radius();
        if distance > limit {
            Some(RejectReason::OutOfRange { distance, limit })
        } else {
            None
        }
    }

    fn reject(
        &self,
        cell: GridCoord,
        action: InteractionAction,
        reason: RejectReason,
        out_events: &mut Vec<Event>,
    ) {
        out_events.push(Event::InteractionRejected {
            cell,
            action,
            reason,
        });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGeometry { geometry } => world.configure_geometry(geometry, out_events),
        Command::MovePlayer { position } => world.move_player(position, out_events),
        Command::MaterializeCell { cell } => world.materialize_cell(cell, out_events),
        Command::EvictCell { cell } => world.evict_cell(cell, out_events),
        Command::CollectToken { cell } => world.collect_token(cell, out_events),
        Command::DoubleToken { cell } => world.double_token(cell, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use tokenfield_core::{CellState, GridCoord, GridGeometry, HeldToken, WorldPosition};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides the world's active grid geometry.
    #[must_use]
    pub fn geometry(world: &World) -> GridGeometry {
        world.geometry
    }

    /// Continuous position currently occupied by the player.
    #[must_use]
    pub fn player_position(world: &World) -> WorldPosition {
        world.player
    }

    /// Grid cell derived from the player's continuous position.
    #[must_use]
    pub fn player_cell(world: &World) -> GridCoord {
        GridCoord::from_position(world.player, world.geometry.cell_length())
    }

    /// Token currently carried by the player, if any.
    #[must_use]
    pub fn held_token(world: &World) -> Option<HeldToken> {
        world.held
    }

    /// Largest token value the world has ever produced.
    #[must_use]
    pub fn highest_value(world: &World) -> u32 {
        world.highest_value
    }

    /// Reports whether the win threshold has been crossed this session.
    #[must_use]
    pub fn threshold_reached(world: &World) -> bool {
        world.threshold_reached
    }

    /// State of the live cell at the coordinate, if materialized.
    #[must_use]
    pub fn cell_state(world: &World, cell: GridCoord) -> Option<CellState> {
        world.cells.state(cell)
    }

    /// Number of coordinates the mutation ledger currently covers.
    #[must_use]
    pub fn ledger_len(world: &World) -> usize {
        world.ledger.len()
    }

    /// Captures a read-only view of the currently live cells.
    #[must_use]
    pub fn live_cells(world: &World) -> LiveCellView {
        LiveCellView {
            snapshots: world
                .cells
                .iter()
                .map(|(cell, state)| CellSnapshot { cell, state })
                .collect(),
        }
    }

    /// Read-only snapshot describing all live cells in the view window.
    #[derive(Clone, Debug)]
    pub struct LiveCellView {
        snapshots: Vec<CellSnapshot>,
    }

    impl LiveCellView {
        /// Iterator over the captured cell snapshots in coordinate order.
        pub fn iter(&self) -> impl Iterator<Item = &CellSnapshot> {
            self.snapshots.iter()
        }

        /// Reports whether the coordinate has a live cell in this view.
        #[must_use]
        pub fn contains(&self, cell: GridCoord) -> bool {
            self.snapshots
                .binary_search_by_key(&cell, |snapshot| snapshot.cell)
                .is_ok()
        }

        /// Number of live cells captured by the view.
        #[must_use]
        pub fn len(&self) -> usize {
            self.snapshots.len()
        }

        /// Reports whether the view captured no live cells.
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.snapshots.is_empty()
        }
    }

    /// Immutable representation of a single live cell used for queries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct CellSnapshot {
        /// Coordinate the cell occupies.
        pub cell: GridCoord,
        /// State the cell held when the view was captured.
        pub state: CellState,
    }
}
