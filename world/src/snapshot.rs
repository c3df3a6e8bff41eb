//! Save/restore contract for the world.
//!
//! A snapshot captures everything needed to reproduce the observable world on
//! another run: the generator seed, geometry, player position, held token,
//! highest-value record with its win latch, and the mutation ledger. Live
//! cells are folded into the ledger on export, mirroring the conservative
//! eviction rule, so a restored world can rebuild its view window purely from
//! ledger-then-generator resolution.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tokenfield_core::{CellState, GridCoord, GridGeometry, HeldToken, WorldPosition};

use crate::{cells::CellRegistry, ledger::MutationLedger, World};

/// Serializable capture of the world's persistent state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Seed the deterministic generator derives cell values from.
    pub seed: u64,
    /// Grid geometry active when the snapshot was taken.
    pub geometry: GridGeometry,
    /// Continuous position the player occupied.
    pub player: WorldPosition,
    /// Token the player carried, if any.
    pub held: Option<HeldToken>,
    /// Largest token value observed during the session.
    pub highest_value: u32,
    /// Whether the win threshold was already crossed.
    pub threshold_reached: bool,
    /// Last known state for every coordinate the session touched.
    pub ledger: Vec<LedgerEntry>,
}

/// Single coordinate-to-state entry within a snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Coordinate the entry describes.
    pub cell: GridCoord,
    /// Last known state of the cell.
    pub state: CellState,
}

/// Captures the world's persistent state for external storage.
#[must_use]
pub fn snapshot(world: &World) -> WorldSnapshot {
    let mut entries: BTreeMap<GridCoord, CellState> = world.ledger.iter().collect();
    for (cell, state) in world.cells.iter() {
        let _ = entries.insert(cell, state);
    }

    WorldSnapshot {
        seed: world.seed,
        geometry: world.geometry,
        player: world.player,
        held: world.held,
        highest_value: world.highest_value,
        threshold_reached: world.threshold_reached,
        ledger: entries
            .into_iter()
            .map(|(cell, state)| LedgerEntry { cell, state })
            .collect(),
    }
}

impl World {
    /// Restores a world from a previously captured snapshot.
    ///
    /// The restored world starts with no live cells; the viewport system
    /// rebuilds the window from the restored player position on the next
    /// movement pump.
    #[must_use]
    pub fn from_snapshot(snapshot: WorldSnapshot) -> Self {
        let mut ledger = MutationLedger::new();
        for entry in snapshot.ledger {
            ledger.save(entry.cell, entry.state);
        }

        Self {
            banner: tokenfield_core::WELCOME_BANNER,
            seed: snapshot.seed,
            geometry: snapshot.geometry,
            player: snapshot.player,
            cells: CellRegistry::new(),
            ledger,
            held: snapshot.held,
            highest_value: snapshot.highest_value,
            threshold_reached: snapshot.threshold_reached,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{snapshot, WorldSnapshot};
    use crate::{apply, query, World};
    use tokenfield_core::{Command, GridCoord, WorldPosition};

    #[test]
    fn snapshot_folds_live_cells_into_the_ledger() {
        let mut world = World::new();
        let mut events = Vec::new();
        let cell = GridCoord::new(2, 3);
        apply(&mut world, Command::MaterializeCell { cell }, &mut events);

        let captured = snapshot(&world);
        assert!(captured.ledger.iter().any(|entry| entry.cell == cell));
    }

    #[test]
    fn restored_world_preserves_persistent_state() {
        let mut world = World::with_seed(99);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::MovePlayer {
                position: WorldPosition::new(42.0, -17.0),
            },
            &mut events,
        );

        let restored = World::from_snapshot(snapshot(&world));
        assert_eq!(
            query::player_position(&restored),
            query::player_position(&world)
        );
        assert_eq!(query::geometry(&restored), query::geometry(&world));
        assert_eq!(query::highest_value(&restored), query::highest_value(&world));
        assert!(query::live_cells(&restored).is_empty());
    }

    #[test]
    fn empty_snapshot_restores_a_fresh_world() {
        let fresh = snapshot(&World::new());
        let restored = World::from_snapshot(WorldSnapshot { ..fresh });
        assert_eq!(query::ledger_len(&restored), 0);
        assert!(query::held_token(&restored).is_none());
        assert!(!query::threshold_reached(&restored));
    }
}
