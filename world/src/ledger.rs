//! Persistent mutation ledger backing the live-cell cache.
//!
//! The ledger is the single source of truth for any cell the world has ever
//! snapshotted: live cells are disposable wrappers, but a ledger entry
//! outlives eviction and is consulted before the generator whenever a cell
//! re-enters the view window.

use std::collections::BTreeMap;

use tokenfield_core::{CellState, GridCoord};

/// Total map from coordinate to the last known state of a touched cell.
#[derive(Clone, Debug, Default)]
pub(crate) struct MutationLedger {
    entries: BTreeMap<GridCoord, CellState>,
}

impl MutationLedger {
    /// Creates an empty ledger.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Unconditionally overwrites the snapshot stored for the coordinate.
    pub(crate) fn save(&mut self, cell: GridCoord, state: CellState) {
        let _ = self.entries.insert(cell, state);
    }

    /// Retrieves the last snapshot for the coordinate, if one was ever saved.
    ///
    /// `None` means "never snapshotted; fall back to generation". Querying an
    /// unknown coordinate is never a fault.
    pub(crate) fn restore(&self, cell: GridCoord) -> Option<CellState> {
        self.entries.get(&cell).copied()
    }

    /// Number of coordinates with a stored snapshot.
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates over the stored snapshots in coordinate order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (GridCoord, CellState)> + '_ {
        self.entries.iter().map(|(cell, state)| (*cell, *state))
    }
}
