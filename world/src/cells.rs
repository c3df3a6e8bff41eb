//! Registry of currently live cells.
//!
//! A live cell is the materialized wrapper around a coordinate's state while
//! it sits inside the view window. The registry owns only the window-sized
//! working set; dropping an entry discards the wrapper, never the state,
//! which the world snapshots into the mutation ledger on eviction.

use std::collections::BTreeMap;

use tokenfield_core::{CellState, GridCoord};

/// Window-sized cache of materialized cells keyed by coordinate.
#[derive(Clone, Debug, Default)]
pub(crate) struct CellRegistry {
    live: BTreeMap<GridCoord, CellState>,
}

impl CellRegistry {
    /// Creates an empty registry.
    pub(crate) fn new() -> Self {
        Self {
            live: BTreeMap::new(),
        }
    }

    /// Reports whether the coordinate currently has a live cell.
    pub(crate) fn is_live(&self, cell: GridCoord) -> bool {
        self.live.contains_key(&cell)
    }

    /// State of the live cell at the coordinate, if materialized.
    pub(crate) fn state(&self, cell: GridCoord) -> Option<CellState> {
        self.live.get(&cell).copied()
    }

    /// Registers a newly materialized cell.
    pub(crate) fn insert(&mut self, cell: GridCoord, state: CellState) {
        let _ = self.live.insert(cell, state);
    }

    /// Replaces the state of an already-live cell.
    ///
    /// Returns `false` when the coordinate has no live cell; the caller
    /// treats that as a sequencing bug, not a recoverable condition.
    pub(crate) fn set_state(&mut self, cell: GridCoord, state: CellState) -> bool {
        match self.live.get_mut(&cell) {
            Some(slot) => {
                *slot = state;
                true
            }
            None => false,
        }
    }

    /// Drops the live cell, returning its final state for snapshotting.
    pub(crate) fn remove(&mut self, cell: GridCoord) -> Option<CellState> {
        self.live.remove(&cell)
    }

    /// Drops every live cell, yielding final states in coordinate order.
    pub(crate) fn drain_all(&mut self) -> Vec<(GridCoord, CellState)> {
        let drained: Vec<_> = self
            .live
            .iter()
            .map(|(cell, state)| (*cell, *state))
            .collect();
        self.live.clear();
        drained
    }

    /// Iterates over live cells in coordinate order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (GridCoord, CellState)> + '_ {
        self.live.iter().map(|(cell, state)| (*cell, *state))
    }
}
