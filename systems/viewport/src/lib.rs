#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! View-window management system.
//!
//! The viewport reacts to player movement and geometry changes by diffing the
//! required coordinate window against the currently live cells, then emits
//! materialize commands for coordinates entering the window and evict
//! commands for live cells leaving it. Cells that remain visible are never
//! touched, so rapid repeated movement cannot flicker a cell through an
//! evict-and-regenerate cycle.

use tokenfield_core::{Command, Event, GridCoord, GridGeometry};
use tokenfield_world::query::LiveCellView;

/// Pure system that keeps the set of live cells aligned with the view window.
#[derive(Debug, Default)]
pub struct Viewport;

impl Viewport {
    /// Creates a new viewport system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Consumes world events and immutable views to emit window commands.
    ///
    /// Only [`Event::PlayerMoved`] and [`Event::GeometryChanged`] trigger a
    /// diff; any other event batch produces no commands. Commands are emitted
    /// in deterministic coordinate order: materializations first, then
    /// evictions.
    pub fn handle(
        &mut self,
        events: &[Event],
        player_cell: GridCoord,
        geometry: GridGeometry,
        live: &LiveCellView,
        out: &mut Vec<Command>,
    ) {
        let window_changed = events.iter().any(|event| {
            matches!(
                event,
                Event::PlayerMoved { .. } | Event::GeometryChanged { .. }
            )
        });
        if !window_changed {
            return;
        }

        let radius = i64::from(geometry.view_radius());
        for cell in window_cells(player_cell, radius) {
            if !live.contains(cell) {
                out.push(Command::MaterializeCell { cell });
            }
        }

        for snapshot in live.iter() {
            if !window_contains(player_cell, radius, snapshot.cell) {
                out.push(Command::EvictCell {
                    cell: snapshot.cell,
                });
            }
        }
    }
}

fn window_cells(center: GridCoord, radius: i64) -> impl Iterator<Item = GridCoord> {
    let (ci, cj) = (center.i(), center.j());
    (ci.saturating_sub(radius)..=ci.saturating_add(radius)).flat_map(move |i| {
        (cj.saturating_sub(radius)..=cj.saturating_add(radius)).map(move |j| GridCoord::new(i, j))
    })
}

fn window_contains(center: GridCoord, radius: i64, cell: GridCoord) -> bool {
    cell.i().abs_diff(center.i()) <= radius.unsigned_abs()
        && cell.j().abs_diff(center.j()) <= radius.unsigned_abs()
}

#[cfg(test)]
mod tests {
    use super::{window_cells, window_contains};
    use tokenfield_core::GridCoord;

    #[test]
    fn window_covers_the_full_square() {
        let cells: Vec<_> = window_cells(GridCoord::new(0, 0), 2).collect();
        assert_eq!(cells.len(), 25);
        assert!(cells.contains(&GridCoord::new(-2, -2)));
        assert!(cells.contains(&GridCoord::new(2, 2)));
    }

    #[test]
    fn containment_matches_enumeration() {
        let center = GridCoord::new(-3, 7);
        for cell in window_cells(center, 3) {
            assert!(window_contains(center, 3, cell));
        }
        assert!(!window_contains(center, 3, GridCoord::new(1, 7)));
        assert!(!window_contains(center, 3, GridCoord::new(-3, 11)));
    }

    #[test]
    fn zero_radius_window_is_the_center_cell() {
        let cells: Vec<_> = window_cells(GridCoord::new(4, 4), 0).collect();
        assert_eq!(cells, vec![GridCoord::new(4, 4)]);
    }
}
