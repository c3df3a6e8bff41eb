use tokenfield_core::{
    CellState, Command, Event, GridCoord, GridGeometry, HeldToken, InteractionAction,
    RejectReason, TokenValue, WorldPosition,
};
use tokenfield_system_generation as generation;
use tokenfield_world::{
    apply, query,
    snapshot::{LedgerEntry, WorldSnapshot},
    World,
};

fn token(value: u32) -> TokenValue {
    TokenValue::from_u32(value).expect("non-zero token value")
}

/// Builds a world whose ledger holds the provided cell values, with the
/// player standing at the center of cell (0, 0).
fn staged_world(entries: &[(GridCoord, Option<u32>)], held: Option<HeldToken>) -> World {
    let geometry = GridGeometry::default();
    let player = GridCoord::new(0, 0).center(geometry.cell_length());
    let mut highest = held.map_or(0, |held| held.value().get());
    let ledger = entries
        .iter()
        .map(|(cell, value)| {
            if let Some(value) = value {
                highest = highest.max(*value);
            }
            LedgerEntry {
                cell: *cell,
                state: match value {
                    Some(value) => CellState::with_token(token(*value)),
                    None => CellState::empty(),
                },
            }
        })
        .collect();

    let mut world = World::from_snapshot(WorldSnapshot {
        seed: generation::DEFAULT_WORLD_SEED,
        geometry,
        player,
        held,
        highest_value: highest,
        threshold_reached: false,
        ledger,
    });

    let mut events = Vec::new();
    for (cell, _) in entries {
        apply(&mut world, Command::MaterializeCell { cell: *cell }, &mut events);
    }
    world
}

fn rejection_of(events: &[Event]) -> Option<(InteractionAction, RejectReason)> {
    events.iter().find_map(|event| match event {
        Event::InteractionRejected { action, reason, .. } => Some((*action, *reason)),
        _ => None,
    })
}

#[test]
fn collect_lifts_the_token_and_empties_the_cell() {
    let cell = GridCoord::new(1, 0);
    let mut world = staged_world(&[(cell, Some(2))], None);

    let mut events = Vec::new();
    apply(&mut world, Command::CollectToken { cell }, &mut events);

    let held = query::held_token(&world).expect("token is now held");
    assert_eq!(held.value(), token(2));
    assert_eq!(held.origin(), cell);
    assert_eq!(query::cell_state(&world, cell), Some(CellState::empty()));
    assert!(events.iter().any(|event| matches!(
        event,
        Event::TokenCollected { cell: c, returned: None, .. } if *c == cell
    )));
}

#[test]
fn collect_while_holding_returns_the_previous_token_to_its_origin() {
    let first = GridCoord::new(1, 0);
    let second = GridCoord::new(0, 1);
    let mut world = staged_world(&[(first, Some(2)), (second, Some(4))], None);

    let mut events = Vec::new();
    apply(&mut world, Command::CollectToken { cell: first }, &mut events);
    events.clear();
    apply(&mut world, Command::CollectToken { cell: second }, &mut events);

    let held = query::held_token(&world).expect("second token is held");
    assert_eq!(held.value(), token(4));
    assert_eq!(held.origin(), second);
    assert_eq!(
        query::cell_state(&world, first),
        Some(CellState::with_token(token(2))),
        "previous token returns to its source"
    );
    assert_eq!(query::cell_state(&world, second), Some(CellState::empty()));
    assert!(events.iter().any(|event| matches!(
        event,
        Event::TokenCollected { returned: Some((origin, value)), .. }
            if *origin == first && *value == token(2)
    )));
}

#[test]
fn return_to_source_reaches_an_evicted_origin_through_the_ledger() {
    let first = GridCoord::new(1, 0);
    let second = GridCoord::new(0, 1);
    let mut world = staged_world(&[(first, Some(2)), (second, Some(4))], None);

    let mut events = Vec::new();
    apply(&mut world, Command::CollectToken { cell: first }, &mut events);
    apply(&mut world, Command::EvictCell { cell: first }, &mut events);
    apply(&mut world, Command::CollectToken { cell: second }, &mut events);

    apply(&mut world, Command::MaterializeCell { cell: first }, &mut events);
    assert_eq!(
        query::cell_state(&world, first),
        Some(CellState::with_token(token(2))),
        "off-screen origin is restored through the ledger"
    );
}

#[test]
fn collect_rejects_cells_without_tokens() {
    let cell = GridCoord::new(1, 1);
    let mut world = staged_world(&[(cell, None)], None);

    let mut events = Vec::new();
    apply(&mut world, Command::CollectToken { cell }, &mut events);

    assert_eq!(
        rejection_of(&events),
        Some((InteractionAction::Collect, RejectReason::NothingToCollect))
    );
    assert!(query::held_token(&world).is_none());
}

#[test]
fn collect_rejects_cells_outside_the_view_window() {
    let mut world = staged_world(&[], None);
    let cell = GridCoord::new(2, 2);

    let mut events = Vec::new();
    apply(&mut world, Command::CollectToken { cell }, &mut events);

    assert_eq!(
        rejection_of(&events),
        Some((InteractionAction::Collect, RejectReason::CellNotVisible))
    );
}

#[test]
fn collect_rejects_distant_cells_without_mutation() {
    // Cell center sits 200 world units east of the player; the default
    // interaction radius is 50.
    let cell = GridCoord::new(20, 0);
    let mut world = staged_world(&[(cell, Some(4))], None);

    let mut events = Vec::new();
    apply(&mut world, Command::CollectToken { cell }, &mut events);

    match rejection_of(&events) {
        Some((InteractionAction::Collect, RejectReason::OutOfRange { distance, limit })) => {
            assert!((distance - 200.0).abs() < 1e-9);
            assert!((limit - 50.0).abs() < f64::EPSILON);
        }
        other => panic!("expected out-of-range rejection, got {other:?}"),
    }
    assert!(query::held_token(&world).is_none());
    assert_eq!(
        query::cell_state(&world, cell),
        Some(CellState::with_token(token(4)))
    );
}

#[test]
fn double_requires_a_held_token() {
    let cell = GridCoord::new(1, 0);
    let mut world = staged_world(&[(cell, Some(4))], None);

    let mut events = Vec::new();
    apply(&mut world, Command::DoubleToken { cell }, &mut events);

    assert_eq!(
        rejection_of(&events),
        Some((InteractionAction::Double, RejectReason::NoHeldToken))
    );
    assert_eq!(
        query::cell_state(&world, cell),
        Some(CellState::with_token(token(4)))
    );
}

#[test]
fn double_rejects_mismatched_values_without_mutation() {
    let origin = GridCoord::new(3, 3);
    let cell = GridCoord::new(1, 0);
    let held = HeldToken::new(token(4), origin);
    let mut world = staged_world(&[(cell, Some(8))], Some(held));

    let mut events = Vec::new();
    apply(&mut world, Command::DoubleToken { cell }, &mut events);

    assert_eq!(
        rejection_of(&events),
        Some((
            InteractionAction::Double,
            RejectReason::ValueMismatch {
                held: token(4),
                found: token(8),
            }
        ))
    );
    assert_eq!(query::held_token(&world), Some(held));
    assert_eq!(
        query::cell_state(&world, cell),
        Some(CellState::with_token(token(8)))
    );
}

#[test]
fn double_doubles_the_cell_and_consumes_the_held_token() {
    let origin = GridCoord::new(3, 3);
    let cell = GridCoord::new(1, 0);
    let mut world = staged_world(&[(cell, Some(4))], Some(HeldToken::new(token(4), origin)));
    let highest_before = query::highest_value(&world);

    let mut events = Vec::new();
    apply(&mut world, Command::DoubleToken { cell }, &mut events);

    assert_eq!(
        query::cell_state(&world, cell),
        Some(CellState::with_token(token(8)))
    );
    assert!(query::held_token(&world).is_none());
    assert!(events.iter().any(|event| matches!(
        event,
        Event::TokenDoubled { cell: c, value } if *c == cell && *value == token(8)
    )));
    assert!(query::highest_value(&world) >= highest_before);
    assert_eq!(query::highest_value(&world), 8);
}

#[test]
fn at_most_one_token_is_ever_held() {
    let cells = [
        (GridCoord::new(1, 0), Some(2)),
        (GridCoord::new(0, 1), Some(4)),
        (GridCoord::new(1, 1), Some(1)),
    ];
    let mut world = staged_world(&cells, None);

    let mut events = Vec::new();
    for (cell, _) in cells {
        apply(&mut world, Command::CollectToken { cell }, &mut events);
    }

    // After any sequence of collects exactly one origin is empty and it is
    // the held token's origin.
    let held = query::held_token(&world).expect("a token is held");
    let empty_origins: Vec<_> = cells
        .iter()
        .filter(|(cell, _)| query::cell_state(&world, *cell) == Some(CellState::empty()))
        .map(|(cell, _)| *cell)
        .collect();
    assert_eq!(empty_origins, vec![held.origin()]);
}

#[test]
fn threshold_fires_once_per_session() {
    let first = GridCoord::new(1, 0);
    let second = GridCoord::new(0, 1);
    let spare = GridCoord::new(1, 1);
    let origin = GridCoord::new(5, 5);
    let mut world = staged_world(
        &[(first, Some(1024)), (second, Some(1024)), (spare, Some(1024))],
        Some(HeldToken::new(token(1024), origin)),
    );

    let mut events = Vec::new();
    apply(&mut world, Command::DoubleToken { cell: first }, &mut events);
    let crossings = events
        .iter()
        .filter(|event| matches!(event, Event::ThresholdReached))
        .count();
    assert_eq!(crossings, 1);
    assert!(query::threshold_reached(&world));

    // Cross the threshold a second time through a different cell: lift a
    // spare 1024 token and double the other 1024 cell up to 2048 as well.
    events.clear();
    apply(&mut world, Command::CollectToken { cell: spare }, &mut events);
    apply(&mut world, Command::DoubleToken { cell: second }, &mut events);

    assert!(events
        .iter()
        .all(|event| !matches!(event, Event::ThresholdReached)));
    assert_eq!(
        query::cell_state(&world, second),
        Some(CellState::with_token(token(2048)))
    );
    assert_eq!(query::highest_value(&world), 2048);
}
