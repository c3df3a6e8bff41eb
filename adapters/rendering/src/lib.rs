#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Tokenfield adapters.
//!
//! The core never makes styling decisions beyond a token-present flag; this
//! crate turns semantic [`Event`] streams into presentation state a concrete
//! renderer can draw: per-cell visuals, the player marker, the interaction
//! range ring, the HUD value, the win banner, and the last status line.

use std::collections::BTreeMap;

use anyhow::Result as AnyResult;
use glam::Vec2;
use tokenfield_core::{
    CellState, Event, GridCoord, GridGeometry, InteractionAction, RejectReason, TokenValue,
    WorldPosition,
};

/// RGBA color in normalized float channels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel in 0.0..=1.0.
    pub red: f32,
    /// Green channel in 0.0..=1.0.
    pub green: f32,
    /// Blue channel in 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel in 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Builds an opaque color from 8-bit RGB components.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Blends the color towards white by `amount`, clamped to 0.0..=1.0.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);
        let channel = |value: f32| value + (1.0 - value) * amount;

        Self {
            red: channel(self.red),
            green: channel(self.green),
            blue: channel(self.blue),
            alpha: self.alpha,
        }
    }
}

/// Style applied to a cell's presentation object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellStyle {
    /// Token-bearing cell drawn with the highlight treatment.
    Highlighted,
    /// Empty cell drawn with the neutral treatment.
    Neutral,
}

impl CellStyle {
    /// Fill color associated with the style.
    #[must_use]
    pub const fn fill(&self) -> Color {
        match self {
            Self::Highlighted => HIGHLIGHT_FILL,
            Self::Neutral => NEUTRAL_FILL,
        }
    }
}

const HIGHLIGHT_FILL: Color = Color::from_rgb_u8(0xff, 0xc1, 0x07);
const NEUTRAL_FILL: Color = Color::from_rgb_u8(0x58, 0x5e, 0x66);

/// Presentation state for a single visible cell.
///
/// Derived from [`CellState`] alone: a collected cell and a cell that never
/// held a token produce identical visuals.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellVisual {
    /// Style the renderer applies to the cell.
    pub style: CellStyle,
    /// Value label drawn over token-bearing cells.
    pub label: Option<String>,
}

impl CellVisual {
    /// Derives the visual for the provided cell state.
    #[must_use]
    pub fn from_state(state: CellState) -> Self {
        match state.token() {
            Some(value) => Self {
                style: CellStyle::Highlighted,
                label: Some(value.get().to_string()),
            },
            None => Self {
                style: CellStyle::Neutral,
                label: None,
            },
        }
    }
}

/// Mapping from world units to render-space pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    pixels_per_unit: f32,
}

impl Projection {
    /// Creates a projection with the provided scale factor.
    #[must_use]
    pub fn new(pixels_per_unit: f32) -> Self {
        let pixels_per_unit = if pixels_per_unit.is_finite() && pixels_per_unit > 0.0 {
            pixels_per_unit
        } else {
            1.0
        };
        Self { pixels_per_unit }
    }

    /// Projects a continuous world position into render space.
    #[must_use]
    pub fn to_render(&self, position: WorldPosition) -> Vec2 {
        Vec2::new(
            position.x() as f32 * self.pixels_per_unit,
            position.y() as f32 * self.pixels_per_unit,
        )
    }

    /// Projects a cell's center into render space.
    #[must_use]
    pub fn cell_center(&self, cell: GridCoord, cell_length: f64) -> Vec2 {
        self.to_render(cell.center(cell_length))
    }

    /// Scales a world-unit distance into render-space pixels.
    #[must_use]
    pub fn scale_distance(&self, distance: f64) -> f32 {
        distance as f32 * self.pixels_per_unit
    }
}

/// Sink that concrete renderers implement to draw a prepared scene.
pub trait ScenePresenter {
    /// Presents the scene, typically once per frame.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}

/// Presentation state folded from the world's event stream.
#[derive(Clone, Debug)]
pub struct Scene {
    geometry: GridGeometry,
    player: WorldPosition,
    cells: BTreeMap<GridCoord, CellVisual>,
    held_value: Option<TokenValue>,
    highest_value: u32,
    win_banner: bool,
    status: Option<String>,
}

impl Scene {
    /// Creates an empty scene with default geometry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            geometry: GridGeometry::default(),
            player: WorldPosition::new(0.0, 0.0),
            cells: BTreeMap::new(),
            held_value: None,
            highest_value: 0,
            win_banner: false,
            status: None,
        }
    }

    /// Folds a batch of world events into the presentation state.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::GeometryChanged { geometry } => self.geometry = *geometry,
                Event::PlayerMoved { position, .. } => self.player = *position,
                Event::CellMaterialized { cell, state } | Event::CellUpdated { cell, state } => {
                    let _ = self.cells.insert(*cell, CellVisual::from_state(*state));
                }
                Event::CellEvicted { cell } => {
                    let _ = self.cells.remove(cell);
                }
                Event::TokenCollected { token, .. } => {
                    self.held_value = Some(token.value());
                    self.status = Some(format!("Collected a {} token.", token.value().get()));
                }
                Event::TokenDoubled { value, .. } => {
                    self.held_value = None;
                    self.status = Some(format!("Doubled up to {}.", value.get()));
                }
                Event::InteractionRejected { action, reason, .. } => {
                    self.status = Some(describe_rejection(*action, *reason));
                }
                Event::HighestValueChanged { value } => self.highest_value = *value,
                Event::ThresholdReached => self.win_banner = true,
            }
        }
    }

    /// Visual for the cell at the coordinate, if it is visible.
    #[must_use]
    pub fn cell_visual(&self, cell: GridCoord) -> Option<&CellVisual> {
        self.cells.get(&cell)
    }

    /// Iterates over visible cells and their visuals in coordinate order.
    pub fn cells(&self) -> impl Iterator<Item = (&GridCoord, &CellVisual)> {
        self.cells.iter()
    }

    /// Number of cells currently visible.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.cells.len()
    }

    /// Player marker position in render space.
    #[must_use]
    pub fn player_marker(&self, projection: &Projection) -> Vec2 {
        projection.to_render(self.player)
    }

    /// Radius of the interaction range ring in render space.
    #[must_use]
    pub fn range_ring(&self, projection: &Projection) -> f32 {
        projection.scale_distance(self.geometry.interaction_radius())
    }

    /// Value of the token the player carries, if any.
    #[must_use]
    pub fn held_value(&self) -> Option<TokenValue> {
        self.held_value
    }

    /// Largest token value reported by the world.
    #[must_use]
    pub fn highest_value(&self) -> u32 {
        self.highest_value
    }

    /// Whether the win banner should be displayed; latches on.
    #[must_use]
    pub fn win_banner(&self) -> bool {
        self.win_banner
    }

    /// Most recent status line, if any.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

fn describe_rejection(action: InteractionAction, reason: RejectReason) -> String {
    let verb = match action {
        InteractionAction::Collect => "collect",
        InteractionAction::Double => "double",
    };
    match reason {
        RejectReason::OutOfRange { distance, limit } => {
            format!("Too far to {verb}: {distance:.1} exceeds the {limit:.1} range.")
        }
        RejectReason::CellNotVisible => format!("Cannot {verb}: that cell is out of view."),
        RejectReason::NothingToCollect => format!("Nothing to {verb} there."),
        RejectReason::NoHeldToken => "Collect a token before doubling.".to_owned(),
        RejectReason::ValueMismatch { held, found } => format!(
            "Cannot double: holding {} but the cell has {}.",
            held.get(),
            found.get()
        ),
    }
}
