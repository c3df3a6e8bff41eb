#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives a Tokenfield session.

mod input;
mod snapshot_transfer;

use anyhow::Result;
use clap::Parser;
use tokenfield_core::{Command, Direction};
use tokenfield_rendering::{Scene, ScenePresenter};
use tokenfield_system_viewport::Viewport;
use tokenfield_world::{apply, query, snapshot, World};

use crate::input::PlayerInput;

/// Command-line arguments accepted by the Tokenfield binary.
#[derive(Debug, Parser)]
#[command(name = "tokenfield", about = "Grid token collection session")]
struct Args {
    /// Seed for the deterministic cell generator.
    #[arg(long)]
    seed: Option<u64>,
    /// Previously saved session to resume; takes precedence over --seed.
    #[arg(long)]
    load: Option<String>,
    /// Session script: n/e/s/w step one cell, c collects, d doubles.
    #[arg(long)]
    script: Option<String>,
    /// Print the encoded session snapshot on exit.
    #[arg(long)]
    save: bool,
}

/// Entry point for the Tokenfield command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();

    let world = match args.load.as_deref() {
        Some(saved) => match snapshot_transfer::decode(saved) {
            Ok(decoded) => World::from_snapshot(decoded),
            Err(error) => {
                // A malformed save is never partially applied.
                eprintln!("ignoring saved session: {error}");
                fresh_world(args.seed)
            }
        },
        None => fresh_world(args.seed),
    };

    println!("{}", query::welcome_banner(&world));

    let mut session = Session::new(world);
    session.rebuild_window();

    if let Some(script) = args.script.as_deref() {
        for intent in script.chars().filter_map(input::parse) {
            session.run(intent);
        }
    }

    let mut presenter = TextPresenter;
    presenter.present(session.scene())?;

    if args.save {
        println!("{}", snapshot_transfer::encode(&snapshot::snapshot(session.world())));
    }

    Ok(())
}

fn fresh_world(seed: Option<u64>) -> World {
    match seed {
        Some(seed) => World::with_seed(seed),
        None => World::new(),
    }
}

/// Owns the world plus the systems and scene that react to its events.
struct Session {
    world: World,
    viewport: Viewport,
    scene: Scene,
}

impl Session {
    fn new(world: World) -> Self {
        Self {
            world,
            viewport: Viewport::new(),
            scene: Scene::new(),
        }
    }

    fn world(&self) -> &World {
        &self.world
    }

    fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Materializes the view window around the current player position.
    ///
    /// Required once after boot or restore, since only movement and geometry
    /// events trigger the viewport.
    fn rebuild_window(&mut self) {
        let position = query::player_position(&self.world);
        self.pump(Command::MovePlayer { position });
    }

    fn run(&mut self, intent: PlayerInput) {
        match intent {
            PlayerInput::Step(direction) => self.step(direction),
            PlayerInput::Collect => {
                let cell = query::player_cell(&self.world);
                self.pump(Command::CollectToken { cell });
            }
            PlayerInput::Double => {
                let cell = query::player_cell(&self.world);
                self.pump(Command::DoubleToken { cell });
            }
        }
        if let Some(status) = self.scene.status() {
            println!("{status}");
        }
    }

    fn step(&mut self, direction: Direction) {
        let cell_length = query::geometry(&self.world).cell_length();
        let (di, dj) = direction.offsets();
        let position = query::player_position(&self.world)
            .offset_by(di as f64 * cell_length, dj as f64 * cell_length);
        self.pump(Command::MovePlayer { position });
    }

    /// Applies a command, routes the events through the viewport, applies
    /// its follow-up commands, and folds everything into the scene.
    fn pump(&mut self, command: Command) {
        let mut events = Vec::new();
        apply(&mut self.world, command, &mut events);

        let mut follow_ups = Vec::new();
        self.viewport.handle(
            &events,
            query::player_cell(&self.world),
            query::geometry(&self.world),
            &query::live_cells(&self.world),
            &mut follow_ups,
        );
        for follow_up in follow_ups {
            apply(&mut self.world, follow_up, &mut events);
        }

        self.scene.handle(&events);
    }
}

/// Presents the scene as a short textual summary.
struct TextPresenter;

impl ScenePresenter for TextPresenter {
    fn present(&mut self, scene: &Scene) -> Result<()> {
        println!("visible cells: {}", scene.visible_count());
        match scene.held_value() {
            Some(value) => println!("holding: {}", value.get()),
            None => println!("holding: nothing"),
        }
        println!("highest value: {}", scene.highest_value());
        if scene.win_banner() {
            println!("*** {} reached! ***", tokenfield_core::WIN_THRESHOLD);
        }
        Ok(())
    }
}
