//! Tilebound headless runner
//!
//! Loads a level (or the built-in demo), plays a scripted input sequence at a fixed 60 Hz step,
//! logs the events raised along the way and prints the final snapshot as JSON.
//!
//! Usage: `tilebound [level.json] [config.json]`

#[cfg(not(target_arch = "wasm32"))]
use tilebound::sim::{Action, FrameDelta, TickInput, World, tick};
#[cfg(not(target_arch = "wasm32"))]
use tilebound::{Config, LevelData};

/// Steps the scripted run lasts
#[cfg(not(target_arch = "wasm32"))]
const DEMO_STEPS: u32 = 900;
/// Step at which the host reports the last spawner destroyed
#[cfg(not(target_arch = "wasm32"))]
const SPAWNERS_CLEARED_AT: u32 = 600;

#[cfg(not(target_arch = "wasm32"))]
const DEMO_LEVEL: &str = r#"{
    "hero": {"tx": 2, "ty": 2},
    "tiles": [
        {"tx": 0, "ty": 0}, {"tx": 1, "ty": 0}, {"tx": 2, "ty": 0}, {"tx": 3, "ty": 0},
        {"tx": 4, "ty": 0}, {"tx": 5, "ty": 0}, {"tx": 6, "ty": 0}, {"tx": 7, "ty": 0},
        {"tx": 0, "ty": 1}, {"tx": 0, "ty": 2}, {"tx": 0, "ty": 3}, {"tx": 0, "ty": 4},
        {"tx": 8, "ty": 1, "tag": "first-shortcut"}, {"tx": 8, "ty": 2, "tag": "first-shortcut"},
        {"tx": 0, "ty": 5}, {"tx": 1, "ty": 5}, {"tx": 2, "ty": 5}, {"tx": 3, "ty": 5}
    ],
    "cameras": [{"tx": 2, "ty": 2}, {"tx": 3, "ty": 2}],
    "monsters": [
        {"tx": 6, "ty": 3, "rank": "grunt"},
        {"tx": 7, "ty": 4, "rank": "warrior"},
        {"tx": 12, "ty": 2, "rank": "elite"},
        {"tx": 5, "ty": 1, "health": 3, "attack": {"damage": 1, "cooldown": 1.0}}
    ],
    "unlocks": [{"id": "first-shortcut", "tx": 6, "ty": 2}]
}"#;

#[cfg(not(target_arch = "wasm32"))]
fn scripted_input(step: u32) -> TickInput {
    let stick = match step {
        0..=179 => TickInput::axis(1.0, 0.0),
        180..=299 => TickInput::axis(0.0, 1.0),
        300..=419 => TickInput::axis(-0.7, -0.7),
        _ => TickInput::axis(1.0, 0.2),
    };
    if step % 20 == 0 {
        stick.press(Action::Primary)
    } else {
        stick
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn read_json<T>(path: &str, parse: fn(&str) -> Result<T, serde_json::Error>) -> Option<T> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            log::error!("Cannot read {path}: {err}");
            return None;
        }
    };
    match parse(&text) {
        Ok(value) => Some(value),
        Err(err) => {
            log::error!("Cannot parse {path}: {err}");
            None
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Tilebound (headless) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();

    let level = match args.first() {
        Some(path) => read_json(path, LevelData::from_json),
        None => LevelData::from_json(DEMO_LEVEL).ok(),
    };
    let config = match args.get(1) {
        Some(path) => read_json(path, Config::from_json),
        None => Some(Config::default()),
    };
    let (Some(level), Some(config)) = (level, config) else {
        std::process::exit(1);
    };

    let mut world = World::new(config, &level);
    let delta = FrameDelta::from_seconds(1.0 / 60.0);

    for step in 0..DEMO_STEPS {
        if step == SPAWNERS_CLEARED_AT {
            world.set_spawner_count(Some(0));
        }
        tick(&mut world, &scripted_input(step), delta);
        for event in world.drain_events() {
            log::info!("step {step}: {event:?}");
        }
    }

    match world.snapshot().to_json() {
        Ok(json) => println!("{json}"),
        Err(err) => {
            log::error!("Cannot serialize snapshot: {err}");
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation is driven by the host page on the web; there is no standalone runner
}
