use chrono::{DateTime, Local};
use log::{error, info, warn};
use std::cell::RefCell;
use std::rc::Rc;

use tilemerge::events::Channel;
use tilemerge::game::settings::{data_dir, Settings};
use tilemerge::game::{AchievementStore, GameSession, GridEngine, RandomSpawner, StatsManager};
use tilemerge::model::{Direction, SessionCommand, SessionEvent};
use tilemerge::Destroyable;

fn init_logging() {
    env_logger::init();
}

/// What the autoplay loop needs to know after each command
#[derive(Debug, Default)]
struct Outcome {
    hint: Option<Direction>,
    finished: bool,
    newly_unlocked: Vec<String>,
}

fn main() {
    init_logging();

    let data_dir = data_dir();
    let settings = Settings::load_from(&data_dir).with_env_overrides();
    info!("Settings: {:?}", settings);

    let engine = match GridEngine::new(settings.grid_size, RandomSpawner::from_seed(settings.seed)) {
        Ok(engine) => engine,
        Err(err) => {
            error!("Could not create engine: {}", err);
            std::process::exit(1);
        }
    };

    let mut store = AchievementStore::load(data_dir.clone());
    let (commands, command_observer) = Channel::<SessionCommand>::new();
    let (event_emitter, event_observer) = Channel::<SessionEvent>::new();

    let outcome = Rc::new(RefCell::new(Outcome::default()));
    let outcome_handler = outcome.clone();
    event_observer.subscribe(move |event| {
        let mut outcome = outcome_handler.borrow_mut();
        match event {
            SessionEvent::HintSuggested(hint) => outcome.hint = *hint,
            SessionEvent::AchievementsUnlocked(defs) => outcome
                .newly_unlocked
                .extend(defs.iter().map(|def| def.id.clone())),
            SessionEvent::Won(score) => {
                println!("Reached 2048 with {} points", score);
                outcome.finished = true;
            }
            SessionEvent::GameOver(_) => outcome.finished = true,
            _ => (),
        }
    });

    let session = GameSession::new(
        engine,
        store.unlocked().clone(),
        command_observer,
        event_emitter,
    );

    commands.emit(SessionCommand::NewGame);
    for _ in 0..settings.max_autoplay_moves {
        commands.emit(SessionCommand::ShowHint);
        let Some(direction) = outcome.borrow_mut().hint.take() else {
            break;
        };
        commands.emit(SessionCommand::Move(direction));
        if outcome.borrow().finished {
            break;
        }
    }

    let stats = session.borrow().get_game_stats();
    for id in &outcome.borrow().newly_unlocked {
        println!("Achievement unlocked: {}", id);
    }
    *store.unlocked_mut() = session.borrow().unlocked().clone();
    if let Err(err) = store.save() {
        warn!("Could not save achievements: {}", err);
    }

    let mut stats_manager = StatsManager::new(data_dir);
    if let Err(err) = stats_manager.record_game(&stats) {
        warn!("Could not record game: {}", err);
    }

    let finished_at: DateTime<Local> = stats.finished_at.into();
    println!("{}", session.borrow().state().grid);
    println!(
        "Score {} (best {}), max tile {}, {} moves, finished {}",
        stats.score,
        stats_manager.best_score(stats.grid_size),
        stats.max_tile,
        stats.moves_made,
        finished_at.format("%Y-%m-%d %H:%M:%S")
    );

    session.borrow_mut().destroy();
}
