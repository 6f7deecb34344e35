use log::{error, info, trace};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use std::time::SystemTime;
use uuid::Uuid;

use super::achievements;
use super::grid_engine::GridEngine;
use super::hint::suggest_move;
use super::history::HistoryManager;
use super::settings::Settings;
use super::spawner::RandomSpawner;
use crate::destroyable::Destroyable;
use crate::events::{EventEmitter, EventObserver, SubscriptionId};
use crate::model::{
    AchievementDef, Direction, GameState, GameStats, SessionCommand, SessionEvent,
};

/// The layer between input and the grid engine: applies commands, keeps the
/// undo/redo history and the unlock set, and reports everything as events.
///
/// Everything runs on one thread. Event listeners are called while the session
/// is mutably borrowed, so they must not send commands back synchronously.
pub struct GameSession {
    engine: GridEngine,
    history: HistoryManager,
    catalog: Vec<AchievementDef>,
    unlocked: HashSet<String>,
    moves_made: u32,
    started_at: SystemTime,
    playthrough_id: Uuid,
    debug_mode: bool,
    command_observer: EventObserver<SessionCommand>,
    subscription_id: Option<SubscriptionId>,
    event_emitter: EventEmitter<SessionEvent>,
}

impl Destroyable for GameSession {
    fn destroy(&mut self) {
        if let Some(subscription_id) = self.subscription_id.take() {
            self.command_observer.unsubscribe(subscription_id);
        }
    }
}

impl GameSession {
    pub fn new(
        engine: GridEngine,
        unlocked: HashSet<String>,
        command_observer: EventObserver<SessionCommand>,
        event_emitter: EventEmitter<SessionEvent>,
    ) -> Rc<RefCell<Self>> {
        let session = Self {
            engine,
            history: HistoryManager::new(),
            catalog: AchievementDef::catalog(),
            unlocked,
            moves_made: 0,
            started_at: SystemTime::now(),
            playthrough_id: Uuid::new_v4(),
            debug_mode: Settings::is_debug_mode(),
            command_observer: command_observer.clone(),
            subscription_id: None,
            event_emitter,
        };
        let refcell = Rc::new(RefCell::new(session));
        GameSession::wire_subscription(refcell.clone(), command_observer);
        refcell
    }

    fn wire_subscription(
        session: Rc<RefCell<Self>>,
        command_observer: EventObserver<SessionCommand>,
    ) {
        let session_handler = session.clone();
        let subscription_id = command_observer.subscribe(move |command| {
            let mut session = session_handler.borrow_mut();
            session.handle_command(command.clone());
        });
        session.borrow_mut().subscription_id = Some(subscription_id);
    }

    pub fn handle_command(&mut self, command: SessionCommand) {
        trace!(target: "session", "Handling command: {:?}", command);
        match command {
            SessionCommand::NewGame => self.new_game(),
            SessionCommand::Resize(size) => self.resize(size),
            SessionCommand::Move(direction) => self.handle_move(direction),
            SessionCommand::Undo => self.undo(),
            SessionCommand::Redo => self.redo(),
            SessionCommand::LoadState(state) => self.load_state(&state),
            SessionCommand::ShowHint => {
                let hint = suggest_move(&self.engine.get_state());
                self.event_emitter.emit(SessionEvent::HintSuggested(hint));
            }
            SessionCommand::Reseed(seed) => {
                info!(target: "session", "Reseeding spawner: {:?}", seed);
                self.engine.set_spawner(RandomSpawner::from_seed(seed));
            }
            SessionCommand::InitDisplay => {
                self.sync_board_display();
                self.sync_history();
            }
        }
    }

    fn start_playthrough(&mut self) {
        self.history.clear();
        self.moves_made = 0;
        self.started_at = SystemTime::now();
        self.playthrough_id = Uuid::new_v4();
        self.sync_board_display();
        self.sync_history();
    }

    fn new_game(&mut self) {
        self.engine.reset();
        info!(
            target: "session",
            "New game; size: {}; seed: {:?}",
            self.engine.size(),
            self.engine.seed()
        );
        self.start_playthrough();
    }

    fn resize(&mut self, size: usize) {
        match self.engine.resize(size) {
            Ok(()) => {
                info!(target: "session", "Resized to {}x{}", size, size);
                self.start_playthrough();
            }
            Err(err) => {
                info!(target: "session", "Resize rejected: {}", err);
                self.event_emitter.emit(SessionEvent::ResizeRejected(size));
            }
        }
    }

    fn load_state(&mut self, state: &GameState) {
        match self.engine.set_state(state) {
            Ok(()) => {
                info!(target: "session", "Loaded saved state; score: {}", state.score);
                self.start_playthrough();
                self.check_achievements();
            }
            Err(err) => {
                self.event_emitter
                    .emit(SessionEvent::LoadRejected(err.to_string()));
            }
        }
    }

    fn handle_move(&mut self, direction: Direction) {
        let pre_state = self.engine.get_state();
        let result = self.engine.move_tiles(direction);
        if !result.moved {
            return;
        }
        self.history.record_move(pre_state);
        self.moves_made += 1;
        if self.debug_mode {
            info!(target: "session", "After {}:\n{}", direction, self.engine.grid());
        }

        let won_now = result.won;
        self.event_emitter.emit(SessionEvent::MoveResolved(result));
        self.sync_board_display();
        self.sync_history();
        self.check_achievements();

        if won_now {
            self.event_emitter
                .emit(SessionEvent::Won(self.engine.score()));
        } else if self.engine.is_game_over() {
            info!(target: "session", "Game over; score: {}", self.engine.score());
            self.event_emitter
                .emit(SessionEvent::GameOver(self.get_game_stats()));
        }
    }

    fn undo(&mut self) {
        if let Some(previous) = self.history.undo(self.engine.get_state()) {
            self.restore(&previous);
            self.moves_made = self.moves_made.saturating_sub(1);
        }
        self.sync_history();
    }

    fn redo(&mut self) {
        if let Some(next) = self.history.redo(self.engine.get_state()) {
            self.restore(&next);
            self.moves_made += 1;
        }
        self.sync_history();
    }

    fn restore(&mut self, state: &GameState) {
        // history only ever holds snapshots taken from this engine at its current size
        if let Err(err) = self.engine.set_state(state) {
            error!(target: "session", "Could not restore history entry: {}", err);
            return;
        }
        self.sync_board_display();
    }

    fn check_achievements(&mut self) {
        let newly_unlocked =
            achievements::check(&self.engine.get_state(), &mut self.unlocked, &self.catalog);
        if !newly_unlocked.is_empty() {
            self.event_emitter
                .emit(SessionEvent::AchievementsUnlocked(newly_unlocked));
        }
    }

    fn sync_board_display(&self) {
        self.event_emitter
            .emit(SessionEvent::BoardUpdated(self.engine.get_state()));
    }

    fn sync_history(&self) {
        self.event_emitter.emit(SessionEvent::HistoryChanged {
            undo_len: self.history.undo_len(),
            redo_len: self.history.redo_len(),
        });
    }

    pub fn get_game_stats(&self) -> GameStats {
        GameStats {
            score: self.engine.score(),
            max_tile: self.engine.grid().max_tile(),
            moves_made: self.moves_made,
            grid_size: self.engine.size(),
            won: self.engine.won(),
            play_time: self.started_at.elapsed().unwrap_or_default(),
            finished_at: SystemTime::now(),
            playthrough_id: self.playthrough_id,
        }
    }

    pub fn state(&self) -> GameState {
        self.engine.get_state()
    }

    pub fn is_game_over(&self) -> bool {
        self.engine.is_game_over()
    }

    pub fn unlocked(&self) -> &HashSet<String> {
        &self.unlocked
    }

    pub fn moves_made(&self) -> u32 {
        self.moves_made
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Channel;
    use crate::model::Grid;

    struct Harness {
        commands: EventEmitter<SessionCommand>,
        events: Rc<RefCell<Vec<SessionEvent>>>,
        session: Rc<RefCell<GameSession>>,
    }

    impl Harness {
        fn new(size: usize, seed: u32) -> Self {
            let (commands, command_observer) = Channel::<SessionCommand>::new();
            let (event_emitter, event_observer) = Channel::<SessionEvent>::new();
            let events = Rc::new(RefCell::new(Vec::new()));
            let events_clone = events.clone();
            event_observer.subscribe(move |event| events_clone.borrow_mut().push(event.clone()));

            let engine = GridEngine::new(size, RandomSpawner::seeded(seed)).unwrap();
            let session = GameSession::new(engine, HashSet::new(), command_observer, event_emitter);
            Self {
                commands,
                events,
                session,
            }
        }

        fn send(&self, command: SessionCommand) -> Vec<SessionEvent> {
            self.events.borrow_mut().clear();
            self.commands.emit(command);
            self.events.borrow().clone()
        }

        fn state(&self) -> GameState {
            self.session.borrow().state()
        }

        fn load(&self, grid: &str, score: u64) {
            let state = GameState::new(Grid::parse(grid), score, false);
            self.send(SessionCommand::LoadState(state));
        }
    }

    #[test]
    fn test_new_game_emits_board_and_history() {
        let harness = Harness::new(4, 5);
        let events = harness.send(SessionCommand::NewGame);
        assert!(matches!(&events[0], SessionEvent::BoardUpdated(state) if state.grid.tile_count() == 2));
        assert_eq!(
            events[1],
            SessionEvent::HistoryChanged {
                undo_len: 0,
                redo_len: 0
            }
        );
    }

    #[test]
    fn test_move_then_undo_and_redo() {
        let harness = Harness::new(4, 5);
        harness.load(
            "
            2 2 0 0
            0 0 0 0
            0 0 0 0
            0 0 0 0",
            0,
        );
        let before = harness.state();

        let events = harness.send(SessionCommand::Move(Direction::Left));
        assert!(matches!(&events[0], SessionEvent::MoveResolved(result) if result.merges_count == 1));
        assert!(events.contains(&SessionEvent::HistoryChanged {
            undo_len: 1,
            redo_len: 0
        }));
        let after = harness.state();
        assert_eq!(after.score, 4);

        harness.send(SessionCommand::Undo);
        assert_eq!(harness.state(), before);
        assert_eq!(harness.session.borrow().moves_made(), 0);

        harness.send(SessionCommand::Redo);
        assert_eq!(harness.state(), after);
        assert_eq!(harness.session.borrow().moves_made(), 1);
    }

    #[test]
    fn test_noop_move_emits_nothing() {
        let harness = Harness::new(4, 5);
        harness.load(
            "
            2 4 0 0
            0 0 0 0
            0 0 0 0
            0 0 0 0",
            0,
        );
        assert!(harness.send(SessionCommand::Move(Direction::Left)).is_empty());
        assert!(harness.send(SessionCommand::Undo).len() == 1);
    }

    #[test]
    fn test_win_unlocks_achievements_once() {
        let harness = Harness::new(4, 5);
        harness.load(
            "
            1024 1024 0 0
            0 0 0 0
            0 0 0 0
            0 0 0 0",
            0,
        );
        // loading already unlocked the tile achievements up to 1024
        assert!(harness.session.borrow().unlocked().contains("ach_1024"));

        let events = harness.send(SessionCommand::Move(Direction::Left));
        let unlocked: Vec<String> = events
            .iter()
            .filter_map(|event| match event {
                SessionEvent::AchievementsUnlocked(defs) => {
                    Some(defs.iter().map(|def| def.id.clone()).collect::<Vec<_>>())
                }
                _ => None,
            })
            .flatten()
            .collect();
        assert_eq!(unlocked, vec!["ach_2048", "ach_score_1000", "ach_win"]);
        assert_eq!(events.last(), Some(&SessionEvent::Won(2048)));
    }

    #[test]
    fn test_game_over_reported_after_last_move() {
        let harness = Harness::new(3, 5);
        harness.load(
            "
            4 8 4
            8 4 8
            0 2 16",
            0,
        );
        // sliding left puts 2 at (2,0) and 16 at (2,1); the 2 or 4 spawned
        // at (2,2) sits under an 8 and next to the 16, so nothing can merge
        let events = harness.send(SessionCommand::Move(Direction::Left));
        let state = harness.state();
        assert_eq!(state.grid.get(2, 0), 2);
        assert_eq!(state.grid.get(2, 1), 16);
        assert_eq!(state.grid.empty_count(), 0);
        assert!(harness.session.borrow().is_game_over());
        assert!(events
            .iter()
            .any(|event| matches!(event, SessionEvent::GameOver(_))));
    }

    #[test]
    fn test_rejected_resize_and_load() {
        let harness = Harness::new(4, 5);
        harness.send(SessionCommand::NewGame);
        let before = harness.state();

        assert_eq!(
            harness.send(SessionCommand::Resize(10)),
            vec![SessionEvent::ResizeRejected(10)]
        );
        let events = harness.send(SessionCommand::LoadState(GameState::new(
            Grid::empty(3),
            0,
            false,
        )));
        assert!(matches!(&events[..], [SessionEvent::LoadRejected(_)]));
        assert_eq!(harness.state(), before);
    }

    #[test]
    fn test_resize_clears_history() {
        let harness = Harness::new(4, 5);
        harness.send(SessionCommand::NewGame);
        for direction in Direction::all() {
            harness.send(SessionCommand::Move(direction));
        }
        let events = harness.send(SessionCommand::Resize(5));
        assert!(events.contains(&SessionEvent::HistoryChanged {
            undo_len: 0,
            redo_len: 0
        }));
        assert_eq!(harness.state().size, 5);
    }

    #[test]
    fn test_hint_and_reseed() {
        let harness = Harness::new(4, 5);
        harness.load(
            "
            2 2 0 0
            0 0 0 0
            0 0 0 0
            0 0 0 0",
            0,
        );
        assert_eq!(
            harness.send(SessionCommand::ShowHint),
            vec![SessionEvent::HintSuggested(Some(Direction::Left))]
        );

        harness.send(SessionCommand::Reseed(Some(77)));
        harness.send(SessionCommand::NewGame);
        let first = harness.state();
        harness.send(SessionCommand::Reseed(Some(77)));
        harness.send(SessionCommand::NewGame);
        assert_eq!(harness.state(), first);
    }

    #[test]
    fn test_destroy_unsubscribes() {
        let harness = Harness::new(4, 5);
        harness.session.borrow_mut().destroy();
        assert!(harness.send(SessionCommand::NewGame).is_empty());
    }
}
