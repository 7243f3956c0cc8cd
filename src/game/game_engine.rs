use log::{info, trace, warn};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use uuid::Uuid;

use super::clock::Clock;
use super::deck_generator::{generate_deck, DeckShuffler};
use super::leaderboard::Leaderboard;
use super::scheduler::{DeferredQueue, Generation};
use super::settings::Settings;
use super::store::KeyValueStore;
use crate::destroyable::Destroyable;
use crate::events::{EventEmitter, EventHandler, EventObserver, Unsubscriber};
use crate::model::{
    catalog, CardId, Deck, GameEngineCommand, GameEngineEvent, Outcome, RankingEntry,
    SessionPhase, SessionSnapshot, SessionStats, TileView,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingAction {
    Resolve { first: usize, second: usize },
}

/// Owns one memory-match session at a time plus the leaderboard.
///
/// Every state change happens inside a call on this type; the resolution delay after a
/// second reveal is queued on the engine clock and applied by [`GameEngine::run_pending`].
pub struct GameEngine {
    settings: Settings,
    catalog: Vec<CardId>,
    deck: Deck,
    selection: Vec<usize>,
    stats: SessionStats,
    generation: Generation,
    playthrough_id: Uuid,
    pending: DeferredQueue<PendingAction>,
    leaderboard: Leaderboard,
    shuffler: Box<dyn DeckShuffler>,
    clock: Box<dyn Clock>,
    game_engine_event_emitter: EventEmitter<GameEngineEvent>,
    subscription: Option<Unsubscriber<GameEngineCommand>>,
}

impl Destroyable for GameEngine {
    fn destroy(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl EventHandler<GameEngineCommand> for GameEngine {
    fn handle_event(&mut self, event: &GameEngineCommand) {
        self.handle_command(event.clone());
    }
}

impl GameEngine {
    /// Builds an engine that takes its input from `game_engine_command_observer`.
    pub fn new(
        game_engine_command_observer: EventObserver<GameEngineCommand>,
        game_engine_event_emitter: EventEmitter<GameEngineEvent>,
        settings: Settings,
        store: Box<dyn KeyValueStore>,
        shuffler: Box<dyn DeckShuffler>,
        clock: Box<dyn Clock>,
    ) -> Rc<RefCell<Self>> {
        let engine = Self::create(game_engine_event_emitter, settings, store, shuffler, clock);
        let refcell = Rc::new(RefCell::new(engine));
        GameEngine::wire_subscription(refcell.clone(), game_engine_command_observer);
        refcell
    }

    /// Builds an engine driven by direct method calls.
    pub fn create(
        game_engine_event_emitter: EventEmitter<GameEngineEvent>,
        settings: Settings,
        store: Box<dyn KeyValueStore>,
        mut shuffler: Box<dyn DeckShuffler>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let catalog = catalog(settings.pair_count);
        let deck = generate_deck(&catalog, shuffler.as_mut());
        let leaderboard = Leaderboard::new(
            store,
            &settings.leaderboard_key,
            settings.leaderboard_size,
        );
        let engine = Self {
            settings,
            catalog,
            deck,
            selection: Vec::with_capacity(2),
            stats: SessionStats::default(),
            generation: 0,
            playthrough_id: Uuid::new_v4(),
            pending: DeferredQueue::new(),
            leaderboard,
            shuffler,
            clock,
            game_engine_event_emitter,
            subscription: None,
        };
        info!(
            target: "game_engine",
            "New session {}; {} pairs; {} leaderboard entries",
            engine.playthrough_id,
            engine.deck.pair_count(),
            engine.leaderboard.entries().len()
        );
        engine
    }

    fn wire_subscription(
        engine: Rc<RefCell<Self>>,
        game_engine_command_observer: EventObserver<GameEngineCommand>,
    ) {
        let engine_handler = engine.clone();
        let subscription = game_engine_command_observer.subscribe(move |command| {
            let mut engine = engine_handler.borrow_mut();
            engine.handle_event(command);
        });
        engine.borrow_mut().subscription = Some(subscription);
    }

    pub fn handle_command(&mut self, command: GameEngineCommand) {
        trace!(target: "game_engine", "Handling command: {:?}", command);
        // Anything that came due since the last command is applied first.
        self.run_pending();
        match command {
            GameEngineCommand::RevealTile(position) => {
                self.reveal_tile(position);
            }
            GameEngineCommand::Reset => self.reset_session(),
            GameEngineCommand::Tick => {
                self.tick();
            }
            GameEngineCommand::Poll => (),
            GameEngineCommand::ReloadLeaderboard => {
                self.load_leaderboard();
            }
        }
    }

    fn can_reveal(&self, position: usize) -> bool {
        self.stats.outcome == Outcome::InProgress
            && position < self.deck.len()
            && !self.deck.is_solved(position)
            && !self.selection.contains(&position)
            && self.selection.len() < 2
    }

    /// Turns a tile face up. Returns false, changing nothing, when the reveal is not allowed.
    pub fn reveal_tile(&mut self, position: usize) -> bool {
        if !self.can_reveal(position) {
            trace!(
                target: "game_engine",
                "Ignoring reveal of {} in phase {:?}",
                position,
                self.phase()
            );
            return false;
        }

        let now = self.clock.now();
        if !self.stats.timer.is_started() {
            self.stats.timer = self.stats.timer.started(now);
            info!(target: "game_engine", "Session {} started", self.playthrough_id);
        }

        self.selection.push(position);
        if let [first, second] = self.selection[..] {
            self.pending.schedule(
                now,
                self.settings.resolution_delay(),
                self.generation,
                PendingAction::Resolve { first, second },
            );
        }
        self.sync_session();
        true
    }

    /// Applies every queued action that is due. Actions queued by an earlier session are
    /// dropped. Returns how many actions were applied.
    pub fn run_pending(&mut self) -> usize {
        let now = self.clock.now();
        let mut applied = 0;
        for (generation, action) in self.pending.take_due(now) {
            if generation != self.generation {
                trace!(
                    target: "game_engine",
                    "Dropping {:?} from generation {} (current {})",
                    action,
                    generation,
                    self.generation
                );
                continue;
            }
            match action {
                PendingAction::Resolve { first, second } => self.resolve(first, second),
            }
            applied += 1;
        }
        applied
    }

    fn resolve(&mut self, first: usize, second: usize) {
        if self.selection[..] != [first, second] {
            warn!(
                target: "game_engine",
                "Resolution for {:?} does not match selection {:?}",
                [first, second],
                self.selection
            );
            return;
        }

        let matched = match (self.deck.get(first), self.deck.get(second)) {
            (Some(a), Some(b)) => a.matches(b),
            _ => false,
        };
        if matched {
            self.deck.mark_solved(first);
            self.deck.mark_solved(second);
        }
        if self.settings.attempt_policy.counts(matched) {
            self.stats.attempts += 1;
        }
        self.selection.clear();
        trace!(
            target: "game_engine",
            "Resolved {} and {}: matched={}, attempts={}",
            first,
            second,
            matched,
            self.stats.attempts
        );
        self.game_engine_event_emitter
            .emit(GameEngineEvent::TilesResolved {
                positions: [first, second],
                matched,
            });

        if self.deck.is_complete() {
            self.finish(Outcome::Won);
        } else if let Some(max_attempts) = self.settings.max_attempts {
            if self.stats.attempts >= max_attempts {
                self.finish(Outcome::Lost);
            }
        }
        self.sync_session();
    }

    fn finish(&mut self, outcome: Outcome) {
        if self.stats.outcome.is_finished() {
            return;
        }
        let now = self.clock.now();
        self.stats.timer = self.stats.timer.ended(now);
        self.stats.outcome = outcome;

        let entry = match outcome {
            Outcome::Won => {
                self.stats.elapsed_seconds = self.stats.timer.elapsed_seconds(now);
                let entry = RankingEntry::new(self.stats.elapsed_seconds, self.stats.attempts);
                if let Err(err) = self.leaderboard.record(entry) {
                    warn!(target: "game_engine", "Could not save leaderboard: {}", err);
                }
                self.game_engine_event_emitter
                    .emit(GameEngineEvent::LeaderboardUpdated(
                        self.leaderboard.entries().to_vec(),
                    ));
                Some(entry)
            }
            _ => None,
        };
        info!(
            target: "game_engine",
            "Session {} finished: {:?} after {}s with {} attempts",
            self.playthrough_id,
            outcome,
            self.stats.timer.elapsed_seconds(now),
            self.stats.attempts
        );
        self.game_engine_event_emitter
            .emit(GameEngineEvent::SessionFinished { outcome, entry });
    }

    /// One-second tick. Only counts while a started session is in progress.
    pub fn tick(&mut self) -> bool {
        if self.stats.outcome != Outcome::InProgress || !self.stats.timer.is_started() {
            return false;
        }
        self.stats.elapsed_seconds += 1;
        self.game_engine_event_emitter
            .emit(GameEngineEvent::ElapsedChanged(self.stats.elapsed_seconds));
        true
    }

    /// Deals a new deck and starts over. The leaderboard is kept.
    pub fn reset_session(&mut self) {
        self.generation += 1;
        let dropped = self.pending.cancel_stale(self.generation);
        self.deck = generate_deck(&self.catalog, self.shuffler.as_mut());
        self.selection.clear();
        self.stats = SessionStats::default();
        self.playthrough_id = Uuid::new_v4();
        info!(
            target: "game_engine",
            "New session {} (generation {}); dropped {} pending actions",
            self.playthrough_id,
            self.generation,
            dropped
        );
        self.sync_session();
    }

    pub fn load_leaderboard(&mut self) -> &[RankingEntry] {
        self.leaderboard.load();
        self.game_engine_event_emitter
            .emit(GameEngineEvent::LeaderboardUpdated(
                self.leaderboard.entries().to_vec(),
            ));
        self.leaderboard.entries()
    }

    pub fn phase(&self) -> SessionPhase {
        match self.stats.outcome {
            Outcome::Won => SessionPhase::Won,
            Outcome::Lost => SessionPhase::Lost,
            Outcome::InProgress => match self.selection.len() {
                0 => SessionPhase::Idle,
                1 => SessionPhase::AwaitingSecondPick,
                _ => SessionPhase::Resolving,
            },
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let tiles = self
            .deck
            .tiles()
            .iter()
            .map(|tile| {
                let is_face_up = self.selection.contains(&tile.position);
                TileView {
                    position: tile.position,
                    card_id: (is_face_up || tile.is_solved).then_some(tile.card_id),
                    is_solved: tile.is_solved,
                    is_face_up,
                }
            })
            .collect();
        SessionSnapshot {
            generation: self.generation,
            playthrough_id: self.playthrough_id,
            tiles,
            selection: self.selection.clone(),
            attempts: self.stats.attempts,
            elapsed_seconds: self.stats.elapsed_seconds,
            outcome: self.stats.outcome,
            phase: self.phase(),
            leaderboard: self.leaderboard.entries().to_vec(),
        }
    }

    fn sync_session(&self) {
        self.game_engine_event_emitter
            .emit(GameEngineEvent::SessionUpdated(self.snapshot()));
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn selection(&self) -> &[usize] {
        &self.selection
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn outcome(&self) -> Outcome {
        self.stats.outcome
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn playthrough_id(&self) -> Uuid {
        self.playthrough_id
    }

    pub fn leaderboard(&self) -> &[RankingEntry] {
        self.leaderboard.entries()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// How long until the next queued action comes due, if any.
    pub fn time_until_pending(&self) -> Option<Duration> {
        self.pending
            .next_due()
            .map(|due| due.saturating_sub(self.clock.now()))
    }
}
