//! Round identity, timing and answer statistics for one page load.

use tracing::{debug, info, trace, warn};

pub mod clock;
use clock::{Clock, Millis, SystemClock};

mod elapsed;
pub use elapsed::Elapsed;

pub mod id;
pub use id::{GameId, IdGenerator, IdSource, IdStrategy};

/// Running answer accuracy across every round of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    correct: u32,
    total: u32,
}

impl Stats {
    pub const fn correct(&self) -> u32 {
        self.correct
    }

    pub const fn total(&self) -> u32 {
        self.total
    }

    pub const fn wrong(&self) -> u32 {
        self.total - self.correct
    }

    /// `None` until the first answer has been recorded.
    pub fn accuracy(&self) -> Option<f64> {
        (self.total > 0).then(|| f64::from(self.correct) / f64::from(self.total))
    }

    fn record(&mut self, correct: bool) {
        if correct {
            self.correct += 1;
        }

        self.total += 1;
    }
}

/// State tracker for a single player's session.
///
/// Owned by whatever drives the page; construct a fresh one per test.
#[derive(Debug, Clone)]
pub struct GameSession<C = SystemClock, R = IdGenerator> {
    clock: C,
    ids: R,
    game_id: GameId,
    hint_id: u32,
    app_start: Option<Millis>,
    game_start: Option<Millis>,
    stats: Stats,
}

impl<C: Clock, R: IdSource> GameSession<C, R> {
    pub fn new(clock: C, ids: R) -> Self {
        Self {
            clock,
            ids,
            game_id: GameId::PLACEHOLDER,
            hint_id: 0,
            app_start: None,
            game_start: None,
            stats: Stats::default(),
        }
    }

    /// Anchors app uptime at the current instant. Calling again re-anchors.
    pub fn init_app(&mut self) {
        let now = self.clock.now();

        if self.app_start.is_some() {
            warn!("app start re-anchored, uptime restarts from zero");
        }

        self.app_start = Some(now);
        debug!(app_start = now, "app initialized");
    }

    /// Starts a new round: fresh id, hint counter back to zero, round clock
    /// restarted. Answer statistics carry over.
    pub fn generate_game_id(&mut self) -> Result<GameId, id::Error> {
        let game_id = self.ids.next_id()?;

        self.game_id = game_id;
        self.hint_id = 0;
        self.game_start = Some(self.clock.now());

        info!(%game_id, "new round");
        Ok(game_id)
    }

    pub fn game_id(&self) -> GameId {
        self.game_id
    }

    /// Counts one more revealed hint and returns its number, starting from 1
    /// in every round.
    pub fn next_hint_id(&mut self) -> u32 {
        self.hint_id += 1;
        trace!(game_id = %self.game_id, hint_id = self.hint_id);
        self.hint_id
    }

    /// Number of hints revealed so far this round, without counting a new one.
    pub fn hints_revealed(&self) -> u32 {
        self.hint_id
    }

    pub fn game_time(&self) -> Elapsed {
        self.elapsed_since(self.game_start, "game")
    }

    pub fn app_time(&self) -> Elapsed {
        self.elapsed_since(self.app_start, "app")
    }

    fn elapsed_since(&self, start: Option<Millis>, anchor: &'static str) -> Elapsed {
        match start {
            Some(start) => Elapsed::between(start, self.clock.now()),
            None => {
                warn!(anchor, "elapsed time requested before start was recorded");
                Elapsed::zero()
            }
        }
    }

    pub fn add_correct_answer(&mut self) {
        self.stats.record(true);
        debug!(correct = self.stats.correct, total = self.stats.total, "correct answer");
    }

    pub fn add_wrong_answer(&mut self) {
        self.stats.record(false);
        debug!(correct = self.stats.correct, total = self.stats.total, "wrong answer");
    }

    pub fn correct_answers(&self) -> u32 {
        self.stats.correct
    }

    pub fn total_answers(&self) -> u32 {
        self.stats.total
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

impl GameSession {
    pub fn with_strategy(strategy: IdStrategy, bits: u8) -> Self {
        Self::new(SystemClock, IdGenerator::new(strategy, bits))
    }
}
