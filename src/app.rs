//! Translates page events into session calls and page effects.

use tracing::{debug, instrument, trace};

use crate::{
    config::{AutocompleteClear, UiConfig},
    error::Result,
    page::{
        timers::{Task, Timers},
        ElementId, Page, DOC_HEIGHT_PROPERTY, FLASH_CLASS, START_BUTTON_CLASS,
    },
    session::{
        clock::{Clock, Millis},
        GameId, GameSession, IdSource,
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Tab,
    Enter,
    Other(String),
}

impl Key {
    /// Maps a keyboard event's key name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Tab" => Self::Tab,
            "Enter" => Self::Enter,
            other => Self::Other(other.to_owned()),
        }
    }
}

/// Whether a handled event should still reach the rest of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    /// Default action prevented and propagation stopped.
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Wrong,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The page finished loading.
    Load,
    KeyDown(Key),
    Resize,
    StartRound,
    RevealHint,
    Answer(Verdict),
    /// Time passed; run any timers that came due.
    Tick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Key(Propagation),
    Round(GameId),
    Hint { game_id: GameId, hint_id: u32 },
    Fired(usize),
}

pub struct App<P, C, R> {
    session: GameSession<C, R>,
    page: P,
    ui: UiConfig,
    timers: Timers,
}

impl<P: Page, C: Clock, R: IdSource> App<P, C, R> {
    pub fn new(session: GameSession<C, R>, page: P, ui: UiConfig) -> Self {
        Self {
            session,
            page,
            ui,
            timers: Timers::new(),
        }
    }

    #[instrument(skip(self))]
    pub fn handle(&mut self, event: Event) -> Result<Outcome> {
        let outcome = match event {
            Event::Load => {
                self.session.init_app();
                self.update_document_height();
                Outcome::Done
            }
            Event::KeyDown(key) => Outcome::Key(self.on_keydown(&key)),
            Event::Resize => {
                self.update_document_height();
                Outcome::Done
            }
            Event::StartRound => Outcome::Round(self.session.generate_game_id()?),
            Event::RevealHint => Outcome::Hint {
                game_id: self.session.game_id(),
                hint_id: self.session.next_hint_id(),
            },
            Event::Answer(Verdict::Correct) => {
                self.session.add_correct_answer();
                Outcome::Done
            }
            Event::Answer(Verdict::Wrong) => {
                self.session.add_wrong_answer();
                self.flash_answer();
                Outcome::Done
            }
            Event::Tick => Outcome::Fired(self.tick()),
        };

        Ok(outcome)
    }

    /// The player's current guess, empty when the answer field is missing.
    pub fn current_answer(&self) -> String {
        self.page.value(ElementId::AnswerBox).unwrap_or_default()
    }

    pub fn on_keydown(&mut self, key: &Key) -> Propagation {
        match key {
            Key::Tab => {
                self.copy_prediction();
                Propagation::Stop
            }
            Key::Enter if self.ui.enter_starts_game => {
                if self.page.click_first(START_BUTTON_CLASS) {
                    debug!("enter clicked start button");
                    Propagation::Stop
                } else {
                    Propagation::Continue
                }
            }
            _ => Propagation::Continue,
        }
    }

    /// Moves the autocomplete suggestion into the answer field.
    pub fn copy_prediction(&mut self) {
        if !self.page.contains(ElementId::AnswerBox) {
            return;
        }

        let Some(prediction) = self.page.value(ElementId::PredictionBox) else {
            return;
        };

        self.page.set_value(ElementId::AnswerBox, &prediction);
        self.page.clear_content(ElementId::Prediction);

        if self.ui.autocomplete_clear == AutocompleteClear::Source {
            self.page.set_value(ElementId::PredictionBox, "");
        }

        trace!(prediction, "copied prediction");
    }

    /// Schedules a short highlight of the answer field.
    ///
    /// The highlight is applied after a small delay so a correct verdict
    /// arriving in the meantime can replace the field first.
    pub fn flash_answer(&mut self) {
        let now = self.session.clock().now();
        self.timers.schedule(now, self.ui.flash_delay_ms, Task::ApplyFlash);
    }

    /// Runs every timer due by now. Returns how many fired.
    pub fn tick(&mut self) -> usize {
        let now = self.session.clock().now();
        let mut fired = 0;

        while let Some((due, task)) = self.timers.pop_due(now) {
            self.run(due, task);
            fired += 1;
        }

        fired
    }

    fn run(&mut self, due: Millis, task: Task) {
        match task {
            Task::ApplyFlash => {
                if self.page.add_class(ElementId::AnswerBox, FLASH_CLASS) {
                    self.timers
                        .schedule(due, self.ui.flash_duration_ms, Task::RemoveFlash);
                }
            }
            Task::RemoveFlash => {
                self.page.remove_class(ElementId::AnswerBox, FLASH_CLASS);
            }
        }
    }

    pub fn update_document_height(&mut self) {
        let height = format!("{}px", self.page.viewport_height());
        self.page.set_root_property(DOC_HEIGHT_PROPERTY, &height);
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn session(&self) -> &GameSession<C, R> {
        &self.session
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }
}
