#![warn(clippy::perf)]
#![warn(clippy::unwrap_used)]

//! Session state for a guess-the-player trivia page: round codes, hint
//! numbering, timers and answer accuracy, plus the small layer that turns
//! page events into calls on that state.

pub mod app;
pub use app::{App, Event, Key, Outcome, Propagation, Verdict};

pub mod config;
pub use config::Config;

mod error;
pub use error::{Error, Result};

pub mod logging;

pub mod page;

pub mod session;
pub use session::{GameId, GameSession, Stats};
