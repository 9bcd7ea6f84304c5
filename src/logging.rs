use tracing_subscriber::{
    filter::ParseError, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt,
    EnvFilter,
};
use tracing_unwrap::ResultExt;

use tracing::{instrument, trace, warn};

pub const DEFAULT_FILTER: &str = "guessgame=info";

/// Installs the global subscriber. An unparseable `filter` falls back to
/// [`DEFAULT_FILTER`].
#[instrument]
pub fn init_tracing(filter: &str) {
    let (env_filter, rejected) = env_filter(filter);

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(env_filter)
        .init();

    if let Some(err) = rejected {
        warn!(filter, %err, "invalid log filter, using {DEFAULT_FILTER}");
    }

    trace!("finished");
}

fn env_filter(filter: &str) -> (EnvFilter, Option<ParseError>) {
    match EnvFilter::try_new(filter) {
        Ok(env_filter) => (env_filter, None),
        Err(err) => (
            EnvFilter::try_new(DEFAULT_FILTER)
                .expect_or_log("hard-coded env filter should be valid"),
            Some(err),
        ),
    }
}
