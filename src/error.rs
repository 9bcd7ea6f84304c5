use thiserror::Error as ThisError;

#[derive(Debug, ThisError, thisslime::TracingError)]
#[span]
pub enum Error {
    #[error(transparent)]
    Id(#[from] crate::session::id::Error),

    #[error(transparent)]
    Config(#[from] crate::config::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
