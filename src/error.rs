use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    /// The display handle could not be created or initialized.
    #[error("screen")]
    Screen(String),
    /// The terminal failed while the application was running.
    #[error("terminal")]
    Terminal(String),
    #[error("runloop")]
    RunLoop(String),
    #[error("internal")]
    Internal(String),
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Screen(e.to_string())
    }
}

impl From<crossbeam_channel::RecvError> for Error {
    fn from(e: crossbeam_channel::RecvError) -> Self {
        Error::RunLoop(e.to_string())
    }
}
