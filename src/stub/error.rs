//! Error and result type for stub transport

/// An enum of all error kinds.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Configured failure
    #[error("client error: {0}")]
    Client(&'static str),
}

impl From<&'static str> for Error {
    fn from(string: &'static str) -> Error {
        Error::Client(string)
    }
}

/// Stub result type
pub type StubResult = Result<(), Error>;
