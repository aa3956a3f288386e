//! Error and result type for sending messages

use crate::error::{AddressError, ValidationError};

/// An enum of all error kinds.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An address given to the mailer did not parse
    #[error(transparent)]
    Address(#[from] AddressError),
    /// The message is not ready to be sent
    #[error("invalid message: {0}")]
    Validation(#[from] ValidationError),
    /// The transport failed, its error is kept as the source
    #[error("transport: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// The transport error, if the failure came from the transport
    pub fn transport_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Error::Transport(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

/// Mailer result type
pub type MailResult = Result<(), Error>;
