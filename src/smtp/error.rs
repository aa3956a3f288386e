//! Error and result type for SMTP clients

use self::Error::*;

/// An enum of all error kinds.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// PLAIN credentials would travel in clear text to a remote host
    #[error("unencrypted connection")]
    Unencrypted,
    /// The credentials were issued for another host
    #[error("wrong host name: credentials for {expected}, server is {actual}")]
    WrongHost { expected: String, actual: String },
    /// The client cannot authorize as an identity other than the username
    #[error("authorization identity must be empty or equal to the username")]
    AuthorizationIdentity,
    /// Envelope address rejected by the SMTP client
    #[error("envelope address: {0}")]
    Address(#[from] lettre::address::AddressError),
    /// Envelope rejected by the SMTP client
    #[error("envelope: {0}")]
    Envelope(#[from] lettre::error::Error),
    /// Connection, TLS, authentication or SMTP reply error
    #[error("smtp: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

impl Error {
    /// Whether the server answered with a transient (4xx) reply
    pub fn is_transient(&self) -> bool {
        match self {
            Smtp(err) => err.is_transient(),
            _ => false,
        }
    }

    /// Whether the server answered with a permanent (5xx) reply
    pub fn is_permanent(&self) -> bool {
        match self {
            Smtp(err) => err.is_permanent(),
            _ => false,
        }
    }
}

/// SMTP result type
pub type SmtpResult<T> = Result<T, Error>;
