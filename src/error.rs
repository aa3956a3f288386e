//! Error types for email content

/// An address string could not be parsed into a mailbox
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid email address {address:?}: {reason}")]
pub struct AddressError {
    address: String,
    reason: String,
}

impl AddressError {
    pub(crate) fn new<A: Into<String>, R: ToString>(address: A, reason: R) -> AddressError {
        AddressError {
            address: address.into(),
            reason: reason.to_string(),
        }
    }

    /// The rejected input
    pub fn address(&self) -> &str {
        &self.address
    }
}

/// A message failed validation before being serialized or sent.
///
/// Checks run in the order the variants are declared; only the first violation is reported.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Missing to in message or envelope
    #[error("no to addressees for message")]
    MissingTo,
    /// Empty subject
    #[error("empty subject for message")]
    EmptySubject,
    /// Neither text nor html body
    #[error("no text or html content for message")]
    MissingContent,
}

/// Email address result type
pub type AddressResult<T> = Result<T, AddressError>;

/// Email validation result type
pub type EmailResult<T> = Result<T, ValidationError>;
