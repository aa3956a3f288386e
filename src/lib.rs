//! Postal composes plain text, HTML or multipart/alternative emails and sends them over SMTP.
//!
//! ```no_run
//! # #[cfg(feature = "smtp-transport")]
//! # fn main() -> Result<(), postal::mailer::Error> {
//! use postal::MailSender;
//!
//! let mut sender = MailSender::gmail("user@gmail.com", "app-password");
//! sender.send_mail(
//!     "Friend <friend@example.org>",
//!     "user@gmail.com",
//!     "Hello",
//!     "Hello from postal",
//!     "<p>Hello from <b>postal</b></p>",
//! )?;
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "smtp-transport"))]
//! # fn main() {}
//! ```

#![deny(
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    missing_debug_implementations,
    clippy::unwrap_used
)]

pub mod error;
#[cfg(feature = "file-transport")]
pub mod file;
pub mod mailer;
pub mod message;
#[cfg(feature = "smtp-transport")]
pub mod smtp;
pub mod stub;
mod types;

pub use types::*;

#[cfg(feature = "file-transport")]
pub use crate::file::FileTransport;
pub use crate::mailer::{MailSender, MailerConfig};
pub use crate::message::{Address, Message, RecipientKind};
#[cfg(feature = "smtp-transport")]
pub use crate::smtp::{ClientSecurity, SmtpTransport};
pub use crate::stub::StubTransport;

/// Transport method for emails
///
/// A send is a single blocking call; transports keep no state between sends.
pub trait Transport {
    /// Error returned when the email could not be delivered
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sends the email to `server`, authenticating with `credentials` if the transport needs to
    fn send(
        &mut self,
        server: &ServerAddress,
        credentials: &Credentials,
        email: SendableEmail,
    ) -> Result<(), Self::Error>;
}
