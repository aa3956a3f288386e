//! The mailer holds the SMTP account configuration and sends [`Message`]s through a
//! [`Transport`].
//!

use std::fmt::{self, Debug, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Utc;
use log::{debug, info, warn};
use md5::{Digest, Md5};

use crate::mailer::error::MailResult;
use crate::message::Message;
use crate::types::{SMTP_PORT, SUBMISSION_PORT};
use crate::{Credentials, SendableEmail, ServerAddress, Transport};
#[cfg(feature = "smtp-transport")]
use crate::SmtpTransport;

pub mod error;

pub use self::error::Error;

/// Gmail submission server
pub const GMAIL_HOST: &str = "smtp.gmail.com";
/// SendGrid relay
pub const SENDGRID_HOST: &str = "smtp.sendgrid.net";

/// SMTP account configuration
#[derive(PartialEq, Eq, Clone)]
#[cfg_attr(
    feature = "serde-impls",
    derive(serde_derive::Serialize, serde_derive::Deserialize)
)]
pub struct MailerConfig {
    /// Authorization identity, usually empty
    #[cfg_attr(feature = "serde-impls", serde(default))]
    identity: String,
    username: String,
    password: String,
    host: String,
    port: u16,
}

impl MailerConfig {
    pub fn new<S: Into<String>>(
        identity: S,
        username: S,
        password: S,
        host: S,
        port: u16,
    ) -> MailerConfig {
        MailerConfig {
            identity: identity.into(),
            username: username.into(),
            password: password.into(),
            host: host.into(),
            port,
        }
    }

    /// Gmail account, submitted over `STARTTLS`
    pub fn gmail<S: Into<String>>(username: S, password: S) -> MailerConfig {
        MailerConfig {
            identity: String::new(),
            username: username.into(),
            password: password.into(),
            host: GMAIL_HOST.to_string(),
            port: SUBMISSION_PORT,
        }
    }

    /// SendGrid account
    pub fn sendgrid<S: Into<String>>(username: S, password: S) -> MailerConfig {
        MailerConfig {
            identity: String::new(),
            username: username.into(),
            password: password.into(),
            host: SENDGRID_HOST.to_string(),
            port: SMTP_PORT,
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// PLAIN credentials for this account, bound to its host
    pub fn credentials(&self) -> Credentials {
        Credentials::new(
            self.identity.clone(),
            self.username.clone(),
            self.password.clone(),
            self.host.clone(),
        )
    }

    pub fn server_address(&self) -> ServerAddress {
        ServerAddress::new(self.host.clone(), self.port)
    }
}

impl Debug for MailerConfig {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("MailerConfig")
            .field("identity", &self.identity)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

/// Sends messages with a fixed account configuration
///
/// Each send is independent; a `MailSender` is meant to be used from one thread at a time.
#[derive(Debug)]
pub struct MailSender<T> {
    config: MailerConfig,
    transport: T,
}

#[cfg(feature = "smtp-transport")]
impl MailSender<SmtpTransport> {
    /// Creates a mailer sending through `host:port` over SMTP
    pub fn new<S: Into<String>>(
        identity: S,
        username: S,
        password: S,
        host: S,
        port: u16,
    ) -> MailSender<SmtpTransport> {
        MailSender::with_transport(
            MailerConfig::new(identity, username, password, host, port),
            SmtpTransport::new(),
        )
    }

    /// Creates a mailer for a Gmail account
    pub fn gmail<S: Into<String>>(username: S, password: S) -> MailSender<SmtpTransport> {
        MailSender::with_transport(MailerConfig::gmail(username, password), SmtpTransport::new())
    }

    /// Creates a mailer for a SendGrid account
    pub fn sendgrid<S: Into<String>>(username: S, password: S) -> MailSender<SmtpTransport> {
        MailSender::with_transport(
            MailerConfig::sendgrid(username, password),
            SmtpTransport::new(),
        )
    }
}

impl<T: Transport> MailSender<T> {
    /// Creates a mailer sending through the given transport
    pub fn with_transport(config: MailerConfig, transport: T) -> MailSender<T> {
        MailSender { config, transport }
    }

    pub fn config(&self) -> &MailerConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Builds a message from raw fields and sends it.
    ///
    /// Either body may be empty, but not both.
    pub fn send_mail(
        &mut self,
        to: &str,
        from: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> MailResult {
        let message = Message::new(to, from, subject, text_body, html_body)?;
        self.send(&message)
    }

    /// Validates and sends a message.
    ///
    /// Only the `to` addresses are envelope recipients. Transport errors are returned as is,
    /// nothing is retried.
    pub fn send(&mut self, message: &Message) -> MailResult {
        message.validate()?;

        let envelope = message.envelope()?;
        let message_id = message_id();
        let server = self.config.server_address();
        info!(
            "{}: sending {:?} to {} recipient(s) via {}",
            message_id,
            message.subject,
            envelope.to().len(),
            server
        );

        let email = SendableEmail::new(envelope, &message_id, message.to_bytes());
        match self
            .transport
            .send(&server, &self.config.credentials(), email)
        {
            Ok(()) => {
                debug!("{}: sent", message_id);
                Ok(())
            }
            Err(err) => {
                warn!("{}: error sending: {}", message_id, err);
                Err(Error::Transport(Box::new(err)))
            }
        }
    }
}

/// Local identifier for a sent message, unique within the process
fn message_id() -> String {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);

    let now = Utc::now();
    let seed = format!(
        "{}.{}.{}.{}",
        now.timestamp(),
        now.timestamp_subsec_nanos(),
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::Relaxed)
    );
    hex::encode(Md5::digest(seed.as_bytes()))
}
