//! The SMTP transport sends emails using the SMTP protocol.
//!
//! The protocol itself is handled by [`lettre`]'s blocking client; this transport only picks the
//! connection security and authenticates with the PLAIN mechanism. Like any PLAIN client, it
//! refuses to send credentials in clear text to anything but localhost, and refuses to send them
//! to a host other than the one they were issued for.
//!
//! No connection is kept between two sends.

use std::time::Duration;

use lettre::address::Envelope as LettreEnvelope;
use lettre::transport::smtp::authentication::{Credentials as LettreCredentials, Mechanism};
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{Address as LettreAddress, SmtpTransport as LettreTransport, Transport as _};
use log::{debug, info};

use crate::smtp::error::SmtpResult;
use crate::types::SUBMISSIONS_PORT;
use crate::{Credentials, EmailAddress, Envelope, SendableEmail, ServerAddress, Transport};

pub mod error;

pub use self::error::Error;

/// How to apply TLS to a client connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientSecurity {
    /// Insecure connection only (for testing purposes)
    None,
    /// Start with insecure connection and use `STARTTLS` when available
    Opportunistic,
    /// Start with insecure connection and require `STARTTLS`
    Required,
    /// Use TLS wrapped connection
    Wrapper,
}

impl ClientSecurity {
    /// Default security for a server: `STARTTLS` when offered on localhost, a wrapped connection
    /// on the submissions port, and required `STARTTLS` everywhere else.
    pub fn for_server(server: &ServerAddress) -> ClientSecurity {
        if server.is_localhost() {
            ClientSecurity::Opportunistic
        } else if server.port() == SUBMISSIONS_PORT {
            ClientSecurity::Wrapper
        } else {
            ClientSecurity::Required
        }
    }

    fn is_encrypted(self) -> bool {
        matches!(self, ClientSecurity::Required | ClientSecurity::Wrapper)
    }
}

/// Structure that implements the high level SMTP client
#[derive(Debug, Default, Clone, Copy)]
pub struct SmtpTransport {
    /// Forced connection security, chosen per server when unset
    security: Option<ClientSecurity>,
    /// Network timeout, none by default
    timeout: Option<Duration>,
}

impl SmtpTransport {
    /// Creates a new SMTP transport
    ///
    /// Defaults are:
    ///
    /// * Security picked by [`ClientSecurity::for_server`]
    /// * No timeout, a send blocks for as long as the server takes
    pub fn new() -> SmtpTransport {
        SmtpTransport::default()
    }

    /// Force the connection security
    pub fn security(mut self, security: ClientSecurity) -> SmtpTransport {
        self.security = Some(security);
        self
    }

    /// Set the timeout duration
    pub fn timeout(mut self, timeout: Option<Duration>) -> SmtpTransport {
        self.timeout = timeout;
        self
    }

    fn security_for(&self, server: &ServerAddress) -> ClientSecurity {
        self.security
            .unwrap_or_else(|| ClientSecurity::for_server(server))
    }

    /// Checks that PLAIN credentials may be presented to `server` over `security`
    fn check_credentials(
        server: &ServerAddress,
        security: ClientSecurity,
        credentials: &Credentials,
    ) -> SmtpResult<()> {
        if !security.is_encrypted() && !server.is_localhost() {
            return Err(Error::Unencrypted);
        }

        if credentials.host() != server.host() {
            return Err(Error::WrongHost {
                expected: credentials.host().to_string(),
                actual: server.host().to_string(),
            });
        }

        let identity = credentials.identity();
        if !identity.is_empty() && identity != credentials.username() {
            return Err(Error::AuthorizationIdentity);
        }

        Ok(())
    }

    fn client(
        &self,
        server: &ServerAddress,
        credentials: &Credentials,
    ) -> SmtpResult<LettreTransport> {
        let security = self.security_for(server);
        Self::check_credentials(server, security, credentials)?;

        let builder = match security {
            ClientSecurity::None => LettreTransport::builder_dangerous(server.host()),
            ClientSecurity::Opportunistic => LettreTransport::builder_dangerous(server.host())
                .tls(Tls::Opportunistic(TlsParameters::new(
                    server.host().to_string(),
                )?)),
            ClientSecurity::Required => LettreTransport::starttls_relay(server.host())?,
            ClientSecurity::Wrapper => LettreTransport::relay(server.host())?,
        };

        debug!("connecting to {} ({:?})", server, security);

        Ok(builder
            .port(server.port())
            .credentials(LettreCredentials::new(
                credentials.username().to_string(),
                credentials.password().to_string(),
            ))
            .authentication(vec![Mechanism::Plain])
            .timeout(self.timeout)
            .build())
    }
}

fn lettre_address(address: &EmailAddress) -> SmtpResult<LettreAddress> {
    Ok(address.as_ref().parse::<LettreAddress>()?)
}

fn lettre_envelope(envelope: &Envelope) -> SmtpResult<LettreEnvelope> {
    let from = envelope.from().map(lettre_address).transpose()?;
    let to = envelope
        .to()
        .iter()
        .map(lettre_address)
        .collect::<SmtpResult<Vec<_>>>()?;
    Ok(LettreEnvelope::new(from, to)?)
}

impl Transport for SmtpTransport {
    type Error = Error;

    fn send(
        &mut self,
        server: &ServerAddress,
        credentials: &Credentials,
        email: SendableEmail,
    ) -> SmtpResult<()> {
        let client = self.client(server, credentials)?;
        let envelope = lettre_envelope(email.envelope())?;

        for to_address in email.envelope().to() {
            debug!("to=<{}>", to_address);
        }

        let response = client.send_raw(&envelope, email.message())?;

        info!(
            "{}: status=sent ({})",
            email.message_id(),
            response.first_line().unwrap_or("no response")
        );

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_security() {
        assert_eq!(
            ClientSecurity::for_server(&ServerAddress::new("smtp.gmail.com", 587)),
            ClientSecurity::Required
        );
        assert_eq!(
            ClientSecurity::for_server(&ServerAddress::new("smtp.sendgrid.net", 25)),
            ClientSecurity::Required
        );
        assert_eq!(
            ClientSecurity::for_server(&ServerAddress::new("smtp.example.org", 465)),
            ClientSecurity::Wrapper
        );
        assert_eq!(
            ClientSecurity::for_server(&ServerAddress::new("localhost", 2525)),
            ClientSecurity::Opportunistic
        );
    }

    #[test]
    fn test_plain_guard_rails() {
        let server = ServerAddress::new("smtp.example.org", 587);
        let creds = Credentials::new("", "user", "pass", "smtp.example.org");

        assert!(SmtpTransport::check_credentials(&server, ClientSecurity::Required, &creds).is_ok());

        match SmtpTransport::check_credentials(&server, ClientSecurity::Opportunistic, &creds) {
            Err(Error::Unencrypted) => {}
            other => panic!("expected unencrypted error, got {:?}", other),
        }

        let local = ServerAddress::new("localhost", 2525);
        let local_creds = Credentials::new("", "user", "pass", "localhost");
        assert!(SmtpTransport::check_credentials(&local, ClientSecurity::None, &local_creds).is_ok());

        let other_host = Credentials::new("", "user", "pass", "smtp.other.org");
        match SmtpTransport::check_credentials(&server, ClientSecurity::Required, &other_host) {
            Err(Error::WrongHost { expected, actual }) => {
                assert_eq!(expected, "smtp.other.org");
                assert_eq!(actual, "smtp.example.org");
            }
            other => panic!("expected wrong host error, got {:?}", other),
        }

        let same_identity = Credentials::new("user", "user", "pass", "smtp.example.org");
        assert!(
            SmtpTransport::check_credentials(&server, ClientSecurity::Required, &same_identity)
                .is_ok()
        );

        let admin = Credentials::new("admin", "user", "pass", "smtp.example.org");
        match SmtpTransport::check_credentials(&server, ClientSecurity::Wrapper, &admin) {
            Err(Error::AuthorizationIdentity) => {}
            other => panic!("expected identity error, got {:?}", other),
        }
    }

    #[test]
    fn test_rejected_before_connecting() {
        let mut transport = SmtpTransport::new().security(ClientSecurity::None);
        let server = ServerAddress::new("smtp.example.org", 25);
        let creds = Credentials::new("", "user", "pass", "smtp.example.org");
        let envelope = Envelope::new(
            "user@example.org".parse().ok(),
            vec!["root@example.org".parse().expect("valid address")],
        )
        .expect("valid envelope");

        let result = transport.send(&server, &creds, SendableEmail::new(envelope, "id", "Hello"));
        assert!(matches!(result, Err(Error::Unencrypted)));
    }
}
