//! The stub transport only logs message envelope and drops the content. It can be useful for
//! testing purposes.
//!

use log::info;

use crate::stub::error::StubResult;
use crate::{Credentials, SendableEmail, ServerAddress, Transport};

pub mod error;

pub use self::error::Error;

/// This transport logs the message envelope and returns the given response
#[derive(Debug, Clone, Copy)]
pub struct StubTransport {
    response: StubResult,
}

impl StubTransport {
    /// Creates a new transport that always returns the given response
    pub fn new(response: StubResult) -> StubTransport {
        StubTransport { response }
    }

    /// Creates a new transport that always returns a success response
    pub fn new_positive() -> StubTransport {
        StubTransport { response: Ok(()) }
    }
}

impl Transport for StubTransport {
    type Error = Error;

    fn send(
        &mut self,
        server: &ServerAddress,
        credentials: &Credentials,
        email: SendableEmail,
    ) -> StubResult {
        info!(
            "{}: server={} user={} from=<{}> to=<{:?}> size={}",
            email.message_id(),
            server,
            credentials.username(),
            match email.envelope().from() {
                Some(address) => address.to_string(),
                None => "".to_string(),
            },
            email.envelope().to(),
            email.message().len()
        );
        self.response
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Envelope;

    fn email() -> SendableEmail {
        let envelope = Envelope::new(
            "user@localhost".parse().ok(),
            vec!["root@localhost".parse().expect("valid address")],
        )
        .expect("valid envelope");
        SendableEmail::new(envelope, "id", "Hello example")
    }

    #[test]
    fn test_stub_responses() {
        let server = ServerAddress::new("localhost", 2525);
        let creds = Credentials::new("", "user", "pass", "localhost");

        let mut positive = StubTransport::new_positive();
        assert_eq!(positive.send(&server, &creds, email()), Ok(()));

        let mut negative = StubTransport::new(Err(Error::Client("rejected")));
        assert_eq!(
            negative.send(&server, &creds, email()),
            Err(Error::Client("rejected"))
        );
    }
}
