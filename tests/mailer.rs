use std::convert::Infallible;

use postal::error::ValidationError;
use postal::mailer::Error;
use postal::{
    Credentials, MailSender, MailerConfig, Message, SendableEmail, ServerAddress, StubTransport,
    Transport,
};

/// Keeps every email it is given
#[derive(Debug, Default)]
struct RecordingTransport {
    sent: Vec<(ServerAddress, Credentials, SendableEmail)>,
}

impl Transport for RecordingTransport {
    type Error = Infallible;

    fn send(
        &mut self,
        server: &ServerAddress,
        credentials: &Credentials,
        email: SendableEmail,
    ) -> Result<(), Infallible> {
        self.sent
            .push((server.clone(), credentials.clone(), email));
        Ok(())
    }
}

fn recording_sender(config: MailerConfig) -> MailSender<RecordingTransport> {
    let _ = env_logger::builder().is_test(true).try_init();
    MailSender::with_transport(config, RecordingTransport::default())
}

#[test]
fn envelope_recipients_are_to_only() {
    let mut sender = recording_sender(MailerConfig::gmail("user@gmail.com", "secret"));

    let mut message = Message::new("one@test.com", "me@test.com", "Hi", "text", "<b>html</b>")
        .expect("valid addresses");
    message.add_to("Two <two@test.com>").expect("to");
    message.add_cc("cc@test.com").expect("cc");
    message.add_bcc("bcc@test.com").expect("bcc");

    sender.send(&message).expect("sent");

    let (server, credentials, email) = &sender.transport().sent[0];
    assert_eq!(server.to_string(), "smtp.gmail.com:587");
    assert_eq!(credentials.username(), "user@gmail.com");
    assert_eq!(credentials.password(), "secret");
    assert_eq!(credentials.host(), "smtp.gmail.com");

    let to: Vec<&str> = email.envelope().to().iter().map(AsRef::as_ref).collect();
    assert_eq!(to, vec!["one@test.com", "two@test.com"]);
    assert_eq!(
        email.envelope().from().map(AsRef::as_ref),
        Some("me@test.com")
    );

    let body = String::from_utf8(email.message().to_vec()).expect("utf-8");
    assert!(body.contains("BCC: <cc@test.com>\r\n"));
    assert!(body.contains("CC: <bcc@test.com>\r\n"));
    assert!(body.contains("multipart/alternative"));
}

#[test]
fn send_mail_builds_message() {
    let mut sender = recording_sender(MailerConfig::new(
        "",
        "user",
        "secret",
        "mail.test.com",
        2525,
    ));

    sender
        .send_mail("to@test.com", "from@test.com", "Subject", "text", "")
        .expect("sent");

    let (server, _, email) = &sender.transport().sent[0];
    assert_eq!(server.to_string(), "mail.test.com:2525");
    assert_eq!(email.message_id().len(), 32);
    assert!(email.message().starts_with(b"To: <to@test.com>\r\nFrom: <from@test.com>\r\n"));
}

#[test]
fn invalid_messages_never_reach_transport() {
    let mut sender = recording_sender(MailerConfig::sendgrid("user", "secret"));

    let mut message =
        Message::new("to@test.com", "from@test.com", "Hi", "text", "").expect("valid addresses");
    message.to.clear();

    match sender.send(&message) {
        Err(Error::Validation(ValidationError::MissingTo)) => {}
        other => panic!("expected missing to, got {:?}", other),
    }
    assert!(sender.transport().sent.is_empty());
}

#[test]
fn stub_failure_is_surfaced() {
    let mut sender = MailSender::with_transport(
        MailerConfig::new("", "user", "secret", "localhost", 25),
        StubTransport::new(Err("mailbox unavailable".into())),
    );

    let err = sender
        .send_mail("to@test.com", "from@test.com", "Hi", "text", "")
        .expect_err("stub fails");
    assert!(matches!(err, Error::Transport(_)));
    assert_eq!(err.to_string(), "transport: client error: mailbox unavailable");
}
