use postal::{FileTransport, MailSender, MailerConfig, Message};

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Result<T> = std::result::Result<T, Error>;

const CONFIG: &str = r#"{
    "username": "user",
    "password": "password",
    "host": "localhost",
    "port": 2525
}"#;

fn main() -> Result<()> {
    env_logger::init();

    let config: MailerConfig = serde_json::from_str(CONFIG)?;
    let dir = std::env::temp_dir().join("postal-outbox");
    std::fs::create_dir_all(&dir)?;

    let mut mailer = MailSender::with_transport(config, FileTransport::new(&dir));

    let mut message = Message::new(
        "Friend <friend@example.com>",
        "user@example.com",
        "Hello",
        "Hello example",
        "<p>Hello <b>example</b></p>",
    )?;
    message.add_cc("copy@example.com")?;
    message.add_header("X-Mailer", "postal");

    mailer.send(&message)?;
    println!("Email written to {}", dir.display());

    Ok(())
}
