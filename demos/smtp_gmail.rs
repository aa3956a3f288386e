use postal::MailSender;

fn main() {
    env_logger::init();

    let username = std::env::var("GMAIL_USERNAME").unwrap_or_else(|_| "example_username".into());
    let password = std::env::var("GMAIL_PASSWORD").unwrap_or_else(|_| "example_password".into());

    // Submission over STARTTLS to smtp.gmail.com:587
    let mut mailer = MailSender::gmail(username.clone(), password);

    let result = mailer.send_mail(
        "to@example.com",
        &username,
        "Hello",
        "Hello example",
        "<p>Hello <b>example</b></p>",
    );

    if result.is_ok() {
        println!("Email sent");
    } else {
        println!("Could not send email: {:?}", result);
    }
}
