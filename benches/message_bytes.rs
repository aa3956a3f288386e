use criterion::{black_box, criterion_group, criterion_main, Criterion};
use postal::Message;

const TEXT: &str = "It's the text body of the mail";
const HTML: &str = "<h1>Hi!</h1> <p>This is some more testing with html</p>";

fn message(text: &str, html: &str) -> Message {
    let mut message = Message::new(
        "testrep@test.com",
        "Test From <testfrom@test.com>",
        "Testing",
        text,
        html,
    )
    .unwrap();
    message.add_cc("cc@test.com").unwrap();
    message.add_header("X-Mailer", "postal");
    message
}

fn bench_text_bytes(c: &mut Criterion) {
    let message = message(TEXT, "");
    c.bench_function("text message to bytes", move |b| {
        b.iter(|| black_box(message.to_bytes()))
    });
}

fn bench_multipart_bytes(c: &mut Criterion) {
    let message = message(TEXT, HTML);
    c.bench_function("multipart message to bytes", move |b| {
        b.iter(|| black_box(message.to_bytes()))
    });
}

fn bench_parse_address(c: &mut Criterion) {
    c.bench_function("parse named address", |b| {
        b.iter(|| black_box(postal::Address::parse("Test From <testfrom@test.com>")))
    });
}

criterion_group!(benches, bench_text_bytes, bench_multipart_bytes, bench_parse_address);
criterion_main!(benches);
