//! Message composition and MIME serialization.
//!
//! A [`Message`] is built from raw address strings, a subject and a text and/or html body. It is
//! only validated when it is serialized for sending, so recipients and content may be changed
//! freely after creation.
//!
//! Known quirks of the wire format produced by [`Message::to_bytes`]:
//!
//! * the `cc` list is written under a `BCC:` header and the `bcc` list under a `CC:` header;
//! * neither list is part of the SMTP envelope (see [`Message::envelope`]), so those addresses
//!   are displayed but never delivered to;
//! * custom headers are written as given, after the generated address headers. A custom header
//!   named like a generated one (`To`, `Subject`, `Date`, `Content-Type`, ...) produces a second
//!   line with that name, and which one a reader honours is undefined.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter, Write};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use lettre::message::Mailbox;
use log::{debug, warn};
use md5::{Digest, Md5};

use crate::error::{AddressError, AddressResult, EmailResult, ValidationError};
use crate::types::{EmailAddress, Envelope};

const CRLF: &str = "\r\n";

/// Characters allowed in an unquoted display name, besides alphanumerics and space
const ATEXT_SPECIALS: &str = "!#$%&'*+-/=?^_`{|}~";

/// Email address with an optional display name
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Address {
    name: Option<String>,
    email: EmailAddress,
}

impl Address {
    /// Parses `local@domain`, `<local@domain>` or `Name <local@domain>`.
    pub fn parse(address: &str) -> AddressResult<Address> {
        let mailbox = address
            .trim()
            .parse::<Mailbox>()
            .map_err(|err| AddressError::new(address, err))?;
        let email = EmailAddress::new(mailbox.email.to_string())
            .map_err(|_| AddressError::new(address, "forbidden character in envelope address"))?;

        Ok(Address {
            name: mailbox.name.filter(|name| !name.is_empty()),
            email,
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Mailbox part of the address
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::parse(s)
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.name {
            Some(ref name) => write!(f, "{} <{}>", encode_display_name(name), self.email),
            None => write!(f, "<{}>", self.email),
        }
    }
}

fn encode_display_name(name: &str) -> Cow<'_, str> {
    if !name.is_ascii() || name.chars().any(|c| c.is_ascii_control()) {
        return Cow::Owned(format!("=?utf-8?b?{}?=", base64::encode(name)));
    }

    if name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == ' ' || ATEXT_SPECIALS.contains(c))
    {
        return Cow::Borrowed(name);
    }

    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push('"');
    for c in name.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    Cow::Owned(quoted)
}

/// Comma separated list of addresses
fn address_list(addresses: &[Address]) -> String {
    addresses
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Recipient list an address is added to
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum RecipientKind {
    To,
    Cc,
    Bcc,
}

/// Email message
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Message {
    pub from: Address,
    pub to: Vec<Address>,
    cc: Vec<Address>,
    bcc: Vec<Address>,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
    /// Custom headers, written in name order
    headers: BTreeMap<String, String>,
}

impl Message {
    /// Creates a message with a single recipient.
    ///
    /// Fails if either address does not parse. An empty body means that representation is left
    /// out of the message.
    pub fn new(
        to: &str,
        from: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> AddressResult<Message> {
        let message = Message {
            from: Address::parse(from)?,
            to: vec![Address::parse(to)?],
            cc: vec![],
            bcc: vec![],
            subject: subject.to_string(),
            text_body: text_body.to_string(),
            html_body: html_body.to_string(),
            headers: BTreeMap::new(),
        };

        debug!(
            "new message to={} text={} html={}",
            message.to[0],
            message.is_text(),
            message.is_html()
        );

        Ok(message)
    }

    /// Whether the message carries a text/plain representation
    pub fn is_text(&self) -> bool {
        !self.text_body.is_empty()
    }

    /// Whether the message carries a text/html representation
    pub fn is_html(&self) -> bool {
        !self.html_body.is_empty()
    }

    /// Parses `address` and appends it to the `kind` list.
    ///
    /// On error the message is left unchanged.
    pub fn add_recipient(&mut self, address: &str, kind: RecipientKind) -> AddressResult<()> {
        let address = match Address::parse(address) {
            Ok(address) => address,
            Err(err) => {
                warn!("dropping {:?} recipient: {}", kind, err);
                return Err(err);
            }
        };

        match kind {
            RecipientKind::To => self.to.push(address),
            RecipientKind::Cc => self.cc.push(address),
            RecipientKind::Bcc => self.bcc.push(address),
        }
        Ok(())
    }

    pub fn add_to(&mut self, to: &str) -> AddressResult<()> {
        self.add_recipient(to, RecipientKind::To)
    }

    pub fn add_cc(&mut self, cc: &str) -> AddressResult<()> {
        self.add_recipient(cc, RecipientKind::Cc)
    }

    pub fn add_bcc(&mut self, bcc: &str) -> AddressResult<()> {
        self.add_recipient(bcc, RecipientKind::Bcc)
    }

    pub fn cc(&self) -> &[Address] {
        &self.cc
    }

    pub fn bcc(&self) -> &[Address] {
        &self.bcc
    }

    /// Sets a custom header, replacing any previous value for the same name
    pub fn add_header<N: Into<String>, V: Into<String>>(&mut self, name: N, value: V) {
        self.headers.insert(name.into(), value.into());
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Checks that the message has a recipient, a subject and some content.
    ///
    /// The sender needs no check, an `Address` is always parsed.
    pub fn validate(&self) -> EmailResult<()> {
        if self.to.is_empty() {
            return Err(ValidationError::MissingTo);
        }

        if self.subject.is_empty() {
            return Err(ValidationError::EmptySubject);
        }

        if !self.is_text() && !self.is_html() {
            return Err(ValidationError::MissingContent);
        }

        Ok(())
    }

    /// Envelope recipients: the `to` mailboxes, in order. `cc` and `bcc` are not included.
    pub fn recipients(&self) -> Vec<EmailAddress> {
        self.to.iter().map(|address| address.email.clone()).collect()
    }

    /// SMTP envelope for this message
    pub fn envelope(&self) -> EmailResult<Envelope> {
        Envelope::new(Some(self.from.email.clone()), self.recipients())
    }

    /// Serializes the message, dated now.
    ///
    /// The bodies are written verbatim, without line folding or transfer encoding.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.format(Utc::now()).into_bytes()
    }

    pub(crate) fn format(&self, now: DateTime<Utc>) -> String {
        let mut out = String::with_capacity(self.text_body.len() + self.html_body.len() + 512);

        push_header(&mut out, "To", &address_list(&self.to));
        push_header(&mut out, "From", &self.from.to_string());

        if !self.cc.is_empty() {
            push_header(&mut out, "BCC", &address_list(&self.cc));
        }
        if !self.bcc.is_empty() {
            push_header(&mut out, "CC", &address_list(&self.bcc));
        }

        for (name, value) in &self.headers {
            push_header(&mut out, name, value);
        }

        push_header(&mut out, "Subject", &self.subject);
        push_header(&mut out, "Date", &now.format("%d %b %y %H:%M UTC").to_string());
        push_header(&mut out, "MIME-Version", "1.0");

        match (self.is_text(), self.is_html()) {
            (true, true) => {
                let boundary = boundary(now);
                push_header(
                    &mut out,
                    "Content-Type",
                    &format!("multipart/alternative; boundary={}", boundary),
                );
                out.push_str(CRLF);
                push_part(&mut out, &boundary, "text/plain", &self.text_body);
                push_part(&mut out, &boundary, "text/html", &self.html_body);
                let _ = write!(out, "--{}--{}", boundary, CRLF);
            }
            (true, false) => push_single(&mut out, "text/plain", &self.text_body),
            (false, true) => push_single(&mut out, "text/html", &self.html_body),
            (false, false) => out.push_str(CRLF),
        }

        out
    }
}

fn push_header(out: &mut String, name: &str, value: &str) {
    let _ = write!(out, "{}: {}{}", name, value, CRLF);
}

fn content_type(mime: &str) -> String {
    format!("{}; charset=\"UTF-8\"", mime)
}

fn push_single(out: &mut String, mime: &str, body: &str) {
    push_header(out, "Content-Type", &content_type(mime));
    out.push_str(CRLF);
    out.push_str(body);
}

fn push_part(out: &mut String, boundary: &str, mime: &str, body: &str) {
    let _ = write!(out, "--{}{}", boundary, CRLF);
    push_header(out, "Content-Type", &content_type(mime));
    out.push_str(CRLF);
    out.push_str(body);
    out.push_str(CRLF);
    out.push_str(CRLF);
}

/// Boundary key for multipart content: md5 of the nanosecond part of `now`, as lowercase hex.
///
/// Two messages serialized within the same nanosecond share a boundary, and nothing checks that
/// the token is absent from the bodies.
fn boundary(now: DateTime<Utc>) -> String {
    hex::encode(Md5::digest(now.timestamp_subsec_nanos().to_string().as_bytes()))
}
