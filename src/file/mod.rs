//! The file transport writes the emails to the given directory. Each email produces two files,
//! `message_id.json` with the envelope and `message_id.eml` with the message itself.
//! It can be useful for testing purposes, or if you want to keep track of sent messages.
//!

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::file::error::FileResult;
use crate::{Credentials, Envelope, SendableEmail, ServerAddress, Transport};

pub mod error;

pub use self::error::Error;

/// Writes the content and the envelope information to a file.
#[derive(Debug, Clone)]
#[cfg_attr(
    feature = "serde-impls",
    derive(serde_derive::Serialize, serde_derive::Deserialize)
)]
pub struct FileTransport {
    path: PathBuf,
}

impl FileTransport {
    /// Creates a new transport to the given directory
    pub fn new<P: AsRef<Path>>(path: P) -> FileTransport {
        FileTransport {
            path: PathBuf::from(path.as_ref()),
        }
    }
}

/// Contents of the `.json` file written next to each message
#[derive(PartialEq, Eq, Clone, Debug)]
#[cfg_attr(
    feature = "serde-impls",
    derive(serde_derive::Serialize, serde_derive::Deserialize)
)]
pub struct SerializableEmail {
    pub envelope: Envelope,
    pub message_id: String,
    pub server: ServerAddress,
}

impl Transport for FileTransport {
    type Error = Error;

    fn send(
        &mut self,
        server: &ServerAddress,
        _credentials: &Credentials,
        email: SendableEmail,
    ) -> FileResult {
        let message_id = email.message_id().to_string();

        let mut serialized = serde_json::to_string(&SerializableEmail {
            envelope: email.envelope().clone(),
            message_id: message_id.clone(),
            server: server.clone(),
        })?;
        serialized += "\n";

        let envelope_file = self.path.join(format!("{}.json", message_id));
        let message_file = self.path.join(format!("{}.eml", message_id));

        fs::write(&envelope_file, serialized)?;
        fs::write(&message_file, email.message())?;

        debug!("{}: written to {}", message_id, message_file.display());
        Ok(())
    }
}
