//! Blob object
//!
//! Blobs store file content only; names live in trees.
//!
//! ## Format
//!
//! On disk: `blob <size>\0<content>`

use crate::artifacts::core::error::Result;
use crate::artifacts::objects::object::{Object, Packable, Unpackable, frame};
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;
use std::io::{BufRead, Read};

/// Immutable file content
///
/// The binary flag is derived from the bytes (any NUL byte marks binary
/// origin), so it is a pure function of the content and never changes the hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    content: Bytes,
    binary: bool,
}

impl Blob {
    pub fn new(content: impl Into<Bytes>) -> Self {
        let content = content.into();
        let binary = is_binary(&content);

        Blob { content, binary }
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn is_binary(&self) -> bool {
        self.binary
    }

    /// Content decoded as text, with invalid UTF-8 replaced
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Content containing a NUL byte is treated as binary
pub fn is_binary(content: &[u8]) -> bool {
    content.contains(&0)
}

impl Packable for Blob {
    fn serialize(&self) -> Result<Bytes> {
        frame(self.object_type(), &self.content)
    }
}

impl Unpackable for Blob {
    fn deserialize(mut reader: impl BufRead) -> Result<Self> {
        let mut content = Vec::new();
        reader.read_to_end(&mut content)?;

        Ok(Self::new(content))
    }
}

impl Object for Blob {
    fn object_type(&self) -> ObjectType {
        ObjectType::Blob
    }

    fn display(&self) -> String {
        self.text()
    }
}
