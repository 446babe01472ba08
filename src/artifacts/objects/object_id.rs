//! Object identifier (SHA-1 hash)
//!
//! Object IDs are 40-character lowercase hexadecimal strings.
//!
//! ## Storage
//!
//! Objects are sharded on disk as `<kind>/<first-2-chars>/<remaining-38-chars>`

use crate::artifacts::core::error::{Error, Result};
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use sha1::{Digest, Sha1};
use std::io;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate an object ID from a string
    ///
    /// Uppercase hex digits are accepted and normalized to lowercase.
    pub fn try_parse(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.len() != OBJECT_ID_LENGTH || !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidObjectId(id));
        }
        Ok(Self(id.to_ascii_lowercase()))
    }

    /// Hash of the given canonical object bytes
    pub fn from_content(content: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(content);
        Self(format!("{:x}", hasher.finalize()))
    }

    /// Write the object ID in binary format (20 bytes)
    pub fn write_h40_to<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        for i in (0..OBJECT_ID_LENGTH).step_by(2) {
            let byte = u8::from_str_radix(&self.0[i..i + 2], 16)
                .map_err(|_| Error::InvalidObjectId(self.0.clone()))?;
            writer.write_all(&[byte])?;
        }

        Ok(())
    }

    /// Read an object ID from binary format (20 bytes)
    pub fn read_h40_from<R: io::Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let mut raw = [0u8; OBJECT_ID_LENGTH / 2];
        reader.read_exact(&mut raw)?;

        let hex40 = raw.iter().map(|byte| format!("{byte:02x}")).collect::<String>();
        Ok(Self(hex40))
    }

    /// Convert to a sharded relative path, e.g. `abc123...` becomes `ab/c123...`
    pub fn to_path(&self) -> PathBuf {
        let (dir, file) = self.0.split_at(2);
        PathBuf::from(dir).join(file)
    }

    /// First 7 characters of the hash
    pub fn to_short_oid(&self) -> String {
        self.0[..7].to_string()
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ObjectId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::try_parse(s)
    }
}
