use crate::artifacts::core::error::{Error, Result};
use std::io::BufRead;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Blob,
    Tree,
    Commit,
}

impl ObjectType {
    pub const ALL: [ObjectType; 3] = [ObjectType::Blob, ObjectType::Tree, ObjectType::Commit];

    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Tree => "tree",
            ObjectType::Commit => "commit",
        }
    }

    /// Directory partition holding objects of this kind
    pub fn partition(&self) -> &'static str {
        match self {
            ObjectType::Blob => "blobs",
            ObjectType::Tree => "trees",
            ObjectType::Commit => "commits",
        }
    }

    /// Parse the `<kind> <size>\0` header, returning the kind and declared payload size
    pub fn parse_header(data_reader: &mut impl BufRead) -> Result<(ObjectType, usize)> {
        let mut object_type = Vec::new();
        data_reader.read_until(b' ', &mut object_type)?;
        if object_type.pop() != Some(b' ') {
            return Err(Error::corrupt("object header", "missing object kind"));
        }

        let object_type = std::str::from_utf8(&object_type)
            .map_err(|e| Error::corrupt("object header", e))?;
        let object_type = ObjectType::try_from(object_type)?;

        let mut size = Vec::new();
        data_reader.read_until(b'\0', &mut size)?;
        if size.pop() != Some(b'\0') {
            return Err(Error::corrupt("object header", "missing size terminator"));
        }

        let size = std::str::from_utf8(&size)
            .ok()
            .and_then(|size| size.parse::<usize>().ok())
            .ok_or_else(|| Error::corrupt("object header", "invalid object size"))?;

        Ok((object_type, size))
    }
}

impl TryFrom<&str> for ObjectType {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        match value {
            "blob" => Ok(ObjectType::Blob),
            "tree" => Ok(ObjectType::Tree),
            "commit" => Ok(ObjectType::Commit),
            other => Err(Error::corrupt(
                "object header",
                format!("unknown object kind {other:?}"),
            )),
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
