use crate::artifacts::core::error::Result;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use bytes::Bytes;
use std::io::{BufRead, Write};

pub trait Packable {
    /// Canonical bytes of the object, header included
    fn serialize(&self) -> Result<Bytes>;
}

pub trait Unpackable {
    /// Rebuild the object from its payload; the header has already been consumed
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    fn display(&self) -> String;

    fn object_id(&self) -> Result<ObjectId> {
        Ok(ObjectId::from_content(&self.serialize()?))
    }
}

/// Prefix `payload` with the `<kind> <size>\0` header
pub(crate) fn frame(object_type: ObjectType, payload: &[u8]) -> Result<Bytes> {
    let mut object_bytes = Vec::with_capacity(payload.len() + 16);
    let header = format!("{} {}\0", object_type.as_str(), payload.len());
    object_bytes.write_all(header.as_bytes())?;
    object_bytes.write_all(payload)?;

    Ok(Bytes::from(object_bytes))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectBox {
    Blob(Box<Blob>),
    Tree(Box<Tree>),
    Commit(Box<Commit>),
}

impl ObjectBox {
    pub fn object_type(&self) -> ObjectType {
        match self {
            ObjectBox::Blob(_) => ObjectType::Blob,
            ObjectBox::Tree(_) => ObjectType::Tree,
            ObjectBox::Commit(_) => ObjectType::Commit,
        }
    }

    pub fn display(&self) -> String {
        match self {
            ObjectBox::Blob(blob) => blob.display(),
            ObjectBox::Tree(tree) => tree.display(),
            ObjectBox::Commit(commit) => commit.display(),
        }
    }
}
