use crate::areas::repository::Repository;
use crate::artifacts::core::error::{Error, Result};
use crate::artifacts::objects::object::ObjectBox;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;

impl Repository {
    /// Load a stored object by hash
    ///
    /// Without a kind, the object's partition decides it.
    pub fn cat_file(&self, kind: Option<ObjectType>, oid: &str) -> Result<ObjectBox> {
        let oid = ObjectId::try_parse(oid)?;
        let kind = match kind {
            Some(kind) => kind,
            None => self.database().kind_of(&oid).ok_or_else(|| Error::NotFound {
                kind: ObjectType::Blob,
                oid: oid.clone(),
            })?,
        };

        self.database().parse_object(kind, &oid)
    }
}
