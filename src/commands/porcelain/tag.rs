use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::TagName;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::core::error::Result;
use crate::artifacts::objects::object_id::ObjectId;
use tracing::instrument;

impl Repository {
    /// Tag the commit a revision names (default: HEAD)
    #[instrument(skip(self))]
    pub fn create_tag(&self, name: &str, revision: Option<&str>) -> Result<ObjectId> {
        let name = TagName::try_parse(name)?;
        let oid = Revision::try_parse(revision.unwrap_or("HEAD"))?.resolve(self)?;

        self.refs().create_tag(&name, &oid)?;

        Ok(oid)
    }

    /// All tags in name order with the commit each one names
    pub fn list_tags(&self) -> Result<Vec<(TagName, ObjectId)>> {
        self.refs()
            .list_tags()?
            .into_iter()
            .map(|name| {
                let oid = self.refs().read_tag(&name)?;
                Ok((name, oid))
            })
            .collect()
    }

    #[instrument(skip(self))]
    pub fn delete_tag(&self, name: &str) -> Result<ObjectId> {
        self.refs().delete_tag(&TagName::try_parse(name)?)
    }
}
