use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::core::error::{Error, Result};
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use std::sync::Arc;
use tracing::instrument;

impl Repository {
    /// First-parent history from a revision (default: HEAD), newest first
    ///
    /// A branch without commits has an empty history.
    #[instrument(skip(self))]
    pub fn log(&self, revision: Option<&str>) -> Result<Vec<(ObjectId, Arc<Commit>)>> {
        let revision = Revision::try_parse(revision.unwrap_or("HEAD"))?;
        let tip = match revision.resolve(self) {
            Ok(tip) => tip,
            Err(Error::EmptyBranch(_)) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        self.history()
            .ancestors(&tip)?
            .into_order()
            .into_iter()
            .map(|oid| {
                let commit = self.database().load_commit(&oid)?;
                Ok((oid, commit))
            })
            .collect()
    }
}
