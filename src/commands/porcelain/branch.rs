use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::core::error::Result;
use crate::artifacts::objects::object_id::ObjectId;
use tracing::instrument;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchInfo {
    pub name: BranchName,
    /// `None` for a branch without commits
    pub tip: Option<ObjectId>,
    pub current: bool,
}

impl Repository {
    /// Create a branch at `start` (default: the current branch's tip, possibly empty)
    #[instrument(skip(self))]
    pub fn create_branch(&self, name: &str, start: Option<&str>) -> Result<Option<ObjectId>> {
        let name = BranchName::try_parse(name)?;

        let tip = match start {
            Some(start) => Some(Revision::try_parse(start)?.resolve(self)?),
            None => {
                let current = self.refs().current_branch()?;
                self.refs().read_branch(&current)?
            }
        };

        self.refs().create_branch(&name, tip.as_ref())?;

        Ok(tip)
    }

    /// All branches in name order, marking the one HEAD names
    pub fn list_branches(&self) -> Result<Vec<BranchInfo>> {
        let current = self.refs().current_branch()?;

        self.refs()
            .list_branches()?
            .into_iter()
            .map(|name| {
                Ok(BranchInfo {
                    tip: self.refs().read_branch(&name)?,
                    current: name == current,
                    name,
                })
            })
            .collect()
    }

    /// Delete a branch other than the current one, returning its former tip
    #[instrument(skip(self))]
    pub fn delete_branch(&self, name: &str) -> Result<Option<ObjectId>> {
        self.refs().delete_branch(&BranchName::try_parse(name)?)
    }

    /// Point HEAD at another branch; the working tree is not touched
    #[instrument(skip(self))]
    pub fn switch(&self, name: &str) -> Result<()> {
        self.refs().set_current_branch(&BranchName::try_parse(name)?)
    }
}
