use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::{BranchName, TagName};
use crate::artifacts::branch::{ANCESTOR, PARENT};
use crate::artifacts::core::error::{Error, Result};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::{MIN_ABBREV_LENGTH, OBJECT_ID_LENGTH};

/// A user-supplied way of naming a commit
///
/// Supported forms:
/// - `HEAD` or `@`: tip of the current branch
/// - a branch name, a tag name, a full commit id, or an abbreviated commit id
///   of at least four hex digits, tried in that order
/// - `<revision>^`: parent of a revision
/// - `<revision>~<n>`: n-th first-parent ancestor of a revision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Revision {
    Head,
    Name(String),
    Parent(Box<Revision>),
    Ancestor(Box<Revision>, usize),
}

impl Revision {
    pub fn try_parse(revision: &str) -> Result<Revision> {
        if let Some(caps) = PARENT.captures(revision) {
            return Ok(Revision::Parent(Box::new(Self::try_parse(&caps[1])?)));
        }

        if let Some(caps) = ANCESTOR.captures(revision) {
            let generations = caps[2]
                .parse::<usize>()
                .map_err(|_| Error::UnknownRevision(revision.to_string()))?;
            return Ok(Revision::Ancestor(
                Box::new(Self::try_parse(&caps[1])?),
                generations,
            ));
        }

        match revision {
            "" => Err(Error::UnknownRevision(revision.to_string())),
            "HEAD" | "@" => Ok(Revision::Head),
            name => Ok(Revision::Name(name.to_string())),
        }
    }

    /// Resolve to the id of an existing commit
    pub fn resolve(&self, repository: &Repository) -> Result<ObjectId> {
        match self {
            Revision::Head => {
                let branch = repository.refs().current_branch()?;
                repository
                    .refs()
                    .read_branch(&branch)?
                    .ok_or_else(|| Error::EmptyBranch(branch.to_string()))
            }
            Revision::Name(name) => Self::resolve_name(name, repository),
            Revision::Parent(base) => self.walk_back(base.resolve(repository)?, 1, repository),
            Revision::Ancestor(base, generations) => {
                self.walk_back(base.resolve(repository)?, *generations, repository)
            }
        }
    }

    fn walk_back(
        &self,
        mut oid: ObjectId,
        generations: usize,
        repository: &Repository,
    ) -> Result<ObjectId> {
        for _ in 0..generations {
            oid = repository
                .database()
                .load_commit(&oid)?
                .parent()
                .cloned()
                .ok_or_else(|| Error::UnknownRevision(self.to_string()))?;
        }

        Ok(oid)
    }

    fn resolve_name(name: &str, repository: &Repository) -> Result<ObjectId> {
        let refs = repository.refs();

        if let Ok(branch) = BranchName::try_parse(name)
            && refs.branch_exists(&branch)
        {
            return refs
                .read_branch(&branch)?
                .ok_or_else(|| Error::EmptyBranch(name.to_string()));
        }

        if let Ok(tag) = TagName::try_parse(name)
            && refs.tag_exists(&tag)
        {
            return refs.read_tag(&tag);
        }

        if name.len() == OBJECT_ID_LENGTH
            && let Ok(oid) = ObjectId::try_parse(name)
        {
            return Self::validate_commit(oid, name, repository);
        }

        if Self::looks_like_abbreviation(name) {
            let mut matches = repository.database().find_commits_by_prefix(name)?;
            return match matches.len() {
                0 => Err(Error::UnknownRevision(name.to_string())),
                1 => Ok(matches.remove(0)),
                _ => Err(Error::AmbiguousRevision {
                    revision: name.to_string(),
                    candidates: matches,
                }),
            };
        }

        Err(Error::UnknownRevision(name.to_string()))
    }

    fn validate_commit(oid: ObjectId, name: &str, repository: &Repository) -> Result<ObjectId> {
        let database = repository.database();
        if database.contains(ObjectType::Commit, &oid) {
            return Ok(oid);
        }

        match database.kind_of(&oid) {
            Some(actual) => Err(Error::KindMismatch {
                oid,
                expected: ObjectType::Commit,
                actual,
            }),
            None => Err(Error::UnknownRevision(name.to_string())),
        }
    }

    fn looks_like_abbreviation(s: &str) -> bool {
        (MIN_ABBREV_LENGTH..OBJECT_ID_LENGTH).contains(&s.len())
            && s.chars().all(|c| c.is_ascii_hexdigit())
    }
}

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Revision::Head => write!(f, "HEAD"),
            Revision::Name(name) => write!(f, "{name}"),
            Revision::Parent(base) => write!(f, "{base}^"),
            Revision::Ancestor(base, generations) => write!(f, "{base}~{generations}"),
        }
    }
}
