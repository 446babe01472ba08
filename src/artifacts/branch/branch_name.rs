use crate::artifacts::branch::{INVALID_REF_NAME, RefKind};
use crate::artifacts::core::error::{Error, Result};

/// Names reserved for revision syntax
const RESERVED_NAMES: [&str; 2] = ["HEAD", "@"];

fn validate(kind: RefKind, name: String) -> Result<String> {
    let invalid = |name: String| Error::InvalidRefName { kind, name };

    if name.is_empty() || RESERVED_NAMES.contains(&name.as_str()) {
        return Err(invalid(name));
    }

    if INVALID_REF_NAME.is_match(&name) {
        Err(invalid(name))
    } else {
        Ok(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BranchName(String);

impl BranchName {
    pub fn try_parse(name: impl Into<String>) -> Result<Self> {
        validate(RefKind::Branch, name.into()).map(Self)
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagName(String);

impl TagName {
    pub fn try_parse(name: impl Into<String>) -> Result<Self> {
        validate(RefKind::Tag, name.into()).map(Self)
    }
}

impl AsRef<str> for TagName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TagName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
