//! Commit object
//!
//! Commits link a tree snapshot to at most one parent commit, forming a
//! first-parent chain back to a root commit.
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! tree <tree-sha>
//! parent <parent-sha>
//! author <name> <email> <timestamp> <timezone>
//!
//! <commit message>
//! ```
//!
//! The `parent` line is omitted for root commits. The message is stored
//! verbatim after the first blank line.

use crate::artifacts::core::error::{Error, Result};
use crate::artifacts::objects::object::{Object, Packable, Unpackable, frame};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset, SubsecRound};
use std::io::BufRead;

/// Author information
///
/// Contains name, email, and timestamp with timezone information. Timestamps
/// are kept at whole-second precision, matching what the on-disk form holds.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Author {
    name: String,
    email: String,
    timestamp: DateTime<FixedOffset>,
}

impl Author {
    /// Create a new author stamped with the current time
    pub fn new(name: String, email: String) -> Self {
        Self::new_with_timestamp(name, email, chrono::Local::now().fixed_offset())
    }

    /// Create a new author with a specific timestamp
    pub fn new_with_timestamp(name: String, email: String, timestamp: DateTime<FixedOffset>) -> Self {
        Author {
            name,
            email,
            timestamp: timestamp.trunc_subsecs(0),
        }
    }

    /// Same identity, stamped with the current time
    pub fn refreshed(&self) -> Self {
        Self::new(self.name.clone(), self.email.clone())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// "Name <email@example.com>"
    pub fn display_name(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }

    /// "Name <email> timestamp timezone", the form stored in commits
    pub fn display(&self) -> String {
        format!(
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )
    }

    /// Format timestamp in human-readable form, e.g. "Mon Jan 1 12:34:56 2024 +0000"
    pub fn readable_timestamp(&self) -> String {
        self.timestamp
            .format("%a %b %-d %H:%M:%S %Y %z")
            .to_string()
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }
}

impl TryFrom<&str> for Author {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        // Format: "name <email> timestamp timezone"
        let parts: Vec<&str> = value.rsplitn(3, ' ').collect();
        if parts.len() < 3 {
            return Err(Error::corrupt("commit", "invalid author line"));
        }

        let offset = parse_offset(parts[0])?;
        let seconds = parts[1]
            .parse::<i64>()
            .map_err(|_| Error::corrupt("commit", "invalid author timestamp"))?;
        let name_email_part = parts[2];

        let email_start = name_email_part
            .find('<')
            .ok_or_else(|| Error::corrupt("commit", "author line is missing '<'"))?;
        let email_end = name_email_part
            .rfind('>')
            .filter(|end| *end > email_start)
            .ok_or_else(|| Error::corrupt("commit", "author line is missing '>'"))?;

        let name = name_email_part[..email_start].trim_end().to_string();
        let email = name_email_part[email_start + 1..email_end].to_string();

        let timestamp = DateTime::from_timestamp(seconds, 0)
            .ok_or_else(|| Error::corrupt("commit", "author timestamp out of range"))?
            .with_timezone(&offset);

        Ok(Author {
            name,
            email,
            timestamp,
        })
    }
}

/// Parse a `+hhmm` / `-hhmm` timezone
fn parse_offset(value: &str) -> Result<FixedOffset> {
    let invalid = || Error::corrupt("commit", format!("invalid timezone {value:?}"));

    let (sign, digits) = match value.split_at_checked(1) {
        Some(("+", digits)) => (1, digits),
        Some(("-", digits)) => (-1, digits),
        _ => return Err(invalid()),
    };
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let hours = digits[..2].parse::<i32>().map_err(|_| invalid())?;
    let minutes = digits[2..].parse::<i32>().map_err(|_| invalid())?;

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    /// `None` for a root commit
    parent: Option<ObjectId>,
    tree_oid: ObjectId,
    author: Author,
    message: String,
}

impl Commit {
    pub fn new(parent: Option<ObjectId>, tree_oid: ObjectId, author: Author, message: String) -> Self {
        Commit {
            parent,
            tree_oid,
            author,
            message,
        }
    }

    /// First line of the commit message
    pub fn short_message(&self) -> String {
        self.message.lines().next().unwrap_or("").to_string()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parent.as_ref()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.author.timestamp()
    }

    /// Copy of this commit on top of `parent`, with a fresh timestamp
    pub fn replayed_onto(&self, parent: ObjectId) -> Self {
        Commit {
            parent: Some(parent),
            tree_oid: self.tree_oid.clone(),
            author: self.author.refreshed(),
            message: self.message.clone(),
        }
    }

    fn headers(&self) -> Vec<String> {
        let mut lines = vec![format!("tree {}", self.tree_oid)];
        if let Some(parent) = &self.parent {
            lines.push(format!("parent {parent}"));
        }
        lines.push(format!("author {}", self.author.display()));

        lines
    }
}

impl Packable for Commit {
    fn serialize(&self) -> Result<Bytes> {
        let mut content = self.headers().join("\n");
        content.push_str("\n\n");
        content.push_str(&self.message);

        frame(self.object_type(), content.as_bytes())
    }
}

impl Unpackable for Commit {
    fn deserialize(mut reader: impl BufRead) -> Result<Self> {
        let mut content = Vec::new();
        reader.read_to_end(&mut content)?;
        let content = String::from_utf8(content).map_err(|e| Error::corrupt("commit", e))?;

        let (headers, message) = content
            .split_once("\n\n")
            .ok_or_else(|| Error::corrupt("commit", "missing blank line before message"))?;
        let mut lines = headers.lines();

        let tree_oid = lines
            .next()
            .and_then(|line| line.strip_prefix("tree "))
            .ok_or_else(|| Error::corrupt("commit", "missing tree line"))?;
        let tree_oid = ObjectId::try_parse(tree_oid).map_err(|e| Error::corrupt("commit", e))?;

        let mut next_line = lines
            .next()
            .ok_or_else(|| Error::corrupt("commit", "missing author line"))?;

        let parent = match next_line.strip_prefix("parent ") {
            Some(parent_oid) => {
                let parent_oid =
                    ObjectId::try_parse(parent_oid).map_err(|e| Error::corrupt("commit", e))?;
                next_line = lines
                    .next()
                    .ok_or_else(|| Error::corrupt("commit", "missing author line"))?;
                Some(parent_oid)
            }
            None => None,
        };

        let author = next_line
            .strip_prefix("author ")
            .ok_or_else(|| Error::corrupt("commit", "invalid author line"))?;
        let author = Author::try_from(author)?;

        if lines.next().is_some() {
            return Err(Error::corrupt("commit", "unexpected header line"));
        }

        Ok(Self::new(parent, tree_oid, author, message.to_string()))
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn display(&self) -> String {
        let mut lines = self.headers();
        lines.push(String::new());
        lines.push(self.message.clone());

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;
    use std::io::Cursor;

    fn oid(n: u8) -> ObjectId {
        ObjectId::try_parse(format!("{n:040x}")).unwrap()
    }

    fn author_at(seconds: i64, offset_seconds: i32) -> Author {
        named_author_at("Ada Lovelace", "ada@example.com", seconds, offset_seconds)
    }

    fn named_author_at(name: &str, email: &str, seconds: i64, offset_seconds: i32) -> Author {
        let offset = FixedOffset::east_opt(offset_seconds).unwrap();
        let timestamp = DateTime::from_timestamp(seconds, 0)
            .unwrap()
            .with_timezone(&offset);
        Author::new_with_timestamp(name.into(), email.into(), timestamp)
    }

    fn reparse(commit: &Commit) -> Commit {
        let bytes = commit.serialize().unwrap();
        let start = bytes.iter().position(|b| *b == 0).unwrap() + 1;
        Commit::deserialize(Cursor::new(bytes.slice(start..))).unwrap()
    }

    #[test]
    fn root_commit_has_no_parent_line() {
        let commit = Commit::new(None, oid(1), author_at(1_700_000_000, 0), "init".into());

        let display = commit.display();

        assert!(commit.is_root());
        assert!(!display.contains("parent"));
        assert!(display.starts_with(&format!("tree {}\nauthor Ada Lovelace", oid(1))));
        assert_eq!(reparse(&commit), commit);
    }

    #[test]
    fn message_survives_blank_lines_and_trailing_newline() {
        let commit = Commit::new(
            Some(oid(2)),
            oid(1),
            author_at(1_700_000_000, -5 * 3600),
            "subject\n\nbody paragraph\n\n".into(),
        );

        let parsed = reparse(&commit);

        assert_eq!(parsed.message(), "subject\n\nbody paragraph\n\n");
        assert_eq!(parsed.short_message(), "subject");
        assert_eq!(parsed.parent(), Some(&oid(2)));
        assert_eq!(parsed.author().timestamp().offset().local_minus_utc(), -5 * 3600);
    }

    #[test]
    fn replay_keeps_tree_message_and_identity() {
        let original = Commit::new(Some(oid(2)), oid(1), author_at(1_000, 0), "work".into());

        let replayed = original.replayed_onto(oid(9));

        assert_eq!(replayed.parent(), Some(&oid(9)));
        assert_eq!(replayed.tree_oid(), original.tree_oid());
        assert_eq!(replayed.message(), original.message());
        assert_eq!(replayed.author().display_name(), original.author().display_name());
        assert_ne!(replayed.object_id().unwrap(), original.object_id().unwrap());
    }

    #[rstest]
    #[case("Ada <ada@example.com> 1700000000 +0530", 19800)]
    #[case("Ada <ada@example.com> 1700000000 -0800", -28800)]
    #[case("Ada <ada@example.com> 0 +0000", 0)]
    fn parses_author_timezones(#[case] line: &str, #[case] offset: i32) {
        let author = Author::try_from(line).unwrap();

        assert_eq!(author.name(), "Ada");
        assert_eq!(author.email(), "ada@example.com");
        assert_eq!(author.timestamp().offset().local_minus_utc(), offset);
    }

    #[rstest]
    #[case("Ada ada@example.com 1700000000 +0000")]
    #[case("Ada <ada@example.com> soon +0000")]
    #[case("Ada <ada@example.com> 1700000000 0000")]
    #[case("Ada <ada@example.com> 1700000000 +00")]
    fn rejects_malformed_author_lines(#[case] line: &str) {
        assert!(matches!(Author::try_from(line), Err(Error::Corrupt { .. })));
    }

    #[test]
    fn missing_message_separator_is_corrupt() {
        let payload = format!("tree {}\nauthor Ada <a@b> 0 +0000", oid(1));

        let result = Commit::deserialize(Cursor::new(payload.into_bytes()));

        assert!(matches!(result, Err(Error::Corrupt { .. })));
    }

    proptest! {
        #[test]
        fn parse_inverts_serialize(
            name in "[A-Za-z0-9._'-]([A-Za-z0-9 ._'@()-]{0,30}[A-Za-z0-9._'-])?",
            email in "[ -;=?-~]{0,32}",
            message in "[ -~\n]{0,64}",
            seconds in 0i64..4_000_000_000,
            offset_minutes in -720i32..=840,
            has_parent in any::<bool>(),
        ) {
            let parent = has_parent.then(|| oid(7));
            let author = named_author_at(&name, &email, seconds, offset_minutes * 60);
            let commit = Commit::new(parent, oid(3), author, message);

            prop_assert_eq!(reparse(&commit), commit);
        }
    }
}
