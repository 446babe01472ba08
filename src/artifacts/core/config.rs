//! Repository configuration
//!
//! Configuration is an explicit value handed to `Repository::init` and
//! `Repository::open`; nothing is read from process-wide state after that.
//! `Config::from_env` is the only place environment variables are consulted.

use crate::artifacts::core::error::{Error, Result};
use crate::artifacts::objects::commit::Author;
use std::num::NonZeroUsize;

pub const DEFAULT_CACHE_CAPACITY: usize = 1000;
pub const DEFAULT_BRANCH: &str = "master";
const DEFAULT_AUTHOR_NAME: &str = "Unknown Author";
const DEFAULT_AUTHOR_EMAIL: &str = "unknown@localhost";

pub const CACHE_CAPACITY_VAR: &str = "TWIG_CACHE_CAPACITY";
pub const DEFAULT_BRANCH_VAR: &str = "TWIG_DEFAULT_BRANCH";
pub const AUTHOR_NAME_VAR: &str = "TWIG_AUTHOR_NAME";
pub const AUTHOR_EMAIL_VAR: &str = "TWIG_AUTHOR_EMAIL";
pub const AUTHOR_DATE_VAR: &str = "TWIG_AUTHOR_DATE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of parsed objects kept per object kind
    pub cache_capacity: NonZeroUsize,
    /// Branch created and checked out by `init`
    pub default_branch: String,
    pub author_name: String,
    pub author_email: String,
    /// Fixed author timestamp; `None` means "now" at commit time
    pub author_date: Option<chrono::DateTime<chrono::FixedOffset>>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cache_capacity: NonZeroUsize::new(DEFAULT_CACHE_CAPACITY)
                .unwrap_or(NonZeroUsize::MIN),
            default_branch: DEFAULT_BRANCH.to_string(),
            author_name: DEFAULT_AUTHOR_NAME.to_string(),
            author_email: DEFAULT_AUTHOR_EMAIL.to_string(),
            author_date: None,
        }
    }
}

impl Config {
    /// Build a configuration from `TWIG_*` environment variables
    ///
    /// Unset variables fall back to the defaults; the author name falls back
    /// to `USER` before the default.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(capacity) = lookup(CACHE_CAPACITY_VAR) {
            config.cache_capacity = parse_capacity(&capacity)?;
        }

        if let Some(branch) = lookup(DEFAULT_BRANCH_VAR) {
            config.default_branch = branch;
        }

        if let Some(name) = lookup(AUTHOR_NAME_VAR)
            .or_else(|| lookup("USER"))
            .filter(|name| !name.trim().is_empty())
        {
            config.author_name = name;
        }

        if let Some(email) = lookup(AUTHOR_EMAIL_VAR) {
            config.author_email = email;
        }

        if let Some(date) = lookup(AUTHOR_DATE_VAR) {
            config.author_date = Some(parse_author_date(&date)?);
        }

        config.validate()?;

        Ok(config)
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Result<Self> {
        self.cache_capacity = NonZeroUsize::new(capacity)
            .ok_or_else(|| Error::Config("cache capacity must be positive".to_string()))?;
        Ok(self)
    }

    pub fn with_default_branch(mut self, branch: impl Into<String>) -> Self {
        self.default_branch = branch.into();
        self
    }

    pub fn with_author(
        mut self,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self> {
        let (name, email) = (name.into(), email.into());
        validate_author(&name, &email)?;

        self.author_name = name;
        self.author_email = email;
        Ok(self)
    }

    pub fn with_author_date(mut self, date: chrono::DateTime<chrono::FixedOffset>) -> Self {
        self.author_date = Some(date);
        self
    }

    /// Reject field values set directly that the builders would refuse
    pub fn validate(&self) -> Result<()> {
        validate_author(&self.author_name, &self.author_email)
    }

    /// The author identity stamped on new commits
    pub fn author(&self) -> Author {
        match self.author_date {
            Some(timestamp) => Author::new_with_timestamp(
                self.author_name.clone(),
                self.author_email.clone(),
                timestamp,
            ),
            None => Author::new(self.author_name.clone(), self.author_email.clone()),
        }
    }
}

fn parse_capacity(value: &str) -> Result<NonZeroUsize> {
    value
        .trim()
        .parse::<NonZeroUsize>()
        .map_err(|_| Error::Config(format!("{CACHE_CAPACITY_VAR} must be a positive integer, got {value:?}")))
}

/// The author line is `<name> <<email>> <seconds> <offset>`, so the name
/// cannot carry the delimiters or leading/trailing whitespace and neither
/// part may break the line.
fn validate_author(name: &str, email: &str) -> Result<()> {
    const LINE_BREAKS: [char; 2] = ['\n', '\r'];

    if name.is_empty()
        || name.trim() != name
        || name.contains(['<', '>'])
        || name.contains(LINE_BREAKS)
    {
        return Err(Error::Config(format!("invalid author name {name:?}")));
    }

    if email.contains(['<', '>']) || email.contains(LINE_BREAKS) {
        return Err(Error::Config(format!("invalid author email {email:?}")));
    }

    Ok(())
}

fn parse_author_date(value: &str) -> Result<chrono::DateTime<chrono::FixedOffset>> {
    chrono::DateTime::parse_from_rfc2822(value)
        .or_else(|_| chrono::DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S %z"))
        .map_err(|_| Error::Config(format!("{AUTHOR_DATE_VAR} is not a valid date: {value:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.cache_capacity.get(), DEFAULT_CACHE_CAPACITY);
        assert_eq!(config.default_branch, "master");
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = Config::from_lookup(lookup(&[
            (CACHE_CAPACITY_VAR, "16"),
            (DEFAULT_BRANCH_VAR, "main"),
            (AUTHOR_NAME_VAR, "Ada"),
            (AUTHOR_EMAIL_VAR, "ada@example.com"),
            (AUTHOR_DATE_VAR, "2023-01-01 12:00:00 +0000"),
        ]))
        .unwrap();

        assert_eq!(config.cache_capacity.get(), 16);
        assert_eq!(config.default_branch, "main");
        assert_eq!(config.author().display_name(), "Ada <ada@example.com>");
        assert_eq!(config.author().timestamp().timestamp(), 1672574400);
    }

    #[test]
    fn author_name_falls_back_to_user() {
        let config = Config::from_lookup(lookup(&[("USER", "felix")])).unwrap();

        assert_eq!(config.author_name, "felix");
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let result = Config::from_lookup(lookup(&[(CACHE_CAPACITY_VAR, "0")]));
        assert!(matches!(result, Err(Error::Config(_))));

        assert!(Config::default().with_cache_capacity(0).is_err());
    }

    #[test]
    fn malformed_date_is_rejected() {
        let result = Config::from_lookup(lookup(&[(AUTHOR_DATE_VAR, "yesterday")]));

        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[rstest]
    #[case("Ada <x", "ada@example.com")]
    #[case("Ada>", "ada@example.com")]
    #[case("Ada\nLovelace", "ada@example.com")]
    #[case("Ada ", "ada@example.com")]
    #[case(" Ada", "ada@example.com")]
    #[case("Ada", "ada>@example.com")]
    #[case("Ada", "ada@example.com\n")]
    #[case("Ada", "ada\r@example.com")]
    fn author_that_cannot_round_trip_is_rejected(#[case] name: &str, #[case] email: &str) {
        assert!(matches!(
            Config::default().with_author(name, email),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[(AUTHOR_NAME_VAR, name), (AUTHOR_EMAIL_VAR, email)])),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn accepted_author_survives_the_commit_format() {
        let date = chrono::DateTime::parse_from_rfc3339("2024-03-01T10:00:00+01:00").unwrap();
        let config = Config::default()
            .with_author("Ada King-Lovelace", "ada+work@example.com")
            .unwrap()
            .with_author_date(date);
        let line = config.author().display();

        let parsed = Author::try_from(line.as_str()).unwrap();

        assert_eq!(parsed, config.author());
        assert!(Config::default().with_author("", "ada@example.com").is_err());
    }
}
