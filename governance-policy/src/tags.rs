//! Mandatory tag checks.

use std::collections::{BTreeMap, BTreeSet};

/// Tag keys every governed resource must carry.
pub const REQUIRED_TAGS: &[&str] = &["environment", "project", "owner", "cost-center"];

/// Result of validating a resource tag map.
#[derive(Clone, Debug)]
pub struct TagReport {
    valid: bool,
    missing: Vec<String>,
}

impl TagReport {
    /// Returns `true` when every required tag is present and non-blank.
    #[must_use]
    pub fn valid(&self) -> bool {
        self.valid
    }

    /// Required tags that are absent or blank.
    #[must_use]
    pub fn missing(&self) -> &[String] {
        &self.missing
    }
}

/// Checks resource tag maps against the required set.
pub struct TagValidator {
    required: BTreeSet<String>,
}

impl TagValidator {
    /// Creates a validator requiring the built-in minimal tag set.
    #[must_use]
    pub fn new() -> Self {
        Self::with_required(REQUIRED_TAGS.iter().copied())
    }

    /// Creates a validator requiring the supplied tag keys.
    #[must_use]
    pub fn with_required<I, S>(required: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required: required.into_iter().map(Into::into).collect(),
        }
    }

    /// Validates a tag map. An entry that is absent or holds a blank value
    /// counts as missing.
    #[must_use]
    pub fn validate(&self, tags: &BTreeMap<String, String>) -> TagReport {
        let missing: Vec<String> = self
            .required
            .iter()
            .filter(|key| {
                tags.get(key.as_str())
                    .is_none_or(|value| value.trim().is_empty())
            })
            .cloned()
            .collect();

        TagReport {
            valid: missing.is_empty(),
            missing,
        }
    }
}

impl Default for TagValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn complete_tag_map_passes() {
        let report = TagValidator::new().validate(&tags(&[
            ("environment", "production"),
            ("project", "atlas"),
            ("owner", "platform-team"),
            ("cost-center", "cc-1042"),
        ]));

        assert!(report.valid());
        assert!(report.missing().is_empty());
    }

    #[test]
    fn absent_and_blank_tags_are_missing() {
        let report = TagValidator::new().validate(&tags(&[
            ("environment", "production"),
            ("owner", "   "),
        ]));

        assert!(!report.valid());
        assert_eq!(
            report.missing(),
            ["cost-center", "owner", "project"]
        );
    }
}
