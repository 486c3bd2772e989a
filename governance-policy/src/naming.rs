//! Resource-name validation and correction.

use governance_primitives::Environment;
use regex::Regex;
use tracing::debug;

struct NamingRule {
    resource_type: &'static str,
    min_len: usize,
    max_len: usize,
    // Single-character class; applied per character so errors can name the
    // offending characters instead of just failing the whole pattern.
    charset: Regex,
    charset_text: &'static str,
    lowercase_only: bool,
    must_start_alpha: bool,
    no_trailing_period: bool,
}

impl NamingRule {
    fn new(
        resource_type: &'static str,
        min_len: usize,
        max_len: usize,
        charset: &'static str,
        charset_text: &'static str,
    ) -> Self {
        Self {
            resource_type,
            min_len,
            max_len,
            charset: Regex::new(charset).expect("valid naming charset"),
            charset_text,
            lowercase_only: false,
            must_start_alpha: false,
            no_trailing_period: false,
        }
    }

    fn lowercase_only(mut self) -> Self {
        self.lowercase_only = true;
        self
    }

    fn must_start_alpha(mut self) -> Self {
        self.must_start_alpha = true;
        self
    }

    fn no_trailing_period(mut self) -> Self {
        self.no_trailing_period = true;
        self
    }

    fn allows_char(&self, c: char) -> bool {
        self.charset.is_match(&c.to_string())
    }

    fn check(&self, name: &str, errors: &mut Vec<String>) {
        let length = name.chars().count();
        if length < self.min_len || length > self.max_len {
            errors.push(format!(
                "name must be between {} and {} characters, got {length}",
                self.min_len, self.max_len
            ));
        }

        let offenders: Vec<char> = name.chars().filter(|c| !self.allows_char(*c)).collect();
        if !offenders.is_empty() {
            errors.push(format!(
                "name may only contain {}; found {offenders:?}",
                self.charset_text
            ));
        }

        if self.must_start_alpha && !name.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
            errors.push("name must start with a letter".to_owned());
        }

        if self.no_trailing_period && name.ends_with('.') {
            errors.push("name must not end with a period".to_owned());
        }
    }

    /// Synthesizes a corrected name: lower-case where the type demands it,
    /// strip disallowed characters, trim a non-alphabetic prefix where the
    /// type demands a leading letter, truncate to the maximum length.
    fn synthesize(&self, name: &str) -> Option<String> {
        let source = if self.lowercase_only {
            name.to_ascii_lowercase()
        } else {
            name.to_owned()
        };

        let mut cleaned: String = source.chars().filter(|c| self.allows_char(*c)).collect();

        if self.must_start_alpha {
            let skip = cleaned
                .chars()
                .take_while(|c| !c.is_ascii_alphabetic())
                .count();
            cleaned = cleaned.chars().skip(skip).collect();
        }

        if self.no_trailing_period {
            while cleaned.ends_with('.') {
                cleaned.pop();
            }
        }

        cleaned.truncate(self.max_len);

        (cleaned.chars().count() >= self.min_len).then_some(cleaned)
    }
}

/// Result of validating a proposed resource name.
#[derive(Clone, Debug, Default)]
pub struct NamingReport {
    valid: bool,
    errors: Vec<String>,
    warnings: Vec<String>,
    suggestion: Option<String>,
}

impl NamingReport {
    /// Returns `true` when the name satisfies the applicable rule.
    #[must_use]
    pub fn valid(&self) -> bool {
        self.valid
    }

    /// Rule violations found in the name.
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Advisory findings that do not invalidate the name.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Corrected name synthesized from the proposal, when one exists.
    #[must_use]
    pub fn suggestion(&self) -> Option<&str> {
        self.suggestion.as_deref()
    }
}

/// Validates proposed resource names against per-type conventions.
pub struct NamingValidator {
    rules: Vec<NamingRule>,
    generic: NamingRule,
}

impl NamingValidator {
    /// Builds a validator with the built-in resource-type rules.
    #[must_use]
    pub fn new() -> Self {
        let rules = vec![
            NamingRule::new(
                "storage-account",
                3,
                24,
                "^[a-z0-9]$",
                "lowercase letters and numbers",
            )
            .lowercase_only(),
            NamingRule::new(
                "key-vault",
                3,
                24,
                "^[a-zA-Z0-9-]$",
                "letters, numbers, and hyphens",
            )
            .must_start_alpha(),
            NamingRule::new(
                "virtual-machine",
                1,
                15,
                "^[a-zA-Z0-9-]$",
                "letters, numbers, and hyphens",
            ),
            NamingRule::new(
                "resource-group",
                1,
                90,
                r"^[a-zA-Z0-9._()\-]$",
                "letters, numbers, periods, underscores, parentheses, and hyphens",
            )
            .no_trailing_period(),
            NamingRule::new(
                "virtual-network",
                2,
                64,
                r"^[a-zA-Z0-9._\-]$",
                "letters, numbers, periods, underscores, and hyphens",
            ),
            NamingRule::new(
                "sql-server",
                1,
                63,
                "^[a-z0-9-]$",
                "lowercase letters, numbers, and hyphens",
            )
            .lowercase_only(),
            NamingRule::new(
                "app-service",
                2,
                60,
                "^[a-zA-Z0-9-]$",
                "letters, numbers, and hyphens",
            ),
            NamingRule::new(
                "function-app",
                2,
                60,
                "^[a-zA-Z0-9-]$",
                "letters, numbers, and hyphens",
            ),
        ];

        let generic = NamingRule::new(
            "generic",
            1,
            64,
            r"^[a-zA-Z0-9._\-]$",
            "letters, numbers, periods, underscores, and hyphens",
        );

        Self { rules, generic }
    }

    fn rule_for(&self, resource_type: &str) -> Option<&NamingRule> {
        self.rules
            .iter()
            .find(|rule| rule.resource_type.eq_ignore_ascii_case(resource_type))
    }

    /// Validates a proposed name for the given resource type and environment.
    ///
    /// Unknown resource types fall back to a generic rule and carry a warning.
    /// Invalid names come back with a synthesized correction when one can be
    /// derived from the proposal.
    #[must_use]
    pub fn validate(
        &self,
        resource_type: &str,
        name: &str,
        environment: Environment,
    ) -> NamingReport {
        let mut warnings = Vec::new();
        let rule = match self.rule_for(resource_type) {
            Some(rule) => rule,
            None => {
                warnings.push(format!(
                    "no naming rule registered for resource type `{resource_type}`; applying generic rule"
                ));
                &self.generic
            }
        };

        let mut errors = Vec::new();
        rule.check(name, &mut errors);

        let lowered = name.to_ascii_lowercase();
        if !environment
            .name_markers()
            .iter()
            .any(|marker| lowered.contains(marker))
        {
            warnings.push(format!(
                "name does not include an environment marker for {environment} (e.g. `{}`)",
                environment.name_markers()[0]
            ));
        }

        let valid = errors.is_empty();
        let suggestion = if valid { None } else { rule.synthesize(name) };

        debug!(
            resource_type,
            name,
            valid,
            error_count = errors.len(),
            "naming validation complete"
        );

        NamingReport {
            valid,
            errors,
            warnings,
            suggestion,
        }
    }
}

impl Default for NamingValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> NamingValidator {
        NamingValidator::new()
    }

    #[test]
    fn accepts_valid_storage_account_name() {
        // 10 characters, lowercase alphanumeric.
        let report = validator().validate("storage-account", "stdevdat01", Environment::Development);
        assert!(report.valid());
        assert!(report.errors().is_empty());
        assert!(report.suggestion().is_none());
    }

    #[test]
    fn rejects_storage_account_name_for_length() {
        let name = "a".repeat(25);
        let report = validator().validate("storage-account", &name, Environment::Development);
        assert!(!report.valid());
        assert!(report.errors()[0].contains("between 3 and 24"));
        // The synthesized correction is the proposal truncated to the max length.
        assert_eq!(report.suggestion(), Some("a".repeat(24).as_str()));
    }

    #[test]
    fn rejects_storage_account_name_for_character_class() {
        let report = validator().validate("storage-account", "dev_data_01", Environment::Development);
        assert!(!report.valid());
        assert!(report.errors().iter().any(|e| e.contains("lowercase")));
        assert_eq!(report.suggestion(), Some("devdata01"));
    }

    #[test]
    fn suggestion_is_itself_valid() {
        let report = validator().validate("storage-account", "My_Prod-Storage_Account_2024", Environment::Production);
        assert!(!report.valid());
        let suggestion = report.suggestion().expect("suggestion").to_owned();
        let recheck = validator().validate("storage-account", &suggestion, Environment::Production);
        assert!(recheck.valid());
    }

    #[test]
    fn key_vault_must_start_with_letter() {
        let report = validator().validate("key-vault", "1kv-prod", Environment::Production);
        assert!(!report.valid());
        assert!(report.errors().iter().any(|e| e.contains("start with a letter")));
        assert_eq!(report.suggestion(), Some("kv-prod"));
    }

    #[test]
    fn unknown_type_falls_back_with_warning() {
        let report = validator().validate("quantum-ledger", "ql-dev-01", Environment::Development);
        assert!(report.valid());
        assert!(report.warnings()[0].contains("generic rule"));
    }

    #[test]
    fn missing_environment_marker_is_warning_only() {
        let report = validator().validate("storage-account", "stdata01", Environment::Production);
        assert!(report.valid());
        assert!(report
            .warnings()
            .iter()
            .any(|w| w.contains("environment marker")));
    }

    #[test]
    fn unsalvageable_name_yields_no_suggestion() {
        let report = validator().validate("storage-account", "__", Environment::Development);
        assert!(!report.valid());
        assert!(report.suggestion().is_none());
    }
}
