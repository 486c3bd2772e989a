//! Approver routing tables.
//!
//! Routing is a pure function of the dominant violation severity and the
//! target environment; no ambient state is consulted.

use std::collections::BTreeSet;

use governance_primitives::{Environment, Severity};

/// Approver groups required for the dominant violation severity.
#[must_use]
pub fn approvers_for_severity(severity: Option<Severity>) -> &'static [&'static str] {
    match severity {
        Some(Severity::Critical | Severity::High) => &["security-review", "compliance-review"],
        _ => &["team-lead"],
    }
}

/// Approver groups required for the target environment.
#[must_use]
pub fn approvers_for_environment(environment: Environment) -> &'static [&'static str] {
    match environment {
        Environment::Production => &["change-advisory-board"],
        Environment::Staging => &["platform-lead"],
        Environment::Development | Environment::Sandbox => &[],
    }
}

/// Union of the severity and environment tables, deduplicated and sorted.
#[must_use]
pub fn required_approvers(severity: Option<Severity>, environment: Environment) -> Vec<String> {
    let set: BTreeSet<&str> = approvers_for_severity(severity)
        .iter()
        .chain(approvers_for_environment(environment))
        .copied()
        .collect();
    set.into_iter().map(str::to_owned).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_severity_routes_to_security_and_compliance() {
        let approvers = required_approvers(Some(Severity::High), Environment::Development);
        assert_eq!(approvers, ["compliance-review", "security-review"]);
    }

    #[test]
    fn production_adds_change_advisory_board() {
        let approvers = required_approvers(Some(Severity::Medium), Environment::Production);
        assert_eq!(approvers, ["change-advisory-board", "team-lead"]);
    }

    #[test]
    fn staging_routes_to_platform_lead() {
        let approvers = required_approvers(None, Environment::Staging);
        assert_eq!(approvers, ["platform-lead", "team-lead"]);
    }
}
