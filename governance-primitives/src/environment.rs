//! Deployment environment classification.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Environment a governed resource is destined for.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    /// Live workloads serving end users.
    Production,
    /// Pre-production verification environment.
    Staging,
    /// Day-to-day engineering environment.
    Development,
    /// Throwaway experimentation environment.
    Sandbox,
}

impl Environment {
    /// Returns `true` for the production environment.
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }

    /// Returns the canonical label for the environment.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Staging => "staging",
            Self::Development => "development",
            Self::Sandbox => "sandbox",
        }
    }

    /// Short markers commonly embedded in resource names for this environment.
    #[must_use]
    pub const fn name_markers(self) -> &'static [&'static str] {
        match self {
            Self::Production => &["prod", "prd"],
            Self::Staging => &["stag", "stg"],
            Self::Development => &["dev"],
            Self::Sandbox => &["sandbox", "sbx"],
        }
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" | "prd" => Ok(Self::Production),
            "stage" | "staging" | "stg" => Ok(Self::Staging),
            "dev" | "development" => Ok(Self::Development),
            "sandbox" | "sbx" | "test" => Ok(Self::Sandbox),
            _ => Err(Error::UnknownEnvironment { label: s.into() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases() {
        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!("stg".parse::<Environment>().unwrap(), Environment::Staging);
        assert!("qa7".parse::<Environment>().is_err());
    }

    #[test]
    fn only_production_is_production() {
        assert!(Environment::Production.is_production());
        assert!(!Environment::Staging.is_production());
    }
}
