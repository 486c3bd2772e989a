//! Ordinal security tiers for regulated environments.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Ordinal security-requirement level bundling encryption, network, identity,
/// tagging and allowed-region rules.
///
/// Tiers are totally ordered. Higher tiers strictly narrow the allowed-region
/// set and broaden the requirement set; the catalog tests assert that chain.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyTier {
    /// Impact Level 2: public-releasable and non-critical mission data.
    Il2,
    /// Impact Level 4: controlled unclassified information.
    Il4,
    /// Impact Level 5: higher-sensitivity CUI and mission-critical data.
    Il5,
    /// Impact Level 6: classified national security systems.
    Il6,
}

impl PolicyTier {
    /// All tiers in ascending order.
    pub const ALL: [Self; 4] = [Self::Il2, Self::Il4, Self::Il5, Self::Il6];

    /// Returns the canonical label for the tier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Il2 => "IL2",
            Self::Il4 => "IL4",
            Self::Il5 => "IL5",
            Self::Il6 => "IL6",
        }
    }
}

impl Display for PolicyTier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyTier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "il2" | "il-2" => Ok(Self::Il2),
            "il4" | "il-4" => Ok(Self::Il4),
            "il5" | "il-5" => Ok(Self::Il5),
            "il6" | "il-6" => Ok(Self::Il6),
            _ => Err(Error::UnknownTier { label: s.into() }),
        }
    }
}
