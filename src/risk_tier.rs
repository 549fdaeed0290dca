//! Qualitative risk tiers.

use serde::{Serialize, Serializer};
use std::fmt;

/// Risk tier of a package, derived from its number of findings.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone)]
pub enum RiskTier {
    /// No findings.
    None,
    /// A single finding.
    Low,
    /// Two or three findings.
    Medium,
    /// More than three findings.
    High,
}

impl RiskTier {
    /// Gets the tier for the given number of findings.
    pub fn from_count(findings: usize) -> Self {
        match findings {
            0 => Self::None,
            1 => Self::Low,
            2..=3 => Self::Medium,
            _ => Self::High,
        }
    }
}

impl fmt::Display for RiskTier {
    #[allow(clippy::use_debug)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format!("{:?}", self).to_uppercase())
    }
}

impl Serialize for RiskTier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.to_string().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::RiskTier;

    #[test]
    fn it_tier_boundaries() {
        assert_eq!(RiskTier::from_count(0), RiskTier::None);
        assert_eq!(RiskTier::from_count(1), RiskTier::Low);
        assert_eq!(RiskTier::from_count(2), RiskTier::Medium);
        assert_eq!(RiskTier::from_count(3), RiskTier::Medium);
        assert_eq!(RiskTier::from_count(4), RiskTier::High);
        assert_eq!(RiskTier::from_count(40), RiskTier::High);
    }

    #[test]
    fn it_tier_order_and_text() {
        assert!(RiskTier::None < RiskTier::Low);
        assert!(RiskTier::Medium < RiskTier::High);
        assert_eq!(RiskTier::Medium.to_string(), "MEDIUM");
        assert_eq!(
            serde_json::to_string(&RiskTier::None).unwrap(),
            "\"NONE\""
        );
    }
}
