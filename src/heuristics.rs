//! Risk heuristics.
//!
//! Combines the manifest and code signals into findings, using the configurable policy tables,
//! and rates the package by the number of findings.

use crate::{
    risk_tier::RiskTier,
    static_analysis::{code::CodeSignals, manifest::ManifestSignals},
};
use serde::{Deserialize, Serialize};
use std::{fmt, path::PathBuf};

/// Permissions that grant a package control over the device or other applications.
const DANGEROUS_PERMISSIONS: [&str; 5] = [
    "android.permission.BIND_ACCESSIBILITY_SERVICE",
    "android.permission.SYSTEM_ALERT_WINDOW",
    "android.permission.WRITE_SECURE_SETTINGS",
    "android.permission.DEVICE_ADMIN",
    "android.permission.PACKAGE_USAGE_STATS",
];

/// Substrings that make a URL suspicious.
const SUSPICIOUS_DOMAINS: [&str; 4] = ["lock", "virus", "hack", "malware"];

/// Policy tables used by the heuristics.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Policy {
    dangerous_permissions: Vec<String>,
    suspicious_domains: Vec<String>,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            dangerous_permissions: DANGEROUS_PERMISSIONS.iter().map(|&p| p.to_owned()).collect(),
            suspicious_domains: SUSPICIOUS_DOMAINS.iter().map(|&d| d.to_owned()).collect(),
        }
    }
}

impl Policy {
    /// Creates a policy from the given tables.
    pub fn new(dangerous_permissions: Vec<String>, suspicious_domains: Vec<String>) -> Self {
        Self {
            dangerous_permissions,
            suspicious_domains,
        }
    }

    /// Gets the dangerous permissions.
    pub fn dangerous_permissions(&self) -> &[String] {
        &self.dangerous_permissions
    }

    /// Gets the suspicious domain substrings.
    pub fn suspicious_domains(&self) -> &[String] {
        &self.suspicious_domains
    }

    fn is_dangerous(&self, permission: &str) -> bool {
        self.dangerous_permissions.iter().any(|p| p == permission)
    }

    fn is_suspicious(&self, url: &str) -> bool {
        let url = url.to_lowercase();
        self.suspicious_domains
            .iter()
            .any(|domain| url.contains(domain.to_lowercase().as_str()))
    }
}

/// One unit of evidence, tagged by the signal it comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "origin", rename_all = "snake_case")]
pub enum Finding {
    /// The manifest requests a dangerous permission.
    DangerousPermission {
        /// Requested permission.
        permission: String,
    },
    /// A file matches a behavior category.
    Category {
        /// Category label.
        category: String,
        /// Matching file, relative to the extraction root.
        file: PathBuf,
    },
    /// A URL contains a suspicious substring.
    SuspiciousUrl {
        /// The URL, as found.
        url: String,
    },
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DangerousPermission { permission } => {
                write!(f, "Dangerous permission: {}", permission)
            }
            Self::Category { category, file } => write!(f, "{}: {}", category, file.display()),
            Self::SuspiciousUrl { url } => write!(f, "Suspicious URL: {}", url),
        }
    }
}

/// Findings of a package and the resulting tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskAssessment {
    findings: Vec<Finding>,
    tier: RiskTier,
}

impl Default for RiskAssessment {
    fn default() -> Self {
        Self {
            findings: Vec::new(),
            tier: RiskTier::None,
        }
    }
}

impl RiskAssessment {
    /// Gets the findings: dangerous permissions, then category matches, then suspicious URLs.
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Gets the risk tier.
    pub fn tier(&self) -> RiskTier {
        self.tier
    }
}

/// Assesses the risk of a package from its signals.
///
/// Findings are never deduplicated: a permission requested twice is two findings.
pub fn assess(manifest: &ManifestSignals, code: &CodeSignals, policy: &Policy) -> RiskAssessment {
    let permissions = manifest
        .permissions()
        .iter()
        .filter(|permission| policy.is_dangerous(permission))
        .map(|permission| Finding::DangerousPermission {
            permission: permission.clone(),
        });
    let categories = code
        .category_matches()
        .iter()
        .map(|m| Finding::Category {
            category: m.category().to_owned(),
            file: m.file().to_path_buf(),
        });
    let urls = code
        .urls()
        .iter()
        .filter(|url| policy.is_suspicious(url))
        .map(|url| Finding::SuspiciousUrl { url: url.clone() });

    let findings: Vec<Finding> = permissions.chain(categories).chain(urls).collect();
    let tier = RiskTier::from_count(findings.len());

    RiskAssessment { findings, tier }
}

#[cfg(test)]
mod tests {
    use super::{assess, Finding, Policy};
    use crate::{
        risk_tier::RiskTier,
        static_analysis::{
            code::{CategoryMatch, CodeSignals},
            manifest::ManifestSignals,
        },
    };

    fn manifest(permissions: &[&str]) -> ManifestSignals {
        ManifestSignals::new(
            permissions.iter().map(|&p| p.to_owned()).collect(),
            Vec::new(),
            Vec::new(),
        )
    }

    #[test]
    fn it_dangerous_permission() {
        let assessment = assess(
            &manifest(&[
                "android.permission.BIND_ACCESSIBILITY_SERVICE",
                "android.permission.CAMERA",
            ]),
            &CodeSignals::default(),
            &Policy::default(),
        );

        assert_eq!(
            assessment.findings(),
            &[Finding::DangerousPermission {
                permission: "android.permission.BIND_ACCESSIBILITY_SERVICE".to_owned()
            }]
        );
        assert_eq!(assessment.tier(), RiskTier::Low);
    }

    #[test]
    fn it_findings_order() {
        let code = CodeSignals::new(
            vec![
                CategoryMatch::new("Lock/screen-lock behavior", "Helper.txt"),
                CategoryMatch::new("Lock/screen-lock behavior", "Other.txt"),
            ],
            vec![
                "http://LockVirus.example.com/a".to_owned(),
                "https://example.com".to_owned(),
                "http://LockVirus.example.com/a".to_owned(),
            ],
        );
        let assessment = assess(
            &manifest(&["android.permission.SYSTEM_ALERT_WINDOW"]),
            &code,
            &Policy::default(),
        );

        let texts: Vec<String> = assessment.findings().iter().map(|f| f.to_string()).collect();
        assert_eq!(
            texts,
            [
                "Dangerous permission: android.permission.SYSTEM_ALERT_WINDOW",
                "Lock/screen-lock behavior: Helper.txt",
                "Lock/screen-lock behavior: Other.txt",
                "Suspicious URL: http://LockVirus.example.com/a",
                "Suspicious URL: http://LockVirus.example.com/a",
            ]
        );
        assert_eq!(assessment.tier(), RiskTier::High);
    }

    #[test]
    fn it_no_findings() {
        let assessment = assess(
            &manifest(&["android.permission.INTERNET"]),
            &CodeSignals::new(Vec::new(), vec!["https://example.com".to_owned()]),
            &Policy::default(),
        );

        assert!(assessment.findings().is_empty());
        assert_eq!(assessment.tier(), RiskTier::None);
    }

    #[test]
    fn it_custom_policy() {
        let policy = Policy::new(
            vec!["android.permission.CAMERA".to_owned()],
            vec!["Tracker".to_owned()],
        );
        let assessment = assess(
            &manifest(&[
                "android.permission.CAMERA",
                "android.permission.SYSTEM_ALERT_WINDOW",
            ]),
            &CodeSignals::new(
                Vec::new(),
                vec![
                    "http://tracker.example.com".to_owned(),
                    "http://lock.example.com".to_owned(),
                ],
            ),
            &policy,
        );

        assert_eq!(assessment.findings().len(), 2);
        assert_eq!(assessment.tier(), RiskTier::Medium);
    }

    #[test]
    fn it_finding_serialization() {
        let finding = Finding::SuspiciousUrl {
            url: "http://hack.example.com".to_owned(),
        };
        assert_eq!(
            serde_json::to_string(&finding).unwrap(),
            r#"{"origin":"suspicious_url","url":"http://hack.example.com"}"#
        );
    }
}
