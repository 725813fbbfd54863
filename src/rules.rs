// 🏷️ Institution Rules - Rules as Data
// Campus constants and the two historical rule lineages, chosen by configuration

use serde::{Deserialize, Serialize};

pub const DEFAULT_CAMPUS_PHONE_PREFIX: &str = "503-725-";
pub const DEFAULT_CAMPUS_EMAIL_DOMAIN: &str = "pdx.edu";

// ============================================================================
// POLICY VARIANTS
// ============================================================================

/// How the alternate phone is treated when it repeats the primary phone
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AltPhonePolicy {
    /// Skip `alt_phone` when its raw value equals the raw `phone`
    #[default]
    SkipDuplicate,

    /// Skip `alt_phone` when it normalizes to the same number as `phone`
    SkipNormalizedDuplicate,

    /// Always keep `alt_phone` when present
    KeepAll,
}

/// Where the department code comes from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DepartmentPolicy {
    /// Organization description first, then the major code
    #[default]
    OrgOrMajor,

    /// Organization description only
    OrgOnly,
}

// ============================================================================
// RULE SET
// ============================================================================

/// Everything the normalizer needs besides the record itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    /// Phone numbers containing this prefix are office numbers
    pub campus_phone_prefix: String,

    /// Email addresses ending with this domain are work addresses
    pub campus_email_domain: String,

    pub alt_phone_policy: AltPhonePolicy,

    pub department_policy: DepartmentPolicy,

    /// Major codes meaning "no declared major"
    pub no_major_codes: Vec<String>,
}

impl Default for RuleSet {
    fn default() -> Self {
        RuleSet {
            campus_phone_prefix: DEFAULT_CAMPUS_PHONE_PREFIX.to_string(),
            campus_email_domain: DEFAULT_CAMPUS_EMAIL_DOMAIN.to_string(),
            alt_phone_policy: AltPhonePolicy::default(),
            department_policy: DepartmentPolicy::default(),
            no_major_codes: vec!["0000".to_string()],
        }
    }
}

impl RuleSet {
    /// Builder pattern: pick the alternate phone policy
    pub fn with_alt_phone_policy(mut self, policy: AltPhonePolicy) -> Self {
        self.alt_phone_policy = policy;
        self
    }

    /// Builder pattern: pick the department policy
    pub fn with_department_policy(mut self, policy: DepartmentPolicy) -> Self {
        self.department_policy = policy;
        self
    }

    pub fn is_no_major(&self, code: &str) -> bool {
        self.no_major_codes.iter().any(|sentinel| sentinel == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_campus() {
        let rules = RuleSet::default();
        assert_eq!(rules.campus_phone_prefix, "503-725-");
        assert_eq!(rules.campus_email_domain, "pdx.edu");
        assert_eq!(rules.alt_phone_policy, AltPhonePolicy::SkipDuplicate);
        assert_eq!(rules.department_policy, DepartmentPolicy::OrgOrMajor);
        assert!(rules.is_no_major("0000"));
        assert!(!rules.is_no_major("CS"));
    }

    #[test]
    fn test_policies_parse_from_kebab_case() {
        let rules: RuleSet = toml::from_str(
            "alt_phone_policy = \"keep-all\"\ndepartment_policy = \"org-only\"\n",
        )
        .unwrap();
        assert_eq!(rules.alt_phone_policy, AltPhonePolicy::KeepAll);
        assert_eq!(rules.department_policy, DepartmentPolicy::OrgOnly);
        // untouched fields keep their defaults
        assert_eq!(rules.campus_email_domain, "pdx.edu");

        let rules: RuleSet = toml::from_str("alt_phone_policy = \"skip-normalized-duplicate\"\n").unwrap();
        assert_eq!(rules.alt_phone_policy, AltPhonePolicy::SkipNormalizedDuplicate);
    }
}
