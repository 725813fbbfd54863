// ⏰ Expiration Policy - patron category + today → expiry and purge dates
//
// "Today" is always passed in, never read from the clock here.

use crate::entities::patron_type::{PatronCategory, PatronType};
use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

/// Days between expiration and eligibility for purge
pub const PURGE_AFTER_DAYS: u64 = 180;

// ============================================================================
// RULE GROUPS
// ============================================================================

/// Which calendar a category expires on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpirationRule {
    /// June 30, one or two years out depending on June 1
    Staff,
    /// June 30 next year
    AcademicYear,
    /// Quarter table
    StudentQuarter,
    /// June 30 two years out
    Default,
}

impl ExpirationRule {
    /// Rule for a group name such as "grad" or "grad-distance"
    ///
    /// Anything outside the enumeration gets the default rule.
    pub fn for_category(category: &str) -> Self {
        match PatronType::parse(category) {
            Some(patron_type) => Self::for_patron_type(&patron_type),
            None => ExpirationRule::Default,
        }
    }

    pub fn for_patron_type(patron_type: &PatronType) -> Self {
        match patron_type.category {
            PatronCategory::Staff => ExpirationRule::Staff,
            PatronCategory::Faculty | PatronCategory::GradAsst | PatronCategory::Emeritus => {
                ExpirationRule::AcademicYear
            }
            PatronCategory::Grad
            | PatronCategory::Undergrad
            | PatronCategory::Honors
            | PatronCategory::HighSchool => ExpirationRule::StudentQuarter,
        }
    }

    pub fn expiration(&self, today: NaiveDate) -> NaiveDate {
        let year = today.year();
        match self {
            ExpirationRule::Staff => {
                if today < ymd(year, 6, 1) {
                    ymd(year + 2, 6, 30)
                } else {
                    ymd(year + 1, 6, 30)
                }
            }
            ExpirationRule::AcademicYear => ymd(year + 1, 6, 30),
            ExpirationRule::StudentQuarter => {
                if today < ymd(year, 3, 15) {
                    // 1/1 - 3/14
                    ymd(year, 10, 20)
                } else if today < ymd(year, 6, 15) {
                    // 3/15 - 6/14
                    ymd(year, 10, 20)
                } else if today < ymd(year, 9, 1) {
                    // 6/15 - 8/31
                    ymd(year + 1, 1, 31)
                } else if today < ymd(year, 12, 15) {
                    // 9/1 - 12/14
                    ymd(year + 1, 4, 25)
                } else {
                    // 12/15 - 12/31
                    ymd(year + 1, 10, 20)
                }
            }
            ExpirationRule::Default => ymd(year + 2, 6, 30),
        }
    }
}

// Fixed month/day pairs are always valid; only chrono's year range can fail.
fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MAX)
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Expiration date for a group name on a given day
pub fn expiration_for(category: &str, today: NaiveDate) -> NaiveDate {
    ExpirationRule::for_category(category).expiration(today)
}

pub fn purge_date_for(expiration: NaiveDate) -> NaiveDate {
    expiration
        .checked_add_days(Days::new(PURGE_AFTER_DAYS))
        .unwrap_or(NaiveDate::MAX)
}

/// Both policy dates for a patron
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PolicyDates {
    pub expiration: NaiveDate,
    pub purge: NaiveDate,
}

impl PolicyDates {
    pub fn for_patron_type(patron_type: &PatronType, today: NaiveDate) -> Self {
        let expiration = ExpirationRule::for_patron_type(patron_type).expiration(today);
        PolicyDates {
            expiration,
            purge: purge_date_for(expiration),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_student_quarter_boundaries() {
        assert_eq!(expiration_for("undergrad", d(2024, 1, 1)), d(2024, 10, 20));
        assert_eq!(expiration_for("undergrad", d(2024, 3, 14)), d(2024, 10, 20));
        assert_eq!(expiration_for("undergrad", d(2024, 3, 15)), d(2024, 10, 20));
        assert_eq!(expiration_for("undergrad", d(2024, 6, 14)), d(2024, 10, 20));
        assert_eq!(expiration_for("undergrad", d(2024, 6, 15)), d(2025, 1, 31));
        assert_eq!(expiration_for("undergrad", d(2024, 8, 31)), d(2025, 1, 31));
        assert_eq!(expiration_for("undergrad", d(2024, 9, 1)), d(2025, 4, 25));
        assert_eq!(expiration_for("undergrad", d(2024, 12, 14)), d(2025, 4, 25));
        assert_eq!(expiration_for("undergrad", d(2024, 12, 15)), d(2025, 10, 20));
        assert_eq!(expiration_for("undergrad", d(2024, 12, 31)), d(2025, 10, 20));
    }

    #[test]
    fn test_student_groups_share_the_quarter_table() {
        let today = d(2024, 7, 1);
        for group in [
            "grad",
            "grad-distance",
            "undergrad-distance",
            "honors",
            "honors-distance",
            "highschool",
            "highschool-distance",
        ] {
            assert_eq!(expiration_for(group, today), d(2025, 1, 31), "{}", group);
        }
    }

    #[test]
    fn test_staff_june_first_cutoff() {
        assert_eq!(expiration_for("staff", d(2024, 5, 31)), d(2026, 6, 30));
        assert_eq!(expiration_for("staff", d(2024, 6, 1)), d(2025, 6, 30));
        assert_eq!(expiration_for("staff-distance", d(2024, 1, 2)), d(2026, 6, 30));
        assert_eq!(expiration_for("staff-distance", d(2024, 11, 2)), d(2025, 6, 30));
    }

    #[test]
    fn test_academic_year_groups() {
        for group in [
            "faculty",
            "faculty-distance",
            "gradasst",
            "gradasst-distance",
            "emeritus",
            "emeritus-distance",
        ] {
            assert_eq!(expiration_for(group, d(2024, 2, 10)), d(2025, 6, 30), "{}", group);
            assert_eq!(expiration_for(group, d(2024, 10, 10)), d(2025, 6, 30), "{}", group);
        }
    }

    #[test]
    fn test_unknown_group_falls_back_to_two_years() {
        assert_eq!(expiration_for("visitor", d(2024, 3, 1)), d(2026, 6, 30));
        assert_eq!(expiration_for("", d(2024, 9, 1)), d(2026, 6, 30));
    }

    #[test]
    fn test_expiration_always_after_today() {
        let mut today = d(2023, 1, 1);
        let end = d(2025, 1, 1);
        while today < end {
            for category in PatronCategory::ALL {
                for distance in [false, true] {
                    let patron_type = PatronType::new(category, distance);
                    let dates = PolicyDates::for_patron_type(&patron_type, today);
                    assert!(dates.expiration > today, "{} on {}", patron_type, today);
                    assert_eq!(dates.purge, dates.expiration + chrono::Duration::days(180));
                    assert_eq!(dates.expiration, expiration_for(&patron_type.to_string(), today));
                }
            }
            today = today.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_purge_crosses_year_end() {
        assert_eq!(purge_date_for(d(2024, 10, 20)), d(2025, 4, 18));
        assert_eq!(purge_date_for(d(2025, 6, 30)), d(2025, 12, 27));
    }
}
