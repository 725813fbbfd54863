// 🎓 Patron Type - fixed category table + distance suffix
//
// The SIS sends upper-case category codes ("UNDERGRADUATE"); Alma groups use
// the short lower-case name ("undergrad"), suffixed "-distance" for patrons
// outside the local-service area.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const DISTANCE_SUFFIX: &str = "-distance";

// ============================================================================
// CATEGORY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatronCategory {
    Faculty,
    Emeritus,
    GradAsst,
    Grad,
    Honors,
    Undergrad,
    HighSchool,
    Staff,
}

impl PatronCategory {
    pub const ALL: [PatronCategory; 8] = [
        PatronCategory::Faculty,
        PatronCategory::Emeritus,
        PatronCategory::GradAsst,
        PatronCategory::Grad,
        PatronCategory::Honors,
        PatronCategory::Undergrad,
        PatronCategory::HighSchool,
        PatronCategory::Staff,
    ];

    /// Look up a raw SIS category code
    pub fn from_sis_code(code: &str) -> Option<Self> {
        match code {
            "FACULTY" => Some(PatronCategory::Faculty),
            "EMERITUS" => Some(PatronCategory::Emeritus),
            "GRADASSISTANT" => Some(PatronCategory::GradAsst),
            "GRADUATE" => Some(PatronCategory::Grad),
            "HONOR" => Some(PatronCategory::Honors),
            "UNDERGRADUATE" => Some(PatronCategory::Undergrad),
            "HIGHSCHOOL" => Some(PatronCategory::HighSchool),
            "STAFF" => Some(PatronCategory::Staff),
            _ => None,
        }
    }

    /// Group name used on the platform side
    pub fn as_str(&self) -> &'static str {
        match self {
            PatronCategory::Faculty => "faculty",
            PatronCategory::Emeritus => "emeritus",
            PatronCategory::GradAsst => "gradasst",
            PatronCategory::Grad => "grad",
            PatronCategory::Honors => "honors",
            PatronCategory::Undergrad => "undergrad",
            PatronCategory::HighSchool => "highschool",
            PatronCategory::Staff => "staff",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        PatronCategory::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

// ============================================================================
// PATRON TYPE (category + distance)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PatronType {
    pub category: PatronCategory,
    pub distance: bool,
}

impl PatronType {
    pub fn new(category: PatronCategory, distance: bool) -> Self {
        PatronType { category, distance }
    }

    /// Parse "grad" / "grad-distance"; `None` outside the enumeration
    pub fn parse(value: &str) -> Option<Self> {
        match value.strip_suffix(DISTANCE_SUFFIX) {
            Some(base) => PatronCategory::from_name(base).map(|c| PatronType::new(c, true)),
            None => PatronCategory::from_name(value).map(|c| PatronType::new(c, false)),
        }
    }
}

impl fmt::Display for PatronType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.distance {
            write!(f, "{}{}", self.category.as_str(), DISTANCE_SUFFIX)
        } else {
            f.write_str(self.category.as_str())
        }
    }
}

impl Serialize for PatronType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
