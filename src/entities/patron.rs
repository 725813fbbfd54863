// 🪪 Patron Entity - one normalized library user
//
// Built once from a RawRecord; every derived field is a function of the
// record, the distance flag, the rule set and the processing date.

use crate::entities::coadmit::coadmit_code;
use crate::entities::patron_type::{PatronCategory, PatronType};
use crate::error::ValidationError;
use crate::expiration::PolicyDates;
use crate::parser::{fields, RawRecord};
use crate::reference::zip5;
use crate::rules::{AltPhonePolicy, DepartmentPolicy, RuleSet};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

// ============================================================================
// CONTACT ROLES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressType {
    Work,
    Home,
    School,
}

impl AddressType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressType::Work => "work",
            AddressType::Home => "home",
            AddressType::School => "school",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailType {
    Work,
    Personal,
}

impl EmailType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmailType::Work => "work",
            EmailType::Personal => "personal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PhoneType {
    Office,
    Home,
}

impl PhoneType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhoneType::Office => "office",
            PhoneType::Home => "home",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Address {
    pub line1: String,
    pub line2: Option<String>,
    pub line3: Option<String>,
    pub city: String,
    pub state: String,
    /// First five characters of the raw ZIP
    pub zip_code: String,
    pub address_type: AddressType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Email {
    pub address: String,
    pub email_type: EmailType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Phone {
    /// Canonical NNN-NNN-NNNN
    pub number: String,
    pub phone_type: PhoneType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Department {
    pub code: String,
    pub name: Option<String>,
}

// ============================================================================
// PATRON
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Patron {
    /// External identifier, from `id_number`
    pub barcode: String,
    pub username: String,

    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,

    pub patron_type: PatronType,
    pub coadmit_code: Option<String>,

    pub address: Address,

    pub expiry_date: NaiveDate,
    pub purge_date: NaiveDate,
    pub start_date: NaiveDate,

    pub email: Option<Email>,
    pub telephone: Option<Phone>,
    pub telephone2: Option<Phone>,

    pub department: Option<Department>,
}

impl Patron {
    /// Normalize one raw record
    ///
    /// Fails only when the identifier or username is empty, or the category
    /// code is unknown. Every other gap leaves the derived field empty.
    pub fn from_raw(
        raw: &RawRecord,
        is_distance: bool,
        rules: &RuleSet,
        today: NaiveDate,
    ) -> Result<Patron, ValidationError> {
        let line = raw.line_number;

        let barcode = raw
            .non_empty(fields::ID_NUMBER)
            .ok_or(ValidationError::MissingField {
                field: fields::ID_NUMBER,
                line,
            })?;
        let username = raw
            .non_empty(fields::STU_USERNAME)
            .ok_or(ValidationError::MissingField {
                field: fields::STU_USERNAME,
                line,
            })?;

        // 1. Name
        let first_name = raw
            .non_empty(fields::PREF_FIRST_NAME)
            .unwrap_or_else(|| raw.get(fields::FIRST_NAME));

        // 2. Category
        let code = raw.get(fields::PATRON);
        let category =
            PatronCategory::from_sis_code(code).ok_or_else(|| ValidationError::UnknownPatronType {
                code: code.to_string(),
                line,
            })?;
        let patron_type = PatronType::new(category, is_distance);

        // 3. Coadmit
        let coadmit = raw.non_empty(fields::COADMIT).and_then(|label| {
            let code = coadmit_code(label);
            if code.is_none() {
                warn!(barcode, line, label, "unknown coadmit label, leaving coadmit code empty");
            }
            code
        });

        // 4-5. Address
        let address = Address {
            line1: raw.get(fields::STREET_LINE1).to_string(),
            line2: raw.non_empty(fields::STREET_LINE2).map(str::to_string),
            line3: raw.non_empty(fields::STREET_LINE3).map(str::to_string),
            city: raw.get(fields::CITY).to_string(),
            state: raw.get(fields::STATE).to_string(),
            zip_code: zip5(raw.get(fields::ZIP)),
            address_type: address_type(category, is_distance),
        };

        // 6. Dates
        let dates = PolicyDates::for_patron_type(&patron_type, today);

        // 7. Email
        let email = raw.non_empty(fields::EMAIL).map(|address| Email {
            address: address.to_string(),
            email_type: classify_email(address, &rules.campus_email_domain),
        });

        // 8. Phones
        let primary_raw = raw.get(fields::PHONE);
        let alt_raw = raw.get(fields::ALT_PHONE);
        let telephone = phone_field(primary_raw, rules, barcode, fields::PHONE);
        let telephone2 = match rules.alt_phone_policy {
            AltPhonePolicy::SkipDuplicate if alt_raw == primary_raw => None,
            AltPhonePolicy::SkipNormalizedDuplicate => {
                phone_field(alt_raw, rules, barcode, fields::ALT_PHONE)
                    .filter(|alt| telephone.as_ref().map(|p| &p.number) != Some(&alt.number))
            }
            _ => phone_field(alt_raw, rules, barcode, fields::ALT_PHONE),
        };

        // 9. Department
        let department = derive_department(raw, rules);
        if department.is_none() {
            debug!(barcode, line, "no department code for record");
        }

        Ok(Patron {
            barcode: barcode.to_string(),
            username: username.to_string(),
            first_name: first_name.to_string(),
            middle_name: raw.non_empty(fields::MIDDLE_NAME).map(str::to_string),
            last_name: raw.get(fields::LAST_NAME).to_string(),
            patron_type,
            coadmit_code: coadmit.map(str::to_string),
            address,
            expiry_date: dates.expiration,
            purge_date: dates.purge,
            start_date: today,
            email,
            telephone,
            telephone2,
            department,
        })
    }

    pub fn department_code(&self) -> Option<&str> {
        self.department.as_ref().map(|d| d.code.as_str())
    }

    pub fn department_name(&self) -> Option<&str> {
        self.department.as_ref().and_then(|d| d.name.as_deref())
    }

    pub fn is_distance(&self) -> bool {
        self.patron_type.distance
    }
}

// ============================================================================
// DERIVATION HELPERS
// ============================================================================

fn address_type(category: PatronCategory, is_distance: bool) -> AddressType {
    if category == PatronCategory::Faculty {
        AddressType::Work
    } else if is_distance {
        AddressType::Home
    } else {
        AddressType::School
    }
}

pub fn classify_email(address: &str, campus_domain: &str) -> EmailType {
    if address.ends_with(campus_domain) {
        EmailType::Work
    } else {
        EmailType::Personal
    }
}

/// Strip non-digits and format the first ten as NNN-NNN-NNNN
///
/// Returns `None` when fewer than ten digits remain.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).take(10).collect();
    if digits.len() < 10 {
        return None;
    }
    Some(format!("{}-{}-{}", &digits[..3], &digits[3..6], &digits[6..10]))
}

pub fn classify_phone(formatted: &str, campus_prefix: &str) -> PhoneType {
    if formatted.contains(campus_prefix) {
        PhoneType::Office
    } else {
        PhoneType::Home
    }
}

fn phone_field(raw: &str, rules: &RuleSet, barcode: &str, field: &str) -> Option<Phone> {
    if raw.is_empty() {
        return None;
    }
    match normalize_phone(raw) {
        Some(number) => {
            let phone_type = classify_phone(&number, &rules.campus_phone_prefix);
            Some(Phone { number, phone_type })
        }
        None => {
            warn!(barcode, field, "phone number has fewer than 10 digits, skipping");
            None
        }
    }
}

/// Department from the org description, or the major under `OrgOrMajor`
pub fn derive_department(raw: &RawRecord, rules: &RuleSet) -> Option<Department> {
    if let Some(code) = raw
        .non_empty(fields::ORGN_DESC)
        .and_then(|desc| desc.split_whitespace().next())
    {
        return Some(Department {
            code: code.to_string(),
            name: None,
        });
    }

    if rules.department_policy == DepartmentPolicy::OrgOnly {
        return None;
    }

    raw.non_empty(fields::STU_MAJOR)
        .filter(|major| !rules.is_no_major(major))
        .map(|major| Department {
            code: major.to_string(),
            name: raw.non_empty(fields::STU_MAJOR_DESC).map(str::to_string),
        })
}

// ============================================================================
// TESTS
// ============================================================================
