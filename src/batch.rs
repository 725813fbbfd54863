// 📦 Batch Coordinator - raw records → patron collection + rejections
//
// A bad record never aborts the batch; it is logged and kept in the
// rejection list with its reason.

use crate::entities::Patron;
use crate::error::ValidationError;
use crate::parser::{fields, RawRecord};
use crate::reference::{DepartmentCodeSet, ZipCodeSet};
use crate::rules::RuleSet;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

// ============================================================================
// PATRON COLLECTION
// ============================================================================

/// Patrons keyed by barcode, in first-insertion order
///
/// Re-inserting a barcode replaces the stored patron in place.
#[derive(Debug, Clone, Default)]
pub struct PatronCollection {
    patrons: Vec<Patron>,
    index: HashMap<String, usize>,
}

impl PatronCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace; returns the patron that was replaced
    pub fn insert(&mut self, patron: Patron) -> Option<Patron> {
        match self.index.get(&patron.barcode) {
            Some(&pos) => Some(std::mem::replace(&mut self.patrons[pos], patron)),
            None => {
                self.index.insert(patron.barcode.clone(), self.patrons.len());
                self.patrons.push(patron);
                None
            }
        }
    }

    pub fn get(&self, barcode: &str) -> Option<&Patron> {
        self.index.get(barcode).map(|&pos| &self.patrons[pos])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Patron> {
        self.patrons.iter()
    }

    pub fn as_slice(&self) -> &[Patron] {
        &self.patrons
    }

    pub fn len(&self) -> usize {
        self.patrons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patrons.is_empty()
    }
}

impl<'a> IntoIterator for &'a PatronCollection {
    type Item = &'a Patron;
    type IntoIter = std::slice::Iter<'a, Patron>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ============================================================================
// BATCH RESULT
// ============================================================================

/// A record dropped from the batch
#[derive(Debug, Clone)]
pub struct Rejection {
    pub record: RawRecord,
    pub reason: ValidationError,
}

impl Rejection {
    pub fn line(&self) -> usize {
        self.record.line_number
    }

    pub fn barcode(&self) -> Option<&str> {
        self.record.non_empty(fields::ID_NUMBER)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    pub patrons: PatronCollection,
    pub rejected: Vec<Rejection>,
    /// Records whose barcode had already been seen
    pub replaced: usize,
}

// ============================================================================
// PROCESSING
// ============================================================================

/// Normalize every record; last record wins on duplicate barcodes
pub fn process<'a, I>(records: I, zip_codes: &ZipCodeSet, rules: &RuleSet, today: NaiveDate) -> BatchResult
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    let mut result = BatchResult::default();

    for raw in records {
        let is_distance = zip_codes.is_distance(raw.get(fields::ZIP));

        match Patron::from_raw(raw, is_distance, rules, today) {
            Ok(patron) => {
                let barcode = patron.barcode.clone();
                if result.patrons.insert(patron).is_some() {
                    debug!(barcode = %barcode, line = raw.line_number, "duplicate barcode, replacing earlier record");
                    result.replaced += 1;
                }
            }
            Err(reason) => {
                warn!(line = raw.line_number, error = %reason, "rejected record");
                result.rejected.push(Rejection {
                    record: raw.clone(),
                    reason,
                });
            }
        }
    }

    info!(
        loaded = result.patrons.len(),
        rejected = result.rejected.len(),
        replaced = result.replaced,
        "normalized patron records"
    );
    result
}

/// Department codes on patrons that the reference set does not know
///
/// First-seen order, each code once.
pub fn find_new_department_codes(
    departments: &DepartmentCodeSet,
    patrons: &PatronCollection,
) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut new_codes = Vec::new();

    for patron in patrons {
        let Some(code) = patron.department_code() else {
            continue;
        };
        if departments.contains(code) || !seen.insert(code) {
            continue;
        }
        match patron.department_name() {
            Some(name) => debug!(code, name, barcode = %patron.barcode, "new department code"),
            None => debug!(code, barcode = %patron.barcode, "new department code"),
        }
        new_codes.push(code.to_string());
    }

    new_codes
}

// ============================================================================
// TESTS
// ============================================================================
