// 📚 Reference Data - department codes and non-distance ZIP codes
// Loaded once per run, read-only afterwards

use crate::error::ReferenceDataError;
use csv::ReaderBuilder;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

// ============================================================================
// DEPARTMENT CODES
// ============================================================================

/// Known department codes and their labels
#[derive(Debug, Clone, Default)]
pub struct DepartmentCodeSet {
    labels: HashMap<String, String>,
}

impl DepartmentCodeSet {
    /// Load a `code,label` CSV file with a header row
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ReferenceDataError> {
        let path = path.as_ref();
        let file = fs::File::open(path).map_err(|source| ReferenceDataError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let csv_err = |source| ReferenceDataError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let headers = reader.headers().map_err(csv_err)?.clone();
        let column = |name: &'static str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or(ReferenceDataError::MissingColumn {
                    path: path.to_path_buf(),
                    column: name,
                })
        };
        let code_idx = column("code")?;
        let label_idx = column("label")?;

        let mut labels = HashMap::new();
        for result in reader.records() {
            let record = result.map_err(csv_err)?;
            let code = record.get(code_idx).unwrap_or("");
            if code.is_empty() {
                continue;
            }
            let label = record.get(label_idx).unwrap_or("");
            labels.insert(code.to_string(), label.to_string());
        }

        debug!(path = %path.display(), count = labels.len(), "loaded department codes");
        Ok(DepartmentCodeSet { labels })
    }

    /// Build a set from in-memory pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        DepartmentCodeSet {
            labels: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.labels.contains_key(code)
    }

    pub fn label(&self, code: &str) -> Option<&str> {
        self.labels.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

// ============================================================================
// ZIP CODES
// ============================================================================

/// ZIP codes inside the local-service area
#[derive(Debug, Clone, Default)]
pub struct ZipCodeSet {
    codes: HashSet<String>,
}

impl ZipCodeSet {
    /// Load a newline-delimited ZIP list
    ///
    /// Blank lines are ignored. Lines that are not exactly five digits are
    /// skipped with a warning.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ReferenceDataError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ReferenceDataError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut codes = HashSet::new();
        for (idx, line) in content.lines().enumerate() {
            let zip = line.trim();
            if zip.is_empty() {
                continue;
            }
            if zip.len() == 5 && zip.bytes().all(|b| b.is_ascii_digit()) {
                codes.insert(zip.to_string());
            } else {
                warn!(path = %path.display(), line = idx + 1, value = zip, "skipping malformed ZIP code");
            }
        }

        debug!(path = %path.display(), count = codes.len(), "loaded non-distance ZIP codes");
        Ok(ZipCodeSet { codes })
    }

    pub fn from_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ZipCodeSet {
            codes: codes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, zip: &str) -> bool {
        self.codes.contains(zip)
    }

    /// A patron is distance when it has a ZIP and the ZIP is outside the set
    pub fn is_distance(&self, raw_zip: &str) -> bool {
        if raw_zip.is_empty() {
            return false;
        }
        !self.contains(&zip5(raw_zip))
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// First five characters of a raw ZIP (ZIP+4 → ZIP)
pub fn zip5(raw_zip: &str) -> String {
    raw_zip.chars().take(5).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_department_codes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "code,label").unwrap();
        writeln!(file, "CS,Computer Science").unwrap();
        writeln!(file, "LIB,\"Library, University\"").unwrap();

        let departments = DepartmentCodeSet::from_file(file.path()).unwrap();
        assert_eq!(departments.len(), 2);
        assert!(departments.contains("CS"));
        assert_eq!(departments.label("LIB"), Some("Library, University"));
        assert!(!departments.contains("MTH"));
    }

    #[test]
    fn test_department_file_without_label_column() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "code,name").unwrap();
        writeln!(file, "CS,Computer Science").unwrap();

        let err = DepartmentCodeSet::from_file(file.path()).unwrap_err();
        assert!(matches!(
            err,
            ReferenceDataError::MissingColumn { column: "label", .. }
        ));
    }

    #[test]
    fn test_missing_department_file() {
        let err = DepartmentCodeSet::from_file("/nonexistent/departments.csv").unwrap_err();
        assert!(matches!(err, ReferenceDataError::Io { .. }));
    }

    #[test]
    fn test_load_zip_codes_skips_junk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "97201").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  97202  ").unwrap();
        writeln!(file, "9720").unwrap();
        writeln!(file, "ABCDE").unwrap();

        let zips = ZipCodeSet::from_file(file.path()).unwrap();
        assert_eq!(zips.len(), 2);
        assert!(zips.contains("97201"));
        assert!(zips.contains("97202"));
    }

    #[test]
    fn test_is_distance() {
        let zips = ZipCodeSet::from_codes(["97201"]);
        assert!(!zips.is_distance("97201"));
        assert!(!zips.is_distance("97201-1234"));
        assert!(zips.is_distance("10001"));
        // no ZIP at all is never distance
        assert!(!zips.is_distance(""));
    }

    #[test]
    fn test_zip5_truncates() {
        assert_eq!(zip5("97201-1234"), "97201");
        assert_eq!(zip5("972"), "972");
    }
}
