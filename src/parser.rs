// 🏗️ Raw Record Reader
// Pipe-delimited, quoted SIS extract → one RawRecord per data line

use anyhow::{Context, Result};
use csv::{ByteRecord, ReaderBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

// ============================================================================
// FIELD NAMES
// ============================================================================

/// Column names of the SIS extract
pub mod fields {
    pub const PATRON: &str = "patron";
    pub const PER_PIDM: &str = "per_pidm";
    pub const ID_NUMBER: &str = "id_number";
    pub const LAST_NAME: &str = "last_name";
    pub const FIRST_NAME: &str = "first_name";
    pub const MIDDLE_NAME: &str = "middle_name";
    pub const STREET_LINE1: &str = "street_line1";
    pub const STREET_LINE2: &str = "street_line2";
    pub const STREET_LINE3: &str = "street_line3";
    pub const CITY: &str = "city_1";
    pub const STATE: &str = "state_1";
    pub const ZIP: &str = "zip_1";
    pub const PHONE: &str = "phone";
    pub const ALT_PHONE: &str = "alt_phone";
    pub const EMAIL: &str = "email";
    pub const STU_MAJOR: &str = "stu_major";
    pub const STU_MAJOR_DESC: &str = "stu_major_desc";
    pub const ORGN_CODE_HOME: &str = "orgn_code_home";
    pub const ORGN_DESC: &str = "orgn_desc";
    pub const COADMIT: &str = "coadmit";
    pub const HONOR_PROG: &str = "honor_prog";
    pub const STU_USERNAME: &str = "stu_username";
    pub const UDC_ID: &str = "udc_id";
    pub const PREF_FIRST_NAME: &str = "pref_first_name";
    pub const TERMINATION_DT: &str = "termination_dt";
}

// ============================================================================
// RAW RECORD
// ============================================================================

/// One row of the extract before normalization
///
/// Absent columns read as empty strings, the same as empty cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Line in the original file (header is line 1)
    pub line_number: usize,

    values: HashMap<String, String>,
}

impl RawRecord {
    pub fn new(line_number: usize) -> Self {
        RawRecord {
            line_number,
            values: HashMap::new(),
        }
    }

    /// Builder pattern: set a field
    pub fn with(mut self, field: &str, value: &str) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: &str, value: &str) {
        self.values.insert(field.to_string(), value.to_string());
    }

    /// Field value, empty when absent
    pub fn get(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }

    /// Field value, `None` when absent or empty
    pub fn non_empty(&self, field: &str) -> Option<&str> {
        Some(self.get(field)).filter(|v| !v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ============================================================================
// PARSER
// ============================================================================

/// Reads an extract file into raw records
pub trait ExtractParser {
    fn parse(&self, file_path: &Path) -> Result<Vec<RawRecord>>;

    /// Get parser version (for the run report)
    fn version(&self) -> &str {
        "1.0.0"
    }
}

/// SIS extract parser: `|` delimiter, `"` quotes, header row
#[derive(Debug, Clone, Copy)]
pub struct SisParser {
    delimiter: u8,
    quote: u8,
}

impl SisParser {
    pub fn new() -> Self {
        SisParser {
            delimiter: b'|',
            quote: b'"',
        }
    }

    /// Parse from any reader; `source_name` only feeds error messages
    pub fn parse_reader<R: Read>(&self, reader: R, source_name: &str) -> Result<Vec<RawRecord>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(self.delimiter)
            .quote(self.quote)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .byte_headers()
            .with_context(|| format!("Failed to read header row of {}", source_name))?
            .iter()
            .map(|h| decode_field(h).trim().to_string())
            .collect();

        let mut records = Vec::new();
        let mut row = ByteRecord::new();
        let mut line_num = 1;

        loop {
            let more = reader.read_byte_record(&mut row).with_context(|| {
                format!("Failed to parse line {} in {}", line_num + 1, source_name)
            })?;
            if !more {
                break;
            }
            line_num += 1;

            let mut record = RawRecord::new(
                row.position().map(|p| p.line() as usize).unwrap_or(line_num),
            );
            for (name, value) in headers.iter().zip(row.iter()) {
                record.insert(name, &decode_field(value));
            }
            records.push(record);
        }

        debug!(source = source_name, records = records.len(), "parsed extract");
        Ok(records)
    }
}

impl Default for SisParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractParser for SisParser {
    fn parse(&self, file_path: &Path) -> Result<Vec<RawRecord>> {
        let file = File::open(file_path)
            .with_context(|| format!("Failed to open file: {}", file_path.display()))?;

        let filename = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown.csv");

        self.parse_reader(file, filename)
    }
}

/// UTF-8 when valid, ISO-8859-1 otherwise
fn decode_field(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\"patron\"|\"id_number\"|\"last_name\"|\"first_name\"|\"zip_1\"|\"stu_username\"\n\
                          \"STAFF\"|\"900000001\"|\"Doe\"|\"Jane\"|\"97201\"|\"jdoe\"\n\
                          \"UNDERGRADUATE\"|\"900000002\"|\"Smith | Jones\"|\"Sam\"|\"\"|\"ssmith\"\n";

    #[test]
    fn test_parse_quoted_pipe_file() {
        let records = SisParser::new()
            .parse_reader(SAMPLE.as_bytes(), "sample")
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get(fields::PATRON), "STAFF");
        assert_eq!(records[0].get(fields::STU_USERNAME), "jdoe");
        assert_eq!(records[0].line_number, 2);
        // quoted delimiter stays inside the field
        assert_eq!(records[1].get(fields::LAST_NAME), "Smith | Jones");
        assert_eq!(records[1].line_number, 3);
    }

    #[test]
    fn test_missing_and_empty_fields_read_empty() {
        let records = SisParser::new()
            .parse_reader(SAMPLE.as_bytes(), "sample")
            .unwrap();

        assert_eq!(records[1].get(fields::ZIP), "");
        assert_eq!(records[1].non_empty(fields::ZIP), None);
        assert_eq!(records[1].get(fields::ORGN_DESC), "");
        assert_eq!(records[0].non_empty(fields::ZIP), Some("97201"));
    }

    #[test]
    fn test_short_rows_are_tolerated() {
        let data = "patron|id_number|email\nSTAFF|9001\n";
        let records = SisParser::new().parse_reader(data.as_bytes(), "short").unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get(fields::ID_NUMBER), "9001");
        assert_eq!(records[0].get(fields::EMAIL), "");
    }

    #[test]
    fn test_latin1_fields_are_decoded() {
        let mut data = b"patron|last_name\nSTAFF|Mu".to_vec();
        data.push(0xF1); // ñ in ISO-8859-1
        data.extend_from_slice(b"oz\n");

        let records = SisParser::new().parse_reader(&data[..], "latin1").unwrap();
        assert_eq!(records[0].get(fields::LAST_NAME), "Muñoz");
    }

    #[test]
    fn test_missing_file_errors() {
        let result = SisParser::new().parse(Path::new("/nonexistent/extract.csv"));
        assert!(result.is_err());
    }
}
