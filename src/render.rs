// 🖨️ Chunked Renderer - patron collection → numbered Alma user XML files
//
// The platform's bulk import wants files under 10,000 users each, so the
// collection is split into fixed-size chunks and each chunk gets its own file.

use crate::entities::{Address, Email, Patron, Phone};
use crate::error::RenderError;
use chrono::NaiveDate;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub const ALMA_DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// CHUNKING
// ============================================================================

/// Split into groups of `size`, keeping collection order
///
/// A size of 0 is treated as 1; configuration validation rejects it earlier.
pub fn chunk_patrons(patrons: &[Patron], size: usize) -> Vec<&[Patron]> {
    patrons.chunks(size.max(1)).collect()
}

/// File name of the n-th chunk (1-based)
pub fn chunk_file_name(index: usize, basename: &str) -> String {
    format!("{}-{}", index, basename)
}

// ============================================================================
// RENDERER TRAIT
// ============================================================================

/// Serializes one chunk of patrons into the import wire format
pub trait PatronRenderer {
    fn render(&self, chunk: &[Patron]) -> Result<String, RenderError>;
}

/// Alma `<users>` document, one `<user>` per patron
#[derive(Debug, Clone, Default)]
pub struct AlmaXmlRenderer;

impl AlmaXmlRenderer {
    pub fn new() -> Self {
        AlmaXmlRenderer
    }
}

impl PatronRenderer for AlmaXmlRenderer {
    fn render(&self, chunk: &[Patron]) -> Result<String, RenderError> {
        let mut xml = XmlDoc::new();
        xml.decl()?;
        xml.open("users", &[])?;
        for patron in chunk {
            write_user(&mut xml, patron)?;
        }
        xml.close("users")?;
        xml.finish()
    }
}

// ============================================================================
// XML HELPERS
// ============================================================================

struct XmlDoc {
    writer: Writer<Vec<u8>>,
}

fn xml_err<E: std::fmt::Display>(err: E) -> RenderError {
    RenderError::Xml(err.to_string())
}

impl XmlDoc {
    fn new() -> Self {
        XmlDoc {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }

    fn decl(&mut self) -> Result<(), RenderError> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(xml_err)
    }

    fn open(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), RenderError> {
        let mut start = BytesStart::new(name);
        for attr in attrs {
            start.push_attribute(*attr);
        }
        self.writer.write_event(Event::Start(start)).map_err(xml_err)
    }

    fn close(&mut self, name: &str) -> Result<(), RenderError> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_err)
    }

    fn text(&mut self, name: &str, value: &str) -> Result<(), RenderError> {
        self.open(name, &[])?;
        self.writer
            .write_event(Event::Text(BytesText::new(value)))
            .map_err(xml_err)?;
        self.close(name)
    }

    fn opt_text(&mut self, name: &str, value: Option<&str>) -> Result<(), RenderError> {
        match value {
            Some(v) => self.text(name, v),
            None => Ok(()),
        }
    }

    fn date(&mut self, name: &str, value: NaiveDate) -> Result<(), RenderError> {
        self.text(name, &value.format(ALMA_DATE_FORMAT).to_string())
    }

    fn finish(self) -> Result<String, RenderError> {
        String::from_utf8(self.writer.into_inner()).map_err(xml_err)
    }
}

const EXTERNAL: (&str, &str) = ("segment_type", "External");

fn write_user(xml: &mut XmlDoc, patron: &Patron) -> Result<(), RenderError> {
    xml.open("user", &[])?;
    xml.text("record_type", "PUBLIC")?;
    xml.text("primary_id", &patron.username)?;
    xml.text("first_name", &patron.first_name)?;
    xml.opt_text("middle_name", patron.middle_name.as_deref())?;
    xml.text("last_name", &patron.last_name)?;
    xml.text("user_group", &patron.patron_type.to_string())?;
    xml.opt_text("campus_code", patron.coadmit_code.as_deref())?;
    xml.date("expiry_date", patron.expiry_date)?;
    xml.date("purge_date", patron.purge_date)?;
    xml.text("account_type", "EXTERNAL")?;
    xml.text("external_id", "SIS")?;
    xml.text("status", "ACTIVE")?;

    xml.open("contact_info", &[])?;
    write_address(xml, &patron.address, patron.start_date)?;
    if let Some(email) = &patron.email {
        write_email(xml, email)?;
    }
    let phones: Vec<&Phone> = patron.telephone.iter().chain(patron.telephone2.iter()).collect();
    if !phones.is_empty() {
        xml.open("phones", &[])?;
        for (idx, phone) in phones.iter().enumerate() {
            write_phone(xml, phone, idx == 0)?;
        }
        xml.close("phones")?;
    }
    xml.close("contact_info")?;

    xml.open("user_identifiers", &[])?;
    xml.open("user_identifier", &[EXTERNAL])?;
    xml.text("id_type", "BARCODE")?;
    xml.text("value", &patron.barcode)?;
    xml.text("status", "ACTIVE")?;
    xml.close("user_identifier")?;
    xml.close("user_identifiers")?;

    if let Some(code) = patron.department_code() {
        xml.open("user_statistics", &[])?;
        write_statistic(xml, code)?;
        xml.close("user_statistics")?;
    }

    xml.close("user")
}

fn write_address(xml: &mut XmlDoc, address: &Address, start: NaiveDate) -> Result<(), RenderError> {
    xml.open("addresses", &[])?;
    xml.open("address", &[("preferred", "true"), EXTERNAL])?;
    xml.text("line1", &address.line1)?;
    xml.opt_text("line2", address.line2.as_deref())?;
    xml.opt_text("line3", address.line3.as_deref())?;
    xml.text("city", &address.city)?;
    xml.text("state_province", &address.state)?;
    xml.text("postal_code", &address.zip_code)?;
    xml.date("start_date", start)?;
    xml.open("address_types", &[])?;
    xml.text("address_type", address.address_type.as_str())?;
    xml.close("address_types")?;
    xml.close("address")?;
    xml.close("addresses")
}

fn write_email(xml: &mut XmlDoc, email: &Email) -> Result<(), RenderError> {
    xml.open("emails", &[])?;
    xml.open("email", &[("preferred", "true"), EXTERNAL])?;
    xml.text("email_address", &email.address)?;
    xml.open("email_types", &[])?;
    xml.text("email_type", email.email_type.as_str())?;
    xml.close("email_types")?;
    xml.close("email")?;
    xml.close("emails")
}

fn write_phone(xml: &mut XmlDoc, phone: &Phone, preferred: bool) -> Result<(), RenderError> {
    let preferred = if preferred { "true" } else { "false" };
    xml.open("phone", &[("preferred", preferred), EXTERNAL])?;
    xml.text("phone_number", &phone.number)?;
    xml.open("phone_types", &[])?;
    xml.text("phone_type", phone.phone_type.as_str())?;
    xml.close("phone_types")?;
    xml.close("phone")
}

fn write_statistic(xml: &mut XmlDoc, code: &str) -> Result<(), RenderError> {
    xml.open("user_statistic", &[EXTERNAL])?;
    xml.text("statistic_category", code)?;
    xml.close("user_statistic")
}

// ============================================================================
// FILE OUTPUT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkOutput {
    pub index: usize,
    pub path: PathBuf,
    pub records: usize,
    pub sha256: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkFailure {
    pub index: usize,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ChunkSummary {
    pub written: Vec<ChunkOutput>,
    pub failed: Vec<ChunkFailure>,
}

impl ChunkSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Render and write `{n}-{basename}` for every chunk
///
/// A failing chunk is logged and recorded; the remaining chunks are still
/// written. Only failing to create `output_dir` aborts.
pub fn write_chunks<R: PatronRenderer + ?Sized>(
    output_dir: &Path,
    basename: &str,
    patrons: &[Patron],
    chunk_size: usize,
    renderer: &R,
) -> Result<ChunkSummary, RenderError> {
    fs::create_dir_all(output_dir).map_err(|source| RenderError::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut summary = ChunkSummary::default();
    for (idx, chunk) in chunk_patrons(patrons, chunk_size).into_iter().enumerate() {
        let index = idx + 1;
        let path = output_dir.join(chunk_file_name(index, basename));

        match write_chunk(&path, chunk, renderer) {
            Ok(sha256) => {
                info!(path = %path.display(), records = chunk.len(), "data written");
                summary.written.push(ChunkOutput {
                    index,
                    path,
                    records: chunk.len(),
                    sha256,
                });
            }
            Err(err) => {
                error!(index, error = %err, "failed to write chunk");
                summary.failed.push(ChunkFailure {
                    index,
                    error: err.to_string(),
                });
            }
        }
    }

    Ok(summary)
}

fn write_chunk<R: PatronRenderer + ?Sized>(
    path: &Path,
    chunk: &[Patron],
    renderer: &R,
) -> Result<String, RenderError> {
    let content = renderer.render(chunk)?;
    fs::write(path, content.as_bytes()).map_err(|source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(format!("{:x}", Sha256::digest(content.as_bytes())))
}

// ============================================================================
// TESTS
// ============================================================================
