// 📋 Run Report - what one run loaded, dropped, discovered and wrote

use crate::batch::{BatchResult, Rejection};
use crate::render::{ChunkFailure, ChunkOutput, ChunkSummary};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct RejectionEntry {
    pub line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    pub reason: String,
}

impl From<&Rejection> for RejectionEntry {
    fn from(rejection: &Rejection) -> Self {
        RejectionEntry {
            line: rejection.line(),
            barcode: rejection.barcode().map(str::to_string),
            reason: rejection.reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub run_date: NaiveDate,
    pub parser_version: String,
    pub records_read: usize,
    pub patrons_loaded: usize,
    pub duplicates_replaced: usize,
    pub rejected: Vec<RejectionEntry>,
    pub new_department_codes: Vec<String>,
    pub chunks: Vec<ChunkOutput>,
    pub failed_chunks: Vec<ChunkFailure>,
}

impl RunReport {
    pub fn new(
        run_date: NaiveDate,
        parser_version: &str,
        records_read: usize,
        batch: &BatchResult,
        new_department_codes: Vec<String>,
    ) -> Self {
        RunReport {
            run_id: uuid::Uuid::new_v4().to_string(),
            run_date,
            parser_version: parser_version.to_string(),
            records_read,
            patrons_loaded: batch.patrons.len(),
            duplicates_replaced: batch.replaced,
            rejected: batch.rejected.iter().map(RejectionEntry::from).collect(),
            new_department_codes,
            chunks: Vec::new(),
            failed_chunks: Vec::new(),
        }
    }

    /// Builder pattern: attach the chunk writer's outcome
    pub fn with_chunks(mut self, summary: ChunkSummary) -> Self {
        self.chunks = summary.written;
        self.failed_chunks = summary.failed;
        self
    }

    pub fn has_failures(&self) -> bool {
        !self.failed_chunks.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} read, {} loaded, {} rejected, {} new department codes, {} files written ({} failed)",
            self.records_read,
            self.patrons_loaded,
            self.rejected.len(),
            self.new_department_codes.len(),
            self.chunks.len(),
            self.failed_chunks.len()
        )
    }

    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).context("Failed to serialize run report")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write run report: {}", path.display()))
    }
}
