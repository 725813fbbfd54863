// 🔁 Pipeline - one scheduled run, start to finish
//
// config → reference data → extract → normalize → novelty → chunks → report

use crate::batch::{find_new_department_codes, process};
use crate::config::PatronLoadConfig;
use crate::parser::{ExtractParser, SisParser};
use crate::reference::{DepartmentCodeSet, ZipCodeSet};
use crate::render::{write_chunks, PatronRenderer};
use crate::report::RunReport;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{info, info_span};

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Processing date used for every date rule
    pub today: NaiveDate,
    /// Normalize and report without writing chunk files
    pub dry_run: bool,
}

pub fn run<R: PatronRenderer + ?Sized>(
    config: &PatronLoadConfig,
    options: RunOptions,
    renderer: &R,
) -> Result<RunReport> {
    let _span = info_span!("patron_load", today = %options.today).entered();
    config.validate()?;

    // Reference data errors are fatal before anything is normalized
    let departments = DepartmentCodeSet::from_file(&config.paths.departments_file)?;
    let zip_codes = ZipCodeSet::from_file(&config.paths.zip_codes_file)?;
    info!(
        departments = departments.len(),
        zip_codes = zip_codes.len(),
        "reference data loaded"
    );

    let parser = SisParser::new();
    let records = parser
        .parse(&config.paths.patron_file)
        .context("Failed to read patron extract")?;
    info!(records = records.len(), "extract loaded");

    let batch = process(&records, &zip_codes, &config.rules, options.today);

    let new_codes = find_new_department_codes(&departments, &batch.patrons);
    info!("{} new department codes found.", new_codes.len());
    for code in &new_codes {
        info!(code = %code, "new department code");
    }

    let report = RunReport::new(
        options.today,
        parser.version(),
        records.len(),
        &batch,
        new_codes,
    );

    if options.dry_run {
        info!("dry run, skipping output files");
        return Ok(report);
    }

    let summary = write_chunks(
        &config.paths.output_dir,
        &config.paths.output_basename,
        batch.patrons.as_slice(),
        config.output.chunk_size,
        renderer,
    )?;

    let report = report.with_chunks(summary);
    info!("{}", report.summary());
    Ok(report)
}
