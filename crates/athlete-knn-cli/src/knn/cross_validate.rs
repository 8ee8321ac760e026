use anyhow::{Context, Result};
use std::io::Write;

use athlete_knn::cross_validation::{CrossValidationReport, CrossValidator};
use athlete_knn::io::read_athletes_csv_with_config;

use crate::knn::input::RunConfig;

/// Load the data and run leave-one-out cross-validation with `config`.
pub fn run_cross_validation(config: &RunConfig) -> Result<CrossValidationReport> {
    let data = read_athletes_csv_with_config(&config.data, &config.reader_config())?;

    CrossValidator::from_config(&config.knn)
        .evaluate(&data.records, &config.knn.features)
        .context("Cross-validation failed")
}

pub fn write_report<W: Write>(output: &mut W, report: &CrossValidationReport) -> Result<()> {
    writeln!(
        output,
        "Evaluated {} athletes with k={} predicting {}",
        report.evaluated(),
        report.k,
        report.label.name()
    )?;
    writeln!(output, "FINAL ACCURACY: {:.4}", report.accuracy())?;
    writeln!(
        output,
        "BASELINE (always the most common {}): {:.4}",
        report.label.name(),
        report.baseline
    )?;
    Ok(())
}
