//! The module responsible for writing result data to disk.
use crate::balance::BalanceResult;
use crate::optimize::LoadOptimization;
use crate::summary::{monthly_summaries, AnnualSummary};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// The root folder in which model-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "enbal_results";

/// The output file name for the hourly balance results
const HOURLY_RESULTS_FILE_NAME: &str = "hourly_balance.csv";

/// The output file name for the monthly summary
const MONTHLY_SUMMARY_FILE_NAME: &str = "monthly_summary.csv";

/// The output file name for the annual summary
const ANNUAL_SUMMARY_FILE_NAME: &str = "annual_summary.csv";

/// The output file name for the load optimisation results
const OPTIMIZATION_FILE_NAME: &str = "optimized_loads.csv";

/// Get the default output directory for the model at the specified path
pub fn get_output_dir(model_dir: &Path) -> Result<PathBuf> {
    // Canonicalise in case the user has specified "."
    let model_dir = model_dir
        .canonicalize()
        .context("Could not resolve path to model")?;

    let model_name = model_dir
        .file_name()
        .context("Model cannot be in root folder")?
        .to_str()
        .context("Invalid chars in model dir name")?;

    Ok([OUTPUT_DIRECTORY_ROOT, model_name].iter().collect())
}

/// Create the output directory if it does not already exist
pub fn create_output_directory(output_dir: &Path) -> Result<()> {
    if output_dir.is_dir() {
        return Ok(());
    }

    fs::create_dir_all(output_dir)?;

    Ok(())
}

/// Represents one hour of balance results in the hourly CSV file
#[derive(Serialize)]
struct HourlyBalanceRow {
    hour: usize,
    corrected_load: f64,
    internal_load: f64,
    total_load: f64,
    chp_output: f64,
    pv_output: f64,
    wind_output: f64,
    peak_pending: f64,
    peak_output: f64,
    thermal_output: f64,
    generation: f64,
    curtailment: f64,
    renewable_actual: f64,
    curtailment_rate: f64,
    grid_exchange: f64,
    flexible_absorption: f64,
}

/// Write the hourly balance results to a CSV file in `output_dir`
pub fn write_hourly_results(output_dir: &Path, results: &BalanceResult) -> Result<()> {
    let file_path = output_dir.join(HOURLY_RESULTS_FILE_NAME);
    let mut writer = csv::Writer::from_path(&file_path)
        .with_context(|| format!("Failed to create {}", file_path.display()))?;

    for hour in 0..crate::series::HOURS_PER_YEAR {
        writer.serialize(HourlyBalanceRow {
            hour,
            corrected_load: results.corrected_load.get(hour),
            internal_load: results.internal_load.get(hour),
            total_load: results.total_load.get(hour),
            chp_output: results.chp_output.get(hour),
            pv_output: results.pv_output.get(hour),
            wind_output: results.wind_output.get(hour),
            peak_pending: results.peak_pending.get(hour),
            peak_output: results.peak_output.get(hour),
            thermal_output: results.thermal_output.get(hour),
            generation: results.generation.get(hour),
            curtailment: results.curtailment.get(hour),
            renewable_actual: results.renewable_actual.get(hour),
            curtailment_rate: results.curtailment_rate.get(hour),
            grid_exchange: results.grid_exchange.get(hour),
            flexible_absorption: results.flexible_absorption.get(hour),
        })?;
    }
    writer.flush()?;

    Ok(())
}

/// Write the monthly and annual summaries to CSV files in `output_dir`
pub fn write_summaries(output_dir: &Path, results: &BalanceResult) -> Result<()> {
    let file_path = output_dir.join(MONTHLY_SUMMARY_FILE_NAME);
    let mut writer = csv::Writer::from_path(&file_path)
        .with_context(|| format!("Failed to create {}", file_path.display()))?;
    for month in monthly_summaries(results) {
        writer.serialize(month)?;
    }
    writer.flush()?;

    let file_path = output_dir.join(ANNUAL_SUMMARY_FILE_NAME);
    let mut writer = csv::Writer::from_path(&file_path)
        .with_context(|| format!("Failed to create {}", file_path.display()))?;
    writer.serialize(AnnualSummary::from_result(results))?;
    writer.flush()?;

    Ok(())
}

/// Represents one hour of load optimisation results in the CSV file
#[derive(Serialize)]
struct OptimizationRow {
    hour: usize,
    basic_load: f64,
    flexible_load: f64,
    revenue: f64,
}

/// Write the load optimisation results to a CSV file in `output_dir`
pub fn write_optimization_results(output_dir: &Path, optimized: &LoadOptimization) -> Result<()> {
    let file_path = output_dir.join(OPTIMIZATION_FILE_NAME);
    let mut writer = csv::Writer::from_path(&file_path)
        .with_context(|| format!("Failed to create {}", file_path.display()))?;

    for hour in 0..crate::series::HOURS_PER_YEAR {
        writer.serialize(OptimizationRow {
            hour,
            basic_load: optimized.basic_load.get(hour),
            flexible_load: optimized.flexible_load.get(hour),
            revenue: optimized.revenue.get(hour),
        })?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::run_annual_balance;
    use crate::fixture::model;
    use crate::model::Model;
    use rstest::rstest;
    use tempfile::tempdir;

    #[test]
    fn test_create_output_directory() {
        let dir = tempdir().unwrap();
        let output_dir = dir.path().join("results");
        create_output_directory(&output_dir).unwrap();
        assert!(output_dir.is_dir());

        // Idempotent when the directory already exists
        create_output_directory(&output_dir).unwrap();
    }

    #[rstest]
    fn test_write_hourly_results(model: Model) {
        let dir = tempdir().unwrap();
        let results = run_annual_balance(&model);
        write_hourly_results(dir.path(), &results).unwrap();

        let contents = fs::read_to_string(dir.path().join(HOURLY_RESULTS_FILE_NAME)).unwrap();
        // Header plus one row per hour
        assert_eq!(
            contents.lines().count(),
            crate::series::HOURS_PER_YEAR + 1
        );
        assert!(contents.starts_with("hour,corrected_load"));
    }

    #[rstest]
    fn test_write_summaries(model: Model) {
        let dir = tempdir().unwrap();
        let results = run_annual_balance(&model);
        write_summaries(dir.path(), &results).unwrap();

        let monthly = fs::read_to_string(dir.path().join(MONTHLY_SUMMARY_FILE_NAME)).unwrap();
        assert_eq!(monthly.lines().count(), 13); // header plus 12 months
        assert!(dir.path().join(ANNUAL_SUMMARY_FILE_NAME).is_file());
    }
}
