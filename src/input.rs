//! Loading the data model from a model directory.
//!
//! A model directory contains a `model.toml` file with the scalar parameters,
//! equipment lists and schedules, plus one CSV file per hourly series. Series
//! files are optional; a missing one is an all-zero series.
use crate::equipment::{PvModel, WindTurbineModel};
use crate::model::{ChpParams, FlexibleLoadParams, Model, OptimizationParams, PeakUnitParams};
use crate::schedule::{OutputLimitEntry, ScheduleEntry};
use crate::series::{HourlySeries, HOURS_PER_YEAR};
use anyhow::{ensure, Context, Result};
use itertools::Itertools;
use log::warn;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// The file name for the model parameters
const MODEL_FILE_NAME: &str = "model.toml";

/// CSV file names for the five hourly series
const ELECTRIC_LOAD_FILE_NAME: &str = "electric_load.csv";
const HEAT_LOAD_FILE_NAME: &str = "heat_load.csv";
const SOLAR_IRRADIANCE_FILE_NAME: &str = "solar_irradiance.csv";
const WIND_SPEED_FILE_NAME: &str = "wind_speed.csv";
const GRID_PURCHASE_PRICE_FILE_NAME: &str = "grid_purchase_price.csv";

/// Parse a TOML file at the specified path
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read file {}", file_path.display()))?;
    let toml_data = toml::from_str(&toml_str)
        .with_context(|| format!("Error parsing {}", file_path.display()))?;

    Ok(toml_data)
}

/// Read a series of type `T`s from a CSV file into a `Vec<T>`
pub fn read_vec_from_csv<T: DeserializeOwned>(file_path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(file_path)
        .with_context(|| format!("Failed to read file {}", file_path.display()))?;

    reader
        .deserialize()
        .map(|result| result.with_context(|| format!("Error parsing {}", file_path.display())))
        .try_collect()
}

/// One row of an hourly series CSV file
#[derive(Debug, Deserialize)]
struct SeriesRow {
    hour: u32,
    value: f64,
}

/// Read an hourly series from a CSV file, or return an all-zero series if the
/// file does not exist
fn read_series(model_dir: &Path, file_name: &str) -> Result<HourlySeries> {
    let file_path = model_dir.join(file_name);
    if !file_path.is_file() {
        warn!("No {file_name} provided; using an all-zero series");
        return Ok(HourlySeries::new());
    }

    let rows: Vec<SeriesRow> = read_vec_from_csv(&file_path)?;
    ensure!(
        rows.len() == HOURS_PER_YEAR,
        "{} must have exactly {} rows (got {})",
        file_name,
        HOURS_PER_YEAR,
        rows.len()
    );
    for (index, row) in rows.iter().enumerate() {
        ensure!(
            row.hour as usize == index,
            "{} has out-of-order hour {} at row {}",
            file_name,
            row.hour,
            index
        );
    }

    HourlySeries::from_values(rows.into_iter().map(|row| row.value).collect())
}

/// Represents the contents of the entire model file
#[derive(Debug, Deserialize, PartialEq)]
struct ModelFile {
    internal_electric_rate: f64,
    chp: ChpParams,
    peak_unit: PeakUnitParams,
    flexible_load: FlexibleLoadParams,
    optimization: OptimizationParams,
    #[serde(default)]
    wind_turbine: Vec<WindTurbineModel>,
    #[serde(default)]
    pv: Vec<PvModel>,
    #[serde(default)]
    maintenance: Vec<ScheduleEntry>,
    #[serde(default)]
    commissioning: Vec<ScheduleEntry>,
    #[serde(default)]
    output_limit: Vec<OutputLimitEntry>,
}

/// Load and validate the full data model from the specified model directory
pub fn load_model<P: AsRef<Path>>(model_dir: P) -> Result<Model> {
    let model_dir = model_dir.as_ref();
    let model_file: ModelFile = read_toml(&model_dir.join(MODEL_FILE_NAME))?;

    let model = Model {
        electric_load: read_series(model_dir, ELECTRIC_LOAD_FILE_NAME)?,
        heat_load: read_series(model_dir, HEAT_LOAD_FILE_NAME)?,
        solar_irradiance: read_series(model_dir, SOLAR_IRRADIANCE_FILE_NAME)?,
        wind_speed: read_series(model_dir, WIND_SPEED_FILE_NAME)?,
        grid_purchase_price: read_series(model_dir, GRID_PURCHASE_PRICE_FILE_NAME)?,
        internal_electric_rate: model_file.internal_electric_rate,
        wind_turbine_models: model_file.wind_turbine,
        pv_models: model_file.pv,
        chp: model_file.chp,
        peak_unit: model_file.peak_unit,
        flexible_load: model_file.flexible_load,
        optimization: model_file.optimization,
        maintenance: model_file.maintenance.into_iter().collect(),
        commissioning: model_file.commissioning.into_iter().collect(),
        output_limits: model_file.output_limit.into_iter().collect(),
    };
    model.validate().context("Invalid model configuration")?;

    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::EffectType;
    use float_cmp::assert_approx_eq;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    const MODEL_TOML: &str = r#"
        internal_electric_rate = 0.05

        [chp]
        electric_heat_ratio = 0.5
        base_electric = 100.0

        [peak_unit]
        max_power = 2000.0
        min_power_summer = 0.0
        min_power_winter = 0.0

        [flexible_load]
        min_load = 0.0
        max_load = 50.0

        [optimization]
        basic_load_revenue = 1.0
        flexible_load_revenue = 0.8
        thermal_cost = 0.2
        pv_cost = 0.05
        wind_cost = 0.05
        min_grid_load = 0.0

        [[wind_turbine]]
        name = "turbine1"
        cut_in_wind = 3.0
        rated_wind = 12.0
        max_rated_wind = 18.0
        cut_out_wind = 25.0
        rated_power = 2000.0
        count = 10

        [[pv]]
        name = "pv1"
        method = "area_efficiency"
        panel_area = 1000.0
        panel_efficiency = 0.2
        count = 10

        [[maintenance]]
        name = "substation overhaul"
        effect = "electric_load"
        power_size = 500.0
        start_date = "2024-03-01"
        end_date = "2024-03-11"

        [[output_limit]]
        name = "pv ceiling"
        limit_type = "pv_max"
        power_size = 800.0
        start_date = "2024-06-01"
        end_date = "2024-06-30"
    "#;

    fn write_model_toml(dir: &Path, contents: &str) {
        let mut file = File::create(dir.join(MODEL_FILE_NAME)).unwrap();
        writeln!(file, "{contents}").unwrap();
    }

    fn write_series_csv(dir: &Path, file_name: &str, value: f64) {
        let mut file = File::create(dir.join(file_name)).unwrap();
        writeln!(file, "hour,value").unwrap();
        for hour in 0..HOURS_PER_YEAR {
            writeln!(file, "{hour},{value}").unwrap();
        }
    }

    #[test]
    fn test_load_model() {
        let dir = tempdir().unwrap();
        write_model_toml(dir.path(), MODEL_TOML);
        write_series_csv(dir.path(), ELECTRIC_LOAD_FILE_NAME, 1000.0);
        write_series_csv(dir.path(), WIND_SPEED_FILE_NAME, 15.0);

        let model = load_model(dir.path()).unwrap();
        assert_approx_eq!(f64, model.electric_load.get(0), 1000.0);
        assert_approx_eq!(f64, model.wind_speed.get(8759), 15.0);
        // Missing series files default to zero
        assert_approx_eq!(f64, model.heat_load.get(0), 0.0);

        assert_eq!(model.wind_turbine_models.len(), 1);
        assert_approx_eq!(f64, model.wind_total_capacity(), 20_000.0);
        // Default correction factor applies when omitted
        assert_approx_eq!(
            f64,
            model.wind_turbine_models[0].output_correction_factor,
            1.0
        );

        assert_eq!(model.maintenance.len(), 1);
        let entry = model.maintenance.iter().next().unwrap();
        assert_eq!(entry.effect, EffectType::ElectricLoad);
        assert_eq!(model.output_limits.len(), 1);
    }

    #[test]
    fn test_load_model_rejects_unknown_effect() {
        let dir = tempdir().unwrap();
        let toml = MODEL_TOML.replace("\"electric_load\"", "\"mystery\"");
        write_model_toml(dir.path(), &toml);

        assert!(load_model(dir.path()).is_err());
    }

    #[test]
    fn test_load_model_rejects_invalid_wind_speeds() {
        let dir = tempdir().unwrap();
        let toml = MODEL_TOML.replace("rated_wind = 12.0", "rated_wind = 2.0");
        write_model_toml(dir.path(), &toml);

        assert!(load_model(dir.path()).is_err());
    }

    #[test]
    fn test_read_series_wrong_length() {
        let dir = tempdir().unwrap();
        let mut file = File::create(dir.path().join(ELECTRIC_LOAD_FILE_NAME)).unwrap();
        writeln!(file, "hour,value\n0,1.0\n1,2.0").unwrap();
        drop(file);

        assert!(read_series(dir.path(), ELECTRIC_LOAD_FILE_NAME).is_err());
    }
}
