//! The simulation data model: time series, equipment, scalar parameters and
//! schedules, captured read-only for the duration of a run.
use crate::equipment::{PvModel, PvParams, WindTurbineModel};
use crate::schedule::{OutputLimitEntry, ScheduleEntry, ScheduleSet};
use crate::series::HourlySeries;
use anyhow::{ensure, Context, Result};
use serde::Deserialize;

/// Parameters of the combined-heat-and-power unit
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChpParams {
    /// Electric output produced per unit of heat load
    pub electric_heat_ratio: f64,
    /// Base electric output independent of heat load (kW)
    pub base_electric: f64,
}

/// Output bounds of the dispatchable peaking unit
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PeakUnitParams {
    /// Maximum output (kW)
    pub max_power: f64,
    /// Minimum-output floor during summer months (kW)
    pub min_power_summer: f64,
    /// Minimum-output floor during winter months (kW)
    pub min_power_winter: f64,
}

impl PeakUnitParams {
    /// The minimum-output floor applicable to the given month
    pub fn seasonal_min(&self, month: u32) -> f64 {
        if crate::calendar::is_summer(month) {
            self.min_power_summer
        } else {
            self.min_power_winter
        }
    }
}

/// Bounds of the voluntarily dispatchable (flexible) load
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FlexibleLoadParams {
    /// Smallest curtailment the flexible load will switch on for (kW)
    pub min_load: f64,
    /// Largest curtailment the flexible load can absorb (kW)
    pub max_load: f64,
}

/// Unit revenues and costs used by the load optimisation pass
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OptimizationParams {
    /// Revenue per kWh served to the basic load
    pub basic_load_revenue: f64,
    /// Revenue per kWh served to the flexible load
    pub flexible_load_revenue: f64,
    /// Generation cost per kWh of thermal output
    pub thermal_cost: f64,
    /// Generation cost per kWh of PV output
    pub pv_cost: f64,
    /// Generation cost per kWh of wind output
    pub wind_cost: f64,
    /// Smallest allowed grid import (kW)
    pub min_grid_load: f64,
}

/// The full data model consumed by the balance calculator.
///
/// A run reads the model as an immutable snapshot; nothing in the core
/// mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    /// Basic electric load of the park (kW)
    pub electric_load: HourlySeries,
    /// Heat load served by the CHP unit (kW)
    pub heat_load: HourlySeries,
    /// Solar irradiance (W/m²)
    pub solar_irradiance: HourlySeries,
    /// Wind speed (m/s)
    pub wind_speed: HourlySeries,
    /// Grid purchase price per kWh
    pub grid_purchase_price: HourlySeries,
    /// Auxiliary (station-service) consumption as a fraction of thermal output
    pub internal_electric_rate: f64,
    /// Installed wind turbine models
    pub wind_turbine_models: Vec<WindTurbineModel>,
    /// Installed PV models
    pub pv_models: Vec<PvModel>,
    /// CHP unit parameters
    pub chp: ChpParams,
    /// Peaking unit bounds
    pub peak_unit: PeakUnitParams,
    /// Flexible load bounds
    pub flexible_load: FlexibleLoadParams,
    /// Load optimisation parameters
    pub optimization: OptimizationParams,
    /// Maintenance outage schedules
    pub maintenance: ScheduleSet<ScheduleEntry>,
    /// Commissioning schedules
    pub commissioning: ScheduleSet<ScheduleEntry>,
    /// Output-limit schedules
    pub output_limits: ScheduleSet<OutputLimitEntry>,
}

impl Model {
    /// Total installed wind capacity: rated power times count over all models
    pub fn wind_total_capacity(&self) -> f64 {
        self.wind_turbine_models
            .iter()
            .map(WindTurbineModel::installed_capacity)
            .sum()
    }

    /// Total installed PV capacity over all models
    pub fn pv_total_capacity(&self) -> f64 {
        self.pv_models.iter().map(PvModel::installed_capacity).sum()
    }

    /// Check the configuration invariants the calculator relies on.
    ///
    /// The calculator itself performs no validation and produces silently
    /// wrong numbers on an invalid model, so this must pass before a run.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            (0.0..=1.0).contains(&self.internal_electric_rate),
            "Internal electric rate must be between 0 and 1"
        );
        ensure!(
            self.flexible_load.min_load >= 0.0
                && self.flexible_load.max_load >= self.flexible_load.min_load,
            "Flexible load bounds must satisfy 0 <= min <= max"
        );
        ensure!(
            self.peak_unit.max_power >= 0.0
                && self.peak_unit.min_power_summer >= 0.0
                && self.peak_unit.min_power_winter >= 0.0,
            "Peak unit bounds must be non-negative"
        );

        for model in &self.wind_turbine_models {
            validate_wind_model(model)
                .with_context(|| format!("Invalid wind turbine model '{}'", model.name))?;
        }
        for model in &self.pv_models {
            validate_pv_model(model)
                .with_context(|| format!("Invalid PV model '{}'", model.name))?;
        }

        Ok(())
    }
}

fn validate_wind_model(model: &WindTurbineModel) -> Result<()> {
    let params = &model.params;
    ensure!(
        params.cut_in_wind < params.rated_wind
            && params.rated_wind < params.max_rated_wind
            && params.max_rated_wind < params.cut_out_wind,
        "Wind speeds must satisfy cut_in < rated < max_rated < cut_out"
    );
    ensure!(params.rated_power > 0.0, "Rated power must be positive");
    ensure!(model.count > 0, "Unit count must be positive");
    ensure!(
        model.output_correction_factor >= 0.0,
        "Output correction factor must be non-negative"
    );

    Ok(())
}

fn validate_pv_model(model: &PvModel) -> Result<()> {
    match model.params {
        PvParams::AreaEfficiency {
            panel_area,
            panel_efficiency,
        } => {
            ensure!(panel_area > 0.0, "Panel area must be positive");
            ensure!(
                panel_efficiency > 0.0 && panel_efficiency <= 1.0,
                "Panel efficiency must be between 0 and 1"
            );
        }
        PvParams::InstalledCapacity {
            installed_capacity,
            system_efficiency,
        } => {
            ensure!(
                installed_capacity > 0.0,
                "Installed capacity must be positive"
            );
            ensure!(
                system_efficiency > 0.0 && system_efficiency <= 1.0,
                "System efficiency must be between 0 and 1"
            );
        }
    }
    ensure!(model.count > 0, "Unit count must be positive");
    ensure!(
        model.output_correction_factor >= 0.0,
        "Output correction factor must be non-negative"
    );

    Ok(())
}
