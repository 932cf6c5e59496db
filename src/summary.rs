//! Aggregation of hourly balance results into annual and monthly statistics.
use crate::balance::BalanceResult;
use crate::calendar::month_for_hour;
use crate::series::HOURS_PER_YEAR;
use serde::Serialize;

/// Annual statistics derived from one balance run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnualSummary {
    /// Hours with net grid import
    pub import_hours: u32,
    /// Hours with net grid export
    pub export_hours: u32,
    /// Total energy imported from the grid (kWh)
    pub total_import: f64,
    /// Total energy exported to the grid (kWh)
    pub total_export: f64,
    /// Total curtailed renewable energy (kWh)
    pub total_curtailment: f64,
    /// Total maximum renewable energy available (kWh)
    pub total_renewable_max: f64,
    /// Curtailed share of the year's maximum renewable energy (0-1)
    pub overall_curtailment_rate: f64,
    /// Mean corrected electric load (kW)
    pub mean_corrected_load: f64,
    /// Mean total load including auxiliary consumption (kW)
    pub mean_total_load: f64,
    /// Mean total generation (kW)
    pub mean_generation: f64,
    /// Mean net grid exchange (kW)
    pub mean_grid_exchange: f64,
}

impl AnnualSummary {
    /// Compute the annual statistics for a balance run
    pub fn from_result(results: &BalanceResult) -> Self {
        let mut import_hours = 0;
        let mut export_hours = 0;
        let mut total_import = 0.0;
        let mut total_export = 0.0;
        for exchange in results.grid_exchange.iter() {
            if exchange > 0.0 {
                import_hours += 1;
                total_import += exchange;
            } else if exchange < 0.0 {
                export_hours += 1;
                total_export += exchange.abs();
            }
        }

        let total_curtailment = results.curtailment.sum();
        let total_renewable_max = results.pv_output.sum() + results.wind_output.sum();
        let overall_curtailment_rate = if total_renewable_max > 0.0 {
            total_curtailment / total_renewable_max
        } else {
            0.0
        };

        AnnualSummary {
            import_hours,
            export_hours,
            total_import,
            total_export,
            total_curtailment,
            total_renewable_max,
            overall_curtailment_rate,
            mean_corrected_load: results.corrected_load.mean(),
            mean_total_load: results.total_load.mean(),
            mean_generation: results.generation.mean(),
            mean_grid_exchange: results.grid_exchange.mean(),
        }
    }
}

/// Per-calendar-month energy totals for one balance run (kWh)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    /// Calendar month (1-12)
    pub month: u32,
    /// Net grid exchange
    pub grid_exchange: f64,
    /// Maximum renewable output available
    pub renewable_max: f64,
    /// Total generation
    pub generation: f64,
    /// Total load including auxiliary consumption
    pub total_load: f64,
    /// Curtailed renewable output
    pub curtailment: f64,
    /// Thermal output
    pub thermal_output: f64,
    /// Auxiliary load
    pub internal_load: f64,
    /// Renewable output delivered (net of corrected curtailment)
    pub renewable_actual: f64,
    /// Corrected electric load
    pub corrected_load: f64,
}

/// Aggregate a balance run into twelve monthly summaries
pub fn monthly_summaries(results: &BalanceResult) -> Vec<MonthlySummary> {
    let mut months: Vec<MonthlySummary> = (1..=12)
        .map(|month| MonthlySummary {
            month,
            grid_exchange: 0.0,
            renewable_max: 0.0,
            generation: 0.0,
            total_load: 0.0,
            curtailment: 0.0,
            thermal_output: 0.0,
            internal_load: 0.0,
            renewable_actual: 0.0,
            corrected_load: 0.0,
        })
        .collect();

    for hour in 0..HOURS_PER_YEAR {
        let entry = &mut months[month_for_hour(hour) as usize - 1];
        entry.grid_exchange += results.grid_exchange.get(hour);
        entry.renewable_max += results.pv_output.get(hour) + results.wind_output.get(hour);
        entry.generation += results.generation.get(hour);
        entry.total_load += results.total_load.get(hour);
        entry.curtailment += results.curtailment.get(hour);
        entry.thermal_output += results.thermal_output.get(hour);
        entry.internal_load += results.internal_load.get(hour);
        entry.renewable_actual += results.renewable_actual.get(hour);
        entry.corrected_load += results.corrected_load.get(hour);
    }

    months
}
