//! The annual balance calculator: an 8760-hour loop of per-hour iterative
//! dispatch.
//!
//! Each hour is solved independently against an immutable snapshot of the
//! model. Auxiliary (station-service) load depends on thermal output, which in
//! turn depends on total load, so the dispatch is an implicit fixed point
//! solved by iteration.
use crate::calendar::{is_summer, month_for_hour};
use crate::model::{FlexibleLoadParams, Model};
use crate::power::{total_pv_power, total_wind_power};
use crate::schedule::{EffectType, OutputLimitType, ScheduleEntry};
use crate::series::{HourlySeries, HOURS_PER_YEAR};
use log::warn;

/// Safety bound on fixed-point rounds per hour
pub const MAX_ITERATIONS: usize = 10;

/// Convergence tolerance on total load between rounds (kW)
pub const CONVERGENCE_TOLERANCE: f64 = 1e-6;

/// The hourly series produced by one full balance run.
///
/// All series are parallel (one value per hour) and immutable once returned;
/// a new run recomputes everything from scratch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BalanceResult {
    /// Auxiliary load consumed by the thermal units (kW)
    pub internal_load: HourlySeries,
    /// Corrected electric load plus auxiliary load (kW)
    pub total_load: HourlySeries,
    /// CHP electric output (kW)
    pub chp_output: HourlySeries,
    /// Maximum available PV output after limits and commissioning (kW)
    pub pv_output: HourlySeries,
    /// Maximum available wind output after limits and commissioning (kW)
    pub wind_output: HourlySeries,
    /// Residual load left for the peaking unit before clamping (kW)
    pub peak_pending: HourlySeries,
    /// Peaking unit output after clamping to its bounds (kW)
    pub peak_output: HourlySeries,
    /// Total thermal output: CHP plus peaking unit (kW)
    pub thermal_output: HourlySeries,
    /// Total generation net of curtailment (kW)
    pub generation: HourlySeries,
    /// Renewable output curtailed after flexible-load absorption (kW)
    pub curtailment: HourlySeries,
    /// Renewable output actually delivered (kW)
    pub renewable_actual: HourlySeries,
    /// Net grid exchange: positive imports, negative exports (kW)
    pub grid_exchange: HourlySeries,
    /// Curtailed share of maximum renewable output (0-1)
    pub curtailment_rate: HourlySeries,
    /// Electric load after maintenance/commissioning correction (kW)
    pub corrected_load: HourlySeries,
    /// Curtailment absorbed by the flexible load (kW)
    pub flexible_absorption: HourlySeries,
}

/// Peak-unit bounds for one hour after applying active schedules.
///
/// Maintenance outages reduce the maximum cumulatively and rescale the
/// seasonal minimum in proportion to the remaining maximum. Commissioning
/// entries ramp the maximum up towards its target as the window progresses,
/// and ramp minimum-output floors down from the original seasonal value.
///
/// Returns `(max, min)`.
pub(crate) fn adjusted_peak_bounds(
    model: &Model,
    hour: usize,
    maintenance: &[&ScheduleEntry],
    commissioning: &[&ScheduleEntry],
) -> (f64, f64) {
    let month = month_for_hour(hour);
    let original_max = model.peak_unit.max_power;
    let mut current_max = original_max;
    let mut current_min = model.peak_unit.seasonal_min(month);

    for entry in maintenance {
        if entry.effect == EffectType::PeakUnitOutput {
            current_max -= entry.power_size;
            if original_max > 0.0 {
                current_min = model.peak_unit.seasonal_min(month) * (current_max / original_max);
            }
        }
    }

    for entry in commissioning {
        let factor = entry.interpolation_factor(hour);
        match entry.effect {
            EffectType::PeakUnitMax => {
                current_max -= entry.power_size * (1.0 - factor);
            }
            EffectType::PeakUnitMinSummer => {
                if is_summer(month) {
                    current_min = model.peak_unit.min_power_summer - entry.power_size * factor;
                }
            }
            EffectType::PeakUnitMinWinter => {
                if !is_summer(month) {
                    current_min = model.peak_unit.min_power_winter - entry.power_size * factor;
                }
            }
            EffectType::PeakUnitMin => {
                current_min = model.peak_unit.seasonal_min(month) - entry.power_size * factor;
            }
            _ => {}
        }
    }

    (current_max, current_min)
}

/// The hour's electric load corrected for active maintenance and
/// commissioning entries, scaled proportionally against the annual peak
fn corrected_electric_load(
    model: &Model,
    hour: usize,
    max_load: f64,
    maintenance: &[&ScheduleEntry],
    commissioning: &[&ScheduleEntry],
) -> f64 {
    let raw_load = model.electric_load.get(hour);
    if max_load <= 0.0 {
        return raw_load;
    }

    let maintenance_reduction: f64 = maintenance
        .iter()
        .filter(|entry| entry.effect == EffectType::ElectricLoad)
        .map(|entry| entry.power_size)
        .sum();
    let commissioning_reduction: f64 = commissioning
        .iter()
        .filter(|entry| entry.effect == EffectType::ElectricLoad)
        .map(|entry| entry.residual_impact(hour))
        .sum();

    raw_load / max_load * (max_load - maintenance_reduction - commissioning_reduction)
}

/// Total remaining capacity deficit from commissioning entries of one effect
/// type that have not yet completed their ramp
fn commissioning_deficit(commissioning: &[&ScheduleEntry], hour: usize, effect: EffectType) -> f64 {
    commissioning
        .iter()
        .filter(|entry| entry.effect == effect)
        .filter(|entry| entry.interpolation_factor(hour) < 1.0)
        .map(|entry| entry.residual_impact(hour))
        .sum()
}

/// Clip a renewable source's raw output to its active ceiling, then scale it
/// by the share of installed capacity not held back by commissioning ramps
fn schedule_adjusted_output(raw: f64, limit: Option<f64>, deficit: f64, capacity: f64) -> f64 {
    let mut output = raw;
    if let Some(limit) = limit {
        output = output.min(limit);
    }
    if capacity > 0.0 {
        output *= (capacity - deficit) / capacity;
    }

    output
}

/// Curtailment absorbed by the flexible load under the three-band policy:
/// nothing below the activation threshold, everything up to the maximum,
/// capped at the maximum beyond it
pub fn flexible_absorption(curtailment: f64, params: &FlexibleLoadParams) -> f64 {
    if curtailment >= params.min_load {
        curtailment.min(params.max_load)
    } else {
        0.0
    }
}

/// Run the full annual balance: iterate hours 0..8759 and solve the per-hour
/// dispatch for each.
///
/// The calculator never fails: malformed schedule dates are inactive and
/// numeric edge cases fall back to zero. Hours whose fixed-point iteration
/// hits the round cap keep the last iterate; they are counted and reported
/// once per run as a warning.
pub fn run_annual_balance(model: &Model) -> BalanceResult {
    let mut results = BalanceResult::default();

    // Snapshot of values every hour reads unchanged
    let max_load = model.electric_load.max();
    let pv_capacity = model.pv_total_capacity();
    let wind_capacity = model.wind_total_capacity();

    let mut unconverged_hours: u32 = 0;

    for hour in 0..HOURS_PER_YEAR {
        let maintenance: Vec<&ScheduleEntry> = model.maintenance.active_at(hour).collect();
        let commissioning: Vec<&ScheduleEntry> =
            model.commissioning.active_with_lead_in_at(hour).collect();

        let (peak_max, peak_min) = adjusted_peak_bounds(model, hour, &maintenance, &commissioning);
        let corrected_load =
            corrected_electric_load(model, hour, max_load, &maintenance, &commissioning);

        let mut internal_load = corrected_load * model.internal_electric_rate;
        let mut total_load = corrected_load + internal_load;

        let mut chp_output = 0.0;
        let mut pv_output = 0.0;
        let mut wind_output = 0.0;
        let mut peak_pending = 0.0;
        let mut peak_output = 0.0;
        let mut thermal_output = 0.0;
        let mut converged = false;

        for _ in 0..MAX_ITERATIONS {
            let prev_total_load = total_load;

            chp_output = model.heat_load.get(hour) * model.chp.electric_heat_ratio;

            pv_output = schedule_adjusted_output(
                total_pv_power(model.solar_irradiance.get(hour), &model.pv_models),
                model
                    .output_limits
                    .effective_limit(hour, OutputLimitType::PvMax),
                commissioning_deficit(&commissioning, hour, EffectType::PvOutput),
                pv_capacity,
            );
            wind_output = schedule_adjusted_output(
                total_wind_power(model.wind_speed.get(hour), &model.wind_turbine_models),
                model
                    .output_limits
                    .effective_limit(hour, OutputLimitType::WindMax),
                commissioning_deficit(&commissioning, hour, EffectType::WindOutput),
                wind_capacity,
            );

            peak_pending = total_load - chp_output - pv_output - wind_output;
            // Cap above first, then floor below; the order matters if
            // schedule overlaps transiently push the floor above the cap
            peak_output = peak_pending.min(peak_max).max(peak_min);
            thermal_output = chp_output + peak_output;

            internal_load = thermal_output * model.internal_electric_rate;
            total_load = corrected_load + internal_load;

            if (total_load - prev_total_load).abs() < CONVERGENCE_TOLERANCE {
                converged = true;
                break;
            }
        }
        if !converged {
            unconverged_hours += 1;
        }

        let raw_curtailment = (peak_min - peak_pending).max(0.0);
        let absorbed = flexible_absorption(raw_curtailment, &model.flexible_load);
        let curtailment = (raw_curtailment - absorbed).max(0.0);

        let renewable_max = pv_output + wind_output;
        let renewable_actual = renewable_max - curtailment;
        let generation = renewable_max + thermal_output - curtailment;
        let curtailment_rate = if renewable_max > 0.0 {
            curtailment / renewable_max
        } else {
            0.0
        };
        let grid_exchange = total_load + absorbed - generation;

        results.internal_load.set(hour, internal_load);
        results.total_load.set(hour, total_load);
        results.chp_output.set(hour, chp_output);
        results.pv_output.set(hour, pv_output);
        results.wind_output.set(hour, wind_output);
        results.peak_pending.set(hour, peak_pending);
        results.peak_output.set(hour, peak_output);
        results.thermal_output.set(hour, thermal_output);
        results.generation.set(hour, generation);
        results.curtailment.set(hour, curtailment);
        results.renewable_actual.set(hour, renewable_actual);
        results.grid_exchange.set(hour, grid_exchange);
        results.curtailment_rate.set(hour, curtailment_rate);
        results.corrected_load.set(hour, corrected_load);
        results.flexible_absorption.set(hour, absorbed);
    }

    if unconverged_hours > 0 {
        warn!(
            "Fixed-point iteration hit the {MAX_ITERATIONS}-round cap for {unconverged_hours} \
             hour(s); last iterates were used"
        );
    }

    results
}
