//! Per-hour optimisation of the basic/flexible load split over a completed
//! balance run.
//!
//! The heuristic compares unit revenues against generation costs when the
//! park is curtailing renewables, or against the hourly grid price when it is
//! importing, and pushes each load towards the profitable end of its range.
//! A minimum grid-import constraint is enforced by topping the loads up.
use crate::balance::{adjusted_peak_bounds, BalanceResult};
use crate::model::Model;
use crate::schedule::ScheduleEntry;
use crate::series::{HourlySeries, HOURS_PER_YEAR};
use log::info;

/// The optimised load split and its hourly revenue
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoadOptimization {
    /// Optimised basic load (kW)
    pub basic_load: HourlySeries,
    /// Optimised flexible load (kW)
    pub flexible_load: HourlySeries,
    /// Net revenue for the hour
    pub revenue: HourlySeries,
    /// Net revenue over the whole year
    pub total_revenue: f64,
}

/// Dispatch outcome for a candidate load level at one hour
struct Dispatch {
    thermal_output: f64,
    grid_exchange: f64,
}

/// Dispatch a candidate total load against fixed renewable/CHP output and the
/// hour's peak-unit bounds
fn dispatch(
    total_load: f64,
    chp_output: f64,
    renewable_output: f64,
    peak_max: f64,
    peak_min: f64,
) -> Dispatch {
    let peak_pending = total_load - chp_output - renewable_output;
    let peak_output = peak_pending.min(peak_max).max(peak_min);
    let thermal_output = chp_output + peak_output;
    let generation = renewable_output + thermal_output;

    Dispatch {
        thermal_output,
        grid_exchange: total_load - generation,
    }
}

/// Optimise the basic/flexible load split for every hour of a completed run.
///
/// The balance results supply the schedule-adjusted CHP, PV and wind outputs;
/// the peak-unit bounds are recomputed from the model's schedules the same way
/// the balance calculator does.
pub fn optimize_loads(model: &Model, results: &BalanceResult) -> LoadOptimization {
    let params = &model.optimization;
    let mut optimized = LoadOptimization::default();

    for hour in 0..HOURS_PER_YEAR {
        let maintenance: Vec<&ScheduleEntry> = model.maintenance.active_at(hour).collect();
        let commissioning: Vec<&ScheduleEntry> =
            model.commissioning.active_with_lead_in_at(hour).collect();
        let (peak_max, peak_min) = adjusted_peak_bounds(model, hour, &maintenance, &commissioning);

        let chp_output = results.chp_output.get(hour);
        let pv_output = results.pv_output.get(hour);
        let wind_output = results.wind_output.get(hour);
        let renewable_output = pv_output + wind_output;

        // Basic load ranges from the peak-unit floor up to the hour's
        // corrected load; flexible load within its configured bounds
        let max_basic = results.corrected_load.get(hour);
        let min_basic = peak_min;
        let min_flexible = model.flexible_load.min_load;
        let max_flexible = model.flexible_load.max_load;

        let clamp_basic = |load: f64| load.min(max_basic).max(min_basic);
        let clamp_flexible = |load: f64| load.min(max_flexible).max(min_flexible);

        // Whether the park is curtailing at the unoptimised operating point
        let current = dispatch(max_basic, chp_output, renewable_output, peak_max, peak_min);
        let curtailing = current.grid_exchange <= 0.0;

        let mut basic_load = clamp_basic(max_basic);
        let mut flexible_load = clamp_flexible(0.0);

        if curtailing {
            // Surplus renewables: raise any load whose revenue beats the
            // renewable generation costs
            if params.basic_load_revenue > params.pv_cost
                && params.basic_load_revenue > params.wind_cost
            {
                basic_load = clamp_basic(max_basic);
            }
            if params.flexible_load_revenue > params.pv_cost
                && params.flexible_load_revenue > params.wind_cost
            {
                flexible_load = clamp_flexible(max_flexible);
            }
        } else {
            // Importing: raise a load only when its revenue beats the price
            // of the energy bought to serve it
            let grid_price = model.grid_purchase_price.get(hour);
            basic_load = if params.basic_load_revenue > grid_price {
                clamp_basic(max_basic)
            } else {
                clamp_basic(min_basic)
            };
            flexible_load = if params.flexible_load_revenue > grid_price {
                clamp_flexible(max_flexible)
            } else {
                clamp_flexible(min_flexible)
            };
        }
        basic_load = basic_load.max(min_basic);

        // Enforce the minimum grid import by topping up basic load first,
        // spilling the remainder into flexible load
        let outcome = dispatch(
            basic_load + flexible_load,
            chp_output,
            renewable_output,
            peak_max,
            peak_min,
        );
        if outcome.grid_exchange < params.min_grid_load {
            let shortfall = params.min_grid_load - outcome.grid_exchange;
            let topped_up = basic_load + shortfall;
            if topped_up <= max_basic {
                basic_load = topped_up;
            } else {
                basic_load = max_basic;
                flexible_load = (flexible_load + topped_up - max_basic).min(max_flexible);
            }
        }

        let outcome = dispatch(
            basic_load + flexible_load,
            chp_output,
            renewable_output,
            peak_max,
            peak_min,
        );
        let mut revenue = basic_load * params.basic_load_revenue
            + flexible_load * params.flexible_load_revenue
            - outcome.thermal_output * params.thermal_cost
            - pv_output * params.pv_cost
            - wind_output * params.wind_cost;
        if outcome.grid_exchange > 0.0 {
            revenue -= outcome.grid_exchange * model.grid_purchase_price.get(hour);
        }

        optimized.basic_load.set(hour, basic_load);
        optimized.flexible_load.set(hour, flexible_load);
        optimized.revenue.set(hour, revenue);
    }

    optimized.total_revenue = optimized.revenue.sum();
    info!(
        "Load optimisation complete; total annual revenue: {:.2}",
        optimized.total_revenue
    );

    optimized
}
