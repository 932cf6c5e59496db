//! Pure power-curve functions mapping resource availability to electric power.
//!
//! All outputs are in kW. None of these functions apply schedule modifiers;
//! the balance calculator layers curtailment and commissioning effects on top.
use crate::equipment::{PvModel, PvParams, WindTurbineModel, WindTurbineParams};
use crate::model::ChpParams;

/// Power produced by a single wind turbine at the given wind speed.
///
/// The curve is piecewise:
///
/// * below cut-in or above cut-out the turbine produces nothing;
/// * between cut-in and rated wind speed output follows a quadratic ramp
///   `a·(v - cut_in)²` with `a` chosen so that rated power is reached exactly
///   at the rated wind speed;
/// * between rated and max-rated wind speed output is the rated power;
/// * between max-rated and cut-out wind speed output decays linearly to zero.
///
/// The result is scaled by `correction_factor`. Callers must validate the
/// speed ordering `cut_in < rated < max_rated < cut_out` beforehand; this
/// function does not check it.
pub fn wind_power(wind_speed: f64, params: &WindTurbineParams, correction_factor: f64) -> f64 {
    if wind_speed < params.cut_in_wind || wind_speed > params.cut_out_wind {
        0.0
    } else if wind_speed < params.rated_wind {
        let a = params.rated_power / (params.rated_wind - params.cut_in_wind).powi(2);
        a * (wind_speed - params.cut_in_wind).powi(2) * correction_factor
    } else if wind_speed < params.max_rated_wind {
        params.rated_power * correction_factor
    } else {
        let slope = params.rated_power / (params.cut_out_wind - params.max_rated_wind);
        (params.rated_power - slope * (wind_speed - params.max_rated_wind)) * correction_factor
    }
}

/// Total power produced by the whole wind fleet at the given wind speed
pub fn total_wind_power(wind_speed: f64, models: &[WindTurbineModel]) -> f64 {
    models
        .iter()
        .map(|model| {
            wind_power(wind_speed, &model.params, model.output_correction_factor)
                * model.count as f64
        })
        .sum()
}

/// Power produced by one unit of a PV model at the given irradiance (W/m²)
pub fn pv_power(irradiance: f64, model: &PvModel) -> f64 {
    let power = match model.params {
        PvParams::AreaEfficiency {
            panel_area,
            panel_efficiency,
        } => panel_area * irradiance * panel_efficiency / 1000.0,
        PvParams::InstalledCapacity {
            installed_capacity,
            system_efficiency,
        } => irradiance / 1000.0 * installed_capacity * system_efficiency,
    };

    power * model.output_correction_factor
}

/// Total power produced by the whole PV fleet at the given irradiance
pub fn total_pv_power(irradiance: f64, models: &[PvModel]) -> f64 {
    models
        .iter()
        .map(|model| pv_power(irradiance, model) * model.count as f64)
        .sum()
}

/// Electric power of the combined-heat-and-power unit for a given heat load.
///
/// CHP electric output is driven by heat demand through a fixed ratio on top
/// of a base output.
pub fn chp_electric_power(heat_load: f64, params: &ChpParams) -> f64 {
    params.base_electric + heat_load * params.electric_heat_ratio
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equipment::default_correction_factor;
    use crate::fixture::{pv_model, wind_model};
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[rstest]
    fn test_wind_curve_boundaries(wind_model: WindTurbineModel) {
        let params = &wind_model.params;

        // Zero at cut-in and cut-out, rated power on both sides of the rated speed
        assert_approx_eq!(f64, wind_power(params.cut_in_wind, params, 1.0), 0.0);
        assert_approx_eq!(f64, wind_power(params.cut_out_wind, params, 1.0), 0.0);
        assert_approx_eq!(
            f64,
            wind_power(params.rated_wind - 1e-9, params, 1.0),
            params.rated_power,
            epsilon = 1e-3
        );
        assert_approx_eq!(
            f64,
            wind_power(params.rated_wind, params, 1.0),
            params.rated_power
        );
    }

    #[rstest]
    #[case(2.9, 0.0)] // below cut-in
    #[case(25.1, 0.0)] // above cut-out
    #[case(15.0, 2000.0)] // rated plateau
    #[case(21.5, 1000.0)] // halfway down the linear decay
    fn test_wind_curve_segments(
        wind_model: WindTurbineModel,
        #[case] speed: f64,
        #[case] expected: f64,
    ) {
        assert_approx_eq!(f64, wind_power(speed, &wind_model.params, 1.0), expected);
    }

    #[rstest]
    fn test_wind_correction_factor_scales_linearly(wind_model: WindTurbineModel) {
        let half = wind_power(7.0, &wind_model.params, 0.5);
        let full = wind_power(7.0, &wind_model.params, 1.0);
        assert_approx_eq!(f64, half * 2.0, full);
    }

    #[rstest]
    fn test_total_wind_power_sums_over_counts(wind_model: WindTurbineModel) {
        let mut fleet = wind_model.clone();
        fleet.count = 3;
        assert_approx_eq!(f64, total_wind_power(15.0, &[fleet]), 6000.0);
    }

    #[rstest]
    fn test_pv_power_is_linear_in_irradiance(pv_model: PvModel) {
        let single = pv_power(350.0, &pv_model);
        let double = pv_power(700.0, &pv_model);
        assert_approx_eq!(f64, double, 2.0 * single);
    }

    #[rstest]
    fn test_pv_power_area_efficiency(pv_model: PvModel) {
        // 1000 m² * 500 W/m² * 0.2 / 1000 = 100 kW
        assert_approx_eq!(f64, pv_power(500.0, &pv_model), 100.0);
    }

    #[test]
    fn test_pv_power_installed_capacity() {
        let model = PvModel {
            name: "pv2".into(),
            params: PvParams::InstalledCapacity {
                installed_capacity: 200.0,
                system_efficiency: 0.9,
            },
            count: 1,
            output_correction_factor: default_correction_factor(),
        };

        // 500/1000 * 200 * 0.9 = 90 kW
        assert_approx_eq!(f64, pv_power(500.0, &model), 90.0);
    }

    #[test]
    fn test_chp_electric_power() {
        let params = ChpParams {
            electric_heat_ratio: 0.5,
            base_electric: 100.0,
        };
        assert_approx_eq!(f64, chp_electric_power(400.0, &params), 300.0);
    }
}
