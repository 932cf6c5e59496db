//! Fixtures for tests
use crate::equipment::{PvModel, PvParams, WindTurbineModel, WindTurbineParams};
use crate::model::{ChpParams, FlexibleLoadParams, Model, OptimizationParams, PeakUnitParams};
use crate::schedule::ScheduleSet;
use crate::series::HourlySeries;
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

#[fixture]
pub fn wind_model() -> WindTurbineModel {
    WindTurbineModel {
        name: "turbine1".into(),
        params: WindTurbineParams {
            cut_in_wind: 3.0,
            rated_wind: 12.0,
            max_rated_wind: 18.0,
            cut_out_wind: 25.0,
            rated_power: 2000.0,
        },
        count: 1,
        output_correction_factor: 1.0,
    }
}

#[fixture]
pub fn pv_model() -> PvModel {
    PvModel {
        name: "pv1".into(),
        params: PvParams::AreaEfficiency {
            panel_area: 1000.0,
            panel_efficiency: 0.2,
        },
        count: 1,
        output_correction_factor: 1.0,
    }
}

/// A valid model with flat hourly profiles and no schedules
#[fixture]
pub fn model(wind_model: WindTurbineModel, pv_model: PvModel) -> Model {
    Model {
        electric_load: HourlySeries::constant(1000.0),
        heat_load: HourlySeries::constant(400.0),
        solar_irradiance: HourlySeries::constant(500.0),
        wind_speed: HourlySeries::constant(15.0),
        grid_purchase_price: HourlySeries::constant(0.5),
        internal_electric_rate: 0.05,
        wind_turbine_models: vec![wind_model],
        pv_models: vec![pv_model],
        chp: ChpParams {
            electric_heat_ratio: 0.5,
            base_electric: 100.0,
        },
        peak_unit: PeakUnitParams {
            max_power: 2000.0,
            min_power_summer: 0.0,
            min_power_winter: 0.0,
        },
        flexible_load: FlexibleLoadParams {
            min_load: 0.0,
            max_load: 0.0,
        },
        optimization: OptimizationParams {
            basic_load_revenue: 1.0,
            flexible_load_revenue: 0.8,
            thermal_cost: 0.2,
            pv_cost: 0.05,
            wind_cost: 0.05,
            min_grid_load: 0.0,
        },
        maintenance: ScheduleSet::new(),
        commissioning: ScheduleSet::new(),
        output_limits: ScheduleSet::new(),
    }
}
