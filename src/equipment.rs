//! Generating equipment installed in the park: wind turbine and PV models.
//!
//! Each model entry describes one piece of equipment plus a unit count; the
//! fleet output for an hour is the sum over models of per-unit power times
//! count. The power curves themselves live in [`crate::power`].
use serde::Deserialize;

/// Default output correction factor for new equipment entries
pub fn default_correction_factor() -> f64 {
    1.0
}

/// Power-curve parameters for a wind turbine model.
///
/// Validation (see [`crate::model::Model::validate`]) requires
/// `cut_in_wind < rated_wind < max_rated_wind < cut_out_wind`; the power curve
/// produces meaningless results otherwise.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WindTurbineParams {
    /// Wind speed below which the turbine produces nothing (m/s)
    pub cut_in_wind: f64,
    /// Wind speed at which rated power is reached (m/s)
    pub rated_wind: f64,
    /// Wind speed up to which rated power is sustained (m/s)
    pub max_rated_wind: f64,
    /// Wind speed above which the turbine shuts down (m/s)
    pub cut_out_wind: f64,
    /// Rated power per turbine (kW)
    pub rated_power: f64,
}

/// A wind turbine model installed in the park
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WindTurbineModel {
    /// Display name for the model (not necessarily unique)
    pub name: String,
    /// Power-curve parameters
    #[serde(flatten)]
    pub params: WindTurbineParams,
    /// Number of installed units
    pub count: u32,
    /// Linear scaling applied to the computed per-unit power
    #[serde(default = "default_correction_factor")]
    pub output_correction_factor: f64,
}

impl WindTurbineModel {
    /// Installed capacity for this model: rated power times unit count (kW)
    pub fn installed_capacity(&self) -> f64 {
        self.params.rated_power * self.count as f64
    }
}

/// How a PV model's output is derived from irradiance
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PvParams {
    /// Output from panel area and efficiency
    AreaEfficiency {
        /// Total panel area per unit (m²)
        panel_area: f64,
        /// Panel conversion efficiency (0-1)
        panel_efficiency: f64,
    },
    /// Output from installed capacity and system efficiency
    InstalledCapacity {
        /// Installed capacity per unit (kW)
        installed_capacity: f64,
        /// Overall system efficiency (0-1)
        system_efficiency: f64,
    },
}

/// A PV model installed in the park
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PvModel {
    /// Display name for the model (not necessarily unique)
    pub name: String,
    /// Calculation method and its parameters
    #[serde(flatten)]
    pub params: PvParams,
    /// Number of installed units
    pub count: u32,
    /// Linear scaling applied to the computed per-unit power
    #[serde(default = "default_correction_factor")]
    pub output_correction_factor: f64,
}

impl PvModel {
    /// Installed capacity for this model (kW)
    ///
    /// For the area-efficiency method this is area times efficiency per unit;
    /// for the installed-capacity method it is the configured capacity.
    pub fn installed_capacity(&self) -> f64 {
        let per_unit = match self.params {
            PvParams::AreaEfficiency {
                panel_area,
                panel_efficiency,
            } => panel_area * panel_efficiency,
            PvParams::InstalledCapacity {
                installed_capacity, ..
            } => installed_capacity,
        };

        per_unit * self.count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{pv_model, wind_model};
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[rstest]
    fn test_wind_installed_capacity(wind_model: WindTurbineModel) {
        assert_approx_eq!(f64, wind_model.installed_capacity(), 2000.0);
    }

    #[rstest]
    fn test_pv_installed_capacity(pv_model: PvModel) {
        // 1000 m² at 20% efficiency, one unit
        assert_approx_eq!(f64, pv_model.installed_capacity(), 200.0);
    }

    #[test]
    fn test_pv_params_unknown_method_rejected() {
        let toml = r#"
            name = "pv1"
            method = "guesswork"
            panel_area = 1000.0
            panel_efficiency = 0.2
            count = 1
        "#;
        assert!(toml::from_str::<PvModel>(toml).is_err());
    }
}
