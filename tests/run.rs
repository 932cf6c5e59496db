//! Integration tests for the `run` command.
use enbal::commands::{handle_run_command, RunOpts};
use std::fs::File;
use std::io::Write;
use std::path::Path;
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
count = 2

[[pv]]
name = "pv1"
method = "area_efficiency"
panel_area = 1000.0
panel_efficiency = 0.2
count = 1
"#;

/// Create a minimal model directory. Series files are omitted, which the
/// loader treats as all-zero series.
fn write_model(dir: &Path) {
    let mut file = File::create(dir.join("model.toml")).unwrap();
    write!(file, "{MODEL_TOML}").unwrap();
}

/// An integration test for the `run` command.
#[test]
fn test_handle_run_command() {
    std::env::set_var("ENBAL_LOG_LEVEL", "off");

    let model_dir = tempdir().unwrap();
    write_model(model_dir.path());

    {
        // Save results to non-existent directory to check that directory creation works
        let tempdir = tempdir().unwrap();
        let output_dir = tempdir.path().join("results");
        let opts = RunOpts {
            output_dir: Some(output_dir.clone()),
            optimize: true,
        };
        handle_run_command(model_dir.path(), &opts, None).unwrap();

        for file_name in [
            "hourly_balance.csv",
            "monthly_summary.csv",
            "annual_summary.csv",
            "optimized_loads.csv",
        ] {
            assert!(output_dir.join(file_name).is_file(), "missing {file_name}");
        }
    }

    // Second time will fail because the logging is already initialised
    let tempdir = tempdir().unwrap();
    let opts = RunOpts {
        output_dir: Some(tempdir.path().to_path_buf()),
        optimize: false,
    };
    assert_eq!(
        handle_run_command(model_dir.path(), &opts, None)
            .unwrap_err()
            .chain()
            .next()
            .unwrap()
            .to_string(),
        "Failed to initialise logging."
    );
}
