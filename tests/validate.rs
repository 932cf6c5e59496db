//! Integration tests for the `validate` command.
use enbal::commands::handle_validate_command;
use enbal::log::is_logger_initialised;
use std::fs::File;
use std::io::Write;
use tempfile::tempdir;

/// An integration test for the `validate` command.
///
/// We also check that the logger is initialised after it is run.
#[test]
fn test_handle_validate_command() {
    std::env::set_var("ENBAL_LOG_LEVEL", "off");

    assert!(!is_logger_initialised());

    let model_dir = tempdir().unwrap();
    {
        let mut file = File::create(model_dir.path().join("model.toml")).unwrap();
        write!(
            file,
            r#"
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
"#
        )
        .unwrap();
    }

    handle_validate_command(model_dir.path(), None).unwrap();

    assert!(is_logger_initialised());
}
