use config::{Config, File};
use engine::settings::{Environment, LogLevel, Settings};
use maritime_core::RealismLevel;
use std::time::Duration;

fn load(name: &str) -> Settings {
    Config::builder()
        .add_source(File::with_name(&format!("config/{name}")))
        .set_override("environment", "Test")
        .unwrap()
        .build()
        .unwrap()
        .try_deserialize()
        .unwrap()
}

#[test]
fn test_local_settings_describe_a_valid_scenario() {
    let settings = load("local");

    assert_eq!(settings.environment, Environment::Test);
    assert_eq!(settings.log_level, LogLevel::Info);
    assert_eq!(settings.cache.ttl, Some(Duration::from_secs(3_600)));
    assert_eq!(settings.scenario.realism_level, RealismLevel::Standard);
    settings.scenario.validate().unwrap();
}

#[test]
fn test_omitted_scenario_flags_use_defaults() {
    let settings = load("test");

    assert!(settings.scenario.seasonal_modeling);
    assert!(settings.scenario.route_optimization);
    assert!(!settings.scenario.uncertainty_quantification);
    assert_eq!(settings.cache.ttl, None);
}
