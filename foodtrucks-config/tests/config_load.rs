use foodtrucks_config::{FoodTrucksConfigLoader, NearbyScope};
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn test_config_load() {
    let tmp = TempDir::new().unwrap();

    let file_yaml = r#"
version: "1"
dataset:
  endpoint: "http://localhost:9000/trucks.json"
  available_limit: 5
geocoding:
  api_key: "${TEST_GOOGLE_MAPS_KEY}"
nearby:
  radius_km: 1.25
  scope: all
http:
  timeout_secs: 3
"#;
    let p = write_yaml(&tmp, "foodtrucks.yaml", file_yaml);

    temp_env::with_var("TEST_GOOGLE_MAPS_KEY", Some("maps-secret"), || {
        let config = FoodTrucksConfigLoader::new()
            .with_env_prefix("FOODTRUCKS_TEST_LOAD")
            .with_file(&p)
            .load()
            .expect("load config");

        assert_eq!(config.version.as_deref(), Some("1"));
        assert_eq!(config.dataset.endpoint, "http://localhost:9000/trucks.json");
        assert_eq!(config.dataset.available_limit, 5);
        assert_eq!(config.geocoding.api_key(), Some("maps-secret"));
        assert_eq!(config.nearby.radius_km, 1.25);
        assert_eq!(config.nearby.scope, NearbyScope::All);
        assert_eq!(config.http.timeout_secs, 3);
        assert_eq!(config.http.retries, 0);
    });
}

#[test]
#[serial]
fn env_overrides_file_values() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(
        &tmp,
        "foodtrucks.yaml",
        "nearby:\n  radius_km: 1.0\n  scope: available\n",
    );

    temp_env::with_vars(
        [
            ("FOODTRUCKS_TEST_ENV__NEARBY__RADIUS_KM", Some("3.5")),
            ("FOODTRUCKS_TEST_ENV__DATASET__AVAILABLE_LIMIT", Some("20")),
        ],
        || {
            let config = FoodTrucksConfigLoader::new()
                .with_env_prefix("FOODTRUCKS_TEST_ENV")
                .with_file(&p)
                .load()
                .expect("load config");

            assert_eq!(config.nearby.radius_km, 3.5);
            assert_eq!(config.nearby.scope, NearbyScope::Available);
            assert_eq!(config.dataset.available_limit, 20);
        },
    );
}

#[test]
#[serial]
fn missing_optional_file_falls_back_to_defaults() {
    let tmp = TempDir::new().unwrap();
    let config = FoodTrucksConfigLoader::new()
        .with_env_prefix("FOODTRUCKS_TEST_OPTIONAL")
        .with_optional_file(tmp.path().join("absent.yaml"))
        .load()
        .expect("defaults");

    assert_eq!(
        config.dataset.endpoint,
        foodtrucks_config::DEFAULT_DATASET_ENDPOINT
    );
    assert_eq!(config.geocoding.api_key(), None);
}

#[test]
#[serial]
fn missing_required_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let result = FoodTrucksConfigLoader::new()
        .with_env_prefix("FOODTRUCKS_TEST_REQUIRED")
        .with_file(tmp.path().join("absent.yaml"))
        .load();

    assert!(result.is_err());
}
