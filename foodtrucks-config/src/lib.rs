//! Loader for workspace configuration with YAML + environment overlays.
//!
//! Sources are merged in order: an optional or required YAML file, inline
//! YAML snippets, then `FOODTRUCKS__SECTION__KEY` environment variables.
//! String values may reference `${VAR}`; those are expanded after merging.
//! Every key has a default, so an empty configuration is valid and points
//! at the public San Francisco dataset and the Google geocoding API.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const CONFIG_FILE_NAME: &str = "foodtrucks.yaml";

pub const DEFAULT_DATASET_ENDPOINT: &str = "https://data.sfgov.org/resource/rqzj-sfat.json";
pub const DEFAULT_GEOCODING_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/geocode/json";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FoodTrucksConfig {
    pub version: Option<String>,
    pub dataset: DatasetConfig,
    pub geocoding: GeocodingConfig,
    pub nearby: NearbyConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub endpoint: String,
    /// How many leading records make up the "available trucks" list.
    pub available_limit: usize,
    /// Socrata application token, sent as `X-App-Token` when set.
    app_token: Option<String>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_DATASET_ENDPOINT.into(),
            available_limit: 10,
            app_token: None,
        }
    }
}

impl DatasetConfig {
    pub fn app_token(&self) -> Option<&str> {
        configured_secret(self.app_token.as_deref())
    }
}

/// A secret counts as unset when it is blank or still an unexpanded `${VAR}`.
fn configured_secret(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim)
        .filter(|k| !k.is_empty() && !k.starts_with("${"))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeocodingConfig {
    pub endpoint: String,
    api_key: Option<String>,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_GEOCODING_ENDPOINT.into(),
            api_key: None,
        }
    }
}

impl GeocodingConfig {
    /// The configured key, or `None` when it is blank or still an unexpanded `${VAR}`.
    pub fn api_key(&self) -> Option<&str> {
        configured_secret(self.api_key.as_deref())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NearbyScope {
    /// Only the first `available_limit` records.
    #[default]
    Available,
    /// Every record the dataset returned.
    All,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NearbyConfig {
    pub radius_km: f64,
    pub scope: NearbyScope,
}

impl Default for NearbyConfig {
    fn default() -> Self {
        Self {
            radius_km: 2.0,
            scope: NearbyScope::Available,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub retries: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            retries: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: Option<PathBuf>,
    pub format: String,
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: None,
            format: "text".into(),
            filter: "info".into(),
        }
    }
}

/// First existing config file among `./foodtrucks.yaml` and
/// `<config dir>/foodtrucks/foodtrucks.yaml`.
pub fn default_config_path() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }
    dirs::config_dir()
        .map(|dir| dir.join("foodtrucks").join(CONFIG_FILE_NAME))
        .filter(|p| p.is_file())
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct FoodTrucksConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: String,
}

impl Default for FoodTrucksConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl FoodTrucksConfigLoader {
    /// Start with no file sources; `FOODTRUCKS__` env overrides are applied last.
    ///
    /// ```
    /// use foodtrucks_config::FoodTrucksConfigLoader;
    ///
    /// let config = FoodTrucksConfigLoader::new()
    ///     .with_yaml_str("version: '1'")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.version.as_deref(), Some("1"));
    /// assert_eq!(config.dataset.available_limit, 10);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
            env_prefix: "FOODTRUCKS".into(),
        }
    }

    /// Use a different environment prefix (tests isolate themselves this way).
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = prefix.to_string();
        self
    }

    /// Attach a YAML/TOML/JSON file that must exist; format is inferred by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is skipped when missing.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use foodtrucks_config::{FoodTrucksConfigLoader, NearbyScope};
    ///
    /// let cfg = FoodTrucksConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// nearby:
    ///   radius_km: 0.5
    ///   scope: all
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.nearby.radius_km, 0.5);
    /// assert_eq!(cfg.nearby.scope, NearbyScope::All);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly typed config.
    ///
    /// ```
    /// use foodtrucks_config::FoodTrucksConfigLoader;
    ///
    /// unsafe { std::env::set_var("DOCTEST_MAPS_KEY", "injected-from-env"); }
    ///
    /// let config = FoodTrucksConfigLoader::new()
    ///     .with_yaml_str(r#"
    /// geocoding:
    ///   api_key: "${DOCTEST_MAPS_KEY}"
    /// "#)
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.geocoding.api_key(), Some("injected-from-env"));
    /// assert_eq!(config.geocoding.endpoint, foodtrucks_config::DEFAULT_GEOCODING_ENDPOINT);
    ///
    /// unsafe { std::env::remove_var("DOCTEST_MAPS_KEY"); }
    /// ```
    pub fn load(self) -> Result<FoodTrucksConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(&self.env_prefix)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: FoodTrucksConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok(typed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_simple_string() {
        temp_env::with_var("FOO", Some("bar"), || {
            let mut v = json!("prefix-${FOO}-suffix");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("prefix-bar-suffix"));
        });
    }

    #[test]
    fn expands_in_array_and_object() {
        temp_env::with_vars([("CITY", Some("Oakland")), ("STATE", Some("CA"))], || {
            let mut v = json!([
                "hello-$CITY",
                { "loc": "${CITY}-${STATE}" },
                42,
                true,
                null
            ]);
            expand_env_in_value(&mut v);
            assert_eq!(
                v,
                json!(["hello-Oakland", { "loc": "Oakland-CA" }, 42, true, null])
            );
        });
    }

    #[test]
    fn expands_recursively_across_env_values() {
        temp_env::with_vars(
            [
                ("BAZ", Some("qux")),
                ("BAR", Some("mid-${BAZ}")),
                ("FOO", Some("start-${BAR}-end")),
            ],
            || {
                let mut v = json!("X=${FOO}");
                expand_env_in_value(&mut v);
                assert_eq!(v, json!("X=start-mid-qux-end"));
            },
        );
    }

    #[test]
    fn stops_on_cycles() {
        temp_env::with_vars([("A", Some("${B}")), ("B", Some("${A}"))], || {
            let mut v = json!("x=${A}-y");
            expand_env_in_value(&mut v);
            let s = v.as_str().unwrap();
            assert!(s.starts_with("x=") && s.ends_with("-y"));
            assert!(s.contains("${"));
        });
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("hi-${DOES_NOT_EXIST}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("hi-${DOES_NOT_EXIST}"));
    }

    #[test]
    fn unexpanded_api_key_counts_as_unset() {
        let cfg: GeocodingConfig =
            serde_json::from_value(json!({ "api_key": "${NOT_SET_ANYWHERE}" })).unwrap();
        assert_eq!(cfg.api_key(), None);

        let cfg: GeocodingConfig = serde_json::from_value(json!({ "api_key": "  " })).unwrap();
        assert_eq!(cfg.api_key(), None);

        let cfg: GeocodingConfig =
            serde_json::from_value(json!({ "api_key": " abc123 " })).unwrap();
        assert_eq!(cfg.api_key(), Some("abc123"));
    }

    #[test]
    fn dataset_app_token_is_optional() {
        let cfg: DatasetConfig = serde_json::from_value(json!({ "app_token": " tok-1 " })).unwrap();
        assert_eq!(cfg.app_token(), Some("tok-1"));
        assert_eq!(cfg.available_limit, 10);

        let cfg: DatasetConfig =
            serde_json::from_value(json!({ "app_token": "${NOT_SET_ANYWHERE}" })).unwrap();
        assert_eq!(cfg.app_token(), None);
        assert_eq!(DatasetConfig::default().app_token(), None);
    }

    #[test]
    fn empty_sources_yield_defaults() {
        let cfg = FoodTrucksConfigLoader::new()
            .with_env_prefix("FOODTRUCKS_UNIT_EMPTY")
            .load()
            .unwrap();
        assert_eq!(cfg.dataset.endpoint, DEFAULT_DATASET_ENDPOINT);
        assert_eq!(cfg.dataset.available_limit, 10);
        assert_eq!(cfg.nearby.radius_km, 2.0);
        assert_eq!(cfg.nearby.scope, NearbyScope::Available);
        assert_eq!(cfg.http.retries, 0);
        assert_eq!(cfg.http.timeout_secs, 15);
        assert_eq!(cfg.logging.filter, "info");
    }
}
