//! Layered configuration lookup
//!
//! A value is looked up in this order, the first hit winning:
//!
//! 1. `ionic<key>` query parameter (`"true"`/`"false"` become booleans)
//! 2. user value for an active platform (`platforms.<name>.<key>`)
//! 3. user top-level value
//! 4. mode config named by an active platform's user `mode`
//! 5. mode config named by the user's top-level `mode`
//! 6. registry setting of an active platform
//! 7. mode config named by an active platform's registry `mode`
//!
//! Within steps 2, 4, 6 and 7 later (more specific) platforms in the
//! resolved chain override earlier ones.

use std::fs;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde_json::{Map, Value};
use skiff_platform::{Platform, QueryParams};

use crate::error::{ConfigError, Result};
use crate::mode::default_modes;

/// Prefix of query parameters overriding config keys
pub const QUERY_PREFIX: &str = "ionic";

/// Key holding per-platform user overrides
const PLATFORMS_KEY: &str = "platforms";

/// Key selecting a mode config
const MODE_KEY: &str = "mode";

/// App configuration resolved against the running platform
#[derive(Clone, Debug, Default)]
pub struct Config {
    settings: Map<String, Value>,
    modes: FxHashMap<String, Map<String, Value>>,
    platforms: Vec<String>,
    platform_settings: FxHashMap<String, Map<String, Value>>,
    query: QueryParams,
}

impl Config {
    /// Create a config from user settings
    ///
    /// Anything other than an object is treated as empty.
    pub fn new(user_config: Value) -> Self {
        let settings = match user_config {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                tracing::warn!("ignoring non-object user config: {}", other);
                Map::new()
            }
        };
        Self {
            settings,
            ..Default::default()
        }
    }

    /// Parse user settings from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(text)?;
        let value = serde_json::to_value(table)?;
        match value {
            Value::Object(_) => Ok(Self::new(value)),
            other => Err(ConfigError::NotATable(other.to_string())),
        }
    }

    /// Read user settings from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("loaded config from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Snapshot the resolved platform
    ///
    /// Registry settings of the active platforms are evaluated here, so
    /// computed settings see the fully resolved platform.
    pub fn init(&mut self, plt: &Platform) {
        self.platforms = plt.platforms().to_vec();
        self.query = plt.query_params().clone();
        self.platform_settings.clear();

        for name in &self.platforms {
            let Some(config) = plt.get_platform_config(name) else {
                continue;
            };
            let resolved: Map<String, Value> = config
                .settings
                .iter()
                .map(|(key, setting)| (key.clone(), setting.resolve(plt)))
                .collect();
            self.platform_settings.insert(name.clone(), resolved);
        }
    }

    /// Look up a value
    pub fn get(&self, key: &str) -> Option<Value> {
        if let Some(value) = self.query_override(key) {
            return Some(value);
        }

        let mut user_platform_value = None;
        let mut user_platform_mode_value = None;
        let mut platform_value = None;
        let mut platform_mode_value = None;

        let user_platforms = self.settings.get(PLATFORMS_KEY).and_then(Value::as_object);

        for name in &self.platforms {
            if let Some(user) = user_platforms
                .and_then(|p| p.get(name))
                .and_then(Value::as_object)
            {
                if let Some(value) = user.get(key) {
                    user_platform_value = Some(value);
                }
                if let Some(value) = self.mode_value(user.get(MODE_KEY), key) {
                    user_platform_mode_value = Some(value);
                }
            }

            if let Some(settings) = self.platform_settings.get(name) {
                if let Some(value) = settings.get(key) {
                    platform_value = Some(value);
                }
                if let Some(value) = self.mode_value(settings.get(MODE_KEY), key) {
                    platform_mode_value = Some(value);
                }
            }
        }

        let user_default_value = self.settings.get(key);
        let user_default_mode_value = self.mode_value(self.settings.get(MODE_KEY), key);

        user_platform_value
            .or(user_default_value)
            .or(user_platform_mode_value)
            .or(user_default_mode_value)
            .or(platform_value)
            .or(platform_mode_value)
            .filter(|value| !value.is_null())
            .cloned()
    }

    /// Look up a value, falling back when it is unset
    pub fn get_or(&self, key: &str, fallback: Value) -> Value {
        self.get(key).unwrap_or(fallback)
    }

    /// Look up a boolean
    ///
    /// Strings count as true only when they read `"true"`; numbers when
    /// non-zero; arrays and objects always.
    pub fn get_bool(&self, key: &str, fallback: bool) -> bool {
        match self.get(key) {
            None => fallback,
            Some(Value::Bool(b)) => b,
            Some(Value::String(s)) => s == "true",
            Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
            Some(Value::Null) => false,
            Some(Value::Array(_)) | Some(Value::Object(_)) => true,
        }
    }

    /// Look up a number; numeric strings are parsed
    pub fn get_number(&self, key: &str, fallback: f64) -> f64 {
        let number = match self.get(key) {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        number.filter(|n| !n.is_nan()).unwrap_or(fallback)
    }

    /// Set a top-level user value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.settings.insert(key.into(), value.into());
    }

    /// Set a user value for one platform
    pub fn set_platform(
        &mut self,
        platform: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) {
        let platforms = self
            .settings
            .entry(PLATFORMS_KEY)
            .or_insert_with(|| Value::Object(Map::new()));
        if !platforms.is_object() {
            *platforms = Value::Object(Map::new());
        }
        let Value::Object(platforms) = platforms else {
            return;
        };

        let entry = platforms
            .entry(platform.into())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        if let Value::Object(entry) = entry {
            entry.insert(key.into(), value.into());
        }
    }

    /// The raw user settings
    pub fn settings(&self) -> &Map<String, Value> {
        &self.settings
    }

    /// Register (or replace) a mode config
    pub fn set_mode_config(&mut self, mode: impl Into<String>, config: Map<String, Value>) {
        self.modes.insert(mode.into(), config);
    }

    /// Look up a mode config
    pub fn get_mode_config(&self, mode: &str) -> Option<&Map<String, Value>> {
        self.modes.get(mode)
    }

    /// Platforms captured by the last [`init`](Self::init)
    pub fn platforms(&self) -> &[String] {
        &self.platforms
    }

    fn mode_value(&self, mode: Option<&Value>, key: &str) -> Option<&Value> {
        let mode = mode.and_then(Value::as_str)?;
        self.modes.get(mode)?.get(key)
    }

    fn query_override(&self, key: &str) -> Option<Value> {
        let exact = format!("{}{}", QUERY_PREFIX, key);
        let raw = self
            .query
            .get(&exact)
            .or_else(|| self.query.get(&exact.to_lowercase()))?;
        Some(match raw {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            other => Value::String(other.to_string()),
        })
    }
}

/// Build the app config for a resolved platform, with the stock modes registered
pub fn setup_config(user_config: Value, plt: &Platform) -> Config {
    let mut config = Config::new(user_config);
    for (mode, values) in default_modes() {
        config.set_mode_config(mode, values);
    }
    config.init(plt);
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use skiff_platform::{default_registry, setup_platform, StaticEnvironment};

    const IPHONE_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 10_3 like Mac OS X) AppleWebKit/603.1.30 (KHTML, like Gecko) Mobile/14E277";
    const ANDROID_UA: &str = "Mozilla/5.0 (Linux; Android 7.1.1; Nexus 5X) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0 Mobile Safari/537.36";

    fn platform(ua: &str, url: &str) -> Platform {
        let env = StaticEnvironment::new(ua)
            .with_navigator_platform(if ua.contains("iPhone") { "iPhone" } else { "Linux" })
            .with_url(url);
        setup_platform(Box::new(env), default_registry()).unwrap()
    }

    #[test]
    fn test_registry_settings() {
        let plt = platform(IPHONE_UA, "/");
        let config = setup_config(json!({}), &plt);

        assert_eq!(config.get("mode"), Some(json!("ios")));
        assert_eq!(config.get_number("keyboardHeight", 0.0), 250.0);
        assert!(!config.get_bool("hoverCSS", true));
        assert_eq!(config.get("unknown"), None);
    }

    #[test]
    fn test_mode_values_from_platform_mode() {
        let plt = platform(ANDROID_UA, "/");
        let config = setup_config(json!({}), &plt);

        assert_eq!(config.get("mode"), Some(json!("md")));
        assert_eq!(config.get("spinner"), Some(json!("crescent")));
        assert_eq!(config.get("pageTransition"), Some(json!("md-transition")));
    }

    #[test]
    fn test_computed_settings_resolved() {
        let plt = platform(IPHONE_UA, "/");
        let config = setup_config(json!({}), &plt);

        // navigator platform is iPhone, no Safari token, no webkit global
        assert!(config.get_bool("swipeBackEnabled", false));
        assert!(config.get_bool("tapPolyfill", false));
        assert!(!config.get_bool("statusbarPadding", true));
    }

    #[test]
    fn test_user_value_beats_platform() {
        let plt = platform(IPHONE_UA, "/");
        let config = setup_config(json!({ "keyboardHeight": 320, "mode": "md" }), &plt);

        assert_eq!(config.get_number("keyboardHeight", 0.0), 320.0);
        // user top-level mode beats the platform's mode setting
        assert_eq!(config.get("mode"), Some(json!("md")));
        // user default mode beats registry platform mode
        assert_eq!(config.get("spinner"), Some(json!("crescent")));
    }

    #[test]
    fn test_user_platform_value_beats_user_default() {
        let plt = platform(IPHONE_UA, "/");
        let config = setup_config(
            json!({
                "tabsPlacement": "top",
                "platforms": {
                    "ios": { "tabsPlacement": "bottom" },
                    "android": { "tabsPlacement": "left" }
                }
            }),
            &plt,
        );
        assert_eq!(config.get("tabsPlacement"), Some(json!("bottom")));
    }

    #[test]
    fn test_later_platform_wins() {
        let plt = platform(IPHONE_UA, "/");
        let config = setup_config(
            json!({
                "platforms": {
                    "mobile": { "backButtonText": "mobile" },
                    "iphone": { "backButtonText": "iphone" }
                }
            }),
            &plt,
        );
        assert_eq!(config.get("backButtonText"), Some(json!("iphone")));
    }

    #[test]
    fn test_user_platform_mode() {
        let plt = platform(ANDROID_UA, "/");
        let config = setup_config(json!({ "platforms": { "android": { "mode": "wp" } } }), &plt);

        assert_eq!(config.get("spinner"), Some(json!("circles")));
    }

    #[test]
    fn test_query_override() {
        let plt = platform(IPHONE_UA, "/?ionicmode=md&ionicanimate=false&ionicscrollAssist=true");
        let config = setup_config(json!({ "animate": true }), &plt);

        assert_eq!(config.get("mode"), Some(json!("md")));
        assert!(!config.get_bool("animate", true));
        assert!(config.get_bool("scrollAssist", false));
    }

    #[test]
    fn test_set_and_fallbacks() {
        let plt = platform(IPHONE_UA, "/");
        let mut config = setup_config(Value::Null, &plt);

        assert_eq!(config.get_or("missing", json!(1)), json!(1));
        assert!(config.get_bool("missing", true));
        assert_eq!(config.get_number("missing", 4.5), 4.5);

        config.set("threshold", "12.5");
        assert_eq!(config.get_number("threshold", 0.0), 12.5);

        config.set("nothing", Value::Null);
        assert_eq!(config.get("nothing"), None);

        config.set_platform("ios", "menuType", "push");
        assert_eq!(config.get("menuType"), Some(json!("push")));
        assert_eq!(
            config.settings()["platforms"]["ios"]["menuType"],
            json!("push")
        );
    }

    #[test]
    fn test_non_object_user_config() {
        let config = Config::new(json!([1, 2, 3]));
        assert!(config.settings().is_empty());
    }

    #[test]
    fn test_from_toml() {
        let config = Config::from_toml_str(
            r#"
            mode = "ios"
            keyboardHeight = 280

            [platforms.android]
            mode = "md"
            "#,
        )
        .unwrap();

        assert_eq!(config.settings()["mode"], json!("ios"));
        assert_eq!(config.settings()["platforms"]["android"]["mode"], json!("md"));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skiff.toml");
        fs::write(&path, "spinner = \"dots\"\n").unwrap();

        let plt = platform(ANDROID_UA, "/");
        let mut config = Config::load(&path).unwrap();
        config.init(&plt);
        assert_eq!(config.get("spinner"), Some(json!("dots")));

        let missing = Config::load(&dir.path().join("nope.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            Config::from_toml_str("mode = "),
            Err(ConfigError::Parse(_))
        ));
    }
}
