//! Declarative platform registry
//!
//! A registry is an ordered map from platform name to [`PlatformConfig`].
//! Declaration order matters: resolution walks candidates in this order and
//! the first declared subset parent that resolves wins.
//!
//! # Example
//!
//! ```rust
//! use skiff_platform::{PlatformConfig, PlatformRegistry};
//!
//! let registry = PlatformRegistry::new()
//!     .with("mobile", PlatformConfig::new())
//!     .with(
//!         "ios",
//!         PlatformConfig::new()
//!             .superset("mobile")
//!             .subsets(["iphone", "ipad"])
//!             .setting("mode", "ios")
//!             .matches(|plt| plt.is_platform_match("ios", &["iphone", "ipad", "ipod"], &[])),
//!     );
//!
//! assert_eq!(registry.subset_parents("iphone"), vec!["ios"]);
//! ```

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::platform::Platform;
use crate::version::{PlatformVersion, RawVersion};

/// Predicate deciding whether a platform matches the live environment
pub type MatchFn = Arc<dyn Fn(&Platform) -> bool + Send + Sync>;

/// Extracts version components from the environment
pub type VersionParserFn = Arc<dyn Fn(&Platform) -> Option<RawVersion> + Send + Sync>;

/// Setup hook run once for each platform in the resolved chain
pub type InitializeFn = Arc<dyn Fn(&mut Platform) + Send + Sync>;

/// Setting computed from the resolved platform
pub type ComputedSettingFn = Arc<dyn Fn(&Platform) -> Value + Send + Sync>;

/// A per-platform setting
#[derive(Clone)]
pub enum SettingValue {
    /// A fixed value
    Value(Value),
    /// A value derived from the platform once it has been resolved
    Computed(ComputedSettingFn),
}

impl SettingValue {
    /// Produce the concrete value for `plt`
    pub fn resolve(&self, plt: &Platform) -> Value {
        match self {
            SettingValue::Value(value) => value.clone(),
            SettingValue::Computed(f) => f(plt),
        }
    }

    /// The fixed value, if this setting is not computed
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            SettingValue::Value(value) => Some(value),
            SettingValue::Computed(_) => None,
        }
    }
}

impl fmt::Debug for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Value(value) => write!(f, "{}", value),
            SettingValue::Computed(_) => f.write_str("<computed>"),
        }
    }
}

/// Declarative description of one platform
#[derive(Clone, Default)]
pub struct PlatformConfig {
    /// Whether this entry wraps a webview engine rather than a device or OS
    pub is_engine: bool,
    /// Broader platform this one specializes
    pub superset: Option<String>,
    /// Platforms this entry is a valid parent of
    pub subsets: Vec<String>,
    /// Opaque per-platform data
    pub settings: IndexMap<String, SettingValue>,
    is_match: Option<MatchFn>,
    version_parser: Option<VersionParserFn>,
    initialize: Option<InitializeFn>,
}

impl PlatformConfig {
    /// Create an empty config that never matches on its own
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark this entry as a webview engine
    pub fn engine(mut self) -> Self {
        self.is_engine = true;
        self
    }

    /// Set the superset platform name
    pub fn superset(mut self, name: impl Into<String>) -> Self {
        self.superset = Some(name.into());
        self
    }

    /// Set the subset platform names
    pub fn subsets<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subsets = names.into_iter().map(Into::into).collect();
        self
    }

    /// Add a fixed setting
    pub fn setting(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.settings
            .insert(key.into(), SettingValue::Value(value.into()));
        self
    }

    /// Add a setting computed from the resolved platform
    pub fn computed_setting<F>(mut self, key: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Platform) -> Value + Send + Sync + 'static,
    {
        self.settings
            .insert(key.into(), SettingValue::Computed(Arc::new(f)));
        self
    }

    /// Set the match predicate
    pub fn matches<F>(mut self, f: F) -> Self
    where
        F: Fn(&Platform) -> bool + Send + Sync + 'static,
    {
        self.is_match = Some(Arc::new(f));
        self
    }

    /// Set the version parser
    pub fn version_parser<F>(mut self, f: F) -> Self
    where
        F: Fn(&Platform) -> Option<RawVersion> + Send + Sync + 'static,
    {
        self.version_parser = Some(Arc::new(f));
        self
    }

    /// Set the initialize hook
    pub fn initialize<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Platform) + Send + Sync + 'static,
    {
        self.initialize = Some(Arc::new(f));
        self
    }

    /// Evaluate the match predicate; entries without one never match
    pub fn is_match(&self, plt: &Platform) -> bool {
        self.is_match.as_ref().is_some_and(|f| f(plt))
    }

    /// Whether a match predicate was declared
    pub fn has_match_predicate(&self) -> bool {
        self.is_match.is_some()
    }

    /// Run the version parser and convert its output
    pub fn parse_version(&self, plt: &Platform) -> Option<PlatformVersion> {
        let parser = self.version_parser.as_ref()?;
        let raw = parser(plt)?;
        PlatformVersion::from_raw(&raw)
    }

    /// The initialize hook, if any
    pub fn initialize_hook(&self) -> Option<InitializeFn> {
        self.initialize.clone()
    }

    /// Look up a setting
    pub fn get_setting(&self, key: &str) -> Option<&SettingValue> {
        self.settings.get(key)
    }
}

impl fmt::Debug for PlatformConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformConfig")
            .field("is_engine", &self.is_engine)
            .field("superset", &self.superset)
            .field("subsets", &self.subsets)
            .field("settings", &self.settings)
            .field("is_match", &self.is_match.is_some())
            .field("version_parser", &self.version_parser.is_some())
            .field("initialize", &self.initialize.is_some())
            .finish()
    }
}

/// Ordered map of platform name to config
#[derive(Clone, Debug, Default)]
pub struct PlatformRegistry {
    entries: IndexMap<String, PlatformConfig>,
}

impl PlatformRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, builder style
    pub fn with(mut self, name: impl Into<String>, config: PlatformConfig) -> Self {
        self.insert(name, config);
        self
    }

    /// Add or replace an entry
    ///
    /// Replacing keeps the entry's original declaration position.
    pub fn insert(&mut self, name: impl Into<String>, config: PlatformConfig) {
        self.entries.insert(name.into(), config);
    }

    /// Look up an entry
    pub fn get(&self, name: &str) -> Option<&PlatformConfig> {
        self.entries.get(name)
    }

    /// Whether an entry exists
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Entry names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PlatformConfig)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names of every entry listing `name` among its subsets, in declaration order
    pub fn subset_parents(&self, name: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, config)| config.subsets.iter().any(|s| s == name))
            .map(|(parent, _)| parent.as_str())
            .collect()
    }
}
