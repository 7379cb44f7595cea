//! Runtime platform state and query surface

use std::cell::Cell;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use indexmap::IndexMap;
use regex::{Regex, RegexBuilder};

use crate::back_button::{BackButtonActions, BackButtonHandle};
use crate::environment::Environment;
use crate::error::{PlatformError, Result};
use crate::event::{Debouncer, EventEmitter, HostEvent};
use crate::node::{resolve_chain, PLATFORM_OVERRIDE_PARAM};
use crate::query::QueryParams;
use crate::ready::{ReadySignal, ReadyTrigger};
use crate::registry::{PlatformConfig, PlatformRegistry};
use crate::version::{PlatformVersion, RawVersion};

/// Platform used when nothing in the registry matches
pub const DEFAULT_PLATFORM: &str = "core";

/// Cached viewport dimensions per orientation
///
/// `is_portrait == None` means the cache must be refreshed on next read.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct DimensionCache {
    portrait_width: f64,
    portrait_height: f64,
    landscape_width: f64,
    landscape_height: f64,
    is_portrait: Option<bool>,
}

/// The resolved runtime platform
///
/// Constructed once at startup, configured through its setters and finalized
/// by [`init`](Self::init). The platform chain does not change afterwards;
/// only the dimension cache and the event state do.
pub struct Platform {
    env: Box<dyn Environment>,
    registry: Arc<PlatformRegistry>,
    default: String,
    platforms: Vec<String>,
    versions: IndexMap<String, PlatformVersion>,
    dir: String,
    lang: String,
    user_agent: String,
    navigator_platform: String,
    query: QueryParams,
    dims: Cell<DimensionCache>,
    resize_debounce: Debouncer,
    ready: ReadySignal,
    ready_trigger: ReadyTrigger,
    back_button_actions: BackButtonActions,
    exit_handler: Option<Box<dyn Fn()>>,

    /// Emitted (debounced) after the window is resized
    pub resize: EventEmitter<()>,
    /// Emitted when the app goes to the background
    pub pause: EventEmitter<()>,
    /// Emitted when the app returns to the foreground
    pub resume: EventEmitter<()>,
    /// Emitted when the hardware back button is pressed
    pub back_button: EventEmitter<()>,
}

impl Platform {
    /// Create an unconfigured platform over a host environment
    pub fn new(env: Box<dyn Environment>) -> Self {
        Self {
            env,
            registry: Arc::new(PlatformRegistry::new()),
            default: DEFAULT_PLATFORM.to_string(),
            platforms: Vec::new(),
            versions: IndexMap::new(),
            dir: String::new(),
            lang: String::new(),
            user_agent: String::new(),
            navigator_platform: String::new(),
            query: QueryParams::new(),
            dims: Cell::new(DimensionCache::default()),
            resize_debounce: Debouncer::default(),
            ready: ReadySignal::new(),
            ready_trigger: ReadyTrigger::default(),
            back_button_actions: BackButtonActions::new(),
            exit_handler: None,
            resize: EventEmitter::new(),
            pause: EventEmitter::new(),
            resume: EventEmitter::new(),
            back_button: EventEmitter::new(),
        }
    }

    /// The host environment
    pub fn environment(&self) -> &dyn Environment {
        self.env.as_ref()
    }

    /// The host environment, mutably
    pub fn environment_mut(&mut self) -> &mut dyn Environment {
        self.env.as_mut()
    }

    // =========================================================================
    // Resolved platforms
    // =========================================================================

    /// Whether `name` is part of the resolved chain
    pub fn is(&self, name: &str) -> bool {
        self.platforms.iter().any(|p| p == name)
    }

    /// Resolved platforms, outermost first
    pub fn platforms(&self) -> &[String] {
        &self.platforms
    }

    /// Parsed versions, keyed by platform, in resolution order
    pub fn versions(&self) -> &IndexMap<String, PlatformVersion> {
        &self.versions
    }

    /// The first version found in resolution order
    pub fn version(&self) -> Option<&PlatformVersion> {
        self.versions.values().next()
    }

    // =========================================================================
    // Registry
    // =========================================================================

    /// Install the platform registry
    pub fn set_platform_configs(&mut self, registry: impl Into<Arc<PlatformRegistry>>) {
        self.registry = registry.into();
    }

    /// The platform registry
    pub fn registry(&self) -> &Arc<PlatformRegistry> {
        &self.registry
    }

    /// Registry entry for a platform
    pub fn get_platform_config(&self, name: &str) -> Option<&PlatformConfig> {
        self.registry.get(name)
    }

    /// Set the fallback platform name
    pub fn set_default(&mut self, name: impl Into<String>) {
        self.default = name.into();
    }

    /// The fallback platform name
    pub fn default_platform(&self) -> &str {
        &self.default
    }

    // =========================================================================
    // Direction and language
    // =========================================================================

    /// Set the text direction, optionally writing it to the document
    pub fn set_dir(&mut self, dir: &str, update_document: bool) {
        self.dir = dir.to_lowercase();
        if update_document {
            self.env.set_document_attribute("dir", dir);
        }
    }

    /// Text direction (`"ltr"`, `"rtl"` or empty)
    pub fn dir(&self) -> &str {
        &self.dir
    }

    /// Whether the text direction is right-to-left
    pub fn is_rtl(&self) -> bool {
        self.dir == "rtl"
    }

    /// Set the language, optionally writing it to the document
    pub fn set_lang(&mut self, lang: &str, update_document: bool) {
        self.lang = lang.to_string();
        if update_document {
            self.env.set_document_attribute("lang", lang);
        }
    }

    /// Document language
    pub fn lang(&self) -> &str {
        &self.lang
    }

    // =========================================================================
    // Environment signals
    // =========================================================================

    /// Set the user agent used for matching
    pub fn set_user_agent(&mut self, user_agent: impl Into<String>) {
        self.user_agent = user_agent.into();
    }

    /// The user agent used for matching
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Set the navigator platform used for matching
    pub fn set_navigator_platform(&mut self, navigator_platform: impl Into<String>) {
        self.navigator_platform = navigator_platform.into();
    }

    /// The navigator platform used for matching
    pub fn navigator_platform(&self) -> &str {
        &self.navigator_platform
    }

    /// Parse query parameters from `url`
    pub fn set_query_params(&mut self, url: &str) {
        self.query.parse_url(url);
    }

    /// Look up a query parameter
    pub fn get_query_param(&self, key: &str) -> Option<&str> {
        self.query.get(key)
    }

    /// All parsed query parameters
    pub fn query_params(&self) -> &QueryParams {
        &self.query
    }

    /// Current page URL
    pub fn url(&self) -> String {
        self.env.url()
    }

    /// Whether a text input currently holds focus
    pub fn has_focused_text_input(&self) -> bool {
        self.env.has_focused_text_input()
    }

    // =========================================================================
    // Matching helpers
    // =========================================================================

    /// Whether the `;`-separated `query_value` lists `test_value`
    ///
    /// Both sides are compared case-insensitively.
    pub fn test_query(&self, query_value: &str, test_value: &str) -> bool {
        let test_value = test_value.to_lowercase();
        query_value
            .to_lowercase()
            .split(';')
            .any(|v| v == test_value)
    }

    /// The `ionicplatform` override, when present and non-empty
    pub fn platform_override(&self) -> Option<&str> {
        self.get_query_param(PLATFORM_OVERRIDE_PARAM)
            .filter(|v| !v.is_empty())
    }

    /// Whether the navigator platform matches a case-insensitive pattern
    ///
    /// Invalid patterns never match.
    pub fn test_navigator_platform(&self, expression: &str) -> bool {
        match self.try_test_navigator_platform(expression) {
            Ok(matched) => matched,
            Err(err) => {
                tracing::warn!("{}", err);
                false
            }
        }
    }

    /// Like [`test_navigator_platform`](Self::test_navigator_platform), but
    /// reports invalid patterns
    pub fn try_test_navigator_platform(&self, expression: &str) -> Result<bool> {
        let rgx = RegexBuilder::new(expression)
            .case_insensitive(true)
            .build()
            .map_err(|e| PlatformError::InvalidPattern {
                pattern: expression.to_string(),
                reason: e.to_string(),
            })?;
        Ok(rgx.is_match(&self.navigator_platform))
    }

    /// Whether the user agent contains `expression` (case-sensitive)
    pub fn test_user_agent(&self, expression: &str) -> bool {
        !self.user_agent.is_empty() && self.user_agent.contains(expression)
    }

    /// Capture a version from the user agent
    ///
    /// Group 1 is the major component, group 2 (optional) the minor one.
    pub fn match_user_agent_version(&self, expression: &Regex) -> Option<RawVersion> {
        if self.user_agent.is_empty() {
            return None;
        }
        let caps = expression.captures(&self.user_agent)?;
        let major = caps.get(1)?.as_str().to_string();
        let minor = caps.get(2).map(|m| m.as_str().to_string());
        Some(RawVersion { major, minor })
    }

    /// Standard OS match against the `ionicplatform` override and the user agent
    ///
    /// When the override is present it alone decides. Otherwise the
    /// lowercased user agent must contain one of `ua_has` (defaulting to
    /// `name`) and none of `ua_must_not_have`.
    pub fn is_platform_match(&self, name: &str, ua_has: &[&str], ua_must_not_have: &[&str]) -> bool {
        if let Some(query_value) = self.platform_override() {
            return self.test_query(query_value, name);
        }

        let user_agent = self.user_agent.to_lowercase();
        let has = |needle: &str| user_agent.contains(needle);

        let matched = if ua_has.is_empty() {
            has(name)
        } else {
            ua_has.iter().any(|&n| has(n))
        };

        matched && !ua_must_not_have.iter().any(|&n| has(n))
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// Resolve the platform chain and run the platform hooks
    ///
    /// No match is not an error: the default platform is used. Only a
    /// registry with cyclic declarations fails.
    pub fn init(&mut self) -> Result<()> {
        self.platforms.clear();
        self.versions.clear();

        let registry = Arc::clone(&self.registry);
        let chain = resolve_chain(&registry, self, &self.default)?;

        for name in chain {
            let config = registry.get(&name);

            if let Some(hook) = config.and_then(PlatformConfig::initialize_hook) {
                hook(self);
            }

            if name == "iphone" && self.navigator_platform == "iPad" {
                // iPads reporting an iPhone user agent
                self.platforms = vec!["tablet".to_string(), "ipad".to_string()];
                tracing::info!("resolved platforms: {:?}", self.platforms);
                return Ok(());
            }

            if let Some(version) = config.and_then(|c| c.parse_version(self)) {
                self.versions.insert(name.clone(), version);
            }
            self.platforms.push(name);
        }

        if self.is("mobile") && !self.is("cordova") && !self.is("mobileweb") {
            self.platforms.push("mobileweb".to_string());
        }

        tracing::info!("resolved platforms: {:?}", self.platforms);
        Ok(())
    }

    // =========================================================================
    // Dimensions
    // =========================================================================

    /// Viewport width for the current orientation
    pub fn width(&self) -> f64 {
        self.calc_dim();
        let dims = self.dims.get();
        if dims.is_portrait == Some(true) {
            dims.portrait_width
        } else {
            dims.landscape_width
        }
    }

    /// Viewport height for the current orientation
    pub fn height(&self) -> f64 {
        self.calc_dim();
        let dims = self.dims.get();
        if dims.is_portrait == Some(true) {
            dims.portrait_height
        } else {
            dims.landscape_height
        }
    }

    /// Whether the last dimension read found a portrait viewport
    pub fn is_portrait(&self) -> Option<bool> {
        self.dims.get().is_portrait
    }

    /// Force the next dimension read to query the environment
    pub fn invalidate_dimensions(&self) {
        let mut dims = self.dims.get();
        dims.is_portrait = None;
        self.dims.set(dims);
    }

    fn calc_dim(&self) {
        let mut dims = self.dims.get();
        if dims.is_portrait == Some(true) {
            return;
        }

        // Reading the window size forces a layout in the host
        let inner_width = self.env.inner_width();
        let inner_height = self.env.inner_height();

        // Some iOS versions report a landscape viewport on the very first
        // read even in portrait, so a cached landscape is re-checked.
        if dims.is_portrait == Some(false) && inner_width >= inner_height {
            return;
        }

        if self.env.screen_width() > 0.0 && self.env.screen_height() > 0.0 {
            if inner_width < inner_height {
                // Portrait sizes only grow: a virtual keyboard shrinks the
                // window without rotating it.
                if dims.portrait_width <= inner_width {
                    tracing::debug!("setting is_portrait to true");
                    dims.is_portrait = Some(true);
                    dims.portrait_width = inner_width;
                }
                if dims.portrait_height <= inner_height {
                    tracing::debug!("setting is_portrait to true");
                    dims.is_portrait = Some(true);
                    dims.portrait_height = inner_height;
                }
            } else {
                if dims.landscape_width != inner_width {
                    tracing::debug!("setting is_portrait to false");
                    dims.is_portrait = Some(false);
                    dims.landscape_width = inner_width;
                }
                if dims.landscape_height != inner_height {
                    tracing::debug!("setting is_portrait to false");
                    dims.is_portrait = Some(false);
                    dims.landscape_height = inner_height;
                }
            }
        }

        self.dims.set(dims);
    }

    // =========================================================================
    // Ready signal
    // =========================================================================

    /// Choose which host event resolves the ready signal
    pub fn set_ready_trigger(&mut self, trigger: ReadyTrigger) {
        self.ready_trigger = trigger;
    }

    /// The host event that resolves the ready signal
    pub fn ready_trigger(&self) -> ReadyTrigger {
        self.ready_trigger
    }

    /// Resolve immediately if the trigger's condition already holds
    ///
    /// With the window-load trigger and a document that has already loaded,
    /// the signal resolves with `"dom"` right away.
    pub fn prepare_ready(&mut self) {
        if self.ready_trigger == ReadyTrigger::WindowLoad && self.env.document_complete() {
            self.trigger_ready(ReadyTrigger::WindowLoad.source());
        }
    }

    /// Resolve the ready signal; only the first call has an effect
    pub fn trigger_ready(&self, source: &str) -> bool {
        self.ready.trigger(source)
    }

    /// Whether the platform is ready
    pub fn is_ready(&self) -> bool {
        self.ready.is_ready()
    }

    /// Future resolving to the ready source (`"dom"`, `"cordova"`, …)
    pub fn ready(&self) -> impl Future<Output = Option<String>> + 'static {
        self.ready.wait()
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Dispatch a host event
    pub fn handle_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::WindowLoad => {
                if self.ready_trigger == ReadyTrigger::WindowLoad {
                    self.trigger_ready(ReadyTrigger::WindowLoad.source());
                }
            }
            HostEvent::DeviceReady => {
                if self.ready_trigger == ReadyTrigger::DeviceReady {
                    self.trigger_ready(ReadyTrigger::DeviceReady.source());
                }
            }
            HostEvent::Pause => self.pause.emit(&()),
            HostEvent::Resume => self.resume.emit(&()),
            HostEvent::BackButton => {
                self.back_button.emit(&());
                self.run_back_button_action();
            }
            HostEvent::Resize(now) => self.resize_debounce.schedule(now),
        }
    }

    /// Fire the debounced resize if it is due; returns whether it fired
    ///
    /// The dimension cache is invalidated unless a text input has focus, as
    /// the resize then most likely comes from the virtual keyboard.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.resize_debounce.poll(now) {
            return false;
        }
        if !self.has_focused_text_input() {
            self.invalidate_dimensions();
        }
        self.resize.emit(&());
        true
    }

    /// Whether a debounced resize is waiting to fire
    pub fn resize_pending(&self) -> bool {
        self.resize_debounce.is_pending()
    }

    // =========================================================================
    // Back button and exit
    // =========================================================================

    /// Register a back-button action; higher priorities win
    pub fn register_back_button_action<F>(&mut self, priority: i32, action: F) -> BackButtonHandle
    where
        F: Fn() + 'static,
    {
        self.back_button_actions.register(priority, action)
    }

    /// Remove a back-button action
    pub fn unregister_back_button_action(&mut self, handle: BackButtonHandle) -> bool {
        self.back_button_actions.unregister(handle)
    }

    /// Run the highest-priority back-button action
    pub fn run_back_button_action(&self) -> bool {
        self.back_button_actions.run()
    }

    /// Install the handler used by [`exit_app`](Self::exit_app)
    pub fn set_exit_handler<F>(&mut self, handler: F)
    where
        F: Fn() + 'static,
    {
        self.exit_handler = Some(Box::new(handler));
    }

    /// Ask the host to exit; a no-op unless a platform installed a handler
    pub fn exit_app(&self) {
        if let Some(handler) = &self.exit_handler {
            handler();
        }
    }
}

impl fmt::Debug for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Platform")
            .field("platforms", &self.platforms)
            .field("versions", &self.versions)
            .field("default", &self.default)
            .field("dir", &self.dir)
            .field("lang", &self.lang)
            .field("user_agent", &self.user_agent)
            .field("navigator_platform", &self.navigator_platform)
            .field("ready", &self.ready.source())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StaticEnvironment;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    fn shared_env(width: f64, height: f64) -> Rc<RefCell<StaticEnvironment>> {
        Rc::new(RefCell::new(StaticEnvironment::new("").with_size(width, height)))
    }

    fn resize(env: &Rc<RefCell<StaticEnvironment>>, width: f64, height: f64) {
        let mut env = env.borrow_mut();
        env.inner_width = width;
        env.inner_height = height;
    }

    #[test]
    fn test_is_platform_match_user_agent() {
        let mut plt = Platform::new(Box::new(StaticEnvironment::default()));
        plt.set_user_agent("Mozilla/5.0 (Linux; Android 7.1; Nexus 5X) Silk/1.0");

        assert!(plt.is_platform_match("android", &["android", "silk"], &["windows phone"]));
        assert!(!plt.is_platform_match("ios", &["iphone", "ipad", "ipod"], &["windows phone"]));

        plt.set_user_agent("Mozilla/5.0 (Windows Phone 10.0; Android 6.0.1)");
        assert!(!plt.is_platform_match("android", &["android", "silk"], &["windows phone"]));
        assert!(plt.is_platform_match("windows", &["windows phone"], &[]));
    }

    #[test]
    fn test_is_platform_match_defaults_to_name() {
        let mut plt = Platform::new(Box::new(StaticEnvironment::default()));
        plt.set_user_agent("Mozilla/5.0 (iPad; CPU OS 10_3 like Mac OS X)");
        assert!(plt.is_platform_match("ipad", &[], &[]));
        assert!(!plt.is_platform_match("iphone", &[], &[]));
    }

    #[test]
    fn test_query_override_decides_alone() {
        let mut plt = Platform::new(Box::new(StaticEnvironment::default()));
        plt.set_user_agent("Mozilla/5.0 (iPhone; CPU iPhone OS 10_3 like Mac OS X)");
        plt.set_query_params("/?ionicplatform=Android;Tablet");

        assert!(plt.is_platform_match("android", &["android"], &[]));
        assert!(plt.is_platform_match("tablet", &[], &[]));
        assert!(!plt.is_platform_match("ios", &["iphone"], &[]));
    }

    #[test]
    fn test_query_list_ignores_case_on_both_sides() {
        let plt = Platform::new(Box::new(StaticEnvironment::default()));
        assert!(plt.test_query("android;tablet", "Tablet"));
        assert!(plt.test_query("ANDROID", "Android"));
        assert!(!plt.test_query("android", "iOS"));
    }

    #[test]
    fn test_empty_query_override_is_absent() {
        let mut plt = Platform::new(Box::new(StaticEnvironment::default()));
        plt.set_user_agent("Mozilla/5.0 (iPhone; CPU iPhone OS 10_3 like Mac OS X)");
        plt.set_query_params("/?ionicplatform=");

        assert_eq!(plt.platform_override(), None);
        assert!(plt.is_platform_match("ios", &["iphone"], &[]));
    }

    #[test]
    fn test_navigator_platform_pattern() {
        let mut plt = Platform::new(Box::new(StaticEnvironment::default()));
        plt.set_navigator_platform("iPhone");
        assert!(plt.test_navigator_platform("iphone|ipad|ipod"));
        assert!(!plt.test_navigator_platform("win"));
        assert!(!plt.test_navigator_platform("("));
        assert!(matches!(
            plt.try_test_navigator_platform("("),
            Err(PlatformError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_match_user_agent_version() {
        let mut plt = Platform::new(Box::new(StaticEnvironment::default()));
        let rgx = Regex::new(r"OS (\d+)_(\d+)?").unwrap();

        assert_eq!(plt.match_user_agent_version(&rgx), None);

        plt.set_user_agent("Mozilla/5.0 (iPhone; CPU iPhone OS 10_3 like Mac OS X)");
        assert_eq!(
            plt.match_user_agent_version(&rgx),
            Some(RawVersion::new("10", "3"))
        );

        plt.set_user_agent("Mozilla/5.0 (iPhone; CPU iPhone OS 9_ like Mac OS X)");
        assert_eq!(
            plt.match_user_agent_version(&rgx),
            Some(RawVersion::major_only("9"))
        );
    }

    #[test]
    fn test_dir_and_lang() {
        let env = Rc::new(RefCell::new(StaticEnvironment::default()));
        let mut plt = Platform::new(Box::new(env.clone()));

        plt.set_dir("RTL", false);
        assert!(plt.is_rtl());
        assert_eq!(env.borrow().attributes.get("dir"), None);

        plt.set_dir("ltr", true);
        assert!(!plt.is_rtl());
        assert_eq!(env.borrow().attributes.get("dir").map(String::as_str), Some("ltr"));

        plt.set_lang("fr", true);
        assert_eq!(plt.lang(), "fr");
        assert_eq!(env.borrow().attributes.get("lang").map(String::as_str), Some("fr"));
    }

    #[test]
    fn test_dimensions_are_cached() {
        let env = shared_env(375.0, 667.0);
        let plt = Platform::new(Box::new(env.clone()));

        assert_eq!((plt.width(), plt.height()), (375.0, 667.0));
        assert_eq!(plt.is_portrait(), Some(true));

        // Not re-read until invalidated
        resize(&env, 667.0, 375.0);
        assert_eq!(plt.width(), 375.0);

        plt.invalidate_dimensions();
        assert_eq!((plt.width(), plt.height()), (667.0, 375.0));
        assert_eq!(plt.is_portrait(), Some(false));
    }

    #[test]
    fn test_landscape_first_read_is_rechecked() {
        let env = shared_env(667.0, 375.0);
        let plt = Platform::new(Box::new(env.clone()));

        assert_eq!(plt.width(), 667.0);
        assert_eq!(plt.is_portrait(), Some(false));

        // Second read corrects a bogus landscape reading without invalidation
        resize(&env, 375.0, 667.0);
        assert_eq!(plt.width(), 375.0);
        assert_eq!(plt.is_portrait(), Some(true));
    }

    #[test]
    fn test_portrait_ignores_keyboard_shrink() {
        let env = shared_env(375.0, 667.0);
        let plt = Platform::new(Box::new(env.clone()));
        assert_eq!(plt.height(), 667.0);

        resize(&env, 375.0, 400.0);
        plt.invalidate_dimensions();
        // Width unchanged still confirms portrait; height keeps the larger value
        assert_eq!(plt.height(), 667.0);
    }

    /// Counts viewport reads, which force a layout in a real host
    struct CountingEnv {
        inner: StaticEnvironment,
        reads: Rc<Cell<usize>>,
    }

    impl Environment for CountingEnv {
        fn user_agent(&self) -> String {
            self.inner.user_agent()
        }
        fn navigator_platform(&self) -> String {
            self.inner.navigator_platform()
        }
        fn url(&self) -> String {
            self.inner.url()
        }
        fn inner_width(&self) -> f64 {
            self.reads.set(self.reads.get() + 1);
            self.inner.inner_width()
        }
        fn inner_height(&self) -> f64 {
            self.reads.set(self.reads.get() + 1);
            self.inner.inner_height()
        }
        fn screen_width(&self) -> f64 {
            self.inner.screen_width()
        }
        fn screen_height(&self) -> f64 {
            self.inner.screen_height()
        }
        fn document_attribute(&self, name: &str) -> Option<String> {
            self.inner.document_attribute(name)
        }
        fn set_document_attribute(&mut self, name: &str, value: &str) {
            self.inner.set_document_attribute(name, value);
        }
        fn has_global(&self, name: &str) -> bool {
            self.inner.has_global(name)
        }
    }

    #[test]
    fn test_cached_portrait_skips_viewport_read() {
        let reads = Rc::new(Cell::new(0));
        let env = CountingEnv {
            inner: StaticEnvironment::new("").with_size(375.0, 667.0),
            reads: reads.clone(),
        };
        let plt = Platform::new(Box::new(env));

        assert_eq!(plt.width(), 375.0);
        let after_first = reads.get();
        assert!(after_first > 0);

        assert_eq!((plt.width(), plt.height()), (375.0, 667.0));
        assert_eq!(reads.get(), after_first);

        plt.invalidate_dimensions();
        plt.width();
        assert!(reads.get() > after_first);
    }

    #[test]
    fn test_zero_screen_is_not_cached() {
        let env = Rc::new(RefCell::new(StaticEnvironment::default()));
        let plt = Platform::new(Box::new(env.clone()));
        assert_eq!(plt.width(), 0.0);
        assert_eq!(plt.is_portrait(), None);
    }

    #[test]
    fn test_debounced_resize_invalidates_cache() {
        let env = shared_env(375.0, 667.0);
        let mut plt = Platform::new(Box::new(env.clone()));
        let fired = Rc::new(Cell::new(0));
        let f = fired.clone();
        plt.resize.subscribe(move |_| f.set(f.get() + 1));

        assert_eq!(plt.width(), 375.0);
        resize(&env, 667.0, 375.0);

        let start = Instant::now();
        plt.handle_event(HostEvent::Resize(start));
        plt.handle_event(HostEvent::Resize(start + Duration::from_millis(100)));
        assert!(!plt.tick(start + Duration::from_millis(250)));
        assert!(plt.tick(start + Duration::from_millis(300)));
        assert!(!plt.resize_pending());

        assert_eq!(fired.get(), 1);
        assert_eq!(plt.width(), 667.0);
    }

    #[test]
    fn test_resize_with_focused_input_keeps_cache() {
        let env = shared_env(375.0, 667.0);
        let mut plt = Platform::new(Box::new(env.clone()));
        assert_eq!(plt.height(), 667.0);

        {
            let mut e = env.borrow_mut();
            e.focused_text_input = true;
            e.inner_height = 350.0;
        }
        let start = Instant::now();
        plt.handle_event(HostEvent::Resize(start));
        assert!(plt.tick(start + Duration::from_millis(200)));
        assert_eq!(plt.is_portrait(), Some(true));
        assert_eq!(plt.height(), 667.0);
    }

    #[test]
    fn test_lifecycle_events() {
        let mut plt = Platform::new(Box::new(StaticEnvironment::default()));
        let log = Rc::new(RefCell::new(Vec::new()));

        let l = log.clone();
        plt.pause.subscribe(move |_| l.borrow_mut().push("pause"));
        let l = log.clone();
        plt.resume.subscribe(move |_| l.borrow_mut().push("resume"));
        let l = log.clone();
        plt.back_button.subscribe(move |_| l.borrow_mut().push("back"));
        let l = log.clone();
        plt.register_back_button_action(0, move || l.borrow_mut().push("action"));

        plt.handle_event(HostEvent::Pause);
        plt.handle_event(HostEvent::Resume);
        plt.handle_event(HostEvent::BackButton);

        assert_eq!(*log.borrow(), vec!["pause", "resume", "back", "action"]);
    }

    #[test]
    fn test_ready_on_window_load() {
        let mut plt = Platform::new(Box::new(StaticEnvironment::default()));
        let ready = plt.ready();

        plt.prepare_ready();
        assert!(!plt.is_ready());

        plt.handle_event(HostEvent::DeviceReady);
        assert!(!plt.is_ready());

        plt.handle_event(HostEvent::WindowLoad);
        assert_eq!(pollster::block_on(ready).as_deref(), Some("dom"));
    }

    #[test]
    fn test_ready_when_document_already_loaded() {
        let mut env = StaticEnvironment::default();
        env.document_complete = true;
        let mut plt = Platform::new(Box::new(env));
        plt.prepare_ready();
        assert!(plt.is_ready());
    }

    #[test]
    fn test_ready_on_device_ready() {
        let mut plt = Platform::new(Box::new(StaticEnvironment::default()));
        plt.set_ready_trigger(ReadyTrigger::DeviceReady);

        plt.handle_event(HostEvent::WindowLoad);
        assert!(!plt.is_ready());
        plt.handle_event(HostEvent::DeviceReady);
        assert_eq!(pollster::block_on(plt.ready()).as_deref(), Some("cordova"));
    }

    #[test]
    fn test_exit_app() {
        let mut plt = Platform::new(Box::new(StaticEnvironment::default()));
        plt.exit_app();

        let exited = Rc::new(Cell::new(false));
        let e = exited.clone();
        plt.set_exit_handler(move || e.set(true));
        plt.exit_app();
        assert!(exited.get());
    }
}
