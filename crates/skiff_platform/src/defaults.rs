//! Stock platform registry
//!
//! Declaration order is part of the behavior: resolution tries entries in
//! this order and picks the first subset parent that resolves.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::platform::Platform;
use crate::ready::ReadyTrigger;
use crate::registry::{PlatformConfig, PlatformRegistry};
use crate::utils::{is_cordova, is_electron, is_ios, is_ios_ui_webview};

static ANDROID_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Android (\d+).(\d+)?").expect("valid android version pattern"));

static IOS_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"OS (\d+)_(\d+)?").expect("valid ios version pattern"));

static WINDOWS_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Windows Phone (\d+).(\d+)?").expect("valid windows phone version pattern")
});

/// Smallest and largest viewport side
fn viewport_sides(plt: &Platform) -> (f64, f64) {
    let (w, h) = (plt.width(), plt.height());
    (w.min(h), w.max(h))
}

fn is_phablet(plt: &Platform) -> bool {
    let (smallest, largest) = viewport_sides(plt);
    (smallest > 390.0 && smallest < 520.0) && (largest > 620.0 && largest < 800.0)
}

fn is_tablet(plt: &Platform) -> bool {
    let (smallest, largest) = viewport_sides(plt);
    (smallest > 460.0 && smallest < 820.0) && (largest > 780.0 && largest < 1400.0)
}

/// The framework's default registry
pub fn default_registry() -> PlatformRegistry {
    PlatformRegistry::new()
        .with(
            "core",
            PlatformConfig::new()
                .setting("mode", "md")
                .setting("keyboardHeight", 290),
        )
        .with("mobile", PlatformConfig::new())
        .with("phablet", PlatformConfig::new().matches(is_phablet))
        .with("tablet", PlatformConfig::new().matches(is_tablet))
        .with(
            "android",
            PlatformConfig::new()
                .superset("mobile")
                .subsets(["phablet", "tablet"])
                .setting("activator", "ripple")
                .setting("hoverCSS", false)
                .setting("keyboardHeight", 300)
                .setting("mode", "md")
                .matches(|plt| {
                    plt.is_platform_match("android", &["android", "silk"], &["windows phone"])
                })
                .version_parser(|plt| plt.match_user_agent_version(&ANDROID_VERSION)),
        )
        .with(
            "ios",
            PlatformConfig::new()
                .superset("mobile")
                .subsets(["ipad", "iphone"])
                .setting("autoFocusAssist", "delay")
                .setting("hideCaretOnScroll", true)
                .setting("hoverCSS", false)
                .computed_setting("inputBlurring", |plt| Value::Bool(is_ios(plt)))
                .computed_setting("inputCloning", |plt| Value::Bool(is_ios(plt)))
                .setting("keyboardHeight", 250)
                .setting("mode", "ios")
                .computed_setting("statusbarPadding", |plt| Value::Bool(is_cordova(plt)))
                .computed_setting("swipeBackEnabled", |plt| Value::Bool(is_ios(plt)))
                .computed_setting("tapPolyfill", |plt| Value::Bool(is_ios_ui_webview(plt)))
                .computed_setting("virtualScrollEventAssist", |plt| {
                    Value::Bool(is_ios_ui_webview(plt))
                })
                .computed_setting("disableScrollAssist", |plt| Value::Bool(is_ios(plt)))
                .computed_setting("scrollAssist", |plt| Value::Bool(is_ios(plt)))
                .matches(|plt| {
                    plt.is_platform_match("ios", &["iphone", "ipad", "ipod"], &["windows phone"])
                })
                .version_parser(|plt| plt.match_user_agent_version(&IOS_VERSION)),
        )
        .with(
            "ipad",
            PlatformConfig::new()
                .superset("tablet")
                .setting("keyboardHeight", 500)
                .matches(|plt| plt.is_platform_match("ipad", &[], &[])),
        )
        .with(
            "iphone",
            PlatformConfig::new()
                .subsets(["phablet"])
                .matches(|plt| plt.is_platform_match("iphone", &[], &[])),
        )
        .with(
            "windows",
            PlatformConfig::new()
                .superset("mobile")
                .subsets(["phablet", "tablet"])
                .setting("mode", "wp")
                .setting("autoFocusAssist", "immediate")
                .setting("hoverCSS", false)
                .matches(|plt| plt.is_platform_match("windows", &["windows phone"], &[]))
                .version_parser(|plt| plt.match_user_agent_version(&WINDOWS_VERSION)),
        )
        .with(
            "cordova",
            PlatformConfig::new()
                .engine()
                .initialize(|plt| plt.set_ready_trigger(ReadyTrigger::DeviceReady))
                .matches(is_cordova),
        )
        .with(
            "electron",
            PlatformConfig::new().superset("core").matches(is_electron),
        )
}
