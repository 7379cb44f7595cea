//! Environment checks shared by platform predicates and settings

use crate::platform::Platform;

/// Running inside a Cordova/PhoneGap webview
pub fn is_cordova(plt: &Platform) -> bool {
    let env = plt.environment();
    env.has_global("cordova") || env.has_global("PhoneGap") || env.has_global("phonegap")
}

/// Running on an iOS device
pub fn is_ios(plt: &Platform) -> bool {
    plt.test_navigator_platform("iphone|ipad|ipod")
}

/// Running in Safari (or a browser claiming to be)
pub fn is_safari(plt: &Platform) -> bool {
    plt.test_user_agent("Safari")
}

/// Running in an iOS WKWebView
pub fn is_wk_webview(plt: &Platform) -> bool {
    is_ios(plt) && plt.environment().has_global("webkit")
}

/// Running in the legacy iOS UIWebView
pub fn is_ios_ui_webview(plt: &Platform) -> bool {
    is_ios(plt) && !is_wk_webview(plt) && !is_safari(plt)
}

/// Running in an Electron shell
pub fn is_electron(plt: &Platform) -> bool {
    plt.test_user_agent("Electron")
}
