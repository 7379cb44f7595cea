//! Stock mode configs
//!
//! A mode is a named bundle of defaults picked through a `mode` setting,
//! either by the user or by a platform's registry settings.

use serde_json::{json, Map, Value};

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// The framework's stock modes: `ios`, `md` and `wp`
pub fn default_modes() -> Vec<(&'static str, Map<String, Value>)> {
    vec![
        (
            "ios",
            object(json!({
                "activator": "highlight",
                "backButtonIcon": "ios-arrow-back",
                "backButtonText": "Back",
                "iconMode": "ios",
                "menuType": "reveal",
                "pageTransition": "ios-transition",
                "spinner": "ios",
                "tabsHighlight": false,
                "tabsPlacement": "bottom",
            })),
        ),
        (
            "md",
            object(json!({
                "activator": "ripple",
                "backButtonIcon": "md-arrow-back",
                "backButtonText": "",
                "iconMode": "md",
                "menuType": "overlay",
                "pageTransition": "md-transition",
                "spinner": "crescent",
                "tabsHighlight": false,
                "tabsPlacement": "bottom",
            })),
        ),
        (
            "wp",
            object(json!({
                "activator": "highlight",
                "backButtonIcon": "ios-arrow-back",
                "backButtonText": "",
                "iconMode": "ios",
                "menuType": "overlay",
                "pageTransition": "wp-transition",
                "spinner": "circles",
                "tabsHighlight": false,
                "tabsPlacement": "top",
            })),
        ),
    ]
}
