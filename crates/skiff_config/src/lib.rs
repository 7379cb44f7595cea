//! Skiff Config
//!
//! Layered app configuration over a resolved [`Platform`](skiff_platform::Platform).
//! Values come from URL query overrides, user settings (global and
//! per-platform), named mode bundles and the platform registry's own
//! settings.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use skiff_config::setup_config;
//! use skiff_platform::prelude::*;
//!
//! let env = StaticEnvironment::new(
//!     "Mozilla/5.0 (Linux; Android 7.1.1; Nexus 5X) AppleWebKit/537.36 Mobile Safari/537.36",
//! );
//! let plt = setup_platform(Box::new(env), default_registry()).unwrap();
//!
//! let config = setup_config(json!({ "tabsPlacement": "top" }), &plt);
//! assert_eq!(config.get("mode"), Some(json!("md")));
//! assert_eq!(config.get("tabsPlacement"), Some(json!("top")));
//! ```

pub mod config;
pub mod error;
pub mod mode;

pub use config::{setup_config, Config, QUERY_PREFIX};
pub use error::{ConfigError, Result};
pub use mode::default_modes;
