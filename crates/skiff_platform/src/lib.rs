//! Skiff Platform Detection
//!
//! This crate works out which platform a hybrid app is running on and
//! exposes the answer to the rest of the framework.
//!
//! # Architecture
//!
//! - [`PlatformRegistry`] - Declarative platform definitions (predicates,
//!   supersets/subsets, settings, version parsers, init hooks)
//! - [`Environment`] - Host accessor for user agent, URL, viewport and document
//! - [`Platform`] - Resolves the platform chain and answers queries about it
//!
//! Resolution turns a registry plus environment signals into an ordered
//! chain such as `mobile -> ios -> iphone`. See [`node`] for the algorithm.
//!
//! # Example
//!
//! ```rust
//! use skiff_platform::{default_registry, setup_platform, StaticEnvironment};
//!
//! let env = StaticEnvironment::new(
//!     "Mozilla/5.0 (iPhone; CPU iPhone OS 10_3 like Mac OS X) AppleWebKit/603.1.30",
//! )
//! .with_navigator_platform("iPhone")
//! .with_url("http://localhost:8100/");
//!
//! let plt = setup_platform(Box::new(env), default_registry()).unwrap();
//!
//! assert!(plt.is("ios"));
//! assert_eq!(plt.platforms(), ["mobile", "ios", "iphone", "mobileweb"]);
//! assert_eq!(plt.version().map(|v| v.major), Some(10));
//! ```

mod back_button;
mod defaults;
mod environment;
mod error;
mod event;
pub mod node;
mod platform;
mod query;
mod ready;
mod registry;
mod setup;
pub mod utils;
mod version;


// Re-export all public types
pub use back_button::{BackButtonActions, BackButtonHandle};
pub use defaults::default_registry;
pub use environment::{Environment, StaticEnvironment};
pub use error::{PlatformError, Result};
pub use event::{Debouncer, EventEmitter, HostEvent, ListenerHandle, RESIZE_DEBOUNCE};
pub use node::{resolve_chain, MAX_CHAIN_DEPTH, PLATFORM_OVERRIDE_PARAM};
pub use platform::{Platform, DEFAULT_PLATFORM};
pub use query::QueryParams;
pub use ready::{ReadySignal, ReadyTrigger};
pub use registry::{
    ComputedSettingFn, InitializeFn, MatchFn, PlatformConfig, PlatformRegistry, SettingValue,
    VersionParserFn,
};
pub use setup::setup_platform;
pub use version::{PlatformVersion, RawVersion};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::defaults::default_registry;
    pub use crate::environment::{Environment, StaticEnvironment};
    pub use crate::error::{PlatformError, Result};
    pub use crate::event::HostEvent;
    pub use crate::platform::Platform;
    pub use crate::registry::{PlatformConfig, PlatformRegistry};
    pub use crate::setup::setup_platform;
}
