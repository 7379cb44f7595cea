//! Composition root

use std::sync::Arc;

use crate::environment::Environment;
use crate::error::Result;
use crate::platform::{Platform, DEFAULT_PLATFORM};
use crate::registry::PlatformRegistry;

/// Build and resolve a [`Platform`] from a host environment
///
/// Reads direction and language from the document (without writing them
/// back), the navigator platform, user agent and URL query, then resolves
/// the platform chain and arms the ready signal. The platform is handed
/// back to the caller to pass on explicitly.
pub fn setup_platform(
    env: Box<dyn Environment>,
    registry: impl Into<Arc<PlatformRegistry>>,
) -> Result<Platform> {
    let mut plt = Platform::new(env);
    plt.set_default(DEFAULT_PLATFORM);
    plt.set_platform_configs(registry);

    let env = plt.environment();
    let dir = env.document_attribute("dir").unwrap_or_default();
    let lang = env.document_attribute("lang").unwrap_or_default();
    let navigator_platform = env.navigator_platform();
    let user_agent = env.user_agent();
    let url = env.url();

    plt.set_dir(&dir, false);
    plt.set_lang(&lang, false);
    plt.set_navigator_platform(navigator_platform);
    plt.set_user_agent(user_agent);
    plt.set_query_params(&url);

    plt.init()?;
    plt.prepare_ready();

    tracing::debug!("platform setup complete: {:?}", plt);
    Ok(plt)
}
