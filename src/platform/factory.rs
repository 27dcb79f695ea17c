//! Platform service factory
//!
//! Creates platform services based on configuration.

use crate::auth::GitHubAuthConfig;
use crate::error::Result;
use crate::platform::{GitHubService, PlatformService};
use crate::types::{Platform, PlatformConfig};

/// Create a platform service from configuration and a resolved credential
pub fn create_platform_service(
    config: &PlatformConfig,
    auth: &GitHubAuthConfig,
) -> Result<Box<dyn PlatformService>> {
    match config.platform {
        Platform::GitHub => Ok(Box::new(GitHubService::new(
            &auth.token,
            config.owner.clone(),
            config.repo.clone(),
            config.host.clone(),
        )?)),
    }
}
