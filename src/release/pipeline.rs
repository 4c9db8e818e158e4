// ABOUTME: Generic release struct parameterized by state marker.
// ABOUTME: Built from a ReleaseContext once its identifiers validate.

use crate::types::{ClusterId, ImageRef, ImageTag, Repository, ServiceId};

use super::context::ReleaseContext;
use super::error::ReleaseError;
use super::state::Resolved;

/// A release in progress, parameterized by its current state.
///
/// Transitions consume the release and return it in the next state, so a
/// rollout can only be triggered on a published release and health can only be
/// verified on a converged one.
#[derive(Debug)]
pub struct Release<S> {
    pub(crate) repository: Repository,
    pub(crate) cluster: ClusterId,
    pub(crate) service: ServiceId,
    /// Release tag first, then `latest` when enabled.
    pub(crate) images: Vec<ImageRef>,
    pub(crate) state: S,
}

impl Release<Resolved> {
    /// Validate the context's identifiers. Performs no side effects.
    ///
    /// # Errors
    ///
    /// Returns `ReleaseError::Configuration` if the registry endpoint, cluster,
    /// service, or region is missing or malformed, if a health URL is needed but
    /// missing or not plain `http://`, or if the flags contradict each other.
    pub fn resolve(ctx: &ReleaseContext) -> Result<Self, ReleaseError> {
        let flags = ctx.flags;
        if flags.build_only && flags.skip_build {
            return Err(configuration("--build-only and --skip-build cannot be combined"));
        }

        if ctx.registry_url.trim().is_empty() {
            return Err(configuration("registry endpoint is required"));
        }
        let repository = Repository::parse(&ctx.registry_url)
            .map_err(|e| configuration(format!("registry endpoint: {e}")))?;

        let cluster =
            ClusterId::new(&ctx.cluster).map_err(|e| configuration(format!("cluster: {e}")))?;
        let service =
            ServiceId::new(&ctx.service).map_err(|e| configuration(format!("service: {e}")))?;

        if ctx.region.trim().is_empty() {
            return Err(configuration("region is required"));
        }

        let needs_health_url = !flags.build_only && !flags.skip_health_check;
        if needs_health_url {
            let url = ctx.health.health_url().trim();
            if url.is_empty() {
                return Err(configuration("health URL is required unless health checks are skipped"));
            }
            // The probe client only speaks plain HTTP.
            if !url.starts_with("http://") {
                return Err(configuration(format!("health URL must use http://, got {url}")));
            }
        }

        let mut images = vec![repository.tagged(&ctx.tag)];
        if ctx.tag_latest && ctx.tag != ImageTag::latest() {
            images.push(repository.tagged(&ImageTag::latest()));
        }

        Ok(Release {
            repository,
            cluster,
            service,
            images,
            state: Resolved,
        })
    }
}

impl<S> Release<S> {
    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    pub fn cluster(&self) -> &ClusterId {
        &self.cluster
    }

    pub fn service(&self) -> &ServiceId {
        &self.service
    }

    /// The release-tagged image reference.
    pub fn image(&self) -> &ImageRef {
        &self.images[0]
    }

    /// Every reference built and pushed for this release.
    pub fn images(&self) -> &[ImageRef] {
        &self.images
    }

    pub fn state(&self) -> &S {
        &self.state
    }
}

fn configuration(message: impl Into<String>) -> ReleaseError {
    ReleaseError::Configuration {
        message: message.into(),
    }
}
