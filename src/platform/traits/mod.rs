// ABOUTME: Capability traits for the external collaborators of a release.
// ABOUTME: Defines ImageBuilder, Registry, OrchestrationPlatform, HealthProbe.

mod builder;
mod orchestrator;
mod probe;
mod registry;
mod shared_types;

pub use builder::{BuildError, ImageBuilder};
pub use orchestrator::{OrchestrationPlatform, PlatformError};
pub use probe::HealthProbe;
pub use registry::{Registry, RegistryError};
pub use shared_types::*;
