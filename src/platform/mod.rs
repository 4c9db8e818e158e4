// ABOUTME: External collaborators of the release pipeline.
// ABOUTME: Capability traits plus Docker, ECR, ECS, and HTTP implementations.

mod command;
mod docker;
mod ecr;
mod ecs;
mod http_probe;
pub mod traits;

pub use command::{CommandOutput, run_command};
pub use docker::{BuildOptions, DockerCli};
pub use ecr::EcrRegistry;
pub use ecs::EcsCli;
pub use http_probe::HttpProbe;
pub use traits::*;
