// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Writes a release.yml template wired to provisioning outputs.

use std::path::Path;

use crate::error::{Error, Result};

use super::CONFIG_FILENAME;

const TEMPLATE: &str = r#"# Values may be literals or { env: NAME, default: ... } references.
registry: { env: ECR_REPOSITORY_URL }
cluster: { env: ECS_CLUSTER_NAME }
service: { env: ECS_SERVICE_NAME }
region: { env: AWS_REGION, default: us-east-1 }
health_url: { env: SERVICE_URL }

build:
  source: .
  platform: linux/amd64
  tag_latest: true

convergence:
  max_wait: 10m
  poll_interval: 30s

health:
  path: /
  max_attempts: 10
  delay: 30s
  timeout: 10s
"#;

pub fn init_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    std::fs::write(&config_path, TEMPLATE)?;
    Ok(())
}
