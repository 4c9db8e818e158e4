// ABOUTME: ECR-backed registry: token login via the aws CLI, push via docker.
// ABOUTME: Keeps authentication failures distinct from transfer failures.

use super::command::run_command;
use super::traits::{Registry, RegistryError};
use crate::types::ImageRef;
use async_trait::async_trait;

/// Publishes images to an Amazon ECR repository.
pub struct EcrRegistry {
    region: String,
    aws: String,
    docker: String,
}

impl EcrRegistry {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            aws: "aws".to_string(),
            docker: "docker".to_string(),
        }
    }

    /// Override the binaries used for login and push.
    pub fn with_programs(mut self, aws: impl Into<String>, docker: impl Into<String>) -> Self {
        self.aws = aws.into();
        self.docker = docker.into();
        self
    }

    async fn login_password(&self) -> Result<String, RegistryError> {
        let args = vec![
            "ecr".to_string(),
            "get-login-password".to_string(),
            "--region".to_string(),
            self.region.clone(),
        ];

        let output = run_command(&self.aws, &args, None)
            .await
            .map_err(|e| RegistryError::Auth(format!("{}: {e}", self.aws)))?;

        if !output.success {
            return Err(RegistryError::Auth(format!(
                "could not obtain registry token: {}",
                output.diagnostic()
            )));
        }

        let password = output.stdout.trim().to_string();
        if password.is_empty() {
            return Err(RegistryError::Auth("registry token was empty".to_string()));
        }
        Ok(password)
    }
}

#[async_trait]
impl Registry for EcrRegistry {
    async fn login(&self, registry: &str) -> Result<(), RegistryError> {
        let password = self.login_password().await?;

        let args = vec![
            "login".to_string(),
            "--username".to_string(),
            "AWS".to_string(),
            "--password-stdin".to_string(),
            registry.to_string(),
        ];

        let output = run_command(&self.docker, &args, Some(password.as_bytes()))
            .await
            .map_err(|e| RegistryError::Auth(format!("{}: {e}", self.docker)))?;

        if !output.success {
            return Err(RegistryError::Auth(format!(
                "docker login to {registry} failed: {}",
                output.diagnostic()
            )));
        }

        Ok(())
    }

    async fn push(&self, image: &ImageRef) -> Result<(), RegistryError> {
        let args = vec!["push".to_string(), image.to_string()];

        let output = run_command(&self.docker, &args, None)
            .await
            .map_err(|e| RegistryError::Push(format!("{}: {e}", self.docker)))?;

        if !output.success {
            return Err(RegistryError::Push(format!(
                "{image}: {}",
                output.diagnostic()
            )));
        }

        Ok(())
    }
}
