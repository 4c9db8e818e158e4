// ABOUTME: Scripted fakes for the release collaborators.
// ABOUTME: Every call is appended to a shared log so tests can assert on order and absence.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use releasectl::platform::{
    BuildError, DeploymentStatus, HealthProbe, ImageBuilder, OrchestrationPlatform,
    PlatformError, Registry, RegistryError, ServiceSnapshot,
};
use releasectl::release::{
    Collaborators, ConvergencePolicy, HealthPolicy, ReleaseContext, ReleaseFlags, StopSignal,
};
use releasectl::types::{ClusterId, ImageRef, ImageTag, ServiceId};

pub const REGISTRY: &str = "123456789012.dkr.ecr.us-east-1.amazonaws.com/inference";
pub const HEALTH_URL: &str = "http://svc.test:8081/";

/// Shared, ordered record of collaborator calls.
#[derive(Clone, Default)]
pub struct Calls(Arc<Mutex<Vec<String>>>);

impl Calls {
    pub fn record(&self, call: impl Into<String>) {
        self.0.lock().push(call.into());
    }

    pub fn all(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    /// Number of calls whose name starts with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.0.lock().iter().filter(|c| c.starts_with(prefix)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().is_empty()
    }
}

// =============================================================================
// Builder
// =============================================================================

pub struct FakeBuilder {
    calls: Calls,
    unavailable: bool,
    fail_build: bool,
    stop_during_build: Option<StopSignal>,
}

impl FakeBuilder {
    pub fn new(calls: &Calls) -> Self {
        Self {
            calls: calls.clone(),
            unavailable: false,
            fail_build: false,
            stop_during_build: None,
        }
    }

    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail_build = true;
        self
    }

    /// Request a stop while the build is in flight.
    pub fn stopping_during_build(mut self, stop: StopSignal) -> Self {
        self.stop_during_build = Some(stop);
        self
    }
}

#[async_trait]
impl ImageBuilder for FakeBuilder {
    async fn preflight(&self) -> Result<(), BuildError> {
        self.calls.record("preflight");
        if self.unavailable {
            return Err(BuildError::Unavailable("daemon not running".to_string()));
        }
        Ok(())
    }

    async fn build(&self, _source: &Path, images: &[ImageRef]) -> Result<(), BuildError> {
        let tags: Vec<String> = images.iter().map(ToString::to_string).collect();
        self.calls.record(format!("build:{}", tags.join(",")));
        if let Some(stop) = &self.stop_during_build {
            stop.request();
        }
        if self.fail_build {
            return Err(BuildError::Failed {
                exit_code: Some(1),
                stderr: "COPY failed: file not found".to_string(),
            });
        }
        Ok(())
    }
}

// =============================================================================
// Registry
// =============================================================================

pub struct FakeRegistry {
    calls: Calls,
    fail_login: bool,
    fail_push: bool,
}

impl FakeRegistry {
    pub fn new(calls: &Calls) -> Self {
        Self {
            calls: calls.clone(),
            fail_login: false,
            fail_push: false,
        }
    }

    pub fn failing_login(mut self) -> Self {
        self.fail_login = true;
        self
    }

    pub fn failing_push(mut self) -> Self {
        self.fail_push = true;
        self
    }
}

#[async_trait]
impl Registry for FakeRegistry {
    async fn login(&self, registry: &str) -> Result<(), RegistryError> {
        self.calls.record(format!("login:{registry}"));
        if self.fail_login {
            return Err(RegistryError::Auth("token expired".to_string()));
        }
        Ok(())
    }

    async fn push(&self, image: &ImageRef) -> Result<(), RegistryError> {
        self.calls.record(format!("push:{image}"));
        if self.fail_push {
            return Err(RegistryError::Push("connection reset".to_string()));
        }
        Ok(())
    }
}

// =============================================================================
// Platform
// =============================================================================

/// One scripted answer to a describe call.
#[derive(Debug, Clone, Copy)]
pub enum Step {
    Observed(ServiceSnapshot),
    Unavailable,
}

pub fn pending(running: u32, desired: u32) -> Step {
    Step::Observed(ServiceSnapshot::new(running, desired, DeploymentStatus::Pending))
}

pub fn primary(running: u32, desired: u32) -> Step {
    Step::Observed(ServiceSnapshot::new(running, desired, DeploymentStatus::Primary))
}

pub fn failed(running: u32, desired: u32) -> Step {
    Step::Observed(ServiceSnapshot::new(running, desired, DeploymentStatus::Failed))
}

/// Answers describe calls from a script; the last step repeats forever.
pub struct ScriptedPlatform {
    calls: Calls,
    script: Vec<Step>,
    cursor: Mutex<usize>,
    fail_trigger: bool,
    stop_on_tick: Option<(usize, StopSignal)>,
}

impl ScriptedPlatform {
    pub fn new(calls: &Calls, script: Vec<Step>) -> Self {
        assert!(!script.is_empty(), "script needs at least one step");
        Self {
            calls: calls.clone(),
            script,
            cursor: Mutex::new(0),
            fail_trigger: false,
            stop_on_tick: None,
        }
    }

    pub fn failing_trigger(mut self) -> Self {
        self.fail_trigger = true;
        self
    }

    /// Request a stop while answering the `tick`th describe call (1-based).
    pub fn stopping_on(mut self, tick: usize, stop: StopSignal) -> Self {
        self.stop_on_tick = Some((tick, stop));
        self
    }
}

#[async_trait]
impl OrchestrationPlatform for ScriptedPlatform {
    async fn trigger_rollout(
        &self,
        cluster: &ClusterId,
        service: &ServiceId,
    ) -> Result<(), PlatformError> {
        self.calls.record(format!("trigger:{cluster}/{service}"));
        if self.fail_trigger {
            return Err(PlatformError::RolloutTrigger(
                "ServiceNotActiveException".to_string(),
            ));
        }
        Ok(())
    }

    async fn describe_service(
        &self,
        _cluster: &ClusterId,
        _service: &ServiceId,
    ) -> Result<ServiceSnapshot, PlatformError> {
        self.calls.record("describe");

        let step = {
            let mut cursor = self.cursor.lock();
            let step = self.script[(*cursor).min(self.script.len() - 1)];
            *cursor += 1;
            if let Some((tick, stop)) = &self.stop_on_tick {
                if *cursor == *tick {
                    stop.request();
                }
            }
            step
        };

        match step {
            Step::Observed(snapshot) => Ok(snapshot),
            Step::Unavailable => Err(PlatformError::Observability("throttled".to_string())),
        }
    }
}

// =============================================================================
// Probe
// =============================================================================

/// Answers probes from a script; the last answer repeats forever.
pub struct ScriptedProbe {
    calls: Calls,
    answers: Vec<bool>,
    cursor: Mutex<usize>,
    stop_on_attempt: Option<(usize, StopSignal)>,
}

impl ScriptedProbe {
    pub fn new(calls: &Calls, answers: Vec<bool>) -> Self {
        assert!(!answers.is_empty(), "script needs at least one answer");
        Self {
            calls: calls.clone(),
            answers,
            cursor: Mutex::new(0),
            stop_on_attempt: None,
        }
    }

    /// Request a stop while answering the `attempt`th probe (1-based).
    pub fn stopping_on(mut self, attempt: usize, stop: StopSignal) -> Self {
        self.stop_on_attempt = Some((attempt, stop));
        self
    }

    /// Healthy on the `n`th attempt (1-based), unhealthy before.
    pub fn healthy_on(calls: &Calls, n: usize) -> Self {
        let mut answers = vec![false; n - 1];
        answers.push(true);
        Self::new(calls, answers)
    }

    pub fn never_healthy(calls: &Calls) -> Self {
        Self::new(calls, vec![false])
    }
}

#[async_trait]
impl HealthProbe for ScriptedProbe {
    async fn check(&self, url: &str) -> bool {
        self.calls.record(format!("probe:{url}"));
        let mut cursor = self.cursor.lock();
        let answer = self.answers[(*cursor).min(self.answers.len() - 1)];
        *cursor += 1;
        if let Some((attempt, stop)) = &self.stop_on_attempt {
            if *cursor == *attempt {
                stop.request();
            }
        }
        answer
    }
}

// =============================================================================
// Wiring
// =============================================================================

pub type Fakes = Collaborators<FakeBuilder, FakeRegistry, ScriptedPlatform, ScriptedProbe>;

/// Collaborators that succeed everywhere; the service converges on the first tick.
pub fn happy(calls: &Calls) -> Fakes {
    Collaborators {
        builder: FakeBuilder::new(calls),
        registry: FakeRegistry::new(calls),
        platform: ScriptedPlatform::new(calls, vec![primary(1, 1)]),
        probe: ScriptedProbe::healthy_on(calls, 1),
    }
}

pub fn convergence_policy() -> ConvergencePolicy {
    ConvergencePolicy::new(Duration::from_secs(120), Duration::from_secs(30)).unwrap()
}

pub fn health_policy(max_attempts: u32) -> HealthPolicy {
    HealthPolicy::new(max_attempts, Duration::from_secs(10), HEALTH_URL).unwrap()
}

pub fn context(flags: ReleaseFlags) -> ReleaseContext {
    ReleaseContext {
        registry_url: REGISTRY.to_string(),
        cluster: "gpu-cluster".to_string(),
        service: "inference-service".to_string(),
        region: "us-east-1".to_string(),
        source: ".".into(),
        tag: ImageTag::new("20260301-123045").unwrap(),
        tag_latest: true,
        flags,
        convergence: convergence_policy(),
        health: health_policy(3),
    }
}

pub fn cluster() -> ClusterId {
    ClusterId::new("gpu-cluster").unwrap()
}

pub fn service() -> ServiceId {
    ServiceId::new("inference-service").unwrap()
}
