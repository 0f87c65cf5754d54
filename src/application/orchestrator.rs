//! Service Lifecycle Orchestrator
//!
//! Drives a heterogeneous set of services through register -> start ->
//! shutdown under one fail-fast group. The first real failure of any task
//! cancels every sibling; a clean stop (signal, or an external shutdown
//! request) unwinds everything and reports success.

use crate::adapters::outbound::{HttpRegistry, NoopRegistry};
use crate::config::Config;
use crate::domain::entities::ServiceInstance;
use crate::domain::ports::{Service, ServiceRegistry};
use crate::domain::value_objects::ServiceGroup;
use crate::infrastructure::shutdown::{shutdown_signal, ShutdownController};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinSet;
use uuid::Uuid;

/// Grace period a service gets to stop after being asked to shut down.
/// Independent per service; teardown is parallel, so total wind-down time
/// is bounded by this, not by the number of services.
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Bound on the best-effort deregister call during teardown.
const DEREGISTER_TIMEOUT: Duration = Duration::from_secs(5);

/// A long-running task hosted alongside the services (queue consumer,
/// background writer). Its failure cancels the whole run; on cancellation
/// the future is dropped.
pub type AuxTask = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'static>>;

/// Errors terminating a run. Only the first one among all parallel tasks
/// propagates; a plain cancellation is a clean stop, not an error.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// A second `run` on the same orchestrator
    #[error("orchestrator has already been started")]
    AlreadyRunning,
    /// The directory rejected or could not be reached
    #[error("registration failed for service {service}: {reason}")]
    Registration {
        service: String,
        reason: anyhow::Error,
    },
    /// A service's start routine returned an error
    #[error("service {service} failed: {reason}")]
    Start {
        service: String,
        reason: anyhow::Error,
    },
    /// An auxiliary task returned an error
    #[error("auxiliary task failed: {0}")]
    Aux(anyhow::Error),
    #[error("task panicked: {0}")]
    Panicked(String),
}

/// Coordinates the lifecycle of every hosted service.
///
/// Built once, run once: a second `run` is rejected rather than silently
/// restarting.
pub struct Orchestrator {
    registry: Arc<dyn ServiceRegistry>,
    services: Vec<Arc<dyn Service>>,
    application_id: String,
    grace_period: Duration,
    controller: ShutdownController,
    started: AtomicBool,
}

impl Orchestrator {
    /// Create an orchestrator backed by the given directory.
    pub fn new(registry: Arc<dyn ServiceRegistry>) -> Self {
        Self {
            registry,
            services: Vec::new(),
            application_id: Uuid::new_v4().to_string(),
            grace_period: DEFAULT_SHUTDOWN_GRACE,
            controller: ShutdownController::new(),
            started: AtomicBool::new(false),
        }
    }

    /// Create an orchestrator from configuration: an HTTP directory when
    /// a registry URL is configured, the no-op stub otherwise.
    pub fn from_config(cfg: &Config) -> Self {
        let registry: Arc<dyn ServiceRegistry> = match &cfg.registry_url {
            Some(url) => Arc::new(HttpRegistry::new(url.clone(), cfg.namespace.clone())),
            None => Arc::new(NoopRegistry::new()),
        };
        let mut orchestrator = Self::new(registry);
        if let Some(id) = &cfg.application_id {
            orchestrator.application_id = id.clone();
        }
        orchestrator.grace_period = Duration::from_secs(cfg.shutdown_grace_secs);
        orchestrator
    }

    /// Override the per-service shutdown grace period.
    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    /// Unique id of this application instance.
    pub fn application_id(&self) -> &str {
        &self.application_id
    }

    /// Add a service to be hosted by the next `run`.
    pub fn add_service(&mut self, svc: Arc<dyn Service>) {
        self.services.push(svc);
    }

    /// Handle for requesting a stop from outside the run. Threading the
    /// caller's own cancellation into the run goes through this.
    pub fn shutdown_handle(&self) -> ShutdownController {
        self.controller.clone()
    }

    /// Query the directory for live instances of a service.
    pub async fn service_instances(
        &self,
        name: &str,
        group: &ServiceGroup,
    ) -> anyhow::Result<Vec<ServiceInstance>> {
        self.registry.service_instances(name, group).await
    }

    /// Run every added service until one fails or a stop is requested.
    pub async fn run(&self) -> Result<(), RunError> {
        self.run_with(Vec::new()).await
    }

    /// Run services plus auxiliary long-running tasks.
    ///
    /// Per service two tasks are spawned under one fail-fast group: one
    /// keeps the directory registration alive and deregisters on the way
    /// out; one runs `start` and, when the group unwinds first, invokes
    /// `shutdown` bounded by the grace period without waiting for `start`
    /// itself. A further task listens for termination signals. The first
    /// real error cancels everything and is returned; a signal-initiated
    /// stop returns Ok.
    pub async fn run_with(&self, aux_tasks: Vec<AuxTask>) -> Result<(), RunError> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(RunError::AlreadyRunning);
        }

        let mut tasks: JoinSet<Result<(), RunError>> = JoinSet::new();

        for svc in &self.services {
            tasks.spawn(Self::registration_task(
                self.registry.clone(),
                svc.clone(),
                self.controller.clone(),
            ));
            tasks.spawn(Self::service_task(
                svc.clone(),
                self.controller.clone(),
                self.grace_period,
            ));
        }

        for task in aux_tasks {
            let controller = self.controller.clone();
            tasks.spawn(async move {
                tracing::debug!("running auxiliary task");
                tokio::select! {
                    res = task => res.map_err(RunError::Aux),
                    _ = controller.cancelled() => Ok(()),
                }
            });
        }

        let controller = self.controller.clone();
        tasks.spawn(async move {
            tokio::select! {
                _ = shutdown_signal() => controller.shutdown(),
                _ = controller.cancelled() => {}
            }
            Ok(())
        });

        let mut first_error: Option<RunError> = None;
        while let Some(joined) = tasks.join_next().await {
            let result = match joined {
                Ok(res) => res,
                Err(e) if e.is_panic() => Err(RunError::Panicked(e.to_string())),
                Err(_) => Ok(()),
            };
            if let Err(err) = result {
                if first_error.is_none() {
                    tracing::error!("service run failed: {}", err);
                    first_error = Some(err);
                }
                self.controller.shutdown();
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Keeps one service registered for the lifetime of the run, then
    /// deregisters it best-effort.
    async fn registration_task(
        registry: Arc<dyn ServiceRegistry>,
        svc: Arc<dyn Service>,
        controller: ShutdownController,
    ) -> Result<(), RunError> {
        if let Err(reason) = registry.register(svc.as_ref()).await {
            return Err(RunError::Registration {
                service: svc.name().to_string(),
                reason,
            });
        }

        controller.cancelled().await;

        match tokio::time::timeout(DEREGISTER_TIMEOUT, registry.deregister(svc.as_ref())).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!("deregister failed for {}: {:#}", svc.name(), e),
            Err(_) => tracing::warn!("deregister timed out for {}", svc.name()),
        }
        Ok(())
    }

    /// Runs one service's start, and its shutdown when the group unwinds
    /// first.
    async fn service_task(
        svc: Arc<dyn Service>,
        controller: ShutdownController,
        grace_period: Duration,
    ) -> Result<(), RunError> {
        let (entered_tx, entered_rx) = oneshot::channel::<()>();
        let runner = svc.clone();
        let mut start_handle = tokio::spawn(async move {
            let addr = runner.discovery();
            tracing::info!("starting service name={} addr={}", runner.name(), addr);
            let _ = entered_tx.send(());
            runner.start().await
        });

        tokio::select! {
            joined = &mut start_handle => match joined {
                Ok(Ok(())) => Ok(()),
                Ok(Err(reason)) => Err(RunError::Start {
                    service: svc.name().to_string(),
                    reason,
                }),
                Err(e) => Err(RunError::Panicked(e.to_string())),
            },
            _ = controller.cancelled() => {
                // Never ask a service to stop before its start was invoked
                let _ = entered_rx.await;
                if tokio::time::timeout(grace_period, svc.shutdown()).await.is_err() {
                    tracing::warn!(
                        "service {} did not stop within {:?}",
                        svc.name(),
                        grace_period
                    );
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::adapters::outbound::NoopRegistry;

    #[tokio::test]
    async fn test_run_returns_clean_on_external_stop() {
        let orchestrator = Orchestrator::new(Arc::new(NoopRegistry::new()));
        orchestrator.shutdown_handle().shutdown();

        let result = orchestrator.run().await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_second_run_is_rejected() {
        let orchestrator = Orchestrator::new(Arc::new(NoopRegistry::new()));
        orchestrator.shutdown_handle().shutdown();

        orchestrator.run().await.unwrap();
        let second = orchestrator.run().await;
        assert!(matches!(second, Err(RunError::AlreadyRunning)));
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn test_aux_task_error_fails_the_run() {
        let orchestrator = Orchestrator::new(Arc::new(NoopRegistry::new()));

        let aux: AuxTask = Box::pin(async { anyhow::bail!("consumer lost its queue") });
        let result = orchestrator.run_with(vec![aux]).await;

        match result {
            Err(RunError::Aux(e)) => assert!(e.to_string().contains("queue")),
            other => panic!("expected aux failure, got {:?}", other),
        }
        assert!(logs_contain("service run failed"));
    }

    #[test]
    fn test_application_id_defaults_to_uuid() {
        let orchestrator = Orchestrator::new(Arc::new(NoopRegistry::new()));
        assert!(!orchestrator.application_id().is_empty());
    }

    #[test]
    fn test_from_config_applies_overrides() {
        let cfg = Config {
            application_id: Some("app-1".to_string()),
            shutdown_grace_secs: 2,
            ..Default::default()
        };
        let orchestrator = Orchestrator::from_config(&cfg);
        assert_eq!(orchestrator.application_id(), "app-1");
        assert_eq!(orchestrator.grace_period, Duration::from_secs(2));
    }
}
