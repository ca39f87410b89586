//! # Servicio de Hashing
//! src/jobs/service.rs
//!
//! Punto central del sistema de jobs: reúne el asignador de tickets, el
//! store, el procesador y el seguimiento de jobs en vuelo. Se construye una
//! vez al arrancar y se pasa a todos los handlers.

use crate::config::Config;
use crate::jobs::{
    stats, JobError, JobProcessor, JobState, JobStore, SiteStats, TaskTracker, Ticket,
    TicketAllocator,
};
use crate::lifecycle::{Lifecycle, ShutdownReport};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Plazo para que los jobs abortados registren su fallo
const ABORT_GRACE: Duration = Duration::from_secs(1);

/// Configuración del servicio
#[derive(Debug, Clone)]
pub struct HashServiceConfig {
    /// Retardo artificial antes de cada hash
    pub delay: Duration,

    /// Espera máxima de `/stats`
    pub stats_timeout: Duration,

    /// Espera máxima por los jobs al apagar
    pub shutdown_timeout: Duration,
}

impl Default for HashServiceConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(5),
            stats_timeout: Duration::from_secs(30),
            shutdown_timeout: Duration::from_secs(60),
        }
    }
}

impl HashServiceConfig {
    /// Crea una configuración desde el Config principal
    pub fn from_config(config: &Config) -> Self {
        Self {
            delay: Duration::from_millis(config.delay_ms),
            stats_timeout: Duration::from_millis(config.stats_timeout_ms),
            shutdown_timeout: Duration::from_millis(config.shutdown_timeout_ms),
        }
    }
}

/// Servicio de hashing asíncrono
#[derive(Clone)]
pub struct HashService {
    config: HashServiceConfig,
    allocator: Arc<TicketAllocator>,
    store: JobStore,
    jobs: TaskTracker,
    processor: JobProcessor,
    lifecycle: Lifecycle,
}

impl HashService {
    pub fn new(config: HashServiceConfig, lifecycle: Lifecycle) -> Self {
        let store = JobStore::new();
        let jobs = TaskTracker::new("jobs");
        let processor = JobProcessor::new(store.clone(), jobs.clone(), lifecycle.clone(), config.delay);

        Self {
            config,
            allocator: Arc::new(TicketAllocator::new()),
            store,
            jobs,
            processor,
            lifecycle,
        }
    }

    /// Acepta un password: reserva ticket, lanza el job y retorna enseguida
    pub fn submit(&self, password: String) -> Result<Ticket, JobError> {
        if !self.lifecycle.is_accepting() {
            return Err(JobError::ShuttingDown);
        }

        let ticket = self.allocator.allocate();
        self.processor.dispatch(ticket, password);

        info!(%ticket, "job submitted");
        Ok(ticket)
    }

    /// Estado actual de un ticket
    pub fn lookup(&self, ticket: Ticket) -> JobState {
        self.store.get(ticket)
    }

    /// Estadísticas sobre todos los jobs (espera acotada)
    pub fn stats(&self) -> Result<SiteStats, JobError> {
        stats::collect(&self.allocator, &self.store, self.config.stats_timeout)
    }

    /// Jobs enviados hasta ahora
    pub fn submitted(&self) -> u64 {
        self.allocator.issued()
    }

    /// Jobs en estado terminal
    pub fn finished(&self) -> u64 {
        self.store.finished_count()
    }

    /// Jobs cuyo thread sigue vivo
    pub fn in_flight(&self) -> usize {
        self.jobs.in_flight()
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn config(&self) -> &HashServiceConfig {
        &self.config
    }

    /// Espera a los jobs despachados; al vencer el plazo los aborta
    pub fn drain(&self) -> ShutdownReport {
        let pending = self.jobs.in_flight();
        if pending > 0 {
            info!(pending, timeout_ms = self.config.shutdown_timeout.as_millis() as u64, "waiting for outstanding jobs");
        }

        if self.jobs.wait_idle(self.config.shutdown_timeout) {
            return ShutdownReport::Complete;
        }

        self.lifecycle.abort_outstanding();
        self.jobs.wait_idle(ABORT_GRACE);

        let remaining = (self.submitted() - self.store.completed_count()) as usize;
        warn!(
            tracker = self.jobs.name(),
            remaining,
            submitted = self.submitted(),
            finished = self.finished(),
            "shutdown timeout elapsed, outstanding jobs abandoned"
        );

        ShutdownReport::Timeout { remaining }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(delay_ms: u64, stats_ms: u64, shutdown_ms: u64) -> HashService {
        let config = HashServiceConfig {
            delay: Duration::from_millis(delay_ms),
            stats_timeout: Duration::from_millis(stats_ms),
            shutdown_timeout: Duration::from_millis(shutdown_ms),
        };
        HashService::new(config, Lifecycle::new())
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.delay_ms = 250;
        config.stats_timeout_ms = 1_000;
        config.shutdown_timeout_ms = 2_000;

        let service_config = HashServiceConfig::from_config(&config);
        assert_eq!(service_config.delay, Duration::from_millis(250));
        assert_eq!(service_config.stats_timeout, Duration::from_secs(1));
        assert_eq!(service_config.shutdown_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_submit_returns_sequential_tickets() {
        let service = service(10, 5_000, 5_000);

        assert_eq!(service.submit("foo".into()).unwrap().external(), 1);
        assert_eq!(service.submit("bar".into()).unwrap().external(), 2);
        assert_eq!(service.submitted(), 2);
    }

    #[test]
    fn test_lookup_pending_then_completed() {
        let service = service(100, 5_000, 5_000);
        let ticket = service.submit("foo".into()).unwrap();

        assert_eq!(service.lookup(ticket), JobState::Pending);

        let stats = service.stats().unwrap();
        assert_eq!(stats.total, 1);

        let first = service.lookup(ticket);
        assert!(matches!(first, JobState::Completed { .. }));
        assert_eq!(service.lookup(ticket), first);
    }

    #[test]
    fn test_stats_not_ready() {
        let service = service(2_000, 20, 5_000);
        service.submit("foo".into()).unwrap();

        let err = service.stats().unwrap_err();
        assert_eq!(err, JobError::StatsNotReady { finished: 0, total: 1 });
    }

    #[test]
    fn test_submit_rejected_while_draining() {
        let service = service(10, 5_000, 5_000);
        service.lifecycle().request_shutdown();

        assert_eq!(service.submit("foo".into()), Err(JobError::ShuttingDown));
        assert_eq!(service.submitted(), 0);
    }

    #[test]
    fn test_drain_waits_for_jobs() {
        let service = service(100, 5_000, 5_000);
        let ticket = service.submit("foo".into()).unwrap();

        service.lifecycle().request_shutdown();
        assert_eq!(service.drain(), ShutdownReport::Complete);
        assert!(matches!(service.lookup(ticket), JobState::Completed { .. }));
        assert_eq!(service.in_flight(), 0);
    }

    #[test]
    fn test_drain_timeout_abandons_jobs() {
        let service = service(30_000, 5_000, 50);
        let ticket = service.submit("foo".into()).unwrap();

        service.lifecycle().request_shutdown();
        assert_eq!(service.drain(), ShutdownReport::Timeout { remaining: 1 });
        assert!(matches!(service.lookup(ticket), JobState::Failed { .. }));
        // El abandonado cuenta como terminado
        assert_eq!(service.finished(), 1);
    }

    #[test]
    fn test_drain_without_jobs() {
        let service = service(10, 5_000, 5_000);
        service.lifecycle().request_shutdown();
        assert_eq!(service.drain(), ShutdownReport::Complete);
    }
}
