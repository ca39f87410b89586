//! # Procesador de Jobs
//! src/jobs/processor.rs
//!
//! Cada submission aceptada se procesa en su propio thread:
//!
//! ```text
//! Pending ──dispatch──▶ Processing ──retardo + transform──▶ Completed
//!                            │
//!                            └──abort durante el retardo──▶ Failed
//! ```
//!
//! El thread se registra en el `TaskTracker` de jobs, así el apagado puede
//! esperarlo. Durante el retardo artificial no se toma ningún lock del
//! store; solo se mide la llamada a `transform`.

use crate::jobs::{transform, JobRecord, JobStore, TaskTracker, Ticket};
use crate::lifecycle::Lifecycle;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

/// Mensaje del registro `Failed` de un job interrumpido por el apagado
pub const ABANDONED_ERROR: &str = "abandoned during shutdown";

/// Lanza y ejecuta jobs de hashing
#[derive(Clone)]
pub struct JobProcessor {
    store: JobStore,
    tracker: TaskTracker,
    lifecycle: Lifecycle,

    /// Retardo artificial antes de calcular el hash
    delay: Duration,
}

impl JobProcessor {
    pub fn new(store: JobStore, tracker: TaskTracker, lifecycle: Lifecycle, delay: Duration) -> Self {
        Self {
            store,
            tracker,
            lifecycle,
            delay,
        }
    }

    /// Lanza el job en segundo plano y retorna de inmediato
    pub fn dispatch(&self, ticket: Ticket, password: String) {
        let guard = self.tracker.track();
        let worker = self.clone();

        let spawned = thread::Builder::new()
            .name(format!("job-{}", ticket))
            .spawn(move || {
                let _guard = guard;
                worker.process(ticket, &password);
            });

        // Sin thread no hay job: se registra como fallido para que los
        // contadores de /stats y del apagado sigan cuadrando.
        if let Err(e) = spawned {
            error!(%ticket, error = %e, "could not spawn job thread");
            self.commit(JobRecord::failed(ticket, format!("could not start job: {}", e)));
        }
    }

    /// Ejecuta un job en el thread actual
    pub fn process(&self, ticket: Ticket, password: &str) {
        debug!(%ticket, delay_ms = self.delay.as_millis() as u64, "job processing");

        if self.lifecycle.wait_abort(self.delay) {
            warn!(%ticket, "job abandoned during shutdown");
            self.commit(JobRecord::failed(ticket, ABANDONED_ERROR));
            return;
        }

        let start = Instant::now();
        let digest = transform(password);
        let duration = start.elapsed();

        debug!(%ticket, duration_us = duration.as_micros() as u64, "job completed");
        self.commit(JobRecord::completed(ticket, digest, duration));
    }

    fn commit(&self, record: JobRecord) {
        if let Err(e) = self.store.put(record) {
            error!(error = %e, "job result discarded");
        }
    }
}
