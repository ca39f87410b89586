//! # Seguimiento de Tareas en Vuelo
//! src/jobs/tracker.rs
//!
//! Contador tipo wait-group: cada tarea lanzada toma un `TaskGuard` y lo
//! suelta al terminar (también si hace panic). El apagado espera con
//! timeout a que el contador llegue a cero en vez de hacer spin.
//!
//! Se usa para los jobs de hashing y para las conexiones aceptadas.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::debug;

struct TrackerState {
    in_flight: Mutex<usize>,
    idle: Condvar,
}

/// Wait-group con nombre (para los logs)
#[derive(Clone)]
pub struct TaskTracker {
    name: &'static str,
    state: Arc<TrackerState>,
}

impl TaskTracker {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: Arc::new(TrackerState {
                in_flight: Mutex::new(0),
                idle: Condvar::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, usize> {
        self.state.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Registra una tarea nueva; se descuenta al soltar el guard
    pub fn track(&self) -> TaskGuard {
        *self.lock() += 1;
        TaskGuard {
            tracker: self.clone(),
        }
    }

    /// Tareas todavía en curso
    pub fn in_flight(&self) -> usize {
        *self.lock()
    }

    /// Espera a que no quede ninguna tarea, como máximo `timeout`
    ///
    /// Retorna `true` si el contador llegó a cero.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let count = self.lock();

        let (count, _result) = self
            .state
            .idle
            .wait_timeout_while(count, timeout, |count| *count > 0)
            .unwrap_or_else(PoisonError::into_inner);

        if *count > 0 {
            debug!(tracker = self.name, in_flight = *count, "wait for idle timed out");
        }

        *count == 0
    }

    fn release(&self) {
        let mut count = self.lock();
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.state.idle.notify_all();
        }
    }
}

/// Marca de una tarea en curso
pub struct TaskGuard {
    tracker: TaskTracker,
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.tracker.release();
    }
}
