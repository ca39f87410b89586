//! # Almacén de Resultados
//! src/jobs/store.rs
//!
//! Mapa thread-safe ticket → resultado. Cada job escribe una sola vez su
//! registro terminal; los lectores (polling y `/stats`) nunca ven un
//! registro a medio escribir porque todo pasa bajo el mismo `Mutex`.
//!
//! El `Condvar` se notifica en cada escritura para que `/stats` y el
//! apagado puedan esperar "N jobs terminados" sin hacer busy-wait.

use crate::jobs::{JobError, JobRecord, JobState, Ticket};
use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Datos protegidos por el mutex
#[derive(Default)]
struct StoreData {
    records: HashMap<Ticket, JobRecord>,

    /// Registros `Completed` (los `Failed` son `records.len() - completed`)
    completed: u64,
}

/// Store en memoria de los jobs terminados
pub struct JobStore {
    data: Arc<Mutex<StoreData>>,

    /// Se notifica cada vez que un job termina
    finished: Arc<Condvar>,
}

impl JobStore {
    pub fn new() -> Self {
        Self {
            data: Arc::new(Mutex::new(StoreData::default())),
            finished: Arc::new(Condvar::new()),
        }
    }

    // Los registros son write-once: un panic a mitad de `put` no deja
    // datos inconsistentes, así que se recupera el lock envenenado.
    fn lock(&self) -> MutexGuard<'_, StoreData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Guarda el resultado terminal de un job
    ///
    /// Retorna `AlreadyRecorded` si el ticket ya tenía resultado; el
    /// registro original no se toca.
    pub fn put(&self, record: JobRecord) -> Result<(), JobError> {
        {
            let mut data = self.lock();

            if data.records.contains_key(&record.ticket) {
                return Err(JobError::AlreadyRecorded(record.ticket));
            }

            if matches!(record.state, JobState::Completed { .. }) {
                data.completed += 1;
            }
            data.records.insert(record.ticket, record);
        }

        self.finished.notify_all();
        Ok(())
    }

    /// Estado de un ticket; `Pending` si todavía no hay resultado
    pub fn get(&self, ticket: Ticket) -> JobState {
        self.lock()
            .records
            .get(&ticket)
            .map(|record| record.state.clone())
            .unwrap_or(JobState::Pending)
    }

    /// Número de jobs completados con digest
    pub fn completed_count(&self) -> u64 {
        self.lock().completed
    }

    /// Número de jobs en estado terminal (completados + fallidos)
    pub fn finished_count(&self) -> u64 {
        self.lock().records.len() as u64
    }

    /// Duraciones de todos los jobs completados
    pub fn completed_durations(&self) -> Vec<Duration> {
        self.lock()
            .records
            .values()
            .filter_map(|record| match record.state {
                JobState::Completed { duration, .. } => Some(duration),
                _ => None,
            })
            .collect()
    }

    /// Bloquea hasta que haya al menos `target` jobs terminados
    ///
    /// Retorna `false` si venció el timeout antes de llegar.
    pub fn wait_for_finished(&self, target: u64, timeout: Duration) -> bool {
        let data = self.lock();

        let (data, _result) = self
            .finished
            .wait_timeout_while(data, timeout, |data| (data.records.len() as u64) < target)
            .unwrap_or_else(PoisonError::into_inner);

        data.records.len() as u64 >= target
    }
}

impl Default for JobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for JobStore {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            finished: Arc::clone(&self.finished),
        }
    }
}
