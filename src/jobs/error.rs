//! # Errores del Sistema de Jobs
//! src/jobs/error.rs

use crate::jobs::Ticket;
use thiserror::Error;

/// Errores del ciclo de vida de los jobs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    /// El segmento de `/hash/{ticket}` no es un número 1-based válido
    #[error("invalid identifier {input:?}: {reason}")]
    InvalidTicket { input: String, reason: String },

    /// Se intentó escribir dos veces el resultado de un ticket
    #[error("identifier {0} already has a recorded result")]
    AlreadyRecorded(Ticket),

    /// Venció la espera acotada de `/stats`
    #[error("stats not ready: {finished} of {total} jobs finished")]
    StatsNotReady { finished: u64, total: u64 },

    /// El servidor ya no acepta trabajos nuevos
    #[error("server is shutting down")]
    ShuttingDown,
}
