//! # Tipos y Estructuras para el Sistema de Jobs
//! src/jobs/types.rs
//!
//! Define los tipos fundamentales del ciclo de vida de un job de hashing:
//! el ticket, el estado explícito de cada job y las estadísticas derivadas.

use crate::jobs::JobError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Identificador de un job
///
/// Internamente es 0-based; hacia el cliente se expone 1-based.
///
/// ```
/// use hash_server::jobs::Ticket;
///
/// let ticket = Ticket::new(0);
/// assert_eq!(ticket.external(), 1);
/// assert_eq!(Ticket::from_external(1), Some(ticket));
/// assert_eq!(Ticket::from_external(0), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    /// Crea un ticket a partir de su índice interno (0-based)
    pub fn new(index: u64) -> Self {
        Ticket(index)
    }

    /// Índice interno (0-based)
    pub fn index(self) -> u64 {
        self.0
    }

    /// Número que ve el cliente (1-based)
    pub fn external(self) -> u64 {
        self.0 + 1
    }

    /// Convierte un número 1-based en ticket; `0` no es válido
    pub fn from_external(number: u64) -> Option<Self> {
        number.checked_sub(1).map(Ticket)
    }

    /// Parsea el segmento de path de `/hash/{ticket}`
    ///
    /// A propósito es más estricto que un `atoi`: `0` y los negativos
    /// nunca pueden ser tickets, así que se rechazan con 400 en lugar de
    /// responder "not ready".
    pub fn parse_external(segment: &str) -> Result<Self, JobError> {
        let number: u64 = segment.parse().map_err(|e: std::num::ParseIntError| {
            JobError::InvalidTicket {
                input: segment.to_string(),
                reason: e.to_string(),
            }
        })?;

        Self::from_external(number).ok_or_else(|| JobError::InvalidTicket {
            input: segment.to_string(),
            reason: "identifiers start at 1".to_string(),
        })
    }
}

impl fmt::Display for Ticket {
    /// Se muestra siempre el número externo
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.external())
    }
}

/// Estado de un job
///
/// `Pending` nunca se guarda en el store: la ausencia del ticket se
/// reporta como `Pending`. `Completed` y `Failed` son terminales.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    /// Encolado o procesándose
    Pending,

    /// Terminó con su digest y la duración de la transformación
    Completed { digest: String, duration: Duration },

    /// Terminó sin digest (abandonado en el apagado)
    Failed { error: String },
}

impl JobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Pending => "pending",
            JobState::Completed { .. } => "completed",
            JobState::Failed { .. } => "failed",
        }
    }

    /// Verifica si el job está en estado terminal
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobState::Pending)
    }
}

/// Resultado final de un job, inmutable una vez guardado
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRecord {
    pub ticket: Ticket,
    pub state: JobState,
}

impl JobRecord {
    pub fn completed(ticket: Ticket, digest: String, duration: Duration) -> Self {
        Self {
            ticket,
            state: JobState::Completed { digest, duration },
        }
    }

    pub fn failed(ticket: Ticket, error: impl Into<String>) -> Self {
        Self {
            ticket,
            state: JobState::Failed {
                error: error.into(),
            },
        }
    }
}

/// Estadísticas del sitio devueltas por `/stats`
///
/// `average` está en microsegundos, truncado a entero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteStats {
    pub total: u64,
    pub average: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_numbering() {
        let ticket = Ticket::new(4);
        assert_eq!(ticket.index(), 4);
        assert_eq!(ticket.external(), 5);
        assert_eq!(ticket.to_string(), "5");
    }

    #[test]
    fn test_parse_external() {
        assert_eq!(Ticket::parse_external("1").unwrap(), Ticket::new(0));
        assert_eq!(Ticket::parse_external("99").unwrap(), Ticket::new(98));
    }

    #[test]
    fn test_parse_external_rejects_garbage() {
        let err = Ticket::parse_external("abc").unwrap_err();
        assert!(matches!(err, JobError::InvalidTicket { .. }));
        assert!(err.to_string().contains("\"abc\""));

        assert!(Ticket::parse_external("").is_err());
        assert!(Ticket::parse_external("-1").is_err());
    }

    #[test]
    fn test_parse_external_stricter_than_atoi() {
        let err = Ticket::parse_external("0").unwrap_err();
        assert!(err.to_string().contains("start at 1"));

        // atoi aceptaría -1
        assert!(Ticket::parse_external("-1").is_err());
    }

    #[test]
    fn test_job_state_terminal() {
        assert!(!JobState::Pending.is_terminal());
        assert!(JobRecord::completed(Ticket::new(0), "x".into(), Duration::ZERO)
            .state
            .is_terminal());
        assert_eq!(JobRecord::failed(Ticket::new(0), "boom").state.as_str(), "failed");
    }

    #[test]
    fn test_site_stats_serialization() {
        let stats = SiteStats { total: 2, average: 13 };
        let json = serde_json::to_string(&stats).unwrap();
        assert_eq!(json, r#"{"total":2,"average":13}"#);
    }
}
