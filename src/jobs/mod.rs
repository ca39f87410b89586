//! # Sistema de Jobs
//!
//! Implementa el hashing asíncrono de passwords: cada submission recibe un
//! ticket de inmediato y el hash se calcula en su propio thread tras un
//! retardo artificial.
//!
//! ## Endpoints
//!
//! - `POST /hash` con `password=...` - Encolar job, retorna el ticket
//! - `GET /hash/{n}` - Consultar resultado
//! - `GET /stats` - Total de jobs y duración promedio del hash (µs)
//! - `/shutdown` - Apagado ordenado

pub mod allocator;
pub mod error;
pub mod handlers;
pub mod processor;
pub mod service;
pub mod stats;
pub mod store;
pub mod tracker;
pub mod transform;
pub mod types;

pub use allocator::TicketAllocator;
pub use error::JobError;
pub use processor::JobProcessor;
pub use service::{HashService, HashServiceConfig};
pub use store::JobStore;
pub use tracker::{TaskGuard, TaskTracker};
pub use transform::transform;
pub use types::{JobRecord, JobState, SiteStats, Ticket};
