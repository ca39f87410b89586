//! # Logging
//! src/logging.rs
//!
//! Logs estructurados con `tracing`. El filtro sale de `RUST_LOG`; si no
//! está definido (o es inválido) se usa el nivel de la configuración.

use tracing_subscriber::EnvFilter;

/// Nivel usado cuando tampoco el configurado es un filtro válido
const FALLBACK_LEVEL: &str = "info";

/// Construye el filtro de eventos
pub fn build_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new(FALLBACK_LEVEL))
}

/// Instala el subscriber global
///
/// Falla si ya había uno instalado (por ejemplo, en tests).
pub fn init_logging(default_level: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(default_level))
        .with_target(false)
        .with_thread_names(true)
        .try_init()
}
