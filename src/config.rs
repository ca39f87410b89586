//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración del servidor de hashing con soporte para argumentos CLI y
//! variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./hash_server --port 8080 \
//!   --delay-ms 5000 \
//!   --stats-timeout-ms 30000 \
//!   --shutdown-timeout-ms 60000
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HASH_PORT=8080 HASH_HOST=0.0.0.0 HASH_LOG=debug ./hash_server
//! ```

use clap::Parser;
use tracing::info;

/// Configuración del servidor de hashing
#[derive(Debug, Clone, Parser)]
#[command(name = "hash_server")]
#[command(about = "Servidor HTTP de hashing SHA-512 asíncrono")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor (0 = efímero)
    #[arg(short, long, default_value = "8080", env = "HASH_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha (0.0.0.0 = todas las interfaces)
    #[arg(long, default_value = "0.0.0.0", env = "HASH_HOST")]
    pub host: String,

    // === Jobs ===
    /// Retardo artificial antes de calcular cada hash, en milisegundos
    #[arg(long = "delay-ms", default_value = "5000", env = "HASH_DELAY_MS")]
    pub delay_ms: u64,

    // === Timeouts ===
    /// Espera máxima de /stats por los jobs en vuelo, en milisegundos
    #[arg(long = "stats-timeout-ms", default_value = "30000", env = "HASH_STATS_TIMEOUT_MS")]
    pub stats_timeout_ms: u64,

    /// Espera máxima por los jobs al apagar, en milisegundos
    #[arg(long = "shutdown-timeout-ms", default_value = "60000", env = "HASH_SHUTDOWN_TIMEOUT_MS")]
    pub shutdown_timeout_ms: u64,

    // === Logging ===
    /// Filtro de logs cuando RUST_LOG no está definido
    #[arg(long = "log-level", default_value = "info", env = "HASH_LOG")]
    pub log_level: String,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use hash_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:8080");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("Host must not be empty".to_string());
        }

        if self.stats_timeout_ms == 0 {
            return Err("Stats timeout must be > 0".to_string());
        }
        if self.shutdown_timeout_ms == 0 {
            return Err("Shutdown timeout must be > 0".to_string());
        }

        Ok(())
    }

    /// Registra un resumen de la configuración
    pub fn log_summary(&self) {
        info!(
            address = %self.address(),
            delay_ms = self.delay_ms,
            stats_timeout_ms = self.stats_timeout_ms,
            shutdown_timeout_ms = self.shutdown_timeout_ms,
            log_level = %self.log_level,
            "configuration loaded"
        );
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".to_string(),
            delay_ms: 5_000,
            stats_timeout_ms: 30_000,
            shutdown_timeout_ms: 60_000,
            log_level: "info".to_string(),
        }
    }
}
