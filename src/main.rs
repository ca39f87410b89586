//! # Hash Server - Entry Point
//! src/main.rs
//!
//! Punto de entrada del servidor de hashing.

use hash_server::config::Config;
use hash_server::error::ServerError;
use hash_server::lifecycle::ShutdownReport;
use hash_server::logging;
use hash_server::server::Server;
use tracing::{error, info, warn};

fn main() {
    // Configuración desde CLI y variables de entorno
    let config = Config::new();

    if let Err(e) = logging::init_logging(&config.log_level) {
        eprintln!("could not initialize logging: {}", e);
    }

    if let Err(e) = run(config) {
        error!(error = %e, "fatal error");
        std::process::exit(1);
    }
}

fn run(config: Config) -> Result<(), ServerError> {
    config.validate().map_err(ServerError::InvalidConfig)?;
    config.log_summary();

    // Crear el servidor y atender hasta /shutdown (esto bloqueará el thread)
    let mut server = Server::new(config);
    match server.run()? {
        ShutdownReport::Complete => info!("Finished"),
        ShutdownReport::Timeout { remaining } => {
            warn!(remaining, "Finished with abandoned jobs")
        }
    }

    Ok(())
}
