//! # Errores del Servidor
//! src/error.rs

use std::io;
use thiserror::Error;

/// Errores fatales del servidor; `main` los reporta y sale con status 1
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("could not bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("server is not bound; call bind() first")]
    NotBound,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
