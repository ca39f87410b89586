//! # Hash Server
//! src/lib.rs
//!
//! Servidor HTTP/1.0 concurrente que calcula hashes SHA-512 (en base64) de
//! passwords de forma asíncrona: `POST /hash` retorna un ticket al instante
//! y el resultado se consulta después en `GET /hash/{n}`.
//!
//! ## Arquitectura
//!
//! El servidor está dividido en módulos especializados:
//! - `http`: Parsing y manejo del protocolo HTTP/1.0
//! - `server`: Lógica del servidor TCP y manejo de conexiones
//! - `router`: Enrutamiento de peticiones a handlers
//! - `jobs`: Tickets, store de resultados, procesamiento y estadísticas
//! - `lifecycle`: Máquina de estados del apagado ordenado
//! - `config`, `logging`, `error`: Configuración, logs y errores
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use hash_server::config::Config;
//! use hash_server::server::Server;
//!
//! let mut server = Server::new(Config::default());
//! let report = server.run().expect("Error al iniciar servidor");
//! println!("{:?}", report);
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod jobs;
pub mod lifecycle;
pub mod logging;
pub mod router;
pub mod server;
