//! # Módulo HTTP
//!
//! Implementa la parte del protocolo HTTP/1.0 que necesita el servicio,
//! sin librerías de alto nivel:
//!
//! - Parsing de requests (request line, headers, formularios)
//! - Construcción de responses
//! - Códigos de estado
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.0 200 OK\r\n
//! Content-Type: text/plain; charset=utf-8\r\n
//! Content-Length: 2\r\n
//! \r\n
//! 1
//! ```

pub mod request;   // Parsing de HTTP requests
pub mod response;  // Construcción de HTTP responses
pub mod status;    // Códigos de estado HTTP

pub use request::{Method, ParseError, Request, MAX_REQUEST_BYTES};
pub use response::Response;
pub use status::StatusCode;
