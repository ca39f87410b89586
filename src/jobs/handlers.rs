//! # Handlers HTTP del Servicio de Hashing
//! src/jobs/handlers.rs
//!
//! Implementa los endpoints:
//! - /hash
//! - /hash/{n}
//! - /stats
//! - /shutdown
//!
//! Los handlers no bloquean salvo `/stats`, que espera (con timeout) a que
//! terminen los jobs en vuelo.

use crate::http::{Request, Response, StatusCode};
use crate::jobs::{HashService, JobError, JobState, Ticket};
use tracing::{debug, warn};

/// Prefijo de las rutas de consulta
pub const RESULT_PREFIX: &str = "/hash/";

/// Handler para POST /hash con el campo `password`
///
/// Retorna el ticket (1-based) de inmediato; el hash se calcula en
/// segundo plano. Sin password responde 400 mostrando lo que se recibió.
///
/// # Ejemplo de response
/// ```text
/// 1
/// ```
pub fn submit_handler(req: &Request, service: &HashService) -> Response {
    let password = match req.post_form_value("password") {
        Some(p) if !p.is_empty() => p,
        _ => return missing_password(req),
    };

    match service.submit(password) {
        Ok(ticket) => Response::text(StatusCode::Ok, &format!("{}\n", ticket)),
        Err(e @ JobError::ShuttingDown) => Response::error(StatusCode::ServiceUnavailable, &e.to_string()),
        Err(e) => Response::error(StatusCode::InternalServerError, &e.to_string()),
    }
}

// Eco de los campos recibidos, uno por línea: Form["k"] = ["v1" "v2"]
fn missing_password(req: &Request) -> Response {
    let mut body = String::from("Only password parameter is supported:\n");

    for (key, values) in req.form() {
        let quoted: Vec<String> = values.iter().map(|v| format!("{:?}", v)).collect();
        body.push_str(&format!("Form[{:?}] = [{}]\n", key, quoted.join(" ")));
    }

    Response::text(StatusCode::BadRequest, &body)
}

/// Handler para GET /hash/{n}
///
/// - Completado: el digest entre comillas.
/// - Pendiente o nunca emitido: "not ready" con 200.
/// - Identificador inválido: 400 con el motivo.
/// - Job fallido: 500 con el error.
pub fn result_handler(req: &Request, service: &HashService) -> Response {
    let segment = req.path().strip_prefix(RESULT_PREFIX).unwrap_or_default();

    let ticket = match Ticket::parse_external(segment) {
        Ok(t) => t,
        Err(e) => {
            debug!(segment, error = %e, "invalid identifier");
            return Response::error(StatusCode::BadRequest, &e.to_string());
        }
    };

    let state = service.lookup(ticket);
    debug!(%ticket, state = state.as_str(), "result lookup");

    match state {
        JobState::Completed { digest, .. } => {
            Response::text(StatusCode::Ok, &format!("{:?}\n", digest))
        }
        JobState::Pending => Response::text(
            StatusCode::Ok,
            &format!("Identifier number {} is not ready.\n", ticket),
        ),
        JobState::Failed { error } => Response::error(StatusCode::InternalServerError, &error),
    }
}

/// Handler para GET /stats
///
/// # Ejemplo de response
/// ```json
/// {"total":2,"average":87}
/// ```
pub fn stats_handler(_req: &Request, service: &HashService) -> Response {
    let stats = match service.stats() {
        Ok(s) => s,
        Err(e) => {
            warn!(error = %e, "stats requested before jobs finished");
            return Response::error(StatusCode::ServiceUnavailable, &e.to_string());
        }
    };

    match serde_json::to_string(&stats) {
        Ok(json) => Response::json(&format!("{}\n", json)),
        Err(e) => Response::error(StatusCode::InternalServerError, &e.to_string()),
    }
}

/// Handler para /shutdown
///
/// Solo arma el acuse; el servidor inicia el apagado después de haberlo
/// enviado al cliente.
pub fn shutdown_handler(_req: &Request, _service: &HashService) -> Response {
    Response::text(StatusCode::Ok, "Shutdown\n")
}
