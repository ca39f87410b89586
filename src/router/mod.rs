//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Este módulo implementa el router que mapea paths HTTP a handlers específicos.
//!
//! ## Arquitectura
//!
//! ```text
//! Request → Router → Handler(&Request, &estado) → Response
//! ```
//!
//! Primero se buscan rutas exactas y después prefijos (`/hash/` atiende
//! `/hash/1`, `/hash/2`, ...). Si nada coincide se responde 404 con el
//! path seguido de `?`.

use crate::http::{Request, Response, StatusCode};

/// Nombre que se anuncia en el header `Server`
pub const SERVER_NAME: &str = "hash_server/0.1";

/// Tipo de función handler
///
/// Un handler recibe el Request y el estado compartido `S` y retorna una
/// Response.
pub type Handler<S> = fn(&Request, &S) -> Response;

/// Router que mapea paths a handlers
pub struct Router<S> {
    /// Rutas exactas
    routes: Vec<(String, Handler<S>)>,

    /// Rutas por prefijo, en orden de registro
    prefixes: Vec<(String, Handler<S>)>,
}

impl<S> Router<S> {
    /// Crea un nuevo router vacío
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            prefixes: Vec::new(),
        }
    }

    /// Registra una ruta exacta
    ///
    /// # Ejemplo
    /// ```
    /// use hash_server::router::Router;
    /// use hash_server::http::{Request, Response};
    ///
    /// fn hello_handler(_req: &Request, _state: &()) -> Response {
    ///     Response::json("{\"message\":\"Hello\"}")
    /// }
    ///
    /// let mut router: Router<()> = Router::new();
    /// router.register("/hello", hello_handler);
    /// ```
    pub fn register(&mut self, path: &str, handler: Handler<S>) {
        self.routes.push((path.to_string(), handler));
    }

    /// Registra un handler para todos los paths que empiezan con `prefix`
    pub fn register_prefix(&mut self, prefix: &str, handler: Handler<S>) {
        self.prefixes.push((prefix.to_string(), handler));
    }

    /// Encuentra y ejecuta el handler apropiado para un request
    ///
    /// ```
    /// use hash_server::router::Router;
    /// use hash_server::http::{Request, StatusCode};
    ///
    /// let router: Router<()> = Router::new();
    ///
    /// let request = Request::parse(b"GET /test HTTP/1.0\r\n\r\n").unwrap();
    /// let response = router.route(&request, &());
    /// assert_eq!(response.status(), StatusCode::NotFound);
    /// assert_eq!(response.body_text(), "/test?\n");
    /// ```
    pub fn route(&self, request: &Request, state: &S) -> Response {
        let mut response = match self.find(request.path()) {
            Some(handler) => handler(request, state),
            None => Response::text(StatusCode::NotFound, &format!("{}?\n", request.path())),
        };

        Self::add_common_headers(&mut response);
        response
    }

    fn find(&self, path: &str) -> Option<Handler<S>> {
        self.routes
            .iter()
            .find(|(route, _)| route == path)
            .or_else(|| self.prefixes.iter().find(|(prefix, _)| path.starts_with(prefix.as_str())))
            .map(|(_, handler)| *handler)
    }

    /// Agrega headers comunes a todas las respuestas
    pub fn add_common_headers(response: &mut Response) {
        response.add_header("Server", SERVER_NAME);
        response.add_header("Connection", "close");
    }
}

impl<S> Default for Router<S> {
    fn default() -> Self {
        Self::new()
    }
}
