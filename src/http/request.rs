//! # Parsing de Requests HTTP/1.0
//! src/http/request.rs
//!
//! Parser HTTP/1.0 escrito a mano. Además de la request line y los headers,
//! decodifica formularios `application/x-www-form-urlencoded`, que es como
//! llega el campo `password` a `/hash`.
//!
//! ## Formato de un Request HTTP/1.0
//!
//! ```text
//! POST /hash HTTP/1.0\r\n
//! Content-Type: application/x-www-form-urlencoded\r\n
//! Content-Length: 12\r\n
//! \r\n
//! password=foo
//! ```

use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Tamaño máximo aceptado para un request completo (headers + body)
pub const MAX_REQUEST_BYTES: usize = 64 * 1024;

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Métodos HTTP soportados
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Obtener un recurso
    GET,

    /// POST - Enviar un formulario
    POST,
}

impl Method {
    /// Parsea un método HTTP desde un string
    fn from_str(s: &str) -> Result<Self, ParseError> {
        match s {
            "GET" => Ok(Method::GET),
            "POST" => Ok(Method::POST),
            _ => Err(ParseError::UnsupportedMethod(s.to_string())),
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
        }
    }
}

/// Representa un request HTTP/1.0 parseado
#[derive(Debug, Clone)]
pub struct Request {
    /// Método HTTP (GET, POST)
    method: Method,

    /// Path de la petición (ej: "/hash/1")
    path: String,

    /// Pares de la query string, en el orden en que llegaron
    query: Vec<(String, String)>,

    /// Headers HTTP tal como llegaron
    headers: HashMap<String, String>,

    /// Versión HTTP ("HTTP/1.0" o "HTTP/1.1")
    version: String,

    /// Body del request (solo POST)
    body: Vec<u8>,
}

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Request incompleto o truncado
    #[error("Incomplete HTTP request")]
    IncompleteRequest,

    /// Formato inválido de la request line
    #[error("Invalid request line format")]
    InvalidRequestLine,

    /// Método HTTP no soportado
    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// Versión HTTP incorrecta
    #[error("Invalid HTTP version: {0}")]
    InvalidHttpVersion(String),

    /// Header malformado
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Request vacío
    #[error("Empty request")]
    EmptyRequest,
}

impl Request {
    /// Parsea un request HTTP/1.0 desde bytes
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use hash_server::http::Request;
    ///
    /// let raw = b"GET /hash/1?verbose=1 HTTP/1.0\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.path(), "/hash/1");
    /// assert_eq!(request.query_param("verbose"), Some("1"));
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        if buffer.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(ParseError::EmptyRequest);
        }

        // Sin terminador tratamos todo como cabecera (peer que cerró antes)
        let (head, rest) = match find_subsequence(buffer, HEADER_TERMINATOR) {
            Some(pos) => (&buffer[..pos], &buffer[pos + HEADER_TERMINATOR.len()..]),
            None => (buffer, &buffer[buffer.len()..]),
        };

        let head = std::str::from_utf8(head).map_err(|_| ParseError::InvalidRequestLine)?;
        let mut lines = head.split("\r\n");

        // 1. Request line
        let request_line = lines.next().ok_or(ParseError::IncompleteRequest)?;
        let (method, path, query, version) = Self::parse_request_line(request_line)?;

        // 2. Headers
        let headers = Self::parse_headers(lines)?;

        // 3. Body (recortado a Content-Length si viene)
        let body = if method == Method::POST {
            let declared = match header_value(&headers, "Content-Length") {
                Some(value) => value
                    .parse::<usize>()
                    .ok()
                    .filter(|len| *len <= MAX_REQUEST_BYTES)
                    .ok_or_else(|| ParseError::InvalidHeader(format!("Content-Length: {}", value)))?,
                None => rest.len(),
            };
            rest[..declared.min(rest.len())].to_vec()
        } else {
            Vec::new()
        };

        Ok(Request {
            method,
            path,
            query,
            headers,
            version,
            body,
        })
    }

    /// Número total de bytes que ocupa el request, si ya llegaron los headers
    ///
    /// Lo usa el servidor para saber cuándo dejar de leer del socket:
    /// cabecera + terminador + `Content-Length`. Si la suma se desborda
    /// retorna `MAX_REQUEST_BYTES + 1` para que el request se rechace por
    /// tamaño.
    ///
    /// ```
    /// use hash_server::http::Request;
    ///
    /// assert_eq!(Request::expected_len(b"GET / HTTP/1.0\r\n"), None);
    /// assert_eq!(Request::expected_len(b"GET / HTTP/1.0\r\n\r\n"), Some(18));
    /// ```
    pub fn expected_len(buffer: &[u8]) -> Option<usize> {
        let header_end = find_subsequence(buffer, HEADER_TERMINATOR)?;
        let head = String::from_utf8_lossy(&buffer[..header_end]);

        let content_length = head
            .split("\r\n")
            .skip(1)
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("Content-Length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);

        let total = (header_end + HEADER_TERMINATOR.len())
            .checked_add(content_length)
            .unwrap_or(MAX_REQUEST_BYTES + 1);

        Some(total)
    }

    /// Parsea la request line (primera línea del request)
    ///
    /// Formato: `GET /path?query HTTP/1.0`
    fn parse_request_line(
        line: &str,
    ) -> Result<(Method, String, Vec<(String, String)>, String), ParseError> {
        let parts: Vec<&str> = line.split_whitespace().collect();

        // METHOD PATH VERSION
        if parts.len() != 3 {
            return Err(ParseError::InvalidRequestLine);
        }

        let method = Method::from_str(parts[0])?;

        let (path, query) = match parts[1].split_once('?') {
            Some((path, query)) => (path.to_string(), parse_pairs(query)),
            None => (parts[1].to_string(), Vec::new()),
        };

        let version = parts[2].to_string();
        if version != "HTTP/1.0" && version != "HTTP/1.1" {
            return Err(ParseError::InvalidHttpVersion(version));
        }

        Ok((method, path, query, version))
    }

    /// Parsea los headers HTTP (`Name: Value`, uno por línea)
    fn parse_headers<'a>(
        lines: impl Iterator<Item = &'a str>,
    ) -> Result<HashMap<String, String>, ParseError> {
        let mut headers = HashMap::new();

        for line in lines {
            if line.trim().is_empty() {
                break;
            }

            match line.split_once(':') {
                Some((name, value)) => {
                    headers.insert(name.trim().to_string(), value.trim().to_string());
                }
                None => return Err(ParseError::InvalidHeader(line.to_string())),
            }
        }

        Ok(headers)
    }

    // === Métodos públicos para acceder a los campos ===

    /// Obtiene el método HTTP del request
    pub fn method(&self) -> Method {
        self.method
    }

    /// Obtiene el path del request
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Obtiene un query parameter (el primero si se repite)
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Obtiene un header sin distinguir mayúsculas/minúsculas
    pub fn header(&self, name: &str) -> Option<&str> {
        header_value(&self.headers, name)
    }

    /// Obtiene la versión HTTP
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Obtiene el body del request
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Pares del formulario enviado en el body
    ///
    /// Solo se decodifica un POST cuyo `Content-Type` sea
    /// `application/x-www-form-urlencoded` (o que no declare ninguno).
    pub fn post_form(&self) -> Vec<(String, String)> {
        if self.method != Method::POST {
            return Vec::new();
        }

        let is_form = self
            .header("Content-Type")
            .map(|ct| ct.to_ascii_lowercase().starts_with(FORM_CONTENT_TYPE))
            .unwrap_or(true);

        if !is_form {
            return Vec::new();
        }

        parse_pairs(&String::from_utf8_lossy(&self.body))
    }

    /// Valor de un campo del body del formulario (ignora la query string)
    ///
    /// ```
    /// use hash_server::http::Request;
    ///
    /// let raw = b"POST /hash HTTP/1.0\r\nContent-Length: 12\r\n\r\npassword=foo";
    /// let request = Request::parse(raw).unwrap();
    /// assert_eq!(request.post_form_value("password").as_deref(), Some("foo"));
    /// ```
    pub fn post_form_value(&self, name: &str) -> Option<String> {
        self.post_form()
            .into_iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Todos los campos recibidos: primero los del body, luego los de la query
    pub fn form(&self) -> BTreeMap<String, Vec<String>> {
        let mut form: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for (key, value) in self.post_form().into_iter().chain(self.query.iter().cloned()) {
            form.entry(key).or_default().push(value);
        }

        form
    }
}

/// Busca un header ignorando mayúsculas
fn header_value<'a>(headers: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Posición de la primera aparición de `needle` en `haystack`
fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Parsea `a=1&b=2` en pares decodificados, conservando el orden
fn parse_pairs(input: &str) -> Vec<(String, String)> {
    input
        .split('&')
        .filter(|param| !param.is_empty())
        .map(|param| match param.split_once('=') {
            Some((key, value)) => (url_decode(key), url_decode(value)),
            // Parámetro sin valor (ej: "?debug")
            None => (url_decode(param), String::new()),
        })
        .collect()
}

/// Decodifica `+` y escapes `%XX`; un escape inválido se deja tal cual
fn url_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                decoded.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                match (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                    (Some(high), Some(low)) => {
                        decoded.push(high << 4 | low);
                        i += 3;
                    }
                    _ => {
                        decoded.push(b'%');
                        i += 1;
                    }
                }
            }
            byte => {
                decoded.push(byte);
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&decoded).into_owned()
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_get() {
        let raw = b"GET / HTTP/1.0\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.path(), "/");
        assert_eq!(request.version(), "HTTP/1.0");
        assert!(request.body().is_empty());
    }

    #[test]
    fn test_parse_ticket_path() {
        let raw = b"GET /hash/42 HTTP/1.1\r\nHost: localhost\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.path(), "/hash/42");
        assert_eq!(request.header("host"), Some("localhost"));
    }

    #[test]
    fn test_parse_post_form() {
        let raw = b"POST /hash HTTP/1.0\r\nContent-Type: application/x-www-form-urlencoded\r\nContent-Length: 22\r\n\r\npassword=angry+Monk%21";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.post_form_value("password").as_deref(), Some("angry Monk!"));
    }

    #[test]
    fn test_body_truncated_to_content_length() {
        let raw = b"POST /hash HTTP/1.0\r\nContent-Length: 12\r\n\r\npassword=fooEXTRA";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.body(), b"password=foo");
    }

    #[test]
    fn test_post_form_ignores_query_string() {
        let raw = b"POST /hash?password=fromquery HTTP/1.0\r\nContent-Length: 0\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.post_form_value("password"), None);
        assert_eq!(request.query_param("password"), Some("fromquery"));
    }

    #[test]
    fn test_post_form_requires_form_content_type() {
        let raw = b"POST /hash HTTP/1.0\r\nContent-Type: application/json\r\nContent-Length: 12\r\n\r\npassword=foo";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.post_form_value("password"), None);
    }

    #[test]
    fn test_form_merges_body_before_query() {
        let raw = b"POST /hash?user=b&user=c HTTP/1.0\r\nContent-Length: 6\r\n\r\nuser=a";
        let request = Request::parse(raw).unwrap();

        let form = request.form();
        assert_eq!(form.get("user").unwrap(), &vec!["a".to_string(), "b".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_url_decode() {
        assert_eq!(url_decode("hello%20world"), "hello world");
        assert_eq!(url_decode("a+b"), "a b");
        assert_eq!(url_decode("%C3%B1"), "ñ");
        assert_eq!(url_decode("100%"), "100%");
        assert_eq!(url_decode("%zz"), "%zz");
    }

    #[test]
    fn test_expected_len() {
        assert_eq!(Request::expected_len(b"POST /hash HTTP/1.0\r\n"), None);

        let raw = b"POST /hash HTTP/1.0\r\ncontent-length: 12\r\n\r\n";
        assert_eq!(Request::expected_len(raw), Some(raw.len() + 12));
    }

    #[test]
    fn test_expected_len_huge_content_length() {
        let raw = b"POST /hash HTTP/1.0\r\nContent-Length: 18446744073709551615\r\n\r\npassword=foo";
        let expected = Request::expected_len(raw).unwrap();

        assert!(expected > MAX_REQUEST_BYTES);
    }

    #[test]
    fn test_content_length_over_limit() {
        let raw = b"POST /hash HTTP/1.0\r\nContent-Length: 18446744073709551615\r\n\r\npassword=foo";
        assert!(matches!(Request::parse(raw), Err(ParseError::InvalidHeader(_))));

        let raw = format!("POST /hash HTTP/1.0\r\nContent-Length: {}\r\n\r\n", MAX_REQUEST_BYTES + 1);
        assert!(matches!(Request::parse(raw.as_bytes()), Err(ParseError::InvalidHeader(_))));
    }

    #[test]
    fn test_invalid_content_length() {
        let raw = b"POST /hash HTTP/1.0\r\nContent-Length: many\r\n\r\n";
        let result = Request::parse(raw);

        assert!(matches!(result, Err(ParseError::InvalidHeader(_))));
    }

    #[test]
    fn test_unsupported_method() {
        for raw in [&b"DELETE /hash/1 HTTP/1.0\r\n\r\n"[..], &b"HEAD /stats HTTP/1.0\r\n\r\n"[..]] {
            let result = Request::parse(raw);
            assert!(matches!(result, Err(ParseError::UnsupportedMethod(_))));
        }
    }

    #[test]
    fn test_invalid_version() {
        let raw = b"GET / HTTP/2.0\r\n\r\n";
        let result = Request::parse(raw);

        assert!(matches!(result, Err(ParseError::InvalidHttpVersion(_))));
    }

    #[test]
    fn test_empty_request() {
        assert!(matches!(Request::parse(b""), Err(ParseError::EmptyRequest)));
        assert!(matches!(Request::parse(b"\r\n"), Err(ParseError::EmptyRequest)));
    }

    #[test]
    fn test_invalid_request_line() {
        let raw = b"GET\r\n\r\n";
        let result = Request::parse(raw);

        assert!(matches!(result, Err(ParseError::InvalidRequestLine)));
    }

    #[test]
    fn test_invalid_header() {
        let raw = b"GET / HTTP/1.0\r\nNoColonHere\r\n\r\n";
        let result = Request::parse(raw);

        assert!(matches!(result, Err(ParseError::InvalidHeader(_))));
    }
}
