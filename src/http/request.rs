//! # Parsing de Requests HTTP/1.1
//! src/http/request.rs
//!
//! Parser HTTP/1.1 escrito a mano. Recibe los bytes de un request completo
//! y construye un [`Request`] inmutable.
//!
//! ## Formato de un Request
//!
//! ```text
//! POST /files/notes.txt HTTP/1.1\r\n
//! Host: localhost:4221\r\n
//! Content-Length: 5\r\n
//! \r\n
//! hello
//! ```
//!
//! ## Componentes
//!
//! 1. **Request Line**: `METHOD /path [VERSION]` (la versión se ignora)
//! 2. **Headers**: Pares `Name: Value`, el último duplicado gana
//! 3. **Empty Line**: `\r\n` que separa headers del body
//! 4. **Body**: Todo lo que sigue, byte a byte

use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

/// Separador entre el head y el body
pub(crate) const HEAD_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Métodos HTTP
///
/// Solo GET y POST tienen rutas asociadas; cualquier otro token se
/// conserva en `Other` para que el router pueda responder 405.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Obtener un recurso
    GET,

    /// POST - Enviar datos a un recurso
    POST,

    /// Cualquier otro token (PUT, DELETE, ...)
    Other(String),
}

impl Method {
    /// Parsea un método HTTP desde un token de la request line
    fn from_token(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            "POST" => Method::POST,
            other => Method::Other(other.to_string()),
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::Other(token) => token,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Representa un request HTTP parseado
#[derive(Debug, Clone)]
pub struct Request {
    /// Método HTTP (GET, POST, ...)
    method: Method,

    /// Path de la petición tal cual llegó (ej: "/echo/abc")
    path: String,

    /// Headers HTTP con el nombre exacto recibido (sin normalizar mayúsculas)
    headers: HashMap<String, String>,

    /// Body del request, sin transformar
    body: Vec<u8>,
}

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Request vacío
    #[error("Empty request")]
    EmptyRequest,

    /// El head no es UTF-8 válido
    #[error("Request head is not valid UTF-8")]
    InvalidEncoding,

    /// La request line no tiene método y path
    #[error("Invalid request line: {0:?}")]
    InvalidRequestLine(String),
}

impl Request {
    /// Parsea un request HTTP desde bytes
    ///
    /// # Argumentos
    ///
    /// * `buffer` - Buffer conteniendo el request HTTP completo
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use httplet::http::Request;
    ///
    /// let raw = b"GET /x HTTP/1.1\r\nHeader: v\r\n\r\nbody";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.method().as_str(), "GET");
    /// assert_eq!(request.path(), "/x");
    /// assert_eq!(request.header("Header"), Some("v"));
    /// assert_eq!(request.body(), b"body");
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        if buffer.is_empty() {
            return Err(ParseError::EmptyRequest);
        }

        // El body empieza después de la primera línea vacía; si no hay
        // línea vacía, todo es head y el body queda vacío
        let (head, body) = split_head(buffer);

        let head = std::str::from_utf8(head).map_err(|_| ParseError::InvalidEncoding)?;
        let mut lines = head.split("\r\n");

        // 1. Request line
        let request_line = lines.next().unwrap_or_default();
        let (method, path) = Self::parse_request_line(request_line)?;

        // 2. Headers (el resto del head)
        let headers = Self::parse_headers(lines);

        Ok(Request {
            method,
            path,
            headers,
            body: body.to_vec(),
        })
    }

    /// Parsea la request line (primera línea del request)
    ///
    /// Formato: `GET /path HTTP/1.1`. Se separa por espacios simples y
    /// solo se usan los dos primeros tokens.
    fn parse_request_line(line: &str) -> Result<(Method, String), ParseError> {
        let mut parts = line.split(' ');

        let method = parts.next().filter(|m| !m.is_empty());
        let path = parts.next().filter(|p| !p.is_empty());

        match (method, path) {
            (Some(method), Some(path)) => Ok((Method::from_token(method), path.to_string())),
            _ => Err(ParseError::InvalidRequestLine(line.to_string())),
        }
    }

    /// Parsea los headers HTTP
    ///
    /// Cada header tiene formato `Name: Value`. Las líneas sin `": "` se
    /// descartan.
    fn parse_headers<'a>(lines: impl Iterator<Item = &'a str>) -> HashMap<String, String> {
        let mut headers = HashMap::new();

        for line in lines {
            if line.is_empty() {
                break;
            }

            match line.split_once(": ") {
                Some((name, value)) => {
                    headers.insert(name.to_string(), value.to_string());
                }
                None => debug!(line, "skipping malformed header line"),
            }
        }

        headers
    }

    // === Métodos públicos para acceder a los campos ===

    /// Obtiene el método HTTP del request
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Obtiene el path del request
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Obtiene todos los headers
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Obtiene un header específico (comparación exacta del nombre)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|s| s.as_str())
    }

    /// Obtiene el body del request
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

/// Divide el buffer en (head, body) en la primera línea vacía
///
/// El head no incluye el `\r\n\r\n` final. Una request line seguida
/// directamente por `\r\n\r\n` deja un head de una sola línea.
pub(crate) fn split_head(buffer: &[u8]) -> (&[u8], &[u8]) {
    match find_head_end(buffer) {
        Some(pos) => (&buffer[..pos], &buffer[pos + HEAD_TERMINATOR.len()..]),
        None => (buffer, &[]),
    }
}

/// Posición donde empieza el `\r\n\r\n` que cierra el head, si existe
pub(crate) fn find_head_end(buffer: &[u8]) -> Option<usize> {
    buffer
        .windows(HEAD_TERMINATOR.len())
        .position(|window| window == HEAD_TERMINATOR)
}
