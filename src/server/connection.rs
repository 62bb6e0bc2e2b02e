//! # Manejo de una conexión
//! src/server/connection.rs
//!
//! Una conexión transporta exactamente un request:
//!
//! 1. Leer el head hasta `\r\n\r\n` (acotado por `max_header_bytes`)
//! 2. Si hay `Content-Length`, leer el body hasta completarlo
//!    (acotado por `max_body_bytes`) o hasta EOF
//! 3. Parsear → rutear → serializar → escribir
//!
//! Todo error se resuelve acá: o se escribe una respuesta, o se cierra la
//! conexión sin escribir nada. Nunca se envía una respuesta a medias.

use crate::http::request::{find_head_end, HEAD_TERMINATOR};
use crate::http::{Request, Response, StatusCode};
use crate::router::Router;
use std::io::{self, Read, Write};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

const READ_CHUNK: usize = 4096;

/// Máximo de body no aceptado que se descarta tras responder 413
const MAX_DRAIN_BYTES: usize = 1024 * 1024;

/// Límites de lectura por conexión
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Máximo de bytes para request line + headers + línea vacía
    pub max_header_bytes: usize,

    /// Máximo `Content-Length` aceptado
    pub max_body_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_header_bytes: 8192,
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Errores al leer el request del socket
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("request head exceeds {limit} bytes")]
    HeadTooLarge { limit: usize },

    /// `received` son los bytes de body que ya estaban en el buffer
    #[error("declared body of {declared} bytes exceeds limit of {limit}")]
    BodyTooLarge {
        declared: usize,
        limit: usize,
        received: usize,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Lee un request completo del stream
///
/// Retorna `Ok(None)` si el peer cerró sin enviar nada. Si el peer cierra
/// antes de completar el head o el body, se retorna lo recibido y el
/// parser decide.
pub fn read_request<R: Read>(stream: &mut R, limits: &Limits) -> Result<Option<Vec<u8>>, ReadError> {
    let mut buffer = Vec::with_capacity(READ_CHUNK);
    let mut chunk = [0u8; READ_CHUNK];

    // 1. Head
    let head_end = loop {
        if let Some(pos) = find_head_end(&buffer) {
            break pos + HEAD_TERMINATOR.len();
        }
        if buffer.len() >= limits.max_header_bytes {
            return Err(ReadError::HeadTooLarge {
                limit: limits.max_header_bytes,
            });
        }

        let n = stream.read(&mut chunk)?;
        if n == 0 {
            return Ok((!buffer.is_empty()).then_some(buffer));
        }
        buffer.extend_from_slice(&chunk[..n]);
    };

    if head_end > limits.max_header_bytes {
        return Err(ReadError::HeadTooLarge {
            limit: limits.max_header_bytes,
        });
    }

    // 2. Body según Content-Length
    let Some(declared) = content_length(&buffer[..head_end]) else {
        return Ok(Some(buffer));
    };
    let total = match head_end.checked_add(declared) {
        Some(total) if declared <= limits.max_body_bytes => total,
        _ => {
            return Err(ReadError::BodyTooLarge {
                declared,
                limit: limits.max_body_bytes,
                received: buffer.len() - head_end,
            })
        }
    };
    while buffer.len() < total {
        let n = stream.read(&mut chunk)?;
        if n == 0 {
            debug!(
                expected = declared,
                received = buffer.len() - head_end,
                "peer closed before full body"
            );
            break;
        }
        buffer.extend_from_slice(&chunk[..n]);
    }
    buffer.truncate(total);

    Ok(Some(buffer))
}

/// Valor de `Content-Length` en el head, si es un número válido
///
/// Para el framing el nombre se compara sin distinguir mayúsculas.
fn content_length(head: &[u8]) -> Option<usize> {
    String::from_utf8_lossy(head)
        .split("\r\n")
        .skip(1)
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("Content-Length"))
        .and_then(|(_, value)| value.trim().parse().ok())
}

/// Atiende una conexión de principio a fin
///
/// Retorna el status enviado, o `None` si la conexión se cerró sin
/// respuesta.
pub fn handle_connection<S: Read + Write>(
    stream: &mut S,
    router: &Router,
    limits: &Limits,
) -> io::Result<Option<StatusCode>> {
    let start = Instant::now();

    let raw = match read_request(stream, limits) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("connection closed without data");
            return Ok(None);
        }
        Err(ReadError::Io(e)) => return Err(e),
        Err(e @ ReadError::HeadTooLarge { .. }) => {
            warn!(error = %e, "closing connection");
            return Ok(None);
        }
        Err(e @ ReadError::BodyTooLarge { .. }) => {
            warn!(error = %e, "rejecting request");
            let response = Response::empty(StatusCode::PayloadTooLarge);
            write_response(stream, &response)?;

            // Cerrar con datos sin leer hace que el kernel mande RST y el
            // cliente pierda la respuesta
            if let ReadError::BodyTooLarge { declared, received, .. } = e {
                drain(stream, declared.saturating_sub(received).min(MAX_DRAIN_BYTES))?;
            }
            return Ok(Some(response.status()));
        }
    };

    let request = match Request::parse(&raw) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, bytes = raw.len(), "unparseable request, closing connection");
            return Ok(None);
        }
    };

    let response = router.route(&request);
    write_response(stream, &response)?;

    let status = response.status();
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    let method = request.method().as_str();
    let path = request.path();
    if status.is_server_error() {
        warn!(method, path, status = status.as_u16(), latency_ms, "request failed");
    } else {
        info!(method, path, status = status.as_u16(), latency_ms, "request served");
    }

    Ok(Some(status))
}

/// Descarta hasta `limit` bytes del stream (o hasta EOF)
fn drain<R: Read>(stream: &mut R, limit: usize) -> io::Result<()> {
    let discarded = io::copy(&mut stream.by_ref().take(limit as u64), &mut io::sink())?;
    debug!(discarded, "drained unread body");
    Ok(())
}

fn write_response<W: Write>(stream: &mut W, response: &Response) -> io::Result<()> {
    stream.write_all(&response.to_bytes())?;
    stream.flush()
}
