//! # Handlers de texto
//!
//! - `/`: respuesta vacía 200
//! - `/echo/<valor>`: devuelve `<valor>`, comprimido con gzip si el cliente lo acepta
//! - `/user-agent`: devuelve el header `User-Agent`

use crate::http::{Request, Response, StatusCode};
use crate::router::Context;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;
use tracing::warn;

pub const ECHO_PREFIX: &str = "/echo/";

/// Handler para `/`
pub fn root_handler(_req: &Request, _ctx: &Context) -> Response {
    Response::empty(StatusCode::Ok)
}

/// Handler para `/echo/<valor>`
///
/// `<valor>` es todo lo que sigue al prefijo, incluidas otras `/`.
/// Si `Accept-Encoding` contiene `gzip` en cualquier posición, el body
/// va comprimido y `Content-Length` es el largo comprimido.
///
/// # Ejemplo
/// ```
/// use httplet::handlers::echo_handler;
/// use httplet::http::{Request, StatusCode};
/// use httplet::router::Context;
///
/// let req = Request::parse(b"GET /echo/abc HTTP/1.1\r\n\r\n").unwrap();
/// let res = echo_handler(&req, &Context::default());
///
/// assert_eq!(res.status(), StatusCode::Ok);
/// assert_eq!(res.body(), b"abc");
/// ```
pub fn echo_handler(req: &Request, _ctx: &Context) -> Response {
    let value = req.path().strip_prefix(ECHO_PREFIX).unwrap_or_default();

    let response = Response::new(StatusCode::Ok).with_header("Content-Type", "text/plain");

    if !accepts_gzip(req) {
        return response.with_body(value);
    }

    match gzip(value.as_bytes()) {
        Ok(compressed) => response
            .with_header("Content-Encoding", "gzip")
            .with_body_bytes(compressed),
        Err(e) => {
            warn!(error = %e, "gzip compression failed");
            Response::new(StatusCode::InternalServerError)
        }
    }
}

/// Handler para `/user-agent`
pub fn user_agent_handler(req: &Request, _ctx: &Context) -> Response {
    match req.header("User-Agent").filter(|ua| !ua.is_empty()) {
        Some(user_agent) => Response::new(StatusCode::Ok)
            .with_header("Content-Type", "text/plain")
            .with_body(user_agent),
        None => Response::empty(StatusCode::NotFound),
    }
}

/// Coincidencia por substring: cualquier lista que contenga "gzip" califica
fn accepts_gzip(req: &Request) -> bool {
    req.header("Accept-Encoding")
        .is_some_and(|encodings| encodings.contains("gzip"))
}

fn gzip(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}
