//! # Módulo HTTP
//!
//! Implementa la parte de HTTP/1.1 que usa el servidor, sin librerías de
//! alto nivel:
//!
//! - Parsing de requests ([`Request::parse`])
//! - Construcción y serialización de responses ([`Response::to_bytes`])
//! - Códigos de estado
//!
//! Una conexión lleva exactamente un request y una response: no hay
//! keep-alive, chunked encoding ni pipelining.
//!
//! ### Formato de Request
//!
//! ```text
//! GET /echo/abc HTTP/1.1\r\n
//! Accept-Encoding: gzip\r\n
//! \r\n
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/plain\r\n
//! Content-Length: 3\r\n
//! \r\n
//! abc
//! ```

pub mod request;
pub mod response;
pub mod status;

pub use request::{Method, ParseError, Request};
pub use response::Response;
pub use status::StatusCode;
