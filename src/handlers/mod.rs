//! # Handlers
//!
//! Funciones puras `(&Request, &Context) -> Response`. Cada request es
//! respondido por exactamente un handler.
//!
//! - **text**: `/`, `/echo/<valor>`, `/user-agent`
//! - **files**: `GET` y `POST` sobre `/files/<nombre>`

pub mod files;
pub mod text;

pub use files::*;
pub use text::*;
