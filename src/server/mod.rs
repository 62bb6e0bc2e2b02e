//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! - `tcp`: escucha en un puerto y lanza un thread por conexión
//! - `connection`: lee un request, lo rutea y escribe la respuesta

pub mod connection;
pub mod tcp;

pub use connection::{handle_connection, read_request, Limits, ReadError};
pub use tcp::Server;
