//! # httplet
//! src/lib.rs
//!
//! Servidor HTTP/1.1 mínimo implementado desde cero. Cada conexión lleva
//! un único request: se parsea, se despacha a un handler y la respuesta se
//! serializa de vuelta al socket antes de cerrar.
//!
//! ## Arquitectura
//!
//! - `http`: Request, Response, StatusCode (parser y serializador)
//! - `router`: Lista de rutas en orden de prioridad
//! - `handlers`: echo, user-agent, archivos
//! - `storage`: Directorio de archivos para `/files/`
//! - `server`: Listener TCP y manejo de cada conexión
//! - `config`: Argumentos CLI y variables de entorno
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use httplet::config::Config;
//! use httplet::server::Server;
//!
//! let config = Config::default();
//! let server = Server::bind(&config).expect("bind");
//! server.run().expect("Error al iniciar servidor");
//! ```

pub mod config;
pub mod handlers;
pub mod http;
pub mod router;
pub mod server;
pub mod storage;
