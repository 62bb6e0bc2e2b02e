//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración por argumentos CLI y variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./httplet --directory /tmp/files --port 4221
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=8080 STORAGE_DIR=/tmp/files ./httplet
//! ```

use crate::server::Limits;
use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

/// Errores de validación de la configuración
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max header bytes must be >= 1")]
    ZeroHeaderLimit,

    #[error("storage directory does not exist or is not a directory: {0}")]
    MissingDirectory(PathBuf),
}

/// Configuración del servidor HTTP/1.1
#[derive(Debug, Clone, Parser)]
#[command(name = "httplet")]
#[command(about = "Servidor HTTP/1.1 mínimo: echo, user-agent y archivos")]
#[command(version)]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "4221", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "127.0.0.1", env = "HTTP_HOST")]
    pub host: String,

    /// Directorio donde se guardan/leen archivos de /files/
    #[arg(long, env = "STORAGE_DIR")]
    pub directory: Option<PathBuf>,

    /// Máximo de bytes para request line + headers
    #[arg(long = "max-header-bytes", default_value = "8192", env = "MAX_HEADER_BYTES")]
    pub max_header_bytes: usize,

    /// Máximo Content-Length aceptado (0 = solo bodies vacíos)
    #[arg(long = "max-body-bytes", default_value = "10485760", env = "MAX_BODY_BYTES")]
    pub max_body_bytes: usize,

    /// Rechazar nombres de archivo que salgan del directorio (../, rutas absolutas)
    #[arg(long = "confine-paths", env = "CONFINE_PATHS")]
    pub confine_paths: bool,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use httplet::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "127.0.0.1:4221");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Límites de lectura por conexión
    pub fn limits(&self) -> Limits {
        Limits {
            max_header_bytes: self.max_header_bytes,
            max_body_bytes: self.max_body_bytes,
        }
    }

    /// Valida la configuración
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_header_bytes == 0 {
            return Err(ConfigError::ZeroHeaderLimit);
        }

        if let Some(dir) = &self.directory {
            if !dir.is_dir() {
                return Err(ConfigError::MissingDirectory(dir.clone()));
            }
        }

        Ok(())
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        let limits = Limits::default();
        Self {
            port: 4221,
            host: "127.0.0.1".to_string(),
            directory: None,
            max_header_bytes: limits.max_header_bytes,
            max_body_bytes: limits.max_body_bytes,
            confine_paths: false,
        }
    }
}
