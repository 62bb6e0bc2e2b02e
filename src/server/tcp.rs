//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Acepta conexiones y atiende cada una en su propio thread. Los threads
//! solo comparten el router (inmutable) detrás de un `Arc`.

use super::connection::{self, Limits};
use crate::config::Config;
use crate::router::Router;
use crate::storage::Storage;
use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use tracing::{info, info_span, warn};

/// Servidor HTTP/1.1, un thread por conexión
pub struct Server {
    router: Arc<Router>,
    limits: Limits,
    listener: TcpListener,
}

impl Server {
    /// Crea el router a partir de la configuración y hace bind del listener
    pub fn bind(config: &Config) -> io::Result<Self> {
        let storage = config
            .directory
            .as_ref()
            .map(|dir| Storage::new(dir).confined(config.confine_paths));

        let router = Router::with_default_routes(storage);
        let listener = TcpListener::bind(config.address())?;

        Ok(Self {
            router: Arc::new(router),
            limits: config.limits(),
            listener,
        })
    }

    /// Dirección efectiva del listener (útil con puerto 0)
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Acepta conexiones para siempre
    pub fn run(self) -> io::Result<()> {
        info!(address = %self.local_addr()?, "server listening");

        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => {
                    let router = Arc::clone(&self.router);
                    let limits = self.limits;

                    thread::spawn(move || Self::serve(stream, &router, &limits));
                }
                Err(e) => {
                    warn!(error = %e, "failed to accept connection");
                }
            }
        }

        Ok(())
    }

    fn serve(mut stream: TcpStream, router: &Router, limits: &Limits) {
        let peer = stream
            .peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        let _span = info_span!("connection", %peer).entered();

        if let Err(e) = connection::handle_connection(&mut stream, router, limits) {
            warn!(error = %e, "connection failed");
        }
        // El stream se cierra al salir del scope
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use crate::storage::tests::scratch_dir;
    use std::net::Shutdown;
    use std::time::Duration;

    fn test_config() -> Config {
        Config {
            port: 0,
            ..Config::default()
        }
    }

    /// Levanta un servidor con `config`, envía `raw` y lee hasta el cierre
    fn exchange(config: &Config, raw: &[u8]) -> io::Result<Vec<u8>> {
        let server = Server::bind(config)?;
        let addr = server.local_addr()?;
        thread::spawn(move || server.run());

        let mut client = TcpStream::connect(addr)?;
        client.set_read_timeout(Some(Duration::from_secs(5)))?;
        client.write_all(raw)?;

        let mut buf = Vec::new();
        client.read_to_end(&mut buf)?;
        Ok(buf)
    }

    #[test]
    fn test_bind_ephemeral_port() {
        let server = Server::bind(&test_config()).unwrap();
        let addr = server.local_addr().unwrap();

        assert!(addr.ip().is_loopback());
        assert_ne!(addr.port(), 0);
    }

    #[test]
    fn test_serve_single_connection() {
        let server = Server::bind(&test_config()).unwrap();
        let addr = server.local_addr().unwrap();
        let router = Arc::clone(&server.router);
        let limits = server.limits;

        let t = thread::spawn(move || {
            let (stream, _) = server.listener.accept().unwrap();
            Server::serve(stream, &router, &limits);
        });

        let mut client = TcpStream::connect(addr).unwrap();
        client.write_all(b"GET /echo/ping HTTP/1.1\r\n\r\n").unwrap();
        client.shutdown(Shutdown::Write).unwrap();

        let mut buf = Vec::new();
        client.read_to_end(&mut buf).unwrap();
        let text = String::from_utf8_lossy(&buf);

        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.ends_with("\r\n\r\nping"));

        t.join().unwrap();
    }

    #[test]
    fn test_confine_paths_reaches_file_routes() {
        let dir = scratch_dir("tcp-confined");
        let config = Config {
            directory: Some(dir.clone()),
            confine_paths: true,
            ..test_config()
        };

        let response = exchange(&config, b"GET /files/../x HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(response, b"HTTP/1.1 403 Forbidden\r\n\r\n");

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_unconfined_paths_by_default() {
        let dir = scratch_dir("tcp-unconfined");
        let config = Config {
            directory: Some(dir.join("inner")),
            ..test_config()
        };
        std::fs::create_dir_all(dir.join("inner")).unwrap();
        std::fs::write(dir.join("outside.txt"), b"up").unwrap();

        let response = exchange(&config, b"GET /files/../outside.txt HTTP/1.1\r\n\r\n").unwrap();
        assert!(response.starts_with(b"HTTP/1.1 200 OK\r\n"));
        assert!(response.ends_with(b"\r\n\r\nup"));

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_oversize_upload_gets_413_not_reset() {
        let config = Config {
            max_body_bytes: 4,
            ..test_config()
        };
        let mut raw = b"POST /files/big HTTP/1.1\r\nContent-Length: 200000\r\n\r\n".to_vec();
        raw.extend(std::iter::repeat(b'x').take(200_000));

        let response = exchange(&config, &raw).unwrap();
        assert_eq!(response, b"HTTP/1.1 413 Payload Too Large\r\nContent-Length: 0\r\n\r\n");
    }
}
