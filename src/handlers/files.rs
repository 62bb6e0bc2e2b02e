//! # Handlers de archivos
//!
//! - `GET /files/<nombre>`: devuelve el contenido del archivo
//! - `POST /files/<nombre>`: crea o sobrescribe el archivo con el body
//!
//! `<nombre>` se une al storage root sin más segmentación.

use crate::http::{Request, Response, StatusCode};
use crate::router::Context;
use crate::storage::{Storage, StorageError};
use tracing::{debug, error, warn};

pub const FILES_PREFIX: &str = "/files/";

/// Handler para `GET /files/<nombre>`
///
/// - No existe: 404 sin body
/// - Otro error de lectura: 500 sin body
/// - Éxito: 200 con `Content-Type: application/octet-stream`
pub fn get_file_handler(req: &Request, ctx: &Context) -> Response {
    let Some(storage) = storage(ctx) else {
        return Response::new(StatusCode::InternalServerError);
    };

    match storage.read(file_name(req)) {
        Ok(contents) => Response::new(StatusCode::Ok)
            .with_header("Content-Type", "application/octet-stream")
            .with_body_bytes(contents),
        Err(e) => error_response(e),
    }
}

/// Handler para `POST /files/<nombre>`
///
/// Éxito: 201 sin body. Error de escritura: 500 sin body.
pub fn post_file_handler(req: &Request, ctx: &Context) -> Response {
    let Some(storage) = storage(ctx) else {
        return Response::new(StatusCode::InternalServerError);
    };

    match storage.write(file_name(req), req.body()) {
        Ok(()) => Response::new(StatusCode::Created),
        Err(e) => error_response(e),
    }
}

fn file_name(req: &Request) -> &str {
    req.path().strip_prefix(FILES_PREFIX).unwrap_or_default()
}

fn storage(ctx: &Context) -> Option<&Storage> {
    if ctx.storage.is_none() {
        error!("/files/ requested but no storage directory is configured");
    }
    ctx.storage.as_ref()
}

fn error_response(e: StorageError) -> Response {
    match e {
        StorageError::NotFound(path) => {
            debug!(path = %path.display(), "file not found");
            Response::new(StatusCode::NotFound)
        }
        StorageError::OutsideRoot(name) => {
            warn!(name = %name, "refusing file name outside storage root");
            Response::new(StatusCode::Forbidden)
        }
        StorageError::Io { .. } => {
            warn!(error = %e, "file access failed");
            Response::new(StatusCode::InternalServerError)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::tests::scratch_dir;
    use std::fs;

    fn make_request(raw: &[u8]) -> Request {
        Request::parse(raw).unwrap()
    }

    fn context(dir: &std::path::Path) -> Context {
        Context::new(Some(Storage::new(dir)))
    }

    #[test]
    fn test_get_existing_file() {
        let dir = scratch_dir("get-file");
        fs::write(dir.join("hello.txt"), b"Hello, World!").unwrap();

        let res = get_file_handler(&make_request(b"GET /files/hello.txt HTTP/1.1\r\n\r\n"), &context(&dir));

        assert_eq!(res.status(), StatusCode::Ok);
        assert_eq!(res.header("Content-Type"), Some("application/octet-stream"));
        assert_eq!(res.header("Content-Length"), Some("13"));
        assert_eq!(res.body(), b"Hello, World!");

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_get_missing_file() {
        let dir = scratch_dir("get-missing");

        let res = get_file_handler(&make_request(b"GET /files/nope HTTP/1.1\r\n\r\n"), &context(&dir));

        assert_eq!(res.status(), StatusCode::NotFound);
        assert!(res.headers().is_empty());
        assert!(res.body().is_empty());

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_get_directory_is_server_error() {
        let dir = scratch_dir("get-dir");

        // "/files/" apunta al root mismo
        let res = get_file_handler(&make_request(b"GET /files/ HTTP/1.1\r\n\r\n"), &context(&dir));

        assert_eq!(res.status(), StatusCode::InternalServerError);
        assert!(res.body().is_empty());

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_post_creates_file() {
        let dir = scratch_dir("post-file");

        let req = make_request(b"POST /files/new.txt HTTP/1.1\r\nContent-Length: 4\r\n\r\ndata");
        let res = post_file_handler(&req, &context(&dir));

        assert_eq!(res.status(), StatusCode::Created);
        assert!(res.body().is_empty());
        assert_eq!(fs::read(dir.join("new.txt")).unwrap(), b"data");

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_post_then_get_round_trip() {
        let dir = scratch_dir("post-get");
        let ctx = context(&dir);

        let post = make_request(b"POST /files/foo HTTP/1.1\r\n\r\nline1\r\nline2");
        assert_eq!(post_file_handler(&post, &ctx).status(), StatusCode::Created);

        let get = make_request(b"GET /files/foo HTTP/1.1\r\n\r\n");
        let res = get_file_handler(&get, &ctx);
        assert_eq!(res.status(), StatusCode::Ok);
        assert_eq!(res.body(), b"line1\r\nline2");

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_post_into_missing_subdirectory_fails() {
        let dir = scratch_dir("post-nodir");

        let req = make_request(b"POST /files/missing/child.txt HTTP/1.1\r\n\r\nx");
        let res = post_file_handler(&req, &context(&dir));

        assert_eq!(res.status(), StatusCode::InternalServerError);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_confined_storage_forbids_traversal() {
        let dir = scratch_dir("confined");
        let ctx = Context::new(Some(Storage::new(&dir).confined(true)));

        let res = get_file_handler(&make_request(b"GET /files/../secret HTTP/1.1\r\n\r\n"), &ctx);
        assert_eq!(res.status(), StatusCode::Forbidden);

        let res = post_file_handler(&make_request(b"POST /files/../secret HTTP/1.1\r\n\r\nx"), &ctx);
        assert_eq!(res.status(), StatusCode::Forbidden);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_no_storage_configured() {
        let ctx = Context::default();

        let res = get_file_handler(&make_request(b"GET /files/a HTTP/1.1\r\n\r\n"), &ctx);
        assert_eq!(res.status(), StatusCode::InternalServerError);

        let res = post_file_handler(&make_request(b"POST /files/a HTTP/1.1\r\n\r\nx"), &ctx);
        assert_eq!(res.status(), StatusCode::InternalServerError);
    }
}
