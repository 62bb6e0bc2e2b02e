//! # Sistema de Routing
//! src/router/mod.rs
//!
//! El router mapea requests a handlers.
//!
//! ## Arquitectura
//!
//! ```text
//! Request → Router → Handler → Response
//! ```
//!
//! Las rutas son una lista de prioridad: se evalúan en el orden en que se
//! registraron y responde la primera que coincide. No es un match por
//! prefijo más largo. Si ninguna coincide, se responde 404 Not Found.

use crate::handlers;
use crate::http::{Method, Request, Response, StatusCode};
use crate::storage::Storage;

/// Estado compartido (solo lectura) que reciben los handlers
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Directorio para `/files/`; `None` si no se configuró
    pub storage: Option<Storage>,
}

impl Context {
    pub fn new(storage: Option<Storage>) -> Self {
        Self { storage }
    }
}

/// Tipo de función handler
///
/// Un handler recibe un Request y el contexto, y retorna una Response
pub type Handler = fn(&Request, &Context) -> Response;

/// Cómo se compara el path del request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    /// El path debe ser exactamente igual
    Exact(String),

    /// El path debe empezar con el prefijo
    Prefix(String),
}

impl Matcher {
    pub fn exact(path: &str) -> Self {
        Matcher::Exact(path.to_string())
    }

    pub fn prefix(prefix: &str) -> Self {
        Matcher::Prefix(prefix.to_string())
    }

    fn matches(&self, path: &str) -> bool {
        match self {
            Matcher::Exact(exact) => path == exact,
            Matcher::Prefix(prefix) => path.starts_with(prefix.as_str()),
        }
    }
}

enum Dispatch {
    /// Un handler para cualquier método
    Any(Handler),

    /// Un handler por método, en orden de registro
    ByMethod(Vec<(Method, Handler)>),
}

struct Route {
    matcher: Matcher,
    dispatch: Dispatch,
}

/// Router con rutas en orden de prioridad
pub struct Router {
    routes: Vec<Route>,
    context: Context,
}

impl Router {
    /// Crea un nuevo router vacío
    pub fn new(context: Context) -> Self {
        Self {
            routes: Vec::new(),
            context,
        }
    }

    /// Router con las rutas del servidor, en este orden:
    ///
    /// 1. `/echo/` (prefijo, cualquier método)
    /// 2. `/user-agent`
    /// 3. `/files/` (prefijo): GET lee, POST escribe, otro método 405
    /// 4. `/`
    ///
    /// Todo lo demás responde 404.
    pub fn with_default_routes(storage: Option<Storage>) -> Self {
        let mut router = Router::new(Context::new(storage));

        router.any(Matcher::prefix(handlers::ECHO_PREFIX), handlers::echo_handler);
        router.any(Matcher::exact("/user-agent"), handlers::user_agent_handler);
        router.on(Matcher::prefix(handlers::FILES_PREFIX), Method::GET, handlers::get_file_handler);
        router.on(Matcher::prefix(handlers::FILES_PREFIX), Method::POST, handlers::post_file_handler);
        router.any(Matcher::exact("/"), handlers::root_handler);

        router
    }

    /// Registra una ruta que acepta cualquier método
    ///
    /// # Ejemplo
    /// ```
    /// use httplet::router::{Context, Matcher, Router};
    /// use httplet::http::{Request, Response, StatusCode};
    ///
    /// fn hello_handler(_req: &Request, _ctx: &Context) -> Response {
    ///     Response::new(StatusCode::Ok).with_body("hello")
    /// }
    ///
    /// let mut router = Router::new(Context::default());
    /// router.any(Matcher::exact("/hello"), hello_handler);
    ///
    /// let request = Request::parse(b"GET /hello HTTP/1.1\r\n\r\n").unwrap();
    /// assert_eq!(router.route(&request).body(), b"hello");
    /// ```
    pub fn any(&mut self, matcher: Matcher, handler: Handler) {
        self.routes.push(Route {
            matcher,
            dispatch: Dispatch::Any(handler),
        });
    }

    /// Registra un handler para un método sobre una ruta
    ///
    /// Si la última ruta registrada tiene el mismo matcher, el método se
    /// agrega a esa ruta; si no, se crea una ruta nueva al final.
    pub fn on(&mut self, matcher: Matcher, method: Method, handler: Handler) {
        if let Some(Route {
            matcher: last,
            dispatch: Dispatch::ByMethod(methods),
        }) = self.routes.last_mut()
        {
            if *last == matcher {
                methods.push((method, handler));
                return;
            }
        }

        self.routes.push(Route {
            matcher,
            dispatch: Dispatch::ByMethod(vec![(method, handler)]),
        });
    }

    /// Encuentra y ejecuta el handler apropiado para un request
    ///
    /// - Primera ruta cuyo matcher coincide con el path
    /// - Si la ruta es por método y el método no está: 405 con `Allow`
    /// - Si ninguna ruta coincide: 404 con `Content-Length: 0`
    pub fn route(&self, request: &Request) -> Response {
        let path = request.path();

        let Some(route) = self.routes.iter().find(|r| r.matcher.matches(path)) else {
            return Response::empty(StatusCode::NotFound);
        };

        match &route.dispatch {
            Dispatch::Any(handler) => handler(request, &self.context),
            Dispatch::ByMethod(methods) => {
                match methods.iter().find(|(m, _)| m == request.method()) {
                    Some((_, handler)) => handler(request, &self.context),
                    None => {
                        let allow = methods
                            .iter()
                            .map(|(m, _)| m.as_str())
                            .collect::<Vec<_>>()
                            .join(", ");
                        Response::empty(StatusCode::MethodNotAllowed).with_header("Allow", &allow)
                    }
                }
            }
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::with_default_routes(None)
    }
}
