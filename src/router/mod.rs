//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Mapea `(método, segmentos del path)` a una ruta y ejecuta su handler.
//!
//! ## Arquitectura
//!
//! ```text
//! Request → Router::resolve → Route → handler → negociación gzip → Response
//! ```
//!
//! La tabla se arma una vez al arrancar y se evalúa en orden: gana la
//! primera entrada que coincide. Todo lo que no coincide (incluidos los
//! verbos desconocidos) cae en `Route::NotFound`.

use crate::handlers::{self, FileStore};
use crate::http::{ContentEncoding, Method, Request, Response, StatusCode};
use tracing::{error, warn};

/// Tipo de ruta, sin parámetros
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    Root,
    Echo,
    UserAgent,
    DownloadFile,
    UploadFile,
}

/// Ruta resuelta con sus parámetros capturados
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Root,
    Echo(String),
    UserAgent,
    DownloadFile(String),
    UploadFile(String),
    NotFound,
}

impl RouteKind {
    /// Construye la ruta con los segmentos capturados por el patrón
    fn bind(self, captures: Vec<String>) -> Route {
        let mut captures = captures.into_iter();

        match self {
            RouteKind::Root => Route::Root,
            RouteKind::UserAgent => Route::UserAgent,
            RouteKind::Echo => captures.next().map(Route::Echo).unwrap_or(Route::NotFound),
            RouteKind::DownloadFile => captures
                .next()
                .map(Route::DownloadFile)
                .unwrap_or(Route::NotFound),
            RouteKind::UploadFile => captures
                .next()
                .map(Route::UploadFile)
                .unwrap_or(Route::NotFound),
        }
    }
}

/// Segmento de un patrón: literal o captura (`{nombre}`)
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Capture,
}

#[derive(Debug, Clone)]
struct RouteEntry {
    method: Method,
    pattern: Vec<Segment>,
    kind: RouteKind,
}

impl RouteEntry {
    /// Retorna los segmentos capturados si el request coincide
    fn matches(&self, method: &Method, segments: &[String]) -> Option<Vec<String>> {
        if &self.method != method || self.pattern.len() != segments.len() {
            return None;
        }

        let mut captures = Vec::new();
        for (expected, actual) in self.pattern.iter().zip(segments) {
            match expected {
                Segment::Literal(literal) if literal == actual => {}
                Segment::Literal(_) => return None,
                Segment::Capture => captures.push(actual.clone()),
            }
        }

        Some(captures)
    }
}

/// Router con la tabla de rutas y el directorio de trabajo
pub struct Router {
    routes: Vec<RouteEntry>,
    files: FileStore,
}

impl Router {
    /// Crea un router vacío
    pub fn new(files: FileStore) -> Self {
        Self {
            routes: Vec::new(),
            files,
        }
    }

    /// Router con las rutas del servidor
    pub fn with_default_routes(files: FileStore) -> Self {
        let mut router = Self::new(files);

        router.register(Method::GET, "/", RouteKind::Root);
        router.register(Method::GET, "/echo/{message}", RouteKind::Echo);
        router.register(Method::GET, "/user-agent", RouteKind::UserAgent);
        router.register(Method::GET, "/files/{name}", RouteKind::DownloadFile);
        router.register(Method::POST, "/files/{name}", RouteKind::UploadFile);

        router
    }

    /// Registra una ruta
    ///
    /// Los segmentos de la forma `{nombre}` capturan un segmento del path.
    ///
    /// # Ejemplo
    /// ```
    /// use raw_http_server::handlers::FileStore;
    /// use raw_http_server::http::{Method, Request};
    /// use raw_http_server::router::{Route, RouteKind, Router};
    ///
    /// let mut router = Router::new(FileStore::new("."));
    /// router.register(Method::GET, "/echo/{message}", RouteKind::Echo);
    ///
    /// let request = Request::parse(b"GET /echo/hi HTTP/1.1\r\n\r\n").unwrap();
    /// assert_eq!(router.resolve(&request), Route::Echo("hi".to_string()));
    /// ```
    pub fn register(&mut self, method: Method, pattern: &str, kind: RouteKind) {
        let pattern = pattern
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                if segment.starts_with('{') && segment.ends_with('}') {
                    Segment::Capture
                } else {
                    Segment::Literal(segment.to_string())
                }
            })
            .collect();

        self.routes.push(RouteEntry {
            method,
            pattern,
            kind,
        });
    }

    /// Resuelve la ruta de un request (función pura, sin I/O)
    pub fn resolve(&self, request: &Request) -> Route {
        self.routes
            .iter()
            .find_map(|entry| {
                entry
                    .matches(request.method(), request.segments())
                    .map(|captures| entry.kind.bind(captures))
            })
            .unwrap_or(Route::NotFound)
    }

    /// Encuentra y ejecuta el handler apropiado para un request
    ///
    /// Los errores del handler se convierten en 400/500 y al final se aplica
    /// la codificación que aceptó el cliente.
    pub async fn route(&self, request: &Request) -> Response {
        let route = self.resolve(request);

        let response = match self.dispatch(route, request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(path = request.path(), error = %e, "handler falló");
                e.into_response()
            }
        };

        match response.negotiate(ContentEncoding::negotiate(request)) {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "no se pudo comprimir la respuesta");
                Response::error(StatusCode::InternalServerError, "Compression failed")
            }
        }
    }

    async fn dispatch(
        &self,
        route: Route,
        request: &Request,
    ) -> Result<Response, crate::error::HandlerError> {
        match route {
            Route::Root => Ok(handlers::health_handler(request)),
            Route::Echo(message) => Ok(handlers::echo_handler(&message)),
            Route::UserAgent => handlers::user_agent_handler(request),
            Route::DownloadFile(name) => handlers::download_handler(&self.files, &name).await,
            Route::UploadFile(name) => handlers::upload_handler(&self.files, &name, request).await,
            Route::NotFound => Ok(Response::not_found()),
        }
    }

    /// Directorio que usan las rutas de archivos
    pub fn files(&self) -> &FileStore {
        &self.files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn router() -> Router {
        Router::with_default_routes(FileStore::new("."))
    }

    fn resolve(raw: &[u8]) -> Route {
        router().resolve(&Request::parse(raw).unwrap())
    }

    #[test]
    fn test_router_creation() {
        let router = Router::new(FileStore::new("."));
        assert_eq!(router.routes.len(), 0);
    }

    #[test]
    fn test_default_routes_registered() {
        assert_eq!(router().routes.len(), 5);
    }

    #[test]
    fn test_resolve_table() {
        assert_eq!(resolve(b"GET / HTTP/1.1\r\n\r\n"), Route::Root);
        assert_eq!(resolve(b"GET /echo/abc HTTP/1.1\r\n\r\n"), Route::Echo("abc".into()));
        assert_eq!(resolve(b"GET /user-agent HTTP/1.1\r\n\r\n"), Route::UserAgent);
        assert_eq!(
            resolve(b"GET /files/a.txt HTTP/1.1\r\n\r\n"),
            Route::DownloadFile("a.txt".into())
        );
        assert_eq!(
            resolve(b"POST /files/a.txt HTTP/1.1\r\n\r\n"),
            Route::UploadFile("a.txt".into())
        );
    }

    #[test]
    fn test_resolve_not_found() {
        assert_eq!(resolve(b"GET /nope HTTP/1.1\r\n\r\n"), Route::NotFound);
        assert_eq!(resolve(b"GET /echo HTTP/1.1\r\n\r\n"), Route::NotFound);
        assert_eq!(resolve(b"GET /echo/a/b HTTP/1.1\r\n\r\n"), Route::NotFound);
        assert_eq!(resolve(b"POST / HTTP/1.1\r\n\r\n"), Route::NotFound);
        assert_eq!(resolve(b"POST /echo/abc HTTP/1.1\r\n\r\n"), Route::NotFound);
        assert_eq!(resolve(b"PUT /files/a.txt HTTP/1.1\r\n\r\n"), Route::NotFound);
    }

    #[test]
    fn test_first_match_wins() {
        let mut router = Router::new(FileStore::new("."));
        router.register(Method::GET, "/echo/{message}", RouteKind::Echo);
        router.register(Method::GET, "/echo/{message}", RouteKind::UserAgent);

        let request = Request::parse(b"GET /echo/x HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(router.resolve(&request), Route::Echo("x".into()));
    }

    #[test]
    fn test_pattern_without_capture_falls_back() {
        let mut router = Router::new(FileStore::new("."));
        router.register(Method::GET, "/echo", RouteKind::Echo);

        let request = Request::parse(b"GET /echo HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(router.resolve(&request), Route::NotFound);
    }

    #[tokio::test]
    async fn test_route_echo_gzip() {
        let request =
            Request::parse(b"GET /echo/abc HTTP/1.1\r\nAccept-Encoding: gzip\r\n\r\n").unwrap();
        let response = router().route(&request).await;

        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.header("Content-Encoding"), Some("gzip"));

        let mut decoded = String::new();
        GzDecoder::new(response.body()).read_to_string(&mut decoded).unwrap();
        assert_eq!(decoded, "abc");
    }

    #[tokio::test]
    async fn test_route_user_agent_not_compressed() {
        let request = Request::parse(
            b"GET /user-agent HTTP/1.1\r\nUser-Agent: ua\r\nAccept-Encoding: gzip\r\n\r\n",
        )
        .unwrap();
        let response = router().route(&request).await;

        assert_eq!(response.header("Content-Encoding"), None);
        assert_eq!(response.body(), b"ua");
    }

    #[tokio::test]
    async fn test_route_missing_user_agent_is_bad_request() {
        let request = Request::parse(b"GET /user-agent HTTP/1.1\r\n\r\n").unwrap();
        let response = router().route(&request).await;

        assert_eq!(response.status(), StatusCode::BadRequest);
    }

    #[tokio::test]
    async fn test_route_not_found() {
        let request = Request::parse(b"GET /nonexistent HTTP/1.1\r\n\r\n").unwrap();
        let response = router().route(&request).await;

        assert_eq!(response.status(), StatusCode::NotFound);
        assert!(response.body().is_empty());
    }
}
