//! # Handlers Básicos
//! src/handlers/basic.rs
//!
//! - `GET /`: health-check
//! - `GET /echo/{message}`: devuelve el segmento tal cual
//! - `GET /user-agent`: devuelve el header `User-Agent`

use crate::error::HandlerError;
use crate::http::{Request, Response, StatusCode};

/// Handler para `GET /`
///
/// 200 sin body. Es comprimible, así que si el cliente acepta gzip la
/// respuesta lleva `Content-Encoding: gzip` aunque el body siga vacío.
pub fn health_handler(_req: &Request) -> Response {
    Response::new(StatusCode::Ok).compressible()
}

/// Handler para `GET /echo/{message}`
pub fn echo_handler(message: &str) -> Response {
    Response::text(message).compressible()
}

/// Handler para `GET /user-agent`
///
/// Sin el header responde 400 en lugar de inventar un valor.
pub fn user_agent_handler(req: &Request) -> Result<Response, HandlerError> {
    let agent = req
        .header("User-Agent")
        .ok_or(HandlerError::MissingHeader("User-Agent"))?;

    Ok(Response::text(agent))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &[u8]) -> Request {
        Request::parse(raw).unwrap()
    }

    #[test]
    fn test_health() {
        let response = health_handler(&parse(b"GET / HTTP/1.1\r\n\r\n"));

        assert_eq!(response.status(), StatusCode::Ok);
        assert!(response.body().is_empty());
        assert_eq!(response.header("Content-Length"), None);
    }

    #[test]
    fn test_echo() {
        let response = echo_handler("abc");

        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.header("Content-Type"), Some("text/plain"));
        assert_eq!(response.header("Content-Length"), Some("3"));
        assert_eq!(response.body(), b"abc");
    }

    #[test]
    fn test_user_agent() {
        let req = parse(b"GET /user-agent HTTP/1.1\r\nUser-Agent: test-agent\r\n\r\n");
        let response = user_agent_handler(&req).unwrap();

        assert_eq!(response.body(), b"test-agent");
        assert_eq!(response.header("Content-Length"), Some("10"));
    }

    #[test]
    fn test_user_agent_missing() {
        let req = parse(b"GET /user-agent HTTP/1.1\r\nHost: localhost\r\n\r\n");
        let err = user_agent_handler(&req).unwrap_err();

        assert!(matches!(err, HandlerError::MissingHeader("User-Agent")));
        assert_eq!(err.status(), StatusCode::BadRequest);
    }
}
