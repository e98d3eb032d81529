//! # Construcción de Respuestas HTTP
//! src/http/response.rs
//!
//! API para construir respuestas HTTP/1.1 y convertirlas a bytes para
//! enviarlas al cliente.
//!
//! ## Formato de una respuesta
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/plain\r\n
//! Content-Length: 3\r\n
//! \r\n
//! abc
//! ```
//!
//! ## Ejemplo de uso
//!
//! ```
//! use raw_http_server::http::{Response, StatusCode};
//!
//! let response = Response::new(StatusCode::Ok)
//!     .with_header("Content-Type", "text/plain")
//!     .with_body("abc");
//!
//! let bytes = response.to_bytes();
//! assert!(bytes.ends_with(b"\r\n\r\nabc"));
//! ```

use super::{ContentEncoding, StatusCode};
use serde::Serialize;
use std::collections::HashMap;

/// Cuerpo JSON de las respuestas de error
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

/// Representa una respuesta HTTP completa
#[derive(Debug, Clone)]
pub struct Response {
    /// Código de estado HTTP (200, 404, etc.)
    status: StatusCode,

    /// Headers HTTP. Usamos HashMap para evitar duplicados
    headers: HashMap<String, String>,

    /// Cuerpo de la respuesta (puede ser vacío)
    body: Vec<u8>,

    /// El handler acepta que el body se comprima si el cliente lo soporta
    compressible: bool,
}

impl Response {
    /// Crea una nueva respuesta sin headers ni body
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
            compressible: false,
        }
    }

    /// Agrega un header a la respuesta
    ///
    /// Si el header ya existe, se sobrescribe.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.add_header(name, value);
        self
    }

    /// Agrega un header a una respuesta existente (versión mutable)
    pub fn add_header(&mut self, name: &str, value: &str) {
        self.headers.insert(name.to_string(), value.to_string());
    }

    /// Establece el cuerpo desde un string y agrega `Content-Length`
    pub fn with_body(self, body: &str) -> Self {
        self.with_body_bytes(body.as_bytes().to_vec())
    }

    /// Establece el cuerpo desde bytes y agrega `Content-Length`
    ///
    /// # Ejemplo
    /// ```
    /// use raw_http_server::http::{Response, StatusCode};
    ///
    /// let response = Response::new(StatusCode::Ok)
    ///     .with_body_bytes(vec![0x00, 0xFF]);
    /// assert_eq!(response.header("Content-Length"), Some("2"));
    /// ```
    pub fn with_body_bytes(mut self, body: Vec<u8>) -> Self {
        let length = body.len().to_string();
        self.body = body;
        self.add_header("Content-Length", &length);
        self
    }

    /// Marca la respuesta como apta para gzip
    pub fn compressible(mut self) -> Self {
        self.compressible = true;
        self
    }

    /// 200 OK con `Content-Type: text/plain`
    pub fn text(body: &str) -> Self {
        Self::new(StatusCode::Ok)
            .with_header("Content-Type", "text/plain")
            .with_body(body)
    }

    /// 404 Not Found sin body
    pub fn not_found() -> Self {
        Self::new(StatusCode::NotFound)
    }

    /// Respuesta de error con mensaje JSON
    ///
    /// Formato del JSON: `{"error":"mensaje"}`
    pub fn error(status: StatusCode, message: &str) -> Self {
        let body = serde_json::to_string(&ErrorBody { error: message })
            .unwrap_or_else(|_| String::from(r#"{"error":"unknown"}"#));

        Self::new(status)
            .with_header("Content-Type", "application/json")
            .with_body(&body)
    }

    /// Aplica la codificación negociada con el cliente
    ///
    /// Solo tiene efecto si el handler marcó la respuesta como
    /// `compressible`. Un body vacío se deja vacío: la respuesta lleva
    /// `Content-Encoding` pero no se agrega `Content-Length`.
    pub fn negotiate(mut self, encoding: ContentEncoding) -> std::io::Result<Self> {
        if !self.compressible || encoding == ContentEncoding::Identity {
            return Ok(self);
        }

        self.add_header("Content-Encoding", encoding.as_str());

        if self.body.is_empty() {
            return Ok(self);
        }

        let encoded = encoding.encode(&self.body)?;
        Ok(self.with_body_bytes(encoded))
    }

    /// Convierte la respuesta a bytes listos para enviar por el socket
    ///
    /// - Status line: `HTTP/1.1 200 OK\r\n`
    /// - Headers: `Header-Name: Value\r\n`
    /// - Línea vacía: `\r\n`
    /// - Body
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(64 + self.body.len());

        result.extend_from_slice(format!("HTTP/1.1 {}\r\n", self.status).as_bytes());

        for (name, value) in &self.headers {
            result.extend_from_slice(format!("{}: {}\r\n", name, value).as_bytes());
        }

        result.extend_from_slice(b"\r\n");
        result.extend_from_slice(&self.body);

        result
    }

    /// Obtiene el código de estado de la respuesta
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Obtiene un header específico
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|s| s.as_str())
    }

    /// Obtiene una referencia al body
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}
