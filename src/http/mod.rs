//! # Módulo HTTP
//!
//! Implementa a mano el subconjunto de HTTP/1.1 que usa el servidor:
//!
//! - Parsing de requests (request line, headers, body)
//! - Construcción de responses
//! - Códigos de estado
//! - Negociación de `Content-Encoding` (gzip)
//!
//! Fuera de alcance: keep-alive, pipelining, chunked transfer encoding y
//! headers multilínea. Cada conexión lleva exactamente un request.

pub mod encoding;
pub mod request;
pub mod response;
pub mod status;

pub use encoding::ContentEncoding;
pub use request::{Method, ParseError, Request};
pub use response::Response;
pub use status::StatusCode;
