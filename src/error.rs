//! # Errores del Servidor
//! src/error.rs
//!
//! Un tipo de error por capa:
//!
//! - `ConfigError`: configuración inválida, fatal al arrancar
//! - `ServerError`: fallos del proceso (bind, accept loop)
//! - `HandlerError`: fallos de un handler, se convierten en respuesta HTTP
//!
//! Los errores de parsing viven en `http::request::ParseError`.

use crate::http::{Response, StatusCode};
use std::path::PathBuf;
use thiserror::Error;

/// Result con `ServerError`
pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Directory '{}' not found", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Buffer size must be >= 1")]
    InvalidBufferSize,

    #[error("Max request size ({max}) must be >= buffer size ({buffer})")]
    InvalidMaxRequestSize { max: usize, buffer: usize },

    #[error("Cannot determine current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Cannot bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Server task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Error de un handler individual
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Falta un header que la ruta necesita
    #[error("Missing required header: {0}")]
    MissingHeader(&'static str),

    /// Falló la lectura o escritura de un archivo
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HandlerError {
    /// Código de estado que corresponde a este error
    pub fn status(&self) -> StatusCode {
        match self {
            HandlerError::MissingHeader(_) => StatusCode::BadRequest,
            HandlerError::Io(_) => StatusCode::InternalServerError,
        }
    }

    /// Convierte el error en una respuesta para el cliente
    pub fn into_response(self) -> Response {
        Response::error(self.status(), &self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_header_is_bad_request() {
        let response = HandlerError::MissingHeader("User-Agent").into_response();

        assert_eq!(response.status(), StatusCode::BadRequest);
        let body = String::from_utf8(response.body().to_vec()).unwrap();
        assert!(body.contains("Missing required header: User-Agent"));
    }

    #[test]
    fn test_io_is_internal_error() {
        let err = HandlerError::from(std::io::Error::other("disk full"));
        assert_eq!(err.status(), StatusCode::InternalServerError);
    }

    #[test]
    fn test_config_error_message() {
        let err = ConfigError::DirectoryNotFound(PathBuf::from("/nope"));
        assert_eq!(err.to_string(), "Directory '/nope' not found");

        let err = ServerError::from(err);
        assert!(err.to_string().starts_with("Invalid configuration"));
    }
}
