//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración desde argumentos CLI y variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./raw_http_server --directory /tmp/files --port 4221
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_DIRECTORY=/tmp/files HTTP_READ_MODE=content-length ./raw_http_server
//! ```

use crate::error::ConfigError;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Cómo se lee el request del socket
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReadMode {
    /// Una sola lectura de `buffer-size` bytes; lo que no entra se pierde
    Single,

    /// Sigue leyendo hasta completar `Content-Length` (con tope)
    ContentLength,
}

/// Parámetros de lectura que usa cada conexión
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    pub buffer_size: usize,
    pub mode: ReadMode,
    pub max_request_size: usize,
}

/// Configuración del servidor HTTP/1.1
#[derive(Debug, Clone, Parser)]
#[command(name = "raw_http_server")]
#[command(about = "Servidor HTTP/1.1 mínimo sobre sockets TCP")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Directorio base de las rutas /files (por defecto el directorio actual)
    #[arg(long, env = "HTTP_DIRECTORY")]
    pub directory: Option<PathBuf>,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "0.0.0.0", env = "HTTP_HOST")]
    pub host: String,

    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "4221", env = "HTTP_PORT")]
    pub port: u16,

    // === Lectura de requests ===
    /// Tamaño del buffer de lectura en bytes
    #[arg(long = "buffer-size", default_value = "1024", env = "HTTP_BUFFER_SIZE")]
    pub buffer_size: usize,

    /// Modo de lectura del request
    #[arg(long = "read-mode", value_enum, default_value_t = ReadMode::Single, env = "HTTP_READ_MODE")]
    pub read_mode: ReadMode,

    /// Tope en bytes para el modo content-length
    #[arg(long = "max-request-size", default_value = "1048576", env = "HTTP_MAX_REQUEST_SIZE")]
    pub max_request_size: usize,
}

impl Config {
    /// Crea la configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use raw_http_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:4221");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida los valores numéricos
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.buffer_size == 0 {
            return Err(ConfigError::InvalidBufferSize);
        }

        if self.max_request_size < self.buffer_size {
            return Err(ConfigError::InvalidMaxRequestSize {
                max: self.max_request_size,
                buffer: self.buffer_size,
            });
        }

        Ok(())
    }

    /// Resuelve el directorio de trabajo
    ///
    /// Un valor vacío o en blanco equivale a no pasar `--directory`. Si se
    /// pasa, tiene que existir y ser un directorio.
    pub fn working_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.directory {
            Some(dir) if !dir.to_string_lossy().trim().is_empty() => {
                if dir.is_dir() {
                    Ok(dir.clone())
                } else {
                    Err(ConfigError::DirectoryNotFound(dir.clone()))
                }
            }
            _ => std::env::current_dir().map_err(ConfigError::CurrentDir),
        }
    }

    pub fn read_options(&self) -> ReadOptions {
        ReadOptions {
            buffer_size: self.buffer_size,
            mode: self.read_mode,
            max_request_size: self.max_request_size,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            directory: None,
            host: "0.0.0.0".to_string(),
            port: 4221,
            buffer_size: 1024,
            read_mode: ReadMode::Single,
            max_request_size: 1024 * 1024,
        }
    }
}
