//! # Raw HTTP Server
//! src/lib.rs
//!
//! Servidor HTTP/1.1 mínimo implementado directamente sobre sockets TCP,
//! sin framework: parsea a mano la request line y los headers, despacha a
//! un conjunto fijo de rutas y arma la respuesta byte a byte, con gzip
//! opcional y archivos servidos desde un directorio.
//!
//! ## Arquitectura
//!
//! - `http`: Parsing de requests, construcción de responses, gzip
//! - `router`: Tabla de rutas y despacho a handlers
//! - `handlers`: Health-check, echo, user-agent y archivos
//! - `server`: Accept loop y manejo de cada conexión
//! - `lifecycle`: Señal de apagado y seguimiento de conexiones
//! - `config`: Argumentos CLI y variables de entorno
//! - `error`: Tipos de error por capa
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use raw_http_server::config::Config;
//! use raw_http_server::lifecycle::Shutdown;
//! use raw_http_server::server::Server;
//!
//! # async fn run() -> raw_http_server::error::Result<()> {
//! let server = Server::new(&Config::default())?;
//! let listener = server.bind().await?;
//! let shutdown = Shutdown::new();
//! server.serve(listener, shutdown.signal()).await
//! # }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod http;
pub mod lifecycle;
pub mod router;
pub mod server;
