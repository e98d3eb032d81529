//! # Módulo del Servidor
//! src/server/mod.rs
//!
//! Servidor TCP que:
//! 1. Escucha en un puerto
//! 2. Acepta conexiones entrantes, una tarea por conexión
//! 3. Lee y parsea el request
//! 4. Genera y envía la respuesta y cierra la conexión

pub mod connection;
pub mod tcp;

pub use connection::{read_request, write_response, Connection, ConnectionId};
pub use tcp::Server;
