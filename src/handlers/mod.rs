//! # Handlers
//!
//! Cada handler recibe lo que necesita del request ya parseado y retorna una
//! `Response` (o un `HandlerError` que el router convierte en respuesta).
//!
//! - **basic**: health-check, echo, user-agent
//! - **files**: descarga y subida de archivos bajo el directorio de trabajo

pub mod basic;
pub mod files;

pub use basic::*;
pub use files::{download_handler, upload_handler, FileStore};
