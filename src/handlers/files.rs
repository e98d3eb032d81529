//! # Handlers de Archivos
//! src/handlers/files.rs
//!
//! - `GET /files/{name}`: descarga un archivo del directorio de trabajo
//! - `POST /files/{name}`: escribe el body del request en ese archivo
//!
//! El nombre se une directamente al directorio, sin canonicalizar. Como el
//! router separa el path por `/`, un nombre nunca contiene `/`.
//!
//! No hay locking: una descarga concurrente con una subida del mismo nombre
//! puede ver el archivo a medio escribir.

use crate::error::HandlerError;
use crate::http::{Request, Response, StatusCode};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Directorio de trabajo, fijado al arrancar y compartido en solo lectura
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Ruta de un archivo dentro del directorio
    pub fn resolve(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

/// Handler para `GET /files/{name}`
///
/// 404 si la ruta no es un archivo regular; si no, 200 con el contenido
/// completo como `application/octet-stream`.
pub async fn download_handler(files: &FileStore, name: &str) -> Result<Response, HandlerError> {
    let path = files.resolve(name);

    match fs::metadata(&path).await {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => return Ok(Response::not_found()),
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Response::not_found()),
        Err(e) => return Err(e.into()),
    }

    let data = fs::read(&path).await?;
    debug!(path = %path.display(), bytes = data.len(), "archivo leído");

    Ok(Response::new(StatusCode::Ok)
        .with_header("Content-Type", "application/octet-stream")
        .with_body_bytes(data))
}

/// Handler para `POST /files/{name}`
///
/// Sobrescribe el archivo con el body (vacío si no vino body) y responde
/// 201 devolviendo lo escrito.
pub async fn upload_handler(
    files: &FileStore,
    name: &str,
    req: &Request,
) -> Result<Response, HandlerError> {
    let path = files.resolve(name);
    let body = req.body().unwrap_or_default();

    fs::write(&path, body).await?;
    debug!(path = %path.display(), bytes = body.len(), "archivo escrito");

    Ok(Response::new(StatusCode::Created).with_body(body))
}
