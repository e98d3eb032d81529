//! # Manejo de una Conexión
//! src/server/connection.rs
//!
//! Pipeline lineal por conexión:
//!
//! ```text
//! read_request → Request::parse → Router::route → write_response → close
//! ```
//!
//! Todo el pipeline compite contra la señal de apagado, así que cualquier
//! punto de espera (lectura, archivo, escritura) se interrumpe al cancelar.
//! El socket se cierra siempre al soltar el `TcpStream`.

use crate::config::{ReadMode, ReadOptions};
use crate::http::request::split_header;
use crate::http::{Request, Response, StatusCode};
use crate::lifecycle::ShutdownSignal;
use crate::router::Router;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

static CONNECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identificador de conexión para los logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn next() -> Self {
        Self(CONNECTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Una conexión aceptada, lista para procesarse en su propia tarea
pub struct Connection {
    id: ConnectionId,
    peer: SocketAddr,
    stream: TcpStream,
    router: Arc<Router>,
    options: ReadOptions,
}

impl Connection {
    pub fn new(stream: TcpStream, peer: SocketAddr, router: Arc<Router>, options: ReadOptions) -> Self {
        Self {
            id: ConnectionId::next(),
            peer,
            stream,
            router,
            options,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Procesa la conexión hasta el final o hasta que se cancele
    pub async fn handle(self, signal: ShutdownSignal) {
        let Connection {
            id,
            peer,
            stream,
            router,
            options,
        } = self;
        let start = Instant::now();

        tokio::select! {
            result = process(stream, &router, &options) => match result {
                Ok(Some(status)) if status.is_server_error() => warn!(
                    connection = %id,
                    %peer,
                    status = status.as_u16(),
                    elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "respuesta de error enviada"
                ),
                Ok(Some(status)) => info!(
                    connection = %id,
                    %peer,
                    status = status.as_u16(),
                    elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "respuesta enviada"
                ),
                Ok(None) => debug!(connection = %id, %peer, "conexión cerrada sin datos"),
                Err(e) => warn!(connection = %id, %peer, error = %e, "error en la conexión"),
            },
            _ = signal.cancelled() => info!(connection = %id, %peer, "conexión cancelada por apagado"),
        }
    }
}

/// Lee, enruta y responde. `None` si el cliente cerró sin enviar nada.
async fn process(
    mut stream: TcpStream,
    router: &Router,
    options: &ReadOptions,
) -> std::io::Result<Option<StatusCode>> {
    let raw = read_request(&mut stream, options).await?;
    if raw.is_empty() {
        return Ok(None);
    }

    let response = match Request::parse(&raw) {
        Ok(request) => {
            debug!(
                method = %request.method(),
                path = request.path(),
                version = request.version().unwrap_or("-"),
                "request recibido"
            );
            router.route(&request).await
        }
        Err(e) => {
            warn!(error = %e, "request inválido");
            Response::error(StatusCode::BadRequest, &format!("Invalid: {}", e))
        }
    };

    write_response(&mut stream, &response).await?;
    Ok(Some(response.status()))
}

/// Lee el request del socket
///
/// En `ReadMode::Single` hace exactamente una lectura de hasta
/// `buffer_size` bytes: un request más grande queda truncado. En
/// `ReadMode::ContentLength` sigue leyendo hasta tener los headers completos
/// y `Content-Length` bytes de body, hasta EOF o hasta `max_request_size`.
/// Un `Content-Length` mayor que el límite solo hace leer hasta el límite.
pub async fn read_request<R>(reader: &mut R, options: &ReadOptions) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut buffer = vec![0u8; options.buffer_size];
    let n = reader.read(&mut buffer).await?;
    buffer.truncate(n);

    if n == 0 || options.mode == ReadMode::Single {
        return Ok(buffer);
    }

    let mut chunk = vec![0u8; options.buffer_size];
    loop {
        let expected = match find_head_end(&buffer) {
            Some(head_end) => head_end
                .saturating_add(content_length(&buffer[..head_end]).unwrap_or(0))
                .min(options.max_request_size),
            None => usize::MAX,
        };

        if buffer.len() >= expected || buffer.len() >= options.max_request_size {
            break;
        }

        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..n]);
    }

    buffer.truncate(options.max_request_size);
    Ok(buffer)
}

/// Posición justo después de la primera línea vacía que sigue a la
/// request line
///
/// Acepta `\r\n` y `\n` solo, igual que `Request::parse`.
fn find_head_end(buffer: &[u8]) -> Option<usize> {
    let mut line_start = 0;

    for (pos, byte) in buffer.iter().enumerate() {
        if *byte != b'\n' {
            continue;
        }

        let line = &buffer[line_start..pos];
        let blank = line.iter().all(|b| *b == 0 || b.is_ascii_whitespace());
        if blank && line_start > 0 {
            return Some(pos + 1);
        }
        line_start = pos + 1;
    }

    None
}

fn content_length(head: &[u8]) -> Option<usize> {
    String::from_utf8_lossy(head)
        .lines()
        .skip(1)
        .filter_map(split_header)
        .find(|(name, _)| name.eq_ignore_ascii_case("Content-Length"))
        .and_then(|(_, value)| value.parse().ok())
}

/// Envía la respuesta y cierra el lado de escritura
pub async fn write_response<W>(writer: &mut W, response: &Response) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(&response.to_bytes()).await?;
    writer.flush().await?;
    writer.shutdown().await
}
