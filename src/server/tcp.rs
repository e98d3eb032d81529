//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! El accept loop corre en su propia tarea y lanza una tarea por conexión,
//! así nunca se bloquea esperando a que se procese un request.

use crate::config::{Config, ReadOptions};
use crate::error::{Result, ServerError};
use crate::handlers::FileStore;
use crate::lifecycle::{ConnectionTracker, ShutdownSignal};
use crate::router::Router;
use crate::server::Connection;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

/// Servidor HTTP/1.1
pub struct Server {
    address: String,
    router: Arc<Router>,
    options: ReadOptions,
}

impl Server {
    /// Valida la configuración y arma la tabla de rutas
    ///
    /// Falla si `--directory` apunta a algo que no es un directorio.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let root = config.working_dir()?;
        let router = Router::with_default_routes(FileStore::new(root));

        Ok(Self {
            address: config.address(),
            router: Arc::new(router),
            options: config.read_options(),
        })
    }

    /// Enlaza el socket de escucha. Un error aquí es fatal.
    pub async fn bind(&self) -> Result<TcpListener> {
        let listener = TcpListener::bind(&self.address)
            .await
            .map_err(|source| ServerError::Bind {
                addr: self.address.clone(),
                source,
            })?;

        info!(
            address = %listener.local_addr()?,
            directory = %self.router.files().root().display(),
            "servidor escuchando"
        );
        Ok(listener)
    }

    /// Accept loop
    ///
    /// Acepta conexiones hasta que se dispare la señal; después espera a
    /// que terminen (o se cancelen) todas las conexiones que lanzó.
    pub async fn serve(self, listener: TcpListener, signal: ShutdownSignal) -> Result<()> {
        let mut tracker = ConnectionTracker::new();

        loop {
            tokio::select! {
                _ = signal.cancelled() => break,
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => self.spawn_connection(&mut tracker, stream, peer, &signal),
                    Err(e) => warn!(error = %e, "error al aceptar conexión"),
                },
            }

            tracker.reap();
        }

        info!(pending = tracker.len(), "dejando de aceptar conexiones");
        drop(listener);
        tracker.wait_all().await;
        info!("todas las conexiones terminaron");

        Ok(())
    }

    fn spawn_connection(
        &self,
        tracker: &mut ConnectionTracker,
        stream: tokio::net::TcpStream,
        peer: SocketAddr,
        signal: &ShutdownSignal,
    ) {
        let connection = Connection::new(stream, peer, Arc::clone(&self.router), self.options);
        debug!(connection = %connection.id(), %peer, "nueva conexión");

        tracker.spawn(connection.handle(signal.clone()));
    }
}
