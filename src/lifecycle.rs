//! # Ciclo de Vida del Servidor
//! src/lifecycle.rs
//!
//! - `Shutdown`: dispara la cancelación (una sola vez, para todos)
//! - `ShutdownSignal`: copia que tiene cada tarea para enterarse
//! - `ConnectionTracker`: registro de las tareas de conexión en curso
//!
//! Secuencia de apagado:
//!
//! ```text
//! operador → Shutdown::trigger → accept loop deja de aceptar
//!                              → conexiones en curso se cancelan
//!                              → ConnectionTracker::wait_all → exit
//! ```

use std::future::Future;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

/// Coordinador del apagado
#[derive(Debug)]
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Nueva señal para entregar a una tarea
    pub fn signal(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Dispara la cancelación
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Señal de cancelación que observa una tarea
///
/// Si el `Shutdown` se destruye sin disparar, la señal cuenta como
/// disparada.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Se completa cuando se dispara el apagado
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

/// Tareas de conexión en curso
#[derive(Debug, Default)]
pub struct ConnectionTracker {
    tasks: JoinSet<()>,
}

impl ConnectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lanza una tarea y la registra
    pub fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tasks.spawn(task);
    }

    /// Descarta las tareas que ya terminaron, sin bloquear
    pub fn reap(&mut self) {
        while let Some(result) = self.tasks.try_join_next() {
            log_join(result);
        }
    }

    /// Cantidad de tareas registradas que no se han recogido
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Espera a que terminen todas las tareas
    pub async fn wait_all(&mut self) {
        while let Some(result) = self.tasks.join_next().await {
            log_join(result);
        }
    }
}

fn log_join(result: Result<(), tokio::task::JoinError>) {
    match result {
        Ok(()) => {}
        Err(e) if e.is_panic() => error!(error = %e, "tarea de conexión terminó en panic"),
        Err(e) => debug!(error = %e, "tarea de conexión abortada"),
    }
}

/// Espera la orden del operador: una lectura de la consola o Ctrl-C
///
/// Si la entrada estándar ya está cerrada (proceso sin terminal) solo
/// queda Ctrl-C.
pub async fn wait_for_operator() {
    let console = async {
        let mut line = String::new();
        match BufReader::new(tokio::io::stdin()).read_line(&mut line).await {
            Ok(n) if n > 0 => info!("apagado solicitado desde la consola"),
            _ => {
                debug!("entrada estándar cerrada, esperando Ctrl-C");
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        _ = console => {}
        result = tokio::signal::ctrl_c() => match result {
            Ok(()) => info!("apagado solicitado con Ctrl-C"),
            Err(e) => error!(error = %e, "no se pudo escuchar Ctrl-C"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_signal_starts_clear() {
        let shutdown = Shutdown::new();
        let signal = shutdown.signal();

        let waited = tokio::time::timeout(Duration::from_millis(50), signal.cancelled()).await;
        assert!(waited.is_err());
    }

    #[tokio::test]
    async fn test_trigger_reaches_every_signal() {
        let shutdown = Shutdown::new();
        let first = shutdown.signal();
        let second = first.clone();

        shutdown.trigger();

        first.cancelled().await;
        second.cancelled().await;
    }

    #[tokio::test]
    async fn test_signal_created_after_trigger() {
        let shutdown = Shutdown::new();
        shutdown.trigger();

        let late = shutdown.signal();
        tokio::time::timeout(Duration::from_secs(1), late.cancelled())
            .await
            .expect("a signal taken after the trigger is already cancelled");
    }

    #[tokio::test]
    async fn test_dropped_shutdown_counts_as_cancelled() {
        let shutdown = Shutdown::new();
        let signal = shutdown.signal();
        drop(shutdown);

        tokio::time::timeout(Duration::from_secs(1), signal.cancelled())
            .await
            .expect("dropping the coordinator must release waiters");
    }

    #[tokio::test]
    async fn test_tracker_waits_for_all() {
        let done = Arc::new(AtomicUsize::new(0));
        let mut tracker = ConnectionTracker::new();

        for i in 0..5 {
            let done = Arc::clone(&done);
            tracker.spawn(async move {
                tokio::time::sleep(Duration::from_millis(10 * i)).await;
                done.fetch_add(1, Ordering::SeqCst);
            });
        }

        assert_eq!(tracker.len(), 5);
        tracker.wait_all().await;

        assert_eq!(done.load(Ordering::SeqCst), 5);
        assert!(tracker.is_empty());
    }

    #[tokio::test]
    async fn test_tracker_reaps_finished() {
        let mut tracker = ConnectionTracker::new();
        tracker.spawn(async {});
        tracker.spawn(async {
            panic!("boom");
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        tracker.reap();

        assert!(tracker.is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_tasks_unwind() {
        let shutdown = Shutdown::new();
        let mut tracker = ConnectionTracker::new();

        for _ in 0..3 {
            let signal = shutdown.signal();
            tracker.spawn(async move {
                tokio::select! {
                    _ = tokio::time::sleep(Duration::from_secs(60)) => {}
                    _ = signal.cancelled() => {}
                }
            });
        }

        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(1), tracker.wait_all())
            .await
            .expect("tasks must observe cancellation");
    }
}
