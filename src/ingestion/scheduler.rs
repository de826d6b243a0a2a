use super::IngestionPipeline;
use anyhow::{Context, Result};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{info, warn};

/// Runs a pipeline on a dedicated thread: once immediately, then again
/// `interval` after each run returns. Runs never overlap.
pub struct PeriodicIngestion {
    stop_tx: Sender<()>,
    handle: JoinHandle<()>,
}

impl PeriodicIngestion {
    pub fn spawn(pipeline: IngestionPipeline, interval: Duration) -> Result<Self> {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = std::thread::Builder::new()
            .name("ingestion".to_string())
            .spawn(move || loop {
                // Errors are logged by the pipeline, the next tick retries
                let _ = pipeline.run();

                info!("Next ingestion in {:?}", interval);
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                        info!("Ingestion worker stopping");
                        break;
                    }
                }
            })
            .context("Failed to spawn ingestion thread")?;

        Ok(Self { stop_tx, handle })
    }

    /// Stop after the current run, if any, and wait for the thread to exit.
    pub fn shutdown(self) {
        let _ = self.stop_tx.send(());
        if self.handle.join().is_err() {
            warn!("Ingestion thread panicked");
        }
    }
}
