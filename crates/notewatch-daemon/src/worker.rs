//! Background worker that feeds new notes through the pipeline

use crate::error::DaemonError;
use crate::metrics::WatchMetrics;
use crate::watcher::{DirectoryWatcher, FileEvent};
use notewatch_domain::traits::{LlmProvider, RecordStore};
use notewatch_extractor::Pipeline;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use tokio::time::{interval, Duration, MissedTickBehavior};

/// Polls a directory on a fixed interval and processes each new `.txt` file
///
/// Files are handled one at a time, in the order the watcher reports them.
/// A file that fails is logged and skipped; the watch never stops because
/// of one bad note.
///
/// # Examples
///
/// ```no_run
/// use notewatch_daemon::{DirectoryWatcher, WatchWorker};
/// use notewatch_extractor::{ExtractorConfig, Pipeline};
/// use notewatch_llm::OllamaProvider;
/// use notewatch_store::SqliteStore;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let llm = OllamaProvider::default_endpoint("llama3")?;
///     let store = SqliteStore::new("notewatch.db")?;
///     let pipeline = Pipeline::new(llm, store, ExtractorConfig::default())?;
///     let watcher = DirectoryWatcher::new("/mnt/storage")?;
///
///     let worker = WatchWorker::new(pipeline, watcher, Duration::from_secs(1));
///
///     // Run until Ctrl+C, then close the store
///     let store = worker.run().await;
///     store.close()?;
///     Ok(())
/// }
/// ```
pub struct WatchWorker<L, S> {
    pipeline: Pipeline<L, S>,
    watcher: DirectoryWatcher,
    interval: Duration,
    metrics: WatchMetrics,
}

impl<L, S> WatchWorker<L, S>
where
    L: LlmProvider,
    L::Error: fmt::Display,
    S: RecordStore,
    S::Error: fmt::Display,
{
    /// Create a worker
    pub fn new(pipeline: Pipeline<L, S>, watcher: DirectoryWatcher, interval: Duration) -> Self {
        Self {
            pipeline,
            watcher,
            interval,
            metrics: WatchMetrics::new(),
        }
    }

    /// Totals so far
    pub fn metrics(&self) -> &WatchMetrics {
        &self.metrics
    }

    /// The underlying pipeline
    pub fn pipeline(&self) -> &Pipeline<L, S> {
        &self.pipeline
    }

    /// Scan once and process every new file
    ///
    /// # Errors
    ///
    /// Only a failed directory scan is returned. Per-file failures are
    /// logged and counted.
    pub async fn poll_once(&mut self) -> Result<usize, DaemonError> {
        let events = self.scan()?;
        let found = events.len();
        for event in events {
            self.handle(event).await;
        }
        Ok(found)
    }

    fn scan(&mut self) -> Result<Vec<FileEvent>, DaemonError> {
        let events = self.watcher.poll()?;
        self.metrics.poll_count += 1;
        Ok(events)
    }

    async fn handle(&mut self, event: FileEvent) {
        self.metrics.files_seen += 1;
        tracing::debug!("New file detected: {}", event.path.display());

        match self.pipeline.process_file(&event.path).await {
            Ok(outcome) => {
                self.metrics.files_processed += 1;
                self.metrics.records_inserted += outcome.report.inserted;
                self.metrics.records_failed += outcome.report.failed;
                self.metrics.repair_attempts += outcome.repair_attempts as usize;
            }
            Err(e) => {
                self.metrics.files_failed += 1;
                tracing::error!("Failed to process {}: {}", event.filename(), e);
            }
        }
    }

    fn scan_failed(e: DaemonError) {
        tracing::error!("Directory scan failed: {}", e);
    }

    /// Run until `shutdown` resolves, then hand back the store
    ///
    /// Shutdown is checked before each file, so a file already being
    /// processed is finished first and the rest of its batch is left alone.
    pub async fn run_until<F>(mut self, shutdown: F) -> S
    where
        F: Future<Output = ()>,
    {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        tracing::info!(
            "Watch worker started on {} (interval: {:?})",
            self.watcher.dir().display(),
            self.interval
        );

        'watch: loop {
            tokio::select! {
                biased;
                _ = shutdown.as_mut() => break 'watch,
                _ = ticker.tick() => {}
            }

            let events = match self.scan() {
                Ok(events) => events,
                Err(e) => {
                    Self::scan_failed(e);
                    continue;
                }
            };

            for event in events {
                if shutdown_requested(shutdown.as_mut()).await {
                    break 'watch;
                }
                self.handle(event).await;
            }
        }

        tracing::info!("Shutdown signal received, stopping watcher");
        tracing::info!("Watcher stopped. Final metrics:\n{}", self.metrics.summary());
        self.pipeline.into_store()
    }

    /// Run until Ctrl+C
    pub async fn run(self) -> S {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Cannot listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Run for a fixed number of scan cycles (useful for testing)
    pub async fn run_cycles(mut self, cycles: usize) -> (S, WatchMetrics) {
        let mut ticker = interval(self.interval);

        for cycle in 0..cycles {
            ticker.tick().await;
            tracing::debug!("Starting scan cycle {}/{}", cycle + 1, cycles);

            if let Err(e) = self.poll_once().await {
                Self::scan_failed(e);
            }
        }

        let metrics = self.metrics.clone();
        (self.pipeline.into_store(), metrics)
    }
}

/// Whether `shutdown` has already resolved, without waiting on it
///
/// Must not be called again once it has returned `true`.
async fn shutdown_requested<F>(shutdown: Pin<&mut F>) -> bool
where
    F: Future<Output = ()>,
{
    tokio::select! {
        biased;
        _ = shutdown => true,
        _ = std::future::ready(()) => false,
    }
}
