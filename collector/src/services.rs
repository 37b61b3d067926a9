use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::futures::Notified;
use tokio::sync::{oneshot, Notify};
use tokio::task::JoinHandle;

use common::{MotionReading, MotionSource, ReadingCallback, SourceError};

use crate::adapters::SimulatedSource;
use crate::constants::{OUTPUT_FILE_NAME, SAMPLE_INTERVAL, SAMPLE_RATE_HZ};
use crate::errors::CollectorError;
use crate::session::{lock_session, CollectionSession, SharedSession};
use crate::table;

type PendingStop = Mutex<Option<JoinHandle<()>>>;

/// Runs bounded motion capture sessions against a [`MotionSource`] and writes the
/// captured frames to a fixed table file.
pub struct FrameCollector<S>
where
    S: MotionSource + 'static,
{
    source: Arc<S>,
    output_path: PathBuf,
    abort_signal: Arc<Notify>,
    in_progress: AtomicBool,
    pending_stop: PendingStop,
}

impl<S> FrameCollector<S>
where
    S: MotionSource + 'static,
{
    /// Creates a collector writing to `OUTPUT_FILE_NAME` inside `output_dir`.
    pub fn new(source: S, output_dir: impl AsRef<Path>) -> Self {
        FrameCollector {
            source: Arc::new(source),
            output_path: output_dir.as_ref().join(OUTPUT_FILE_NAME),
            abort_signal: Arc::new(Notify::new()),
            in_progress: AtomicBool::new(false),
            pending_stop: Mutex::new(None),
        }
    }

    /// Location of the table written by successful sessions.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Cancels the session in flight, if any. No file is written for a cancelled session.
    pub fn cancel(&self) {
        self.abort_signal.notify_waiters();
    }

    /// Captures `target_count` frames at 50 Hz and writes them to the output table.
    ///
    /// Resolves once the session reaches its terminal outcome, with the location of the table on
    /// success. The stream is started once and stopped at most once. There is no timeout: a source
    /// that never delivers enough frames keeps the session pending
    /// until [`FrameCollector::cancel`].
    ///
    /// Dropping the returned future cancels the session: it is sealed and the stream is stopped
    /// on the runtime before the next session starts.
    /// # Errors
    /// - InvalidTarget if `target_count` is not positive. The source is not touched.
    /// - SessionInProgress if another session is running on this collector.
    /// - SensorUnavailable if the source is not available or fails to start.
    /// - SensorStream if the stream reports an error before the target is reached.
    /// - DestinationCreationFailed / SerializationFailed if the table cannot be written.
    /// - Cancelled if [`FrameCollector::cancel`] is called before the target is reached.
    pub async fn collect(&self, target_count: i64) -> Result<PathBuf, CollectorError> {
        let target = validate_target(target_count)?;

        // registered before the session is claimed so no cancel can slip in between
        let abort = self.abort_signal.notified();
        tokio::pin!(abort);
        abort.as_mut().enable();

        if self.in_progress.swap(true, Ordering::AcqRel) {
            warn!("Rejecting session: another one is still running");
            return Err(CollectorError::SessionInProgress);
        }
        let _guard = InProgressGuard(&self.in_progress);

        let pending_stop = lock_pending(&self.pending_stop).take();
        if let Some(pending_stop) = pending_stop {
            debug!("Waiting for the previous stream to stop");
            let _ = pending_stop.await;
        }

        self.run_session(target, abort).await
    }

    async fn run_session(
        &self,
        target: usize,
        mut abort: Pin<&mut Notified<'_>>,
    ) -> Result<PathBuf, CollectorError> {
        if !self.source.is_available() {
            error!("Motion sensor is not available");
            return Err(CollectorError::SensorUnavailable(
                "device motion is not available".to_string(),
            ));
        }

        let (completion_tx, mut completion_rx) = oneshot::channel();
        let session: SharedSession =
            Arc::new(Mutex::new(CollectionSession::new(target, completion_tx)));
        let session_id = lock_session(&session).id();

        info!(
            "Session {}: collecting {} frames at {} Hz",
            session_id, target, SAMPLE_RATE_HZ
        );
        lock_session(&session).begin();

        let on_reading: ReadingCallback = {
            let session = Arc::clone(&session);
            Arc::new(move |reading: Result<MotionReading, SourceError>| {
                lock_session(&session).on_reading(reading);
            })
        };

        let mut stream = ActiveStream {
            source: &self.source,
            session: Arc::clone(&session),
            pending_stop: &self.pending_stop,
            armed: true,
        };
        if let Err(e) = self.source.start(SAMPLE_INTERVAL, on_reading).await {
            stream.disarm();
            error!("Session {}: stream failed to start: {}", session_id, e);
            let outcome = Err(CollectorError::SensorUnavailable(e.to_string()));
            let mut session = lock_session(&session);
            session.abort(CollectorError::SensorUnavailable(e.to_string()));
            session.finish(&outcome);
            return outcome;
        }
        debug!("Session {}: stream started", session_id);

        let collected = tokio::select! {
            biased;
            collected = &mut completion_rx => collected,
            _ = &mut abort => {
                let received = {
                    let mut session = lock_session(&session);
                    session.abort(CollectorError::Cancelled);
                    session.len()
                };
                info!("Session {}: cancel requested after {} frames", session_id, received);
                // holds either the cancellation or frames sealed just before it
                (&mut completion_rx).await
            }
        };
        let collected = collected.unwrap_or_else(|_| {
            Err(CollectorError::SensorStream(
                "session closed without outcome".to_string(),
            ))
        });

        stream.stop().await;
        debug!("Session {}: stream stopped", session_id);

        let outcome = match collected {
            Ok(readings) => self.write_table(readings).await,
            Err(e) => Err(e),
        };

        let state = {
            let mut session = lock_session(&session);
            session.finish(&outcome);
            session.state().clone()
        };
        match &outcome {
            Ok(path) => info!("Session {}: frames saved to '{}'", session_id, path.display()),
            Err(e) => error!("Session {}: failed: {}", session_id, e),
        }
        debug!("Session {}: {:?}", session_id, state);

        outcome
    }

    /// Serializes on the blocking pool so the runtime thread is never blocked on file I/O.
    async fn write_table(&self, readings: Vec<MotionReading>) -> Result<PathBuf, CollectorError> {
        let destination = self.output_path.clone();
        tokio::task::spawn_blocking(move || {
            table::serialize(&readings, &destination).map(|_| destination)
        })
        .await
        .map_err(|e| CollectorError::SerializationFailed(e.to_string()))?
    }
}

struct InProgressGuard<'a>(&'a AtomicBool);

impl Drop for InProgressGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Running stream of a session. If the session is dropped before the stream is stopped, the
/// session is sealed and the stop is handed to the runtime.
struct ActiveStream<'a, S>
where
    S: MotionSource + 'static,
{
    source: &'a Arc<S>,
    session: SharedSession,
    pending_stop: &'a PendingStop,
    armed: bool,
}

impl<S> ActiveStream<'_, S>
where
    S: MotionSource + 'static,
{
    fn disarm(&mut self) {
        self.armed = false;
    }

    async fn stop(mut self) {
        self.source.stop().await;
        self.disarm();
    }
}

impl<S> Drop for ActiveStream<'_, S>
where
    S: MotionSource + 'static,
{
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let session_id = {
            let mut session = lock_session(&self.session);
            session.abort(CollectorError::Cancelled);
            session.id()
        };
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                warn!("Session {}: dropped while collecting, stopping stream", session_id);
                let source = Arc::clone(self.source);
                let handle = runtime.spawn(async move { source.stop().await });
                *lock_pending(self.pending_stop) = Some(handle);
            }
            Err(_) => error!(
                "Session {}: dropped outside a runtime, stream left running",
                session_id
            ),
        }
    }
}

fn lock_pending(pending_stop: &PendingStop) -> MutexGuard<'_, Option<JoinHandle<()>>> {
    pending_stop.lock().unwrap_or_else(PoisonError::into_inner)
}

fn validate_target(target_count: i64) -> Result<usize, CollectorError> {
    if target_count <= 0 {
        return Err(CollectorError::InvalidTarget(target_count));
    }
    usize::try_from(target_count).map_err(|_| CollectorError::InvalidTarget(target_count))
}

/// Spawns one collection session on the runtime.
///
/// The join handle yields the single terminal outcome of the session.
pub fn run_service<S>(
    collector: Arc<FrameCollector<S>>,
    target_count: i64,
) -> tokio::task::JoinHandle<Result<PathBuf, CollectorError>>
where
    S: MotionSource + 'static,
{
    tokio::spawn(async move { collector.collect(target_count).await })
}

/// Starts a session against a simulated motion source.
///
/// Returns a tuple containing:
/// - A `tokio::task::JoinHandle` yielding the outcome of the session.
/// - An `Arc<FrameCollector<SimulatedSource>>` instance, allowing the session to be cancelled.
///
/// An error SensorUnavailable is returned if the simulated source cannot be built.
pub fn run_simulated_service(
    output_dir: impl AsRef<Path>,
    target_count: i64,
) -> Result<
    (
        tokio::task::JoinHandle<Result<PathBuf, CollectorError>>,
        Arc<FrameCollector<SimulatedSource>>,
    ),
    CollectorError,
> {
    let source = SimulatedSource::new()?;
    let collector = Arc::new(FrameCollector::new(source, output_dir));
    let handle = run_service(Arc::clone(&collector), target_count);
    Ok((handle, collector))
}
