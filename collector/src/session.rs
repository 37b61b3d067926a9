//! Collection session state machine
//!
//! A session moves through `Idle -> Collecting -> Finalizing -> Done` and never back. It is
//! sealed (moved to `Finalizing`) the instant the target count is reached, a stream error
//! arrives or the session is aborted. The completion channel fires exactly once, at sealing.
//! Anything the stream delivers after that is dropped.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, trace, warn};
use tokio::sync::oneshot;
use uuid::Uuid;

use common::{MotionReading, SourceError};

use crate::errors::CollectorError;

pub(crate) type Collected = Result<Vec<MotionReading>, CollectorError>;
pub(crate) type SharedSession = Arc<Mutex<CollectionSession>>;

/// Terminal outcome of a session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    Succeeded(PathBuf),
    Failed(CollectorError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    Collecting,
    Finalizing,
    Done(SessionOutcome),
}

pub(crate) struct CollectionSession {
    id: Uuid,
    target: usize,
    state: SessionState,
    readings: Vec<MotionReading>,
    completion: Option<oneshot::Sender<Collected>>,
}

impl CollectionSession {
    pub(crate) fn new(target: usize, completion: oneshot::Sender<Collected>) -> Self {
        Self {
            id: Uuid::new_v4(),
            target,
            state: SessionState::Idle,
            readings: Vec::with_capacity(target),
            completion: Some(completion),
        }
    }

    pub(crate) fn id(&self) -> Uuid {
        self.id
    }

    pub(crate) fn state(&self) -> &SessionState {
        &self.state
    }

    pub(crate) fn len(&self) -> usize {
        self.readings.len()
    }

    /// Opens the session for incoming readings.
    pub(crate) fn begin(&mut self) {
        if self.state == SessionState::Idle {
            self.state = SessionState::Collecting;
        }
    }

    /// Processes one delivery from the stream. Returns true if the delivery was accepted.
    pub(crate) fn on_reading(&mut self, reading: Result<MotionReading, SourceError>) -> bool {
        if self.state != SessionState::Collecting {
            trace!("Session {}: dropping late delivery", self.id);
            return false;
        }

        match reading {
            Ok(reading) => {
                self.readings.push(reading);
                if self.readings.len() == self.target {
                    debug!("Session {}: collected {} frames", self.id, self.target);
                    let readings = std::mem::take(&mut self.readings);
                    self.seal(Ok(readings));
                }
            }
            Err(e) => {
                warn!(
                    "Session {}: stream error after {} frames: {}",
                    self.id,
                    self.readings.len(),
                    e
                );
                self.seal(Err(CollectorError::SensorStream(e.to_string())));
            }
        }
        true
    }

    /// Seals a session that is still open with `error`. Returns false if it was already sealed.
    pub(crate) fn abort(&mut self, error: CollectorError) -> bool {
        match self.state {
            SessionState::Idle | SessionState::Collecting => {
                debug!("Session {}: aborted with {}", self.id, error);
                self.seal(Err(error));
                true
            }
            _ => false,
        }
    }

    /// Records the terminal outcome once the sealed session has been finalized.
    pub(crate) fn finish(&mut self, outcome: &Result<PathBuf, CollectorError>) {
        if self.state != SessionState::Finalizing {
            return;
        }
        self.state = SessionState::Done(match outcome {
            Ok(path) => SessionOutcome::Succeeded(path.clone()),
            Err(e) => SessionOutcome::Failed(e.clone()),
        });
    }

    fn seal(&mut self, collected: Collected) {
        self.state = SessionState::Finalizing;
        if let Some(completion) = self.completion.take() {
            // receiver is gone only if the caller stopped waiting
            let _ = completion.send(collected);
        }
    }
}

pub(crate) fn lock_session(session: &SharedSession) -> MutexGuard<'_, CollectionSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}
