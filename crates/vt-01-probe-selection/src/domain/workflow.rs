//! Workflow lifecycle and single-flight control.

use parking_lot::Mutex;

use super::cancellation::CancellationToken;
use super::errors::{SelectionError, WorkflowKind};

/// Lifecycle of one orchestrator instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowState {
    /// No run has started yet
    #[default]
    Idle,
    /// A run is iterating candidates
    Running,
    /// Cancellation observed; the loop is winding down
    Cancelling,
    /// The last run finished (naturally, exhausted or cancelled)
    Done,
}

impl WorkflowState {
    /// Whether a run currently occupies the instance.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Running | Self::Cancelling)
    }
}

#[derive(Debug, Default)]
struct ControlInner {
    state: WorkflowState,
    token: Option<CancellationToken>,
}

/// Single-flight gate plus cancellation hookup for an orchestrator.
#[derive(Debug)]
pub struct WorkflowControl {
    kind: WorkflowKind,
    inner: Mutex<ControlInner>,
}

impl WorkflowControl {
    /// Create an idle control for `kind`.
    pub fn new(kind: WorkflowKind) -> Self {
        Self {
            kind,
            inner: Mutex::new(ControlInner::default()),
        }
    }

    /// Workflow this control belongs to.
    pub fn kind(&self) -> WorkflowKind {
        self.kind
    }

    /// Current lifecycle state.
    pub fn state(&self) -> WorkflowState {
        self.inner.lock().state
    }

    /// Whether a run is active.
    pub fn is_running(&self) -> bool {
        self.state().is_active()
    }

    /// Start a run with a fresh cancellation token.
    ///
    /// Fails fast with `AlreadyRunning` instead of queueing.
    pub fn begin(&self) -> Result<RunHandle<'_>, SelectionError> {
        let mut inner = self.inner.lock();
        if inner.state.is_active() {
            return Err(SelectionError::AlreadyRunning {
                workflow: self.kind,
            });
        }

        let token = CancellationToken::new();
        inner.state = WorkflowState::Running;
        inner.token = Some(token.clone());

        Ok(RunHandle {
            control: self,
            token,
        })
    }

    /// Signal the active run to stop at its next step boundary.
    ///
    /// No-op when idle. Returns whether a run was active.
    pub fn cancel(&self) -> bool {
        match &self.inner.lock().token {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    fn mark_cancelling(&self) {
        let mut inner = self.inner.lock();
        if inner.state == WorkflowState::Running {
            inner.state = WorkflowState::Cancelling;
        }
    }

    fn finish(&self) {
        let mut inner = self.inner.lock();
        inner.state = WorkflowState::Done;
        inner.token = None;
    }
}

/// Active run on a `WorkflowControl`; moves it to `Done` on drop.
#[derive(Debug)]
pub struct RunHandle<'a> {
    control: &'a WorkflowControl,
    token: CancellationToken,
}

impl RunHandle<'_> {
    /// Token owned by this run.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Sample the token at a step boundary.
    ///
    /// The first positive observation moves the control to `Cancelling`.
    pub fn observe_cancellation(&self) -> bool {
        if self.token.is_cancelled() {
            self.control.mark_cancelling();
            true
        } else {
            false
        }
    }
}

impl Drop for RunHandle<'_> {
    fn drop(&mut self) {
        self.control.finish();
    }
}
