use tracing::debug;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReadyState {
    Pending,
    Ready,
}

/// One-way readiness gate with a single deferred continuation.
///
/// While pending, [`Readiness::submit`] parks the request; a later submit
/// replaces an earlier one that has not run yet. [`Readiness::mark_ready`]
/// hands the parked request back exactly once. Once ready, submits are
/// returned immediately for the caller to run in place.
#[derive(Debug)]
pub struct Readiness<T> {
    state: ReadyState,
    deferred: Option<T>,
}

impl<T> Default for Readiness<T> {
    fn default() -> Self {
        Self {
            state: ReadyState::Pending,
            deferred: None,
        }
    }
}

impl<T> Readiness<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ReadyState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == ReadyState::Ready
    }

    pub fn has_deferred(&self) -> bool {
        self.deferred.is_some()
    }

    /// Returns `Some(request)` when the caller should run it now, `None` when parked.
    pub fn submit(&mut self, request: T) -> Option<T> {
        match self.state {
            ReadyState::Ready => Some(request),
            ReadyState::Pending => {
                if self.deferred.replace(request).is_some() {
                    debug!("replacing deferred request that never ran");
                }
                None
            }
        }
    }

    /// Runs `request` now if ready, otherwise parks it.
    pub fn run_or_defer(&mut self, request: T, run: impl FnOnce(T)) {
        if let Some(request) = self.submit(request) {
            run(request);
        }
    }

    /// Transitions to ready. Returns the parked request, if any; repeated calls return `None`.
    pub fn mark_ready(&mut self) -> Option<T> {
        self.state = ReadyState::Ready;
        let deferred = self.deferred.take();
        if deferred.is_some() {
            debug!("replaying deferred request");
        }
        deferred
    }
}
