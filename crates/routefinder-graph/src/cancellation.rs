use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

const RUNNING: u8 = 0;
const FINISHED: u8 = 1;
const CANCELLED: u8 = 2;

/// Where a reveal is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Running,
    Finished,
    Cancelled,
}

/// Lifecycle flag shared by a reveal sequence and every handle to it.
///
/// A reveal settles exactly once: whichever of finish or cancel lands first
/// wins, and later calls are ignored.
#[derive(Clone, Debug)]
pub struct RevealSignal {
    state: Arc<AtomicU8>,
}

impl RevealSignal {
    pub fn running() -> Self {
        Self::with_state(RUNNING)
    }

    /// Signal for a reveal with nothing to show.
    pub fn settled() -> Self {
        Self::with_state(FINISHED)
    }

    fn with_state(state: u8) -> Self {
        Self {
            state: Arc::new(AtomicU8::new(state)),
        }
    }

    pub fn state(&self) -> RevealState {
        match self.state.load(Ordering::Acquire) {
            RUNNING => RevealState::Running,
            FINISHED => RevealState::Finished,
            _ => RevealState::Cancelled,
        }
    }

    /// Stop a running reveal. Returns false if it had already settled.
    pub fn cancel(&self) -> bool {
        self.settle(CANCELLED)
    }

    /// Mark the reveal as played out. Returns false if it had already settled.
    pub fn finish(&self) -> bool {
        self.settle(FINISHED)
    }

    fn settle(&self, to: u8) -> bool {
        self.state
            .compare_exchange(RUNNING, to, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn is_running(&self) -> bool {
        self.state() == RevealState::Running
    }

    pub fn is_cancelled(&self) -> bool {
        self.state() == RevealState::Cancelled
    }
}
