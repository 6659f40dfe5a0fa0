pub mod forms;
pub mod sample;
pub mod scheduler;
pub mod settings;

pub use forms::{CityForm, ConnectionForm, SolveForm, ValidConnection};
pub use sample::{ConnectionSeed, NetworkSeed, seed_sample_network};
pub use scheduler::{RevealFrame, RevealScheduler};
pub use settings::{PathfinderSettings, RevealSettings};

use crossbeam_channel::Receiver;
use parking_lot::Mutex;
use routefinder_core::{CityId, ConnectionId, RouteError, Solution};
use routefinder_events::{Event, EventBus};
use routefinder_graph::{
    GraphSnapshot, GraphStore, HighlightController, RevealHandle, RevealSequence, solve,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Where the current solve cycle is: `Idle → Solving → Highlighting → Revealing → Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SolvePhase {
    #[default]
    Idle,
    Solving,
    Highlighting,
    Revealing,
}

/// Result of an accepted solve request. `reveal` must be driven (or dropped)
/// before the next solve is accepted.
pub struct SolveOutcome {
    pub solution: Solution,
    pub reveal: RevealSequence,
}

struct SessionState {
    store: GraphStore,
    highlighter: HighlightController,
    phase: SolvePhase,
    reveal: Option<RevealHandle>,
    last_solution: Option<Solution>,
}

impl SessionState {
    /// Drops back to `Idle` once the in-flight reveal has ended.
    fn refresh_phase(&mut self) {
        if self.phase == SolvePhase::Revealing
            && !self.reveal.as_ref().is_some_and(RevealHandle::is_running)
        {
            self.phase = SolvePhase::Idle;
            self.reveal = None;
        }
    }
}

/// Headless orchestrator for one editing session.
///
/// Any shell (CLI, canvas front end) calls into this controller with form
/// input and subscribes to [`Event`]s to redraw.
#[derive(Clone)]
pub struct PathfinderController {
    state: Arc<Mutex<SessionState>>,
    events: EventBus,
}

impl Default for PathfinderController {
    fn default() -> Self {
        Self::new(&PathfinderSettings::default())
    }
}

impl PathfinderController {
    pub fn new(settings: &PathfinderSettings) -> Self {
        let events = EventBus::new();
        let store = GraphStore::new(settings.style.clone()).with_event_bus(events.clone());
        Self {
            state: Arc::new(Mutex::new(SessionState {
                store,
                highlighter: HighlightController::new(settings.reveal.step_duration()),
                phase: SolvePhase::Idle,
                reveal: None,
                last_solution: None,
            })),
            events,
        }
    }

    /// Subscribe to graph and reveal events.
    pub fn events(&self) -> Receiver<Event> {
        self.events.receiver()
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.events
    }

    pub fn phase(&self) -> SolvePhase {
        let mut s = self.state.lock();
        s.refresh_phase();
        s.phase
    }

    pub fn is_revealing(&self) -> bool {
        self.phase() == SolvePhase::Revealing
    }

    pub fn add_city(&self, form: &CityForm) -> Result<CityId, RouteError> {
        self.state.lock().store.add_city(&form.label)
    }

    pub fn add_connection(&self, form: &ConnectionForm) -> Result<ConnectionId, RouteError> {
        let valid = form.validate()?;
        self.state
            .lock()
            .store
            .add_connection(&valid.from, &valid.to, valid.distance, valid.mode)
    }

    /// Solve, highlight and hand back the reveal for the requested route.
    ///
    /// Rejected with [`RouteError::Busy`] while a previous reveal is running.
    pub fn solve(&self, form: &SolveForm) -> Result<SolveOutcome, RouteError> {
        let mut s = self.state.lock();
        s.refresh_phase();
        if s.phase == SolvePhase::Revealing {
            tracing::debug!("Solve rejected: reveal in progress");
            return Err(RouteError::Busy);
        }

        s.phase = SolvePhase::Solving;
        let solution = match solve(&s.store, &form.start, &form.end) {
            Ok(solution) => solution,
            Err(err) => {
                s.phase = SolvePhase::Idle;
                tracing::warn!("Solve failed: {}", err);
                self.events.publish(Event::SolveFailed {
                    code: err.code().to_string(),
                    message: err.to_string(),
                });
                return Err(err);
            }
        };

        s.phase = SolvePhase::Highlighting;
        let state = &mut *s;
        let reveal = state.highlighter.present_solution(&mut state.store, &solution);

        match solution.distance {
            Some(distance) => self.events.publish(Event::SolveCompleted {
                path: solution.path.clone(),
                distance,
            }),
            None => self.events.publish(Event::RouteUnreachable {
                start: form.start.trim().to_string(),
                end: form.end.trim().to_string(),
            }),
        }

        if reveal.is_running() {
            s.phase = SolvePhase::Revealing;
            s.reveal = Some(reveal.handle());
        } else {
            s.phase = SolvePhase::Idle;
            s.reveal = None;
        }
        s.last_solution = Some(solution.clone());

        Ok(SolveOutcome { solution, reveal })
    }

    /// Stops the in-flight reveal, if any. Highlights stay as they are.
    pub fn cancel_reveal(&self) -> bool {
        let mut s = self.state.lock();
        let cancelled = s.reveal.take().is_some_and(|handle| handle.cancel());
        if s.phase == SolvePhase::Revealing {
            s.phase = SolvePhase::Idle;
        }
        cancelled
    }

    /// Cancels any running reveal, then solves.
    pub fn solve_preempting(&self, form: &SolveForm) -> Result<SolveOutcome, RouteError> {
        if self.cancel_reveal() {
            tracing::debug!("Preempted running reveal");
        }
        self.solve(form)
    }

    pub fn reset_highlights(&self) -> Result<(), RouteError> {
        let mut s = self.state.lock();
        s.refresh_phase();
        if s.phase == SolvePhase::Revealing {
            return Err(RouteError::Busy);
        }
        s.store.reset_all_edge_highlights();
        Ok(())
    }

    pub fn last_solution(&self) -> Option<Solution> {
        self.state.lock().last_solution.clone()
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        self.state.lock().store.snapshot()
    }

    /// Read access to the store without copying it.
    pub fn with_store<R>(&self, f: impl FnOnce(&GraphStore) -> R) -> R {
        f(&self.state.lock().store)
    }
}
