//! Shortest-path highlighting and the step-by-step reveal of a solved route.

use crate::cancellation::{RevealSignal, RevealState};
use crate::graph::GraphStore;
use routefinder_core::{CityId, ConnectionId, PathEdge, Solution};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_STEP_DURATION: Duration = Duration::from_millis(1000);

/// One step of the reveal: the renderer animates a marker from `from` to `to`
/// over `duration` before asking for the next step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealEvent {
    pub index: usize,
    pub total: usize,
    pub from: CityId,
    pub to: CityId,
    pub from_label: String,
    pub to_label: String,
    pub connection: ConnectionId,
    pub duration: Duration,
}

/// Observes and stops a [`RevealSequence`] from outside.
#[derive(Debug, Clone)]
pub struct RevealHandle {
    signal: RevealSignal,
}

impl RevealHandle {
    /// Returns true if the reveal was still running.
    pub fn cancel(&self) -> bool {
        self.signal.cancel()
    }

    pub fn state(&self) -> RevealState {
        self.signal.state()
    }

    pub fn is_cancelled(&self) -> bool {
        self.signal.is_cancelled()
    }

    pub fn is_running(&self) -> bool {
        self.signal.is_running()
    }
}

/// Lazy, finite, non-restartable series of reveal steps, ordered from the
/// start city to the end city.
///
/// The sequence stays running until a pull after the last step returns
/// `None`, until it is cancelled, or until it is dropped.
#[derive(Debug)]
pub struct RevealSequence {
    steps: std::vec::IntoIter<RevealEvent>,
    total: usize,
    emitted: usize,
    signal: RevealSignal,
}

impl RevealSequence {
    fn new(steps: Vec<RevealEvent>) -> Self {
        let total = steps.len();
        Self {
            steps: steps.into_iter(),
            total,
            emitted: 0,
            signal: if total == 0 {
                RevealSignal::settled()
            } else {
                RevealSignal::running()
            },
        }
    }

    pub fn handle(&self) -> RevealHandle {
        RevealHandle {
            signal: self.signal.clone(),
        }
    }

    pub fn cancel(&self) -> bool {
        self.signal.cancel()
    }

    pub fn is_cancelled(&self) -> bool {
        self.signal.is_cancelled()
    }

    pub fn is_running(&self) -> bool {
        self.signal.is_running()
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Steps handed out so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

}

impl Iterator for RevealSequence {
    type Item = RevealEvent;

    fn next(&mut self) -> Option<Self::Item> {
        if self.signal.is_cancelled() {
            return None;
        }
        match self.steps.next() {
            Some(step) => {
                self.emitted += 1;
                Some(step)
            }
            None => {
                self.signal.finish();
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.signal.is_cancelled() {
            (0, Some(0))
        } else {
            (0, Some(self.steps.len()))
        }
    }
}

impl Drop for RevealSequence {
    fn drop(&mut self) {
        self.signal.finish();
    }
}

/// Turns a solution into highlighted connections plus a reveal sequence.
#[derive(Debug, Clone)]
pub struct HighlightController {
    step_duration: Duration,
}

impl Default for HighlightController {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_DURATION)
    }
}

impl HighlightController {
    pub fn new(step_duration: Duration) -> Self {
        Self { step_duration }
    }

    pub fn step_duration(&self) -> Duration {
        self.step_duration
    }

    /// Clears previous highlights, marks the solved route and returns the
    /// reveal sequence for it. An unreachable solution still clears.
    pub fn present_solution(&self, store: &mut GraphStore, solution: &Solution) -> RevealSequence {
        store.reset_all_edge_highlights();

        let traversed = traversed_edges(store, solution);
        let mut steps = Vec::with_capacity(traversed.len());
        for hop in traversed {
            let Some(connection) = store.find_edge_between(hop.from, hop.to).map(|e| e.id) else {
                tracing::warn!("No connection between {} and {}; skipping", hop.from, hop.to);
                continue;
            };
            if let Err(err) = store.mark_edge_on_path(connection) {
                tracing::warn!("Could not highlight connection {}: {}", connection, err);
                continue;
            }
            steps.push(RevealEvent {
                index: steps.len(),
                total: 0,
                from: hop.from,
                to: hop.to,
                from_label: label_of(store, hop.from),
                to_label: label_of(store, hop.to),
                connection,
                duration: self.step_duration,
            });
        }

        let total = steps.len();
        for step in &mut steps {
            step.total = total;
        }
        tracing::info!(steps = total, "Route highlighted");
        RevealSequence::new(steps)
    }
}

fn label_of(store: &GraphStore, id: CityId) -> String {
    store
        .city(id)
        .map(|city| city.label.clone())
        .unwrap_or_default()
}

/// Ordered hops of a solution, resolved to city ids. Hops whose labels no
/// longer resolve are dropped.
pub fn traversed_edges(store: &GraphStore, solution: &Solution) -> Vec<PathEdge> {
    solution
        .hops()
        .filter_map(|(from, to)| {
            match (store.find_city_by_label(from), store.find_city_by_label(to)) {
                (Some(from), Some(to)) => Some(PathEdge {
                    from: from.id,
                    to: to.id,
                }),
                _ => {
                    tracing::warn!("Route hop {} -> {} names an unknown city", from, to);
                    None
                }
            }
        })
        .collect()
}
