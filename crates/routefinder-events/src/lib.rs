use crossbeam_channel::{Receiver, Sender, unbounded};
use routefinder_core::{CityId, ColorProfile, ConnectionId, TransportMode};
use serde::{Deserialize, Serialize};

/// Notifications pushed to the rendering collaborator. Anything that changes
/// what the canvas should draw goes through here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    // Graph
    CityAdded {
        id: CityId,
        label: String,
    },
    ConnectionAdded {
        id: ConnectionId,
        from: CityId,
        to: CityId,
        distance: f64,
        mode: TransportMode,
        color: ColorProfile,
        width: f32,
    },
    ConnectionStyleChanged {
        id: ConnectionId,
        color: ColorProfile,
        width: f32,
    },
    /// Every connection is back at its resting style.
    HighlightsCleared,

    // Solving
    SolveCompleted {
        path: Vec<String>,
        distance: f64,
    },
    RouteUnreachable {
        start: String,
        end: String,
    },
    /// `code` is the machine-readable error kind, `message` the text for the user.
    SolveFailed {
        code: String,
        message: String,
    },

    // Reveal
    RevealStarted {
        total_steps: usize,
    },
    RevealStep {
        index: usize,
        from: CityId,
        to: CityId,
        connection: ConnectionId,
    },
    RevealFinished,
    RevealCancelled {
        completed_steps: usize,
    },
}

#[derive(Clone, Debug)]
pub struct EventBus {
    tx: Sender<Event>,
    rx: Receiver<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<Event> {
        self.tx.clone()
    }

    pub fn receiver(&self) -> Receiver<Event> {
        self.rx.clone()
    }

    pub fn publish(&self, event: Event) {
        tracing::trace!(?event, "publish");
        let _ = self.tx.send(event);
    }

    /// Dispatch all pending events to a listener.
    /// Meant to be called once per frame by the rendering loop.
    pub fn dispatch_to<L: EventListener>(&self, listener: &mut L) {
        while let Ok(event) = self.rx.try_recv() {
            listener.handle_event(&event);
        }
    }

    /// Take every pending event without blocking.
    pub fn drain(&self) -> Vec<Event> {
        self.rx.try_iter().collect()
    }
}

/// Implement this to redraw in response to graph and reveal changes.
pub trait EventListener {
    fn handle_event(&mut self, event: &Event);
}
