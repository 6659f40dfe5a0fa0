//! Frame-driven playback of a reveal sequence.
//!
//! The renderer calls [`RevealScheduler::tick`] once per frame. Each step is
//! held for its duration before the next one is pulled, so the scheduler never
//! blocks and can be stopped between any two frames. Time a frame overshoots
//! a step by counts towards the next step, so frame size does not stretch the
//! reveal.

use routefinder_core::CityId;
use routefinder_events::{Event, EventBus};
use routefinder_graph::{RevealEvent, RevealHandle, RevealSequence};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum RevealFrame {
    /// The marker travels `from` → `to`; `progress` runs 0.0 to 1.0.
    Moving {
        index: usize,
        from: CityId,
        to: CityId,
        progress: f32,
    },
    Finished,
    Cancelled {
        completed_steps: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Pending,
    Playing,
    Finished,
    Cancelled,
}

pub struct RevealScheduler {
    sequence: RevealSequence,
    current: Option<RevealEvent>,
    elapsed: Duration,
    completed: usize,
    status: Status,
    events: Option<EventBus>,
}

impl RevealScheduler {
    pub fn new(sequence: RevealSequence) -> Self {
        Self {
            sequence,
            current: None,
            elapsed: Duration::ZERO,
            completed: 0,
            status: Status::Pending,
            events: None,
        }
    }

    /// Mirror step transitions onto `bus`.
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.events = Some(bus);
        self
    }

    pub fn handle(&self) -> RevealHandle {
        self.sequence.handle()
    }

    pub fn cancel(&self) {
        self.sequence.cancel();
    }

    pub fn is_done(&self) -> bool {
        matches!(self.status, Status::Finished | Status::Cancelled)
    }

    pub fn completed_steps(&self) -> usize {
        self.completed
    }

    pub fn total_steps(&self) -> usize {
        self.sequence.total()
    }

    fn publish(&self, event: Event) {
        if let Some(bus) = &self.events {
            bus.publish(event);
        }
    }

    /// Advance playback by `dt` and report what the renderer should draw.
    pub fn tick(&mut self, dt: Duration) -> RevealFrame {
        match self.status {
            Status::Finished => return RevealFrame::Finished,
            Status::Cancelled => {
                return RevealFrame::Cancelled {
                    completed_steps: self.completed,
                };
            }
            Status::Pending => {
                self.status = Status::Playing;
                self.publish(Event::RevealStarted {
                    total_steps: self.sequence.total(),
                });
                return self.advance();
            }
            Status::Playing => {}
        }

        if self.sequence.is_cancelled() {
            return self.stop();
        }

        if let Some(step) = &self.current {
            self.elapsed += dt;
            if self.elapsed < step.duration {
                return moving(step, progress(self.elapsed, step.duration));
            }
            self.elapsed -= step.duration;
            self.completed += 1;
            self.current = None;
        }
        self.advance()
    }

    fn advance(&mut self) -> RevealFrame {
        match self.sequence.next() {
            Some(step) => {
                tracing::debug!(
                    index = step.index,
                    "Revealing {} -> {}",
                    step.from_label,
                    step.to_label
                );
                self.publish(Event::RevealStep {
                    index: step.index,
                    from: step.from,
                    to: step.to,
                    connection: step.connection,
                });
                let frame = moving(&step, progress(self.elapsed, step.duration));
                self.current = Some(step);
                frame
            }
            None if self.sequence.is_cancelled() => self.stop(),
            None => {
                self.status = Status::Finished;
                tracing::info!(steps = self.completed, "Reveal finished");
                self.publish(Event::RevealFinished);
                RevealFrame::Finished
            }
        }
    }

    fn stop(&mut self) -> RevealFrame {
        self.status = Status::Cancelled;
        self.current = None;
        tracing::info!(completed = self.completed, "Reveal cancelled");
        self.publish(Event::RevealCancelled {
            completed_steps: self.completed,
        });
        RevealFrame::Cancelled {
            completed_steps: self.completed,
        }
    }
}

fn moving(step: &RevealEvent, progress: f32) -> RevealFrame {
    RevealFrame::Moving {
        index: step.index,
        from: step.from,
        to: step.to,
        progress,
    }
}

fn progress(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        1.0
    } else {
        (elapsed.as_secs_f64() / duration.as_secs_f64()).min(1.0) as f32
    }
}
