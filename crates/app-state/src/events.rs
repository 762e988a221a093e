//! Fire-and-forget notifications emitted after a state transition.
//!
//! Subscribers receive events over unbounded crossbeam channels. Publishing
//! never blocks, and a subscriber that dropped its receiver is forgotten on
//! the next publish.

use crossbeam::channel::{self, Receiver, Sender};
use nle_timeline::{Clip, Transition};
use serde::{Deserialize, Serialize};

/// Timing of a clip, enough for a renderer to update without re-diffing.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClipSummary {
    pub start_time: f64,
    pub end_time: f64,
    pub media_offset: f64,
    pub media_duration: f64,
}

impl From<&Clip> for ClipSummary {
    fn from(clip: &Clip) -> Self {
        Self {
            start_time: clip.start_time,
            end_time: clip.end_time,
            media_offset: clip.media_offset,
            media_duration: clip.media_duration,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum TimelineEvent {
    ClipSplit {
        track_id: String,
        original_clip_id: String,
        split_time: f64,
        first_clip_id: String,
        second_clip_id: String,
        first: ClipSummary,
        second: ClipSummary,
    },
    TransitionAdded {
        track_id: String,
        transition_id: String,
        transition: Transition,
    },
    TransitionUpdated {
        track_id: String,
        transition_id: String,
        previous_duration: f64,
        transition: Transition,
    },
    TransitionRemoved {
        track_id: String,
        transition_id: String,
        clip_a_id: String,
        clip_b_id: String,
    },
    UndoComplete {
        from_index: usize,
        to_index: usize,
        description: String,
    },
    RedoComplete {
        /// `None` when redoing from before the first entry.
        from_index: Option<usize>,
        to_index: usize,
        description: String,
    },
}

impl TimelineEvent {
    pub fn name(&self) -> &'static str {
        match self {
            TimelineEvent::ClipSplit { .. } => "clip-split",
            TimelineEvent::TransitionAdded { .. } => "transition-added",
            TimelineEvent::TransitionUpdated { .. } => "transition-updated",
            TimelineEvent::TransitionRemoved { .. } => "transition-removed",
            TimelineEvent::UndoComplete { .. } => "undo-complete",
            TimelineEvent::RedoComplete { .. } => "redo-complete",
        }
    }
}

/// Fan-out of events to every live subscriber.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Sender<TimelineEvent>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> Receiver<TimelineEvent> {
        let (tx, rx) = channel::unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Deliver each event to every subscriber, dropping disconnected ones.
    pub fn publish(&mut self, events: &[TimelineEvent]) {
        for event in events {
            tracing::debug!(event = event.name(), "Publishing timeline event");
            self.subscribers
                .retain(|subscriber| subscriber.send(event.clone()).is_ok());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn undo_event() -> TimelineEvent {
        TimelineEvent::UndoComplete {
            from_index: 2,
            to_index: 1,
            description: "Trim clip".into(),
        }
    }

    #[test]
    fn every_subscriber_receives_events() {
        let mut bus = EventBus::new();
        let a = bus.subscribe();
        let b = bus.subscribe();
        bus.publish(&[undo_event()]);
        assert_eq!(a.try_recv().unwrap(), undo_event());
        assert_eq!(b.try_recv().unwrap(), undo_event());
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut bus = EventBus::new();
        let keep = bus.subscribe();
        drop(bus.subscribe());
        assert_eq!(bus.subscribers.len(), 2);
        bus.publish(&[undo_event()]);
        assert_eq!(bus.subscribers.len(), 1);
        assert!(keep.try_recv().is_ok());
    }

    #[test]
    fn serializes_with_kebab_case_tag() {
        let json = serde_json::to_value(undo_event()).unwrap();
        assert_eq!(json["event"], "undo-complete");
        assert_eq!(json["from_index"], 2);
        assert_eq!(undo_event().name(), "undo-complete");
    }
}
