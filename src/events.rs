//! Outbound cues for presentation layers (audio, overlays, UI).
//!
//! The pipeline emits plain [`GameEvent`] values synchronously to an
//! [`EventSink`]. Sinks decide what, if anything, to render or play.

use crate::{classifier::Expression, features::FeatureVector};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Cue emitted by the frame pipeline or the game state machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// A session started
    GameStart,
    /// Per-frame classification, before smoothing
    RawLabel(Expression),
    /// Label that dominated the history this frame
    ConfirmedLabel(Expression),
    /// The target of `level` was matched
    LevelComplete {
        /// Level just completed, 1-based
        level: u32,
        /// Score after awarding the level
        score: u32,
    },
    /// The last level was completed
    GameComplete {
        /// Final score
        score: u32,
    },
    /// The session was discarded
    GameReset,
}

impl GameEvent {
    /// Short event name for logs
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::GameStart => "game_start",
            Self::RawLabel(_) => "raw_label",
            Self::ConfirmedLabel(_) => "confirmed_label",
            Self::LevelComplete { .. } => "level_complete",
            Self::GameComplete { .. } => "game_complete",
            Self::GameReset => "game_reset",
        }
    }
}

/// Receiver of game cues
pub trait EventSink: Send {
    /// Handle one event
    fn emit(&mut self, event: &GameEvent);

    /// Diagnostic hook for the features of each frame with a face.
    ///
    /// `matched` lists every rule that matched, in priority order.
    fn on_features(&mut self, _features: &FeatureVector, _matched: &[Expression]) {}
}

/// Sink that drops every event
pub struct NoEvents;

impl EventSink for NoEvents {
    fn emit(&mut self, _event: &GameEvent) {}
}

/// Sink that writes events to the `log` facade
pub struct LogEvents;

impl EventSink for LogEvents {
    fn emit(&mut self, event: &GameEvent) {
        match event {
            GameEvent::RawLabel(label) => log::debug!("Raw label: {label}"),
            GameEvent::ConfirmedLabel(label) => log::debug!("Confirmed label: {label}"),
            GameEvent::GameStart => log::info!("Game started"),
            GameEvent::LevelComplete { level, score } => {
                log::info!("Level {level} complete, score {score}");
            }
            GameEvent::GameComplete { score } => log::info!("Game complete, final score {score}"),
            GameEvent::GameReset => log::info!("Game reset"),
        }
    }

    fn on_features(&mut self, features: &FeatureVector, matched: &[Expression]) {
        log::trace!("Features {features:?} matched {matched:?}");
    }
}

/// Recording sink, mostly for tests
impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: &GameEvent) {
        self.push(*event);
    }
}

/// Cloneable recorder whose handles share one event log
#[derive(Clone, Default)]
pub struct RecordingEvents {
    events: Arc<Mutex<Vec<GameEvent>>>,
}

impl RecordingEvents {
    /// Create an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far
    #[must_use]
    pub fn events(&self) -> Vec<GameEvent> {
        self.log().clone()
    }

    /// Recorded events other than per-frame labels
    #[must_use]
    pub fn cues(&self) -> Vec<GameEvent> {
        self.events()
            .into_iter()
            .filter(|e| !matches!(e, GameEvent::RawLabel(_) | GameEvent::ConfirmedLabel(_)))
            .collect()
    }

    // A panicking holder leaves the log intact, so keep using it
    fn log(&self) -> MutexGuard<'_, Vec<GameEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EventSink for RecordingEvents {
    fn emit(&mut self, event: &GameEvent) {
        self.log().push(*event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_records_in_order() {
        let mut sink: Vec<GameEvent> = Vec::new();
        sink.emit(&GameEvent::GameStart);
        sink.emit(&GameEvent::RawLabel(Expression::Smile));
        sink.emit(&GameEvent::LevelComplete { level: 1, score: 10 });

        assert_eq!(sink.len(), 3);
        assert_eq!(sink[1], GameEvent::RawLabel(Expression::Smile));
        assert_eq!(sink[2].name(), "level_complete");
    }

    #[test]
    fn test_recording_handles_share_log() {
        let recorder = RecordingEvents::new();
        let mut handle = recorder.clone();
        handle.emit(&GameEvent::GameStart);
        handle.emit(&GameEvent::RawLabel(Expression::Neutral));
        handle.emit(&GameEvent::GameReset);

        assert_eq!(recorder.events().len(), 3);
        assert_eq!(recorder.cues(), vec![GameEvent::GameStart, GameEvent::GameReset]);
    }

    #[test]
    fn test_recording_survives_poisoned_lock() {
        let recorder = RecordingEvents::new();
        let mut handle = recorder.clone();
        handle.emit(&GameEvent::GameStart);

        let poisoner = recorder.clone();
        let result = std::thread::spawn(move || {
            let _guard = poisoner.events.lock().unwrap();
            panic!("poison the recorder");
        })
        .join();
        assert!(result.is_err());
        assert!(recorder.events.is_poisoned());

        handle.emit(&GameEvent::GameReset);
        assert_eq!(recorder.events(), vec![GameEvent::GameStart, GameEvent::GameReset]);
    }

    #[test]
    fn test_silent_sinks_accept_everything() {
        let events = [
            GameEvent::GameStart,
            GameEvent::ConfirmedLabel(Expression::NoFace),
            GameEvent::GameComplete { score: 80 },
            GameEvent::GameReset,
        ];
        for event in &events {
            NoEvents.emit(event);
            LogEvents.emit(event);
        }
    }
}
