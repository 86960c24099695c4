//! Per-frame processing: landmarks to features, label, smoothed label and
//! game transition.
//!
//! Frames are processed one at a time on the caller's thread. Per-frame
//! failures (no face, malformed landmark set) degrade to the `no-face` label
//! and never abort the pipeline.

use crate::{
    classifier::{Expression, ExpressionClassifier},
    config::Config,
    events::{EventSink, GameEvent, NoEvents},
    features::extract_features,
    game::{GameState, GameStateMachine, SessionSnapshot, Transition},
    landmarks::LandmarkSet,
    smoothing::{ConfidenceSmoother, Observation},
    Result,
};

/// Everything derived from one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutcome {
    /// Label before smoothing
    pub raw: Expression,
    /// Smoother output for this frame
    pub observation: Observation,
    /// Game transition caused by the confirmed label, if any
    pub transition: Transition,
}

/// Frame pipeline owning the expression history and the game session
pub struct FramePipeline {
    classifier: ExpressionClassifier,
    smoother: ConfidenceSmoother,
    game: GameStateMachine,
    sink: Box<dyn EventSink>,
}

impl FramePipeline {
    /// Assemble a pipeline from its parts
    #[must_use]
    pub fn new(
        classifier: ExpressionClassifier,
        smoother: ConfidenceSmoother,
        game: GameStateMachine,
        sink: Box<dyn EventSink>,
    ) -> Self {
        Self {
            classifier,
            smoother,
            game,
            sink,
        }
    }

    /// Build a pipeline from a validated configuration
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if the configuration
    /// does not validate.
    pub fn from_config(config: &Config, sink: Box<dyn EventSink>) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(
            ExpressionClassifier::with_thresholds(config.thresholds),
            config.create_smoother()?,
            config.create_game(),
            sink,
        ))
    }

    /// Pipeline with default settings that emits nothing
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(
            ExpressionClassifier::new(),
            ConfidenceSmoother::default(),
            GameStateMachine::default(),
            Box::new(NoEvents),
        )
    }

    /// Replace the event sink
    pub fn set_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sink = sink;
    }

    /// Start a session with a fresh expression history
    ///
    /// # Errors
    ///
    /// Propagates [`GameStateMachine::start`] failures; nothing is emitted
    /// and the history is untouched in that case.
    pub fn start(&mut self) -> Result<()> {
        let event = self.game.start()?;
        self.smoother.reset();
        self.sink.emit(&event);
        Ok(())
    }

    /// Discard the session and the expression history
    pub fn reset(&mut self) {
        self.smoother.reset();
        let event = self.game.reset();
        self.sink.emit(&event);
    }

    /// Run one frame through the pipeline.
    ///
    /// `landmarks` is the first detected face, or `None` when the detector
    /// found no face.
    pub fn process_frame(&mut self, landmarks: Option<&LandmarkSet>) -> FrameOutcome {
        let raw = self.classify(landmarks);
        self.sink.emit(&GameEvent::RawLabel(raw));

        self.process_label(raw)
    }

    /// Feed an already classified label into smoothing and the game
    pub fn process_label(&mut self, raw: Expression) -> FrameOutcome {
        let observation = self.smoother.observe(raw);

        let in_progress = self.game.state() == GameState::InProgress;
        if in_progress {
            self.game.record_accuracy(observation.accuracy_percent);
        }

        let transition = match observation.confirmed {
            Some(confirmed) => {
                self.sink.emit(&GameEvent::ConfirmedLabel(confirmed));
                if in_progress {
                    self.game.on_confirmed(confirmed)
                } else {
                    Transition::Ignored
                }
            }
            None => Transition::Ignored,
        };

        for event in transition.events() {
            self.sink.emit(&event);
        }

        FrameOutcome {
            raw,
            observation,
            transition,
        }
    }

    fn classify(&mut self, landmarks: Option<&LandmarkSet>) -> Expression {
        let Some(landmarks) = landmarks else {
            return Expression::NoFace;
        };

        match extract_features(landmarks) {
            Ok(features) => {
                let matched = self.classifier.matching_rules(&features);
                self.sink.on_features(&features, &matched);
                matched.first().copied().unwrap_or(Expression::Neutral)
            }
            Err(e) => {
                if e.is_frame_failure() {
                    log::debug!("Treating frame as no-face: {e}");
                } else {
                    log::warn!("Unexpected feature extraction failure: {e}");
                }
                Expression::NoFace
            }
        }
    }

    /// Read-only session view
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.game.snapshot()
    }

    /// Lifecycle state of the game
    #[must_use]
    pub fn state(&self) -> GameState {
        self.game.state()
    }

    /// Expression history
    #[must_use]
    pub fn smoother(&self) -> &ConfidenceSmoother {
        &self.smoother
    }

    /// Classifier in use
    #[must_use]
    pub fn classifier(&self) -> &ExpressionClassifier {
        &self.classifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        constants::{landmark_index as idx, NUM_FACE_MESH_LANDMARKS},
        features::FeatureVector,
        landmarks::LandmarkPoint,
    };
    use std::sync::{Arc, Mutex};

    type FeatureLog = Arc<Mutex<Vec<(FeatureVector, Vec<Expression>)>>>;

    /// Sink that keeps every diagnostic callback
    struct FeatureRecorder(FeatureLog);

    impl EventSink for FeatureRecorder {
        fn emit(&mut self, _event: &GameEvent) {}

        fn on_features(&mut self, features: &FeatureVector, matched: &[Expression]) {
            self.0.lock().unwrap().push((*features, matched.to_vec()));
        }
    }

    fn frontal_face() -> LandmarkSet {
        let mut set = LandmarkSet::new(vec![LandmarkPoint::new(0.5, 0.5); NUM_FACE_MESH_LANDMARKS]);
        let points = [
            (idx::NOSE_TIP, 0.5, 0.5),
            (idx::LEFT_EYE_UPPER, 0.56, 0.40),
            (idx::LEFT_EYE_LOWER, 0.56, 0.42),
            (idx::RIGHT_EYE_UPPER, 0.44, 0.40),
            (idx::RIGHT_EYE_LOWER, 0.44, 0.42),
            (idx::LEFT_BROW, 0.56, 0.36),
            (idx::RIGHT_BROW, 0.44, 0.36),
            (idx::MOUTH_LEFT, 0.55, 0.60),
            (idx::MOUTH_RIGHT, 0.45, 0.60),
            (idx::UPPER_LIP_INNER, 0.5, 0.598),
            (idx::LOWER_LIP_INNER, 0.5, 0.602),
            (idx::JAW_LEFT, 0.65, 0.5),
            (idx::JAW_RIGHT, 0.35, 0.5),
        ];
        for (i, x, y) in points {
            *set.point_mut(i).unwrap() = LandmarkPoint::new(x, y);
        }
        set
    }

    #[test]
    fn test_feature_hook_sees_every_face() {
        let log = FeatureLog::default();
        let mut pipeline = FramePipeline::with_defaults();
        pipeline.set_sink(Box::new(FeatureRecorder(Arc::clone(&log))));

        // Drooping corners and a closed left eye match both sad and blink-left
        let mut overlap = frontal_face();
        overlap.point_mut(idx::MOUTH_LEFT).unwrap().y = 0.606;
        overlap.point_mut(idx::MOUTH_RIGHT).unwrap().y = 0.606;
        overlap.point_mut(idx::LEFT_EYE_LOWER).unwrap().y = 0.403;

        let truncated = LandmarkSet::new(vec![LandmarkPoint::new(0.5, 0.5); 10]);

        assert_eq!(pipeline.process_frame(Some(&frontal_face())).raw, Expression::Neutral);
        assert_eq!(pipeline.process_frame(None).raw, Expression::NoFace);
        assert_eq!(pipeline.process_frame(Some(&truncated)).raw, Expression::NoFace);
        assert_eq!(pipeline.process_frame(Some(&overlap)).raw, Expression::Sad);

        let calls = log.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].1.is_empty());

        let (features, matched) = &calls[1];
        assert_eq!(*features, extract_features(&overlap).unwrap());
        assert_eq!(matched, &pipeline.classifier().matching_rules(features));
        assert_eq!(matched, &vec![Expression::Sad, Expression::BlinkLeft]);
    }

    #[test]
    fn test_missing_face_degrades_to_no_face() {
        let mut pipeline = FramePipeline::with_defaults();
        let outcome = pipeline.process_frame(None);
        assert_eq!(outcome.raw, Expression::NoFace);

        let truncated = LandmarkSet::new(vec![LandmarkPoint::new(0.5, 0.5); 10]);
        let outcome = pipeline.process_frame(Some(&truncated));
        assert_eq!(outcome.raw, Expression::NoFace);
        assert_eq!(outcome.observation.confirmed, Some(Expression::NoFace));
    }

    #[test]
    fn test_labels_do_not_touch_game_before_start() {
        let mut pipeline = FramePipeline::with_defaults();
        let outcome = pipeline.process_label(Expression::BlinkLeft);
        assert_eq!(outcome.observation.confirmed, Some(Expression::BlinkLeft));
        assert_eq!(outcome.transition, Transition::Ignored);
        assert_eq!(pipeline.state(), GameState::NotStarted);
    }

    #[test]
    fn test_start_clears_history() {
        let mut pipeline = FramePipeline::with_defaults();
        pipeline.process_label(Expression::Sad);
        pipeline.start().unwrap();
        assert!(pipeline.smoother().is_empty());
    }

    #[test]
    fn test_first_target_confirms() {
        let mut pipeline = FramePipeline::with_defaults();
        pipeline.start().unwrap();

        let outcome = pipeline.process_label(Expression::BlinkLeft);
        assert_eq!(outcome.transition, Transition::LevelComplete { level: 1, score: 10 });
        assert_eq!(pipeline.snapshot().current_target, Some(Expression::BlinkRight));
        assert_eq!(pipeline.snapshot().accuracy_percent, 5.0);
    }
}
