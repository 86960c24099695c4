//! Application driver: pulls frames from a source through the pipeline.

use crate::{
    config::Config,
    events::EventSink,
    game::{GameState, SessionSnapshot},
    pipeline::FramePipeline,
    replay::LandmarkSource,
    Result,
};
use log::{debug, info};

/// Summary of one run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Frames delivered to the pipeline
    pub frames_processed: usize,
    /// Frames without a usable face
    pub no_face_frames: usize,
    /// Session state after the last frame
    pub snapshot: SessionSnapshot,
}

/// Game application over a landmark source
pub struct GameApp {
    pipeline: FramePipeline,
    source: Box<dyn LandmarkSource>,
}

impl GameApp {
    /// Create an application from configuration
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if the configuration is
    /// invalid.
    pub fn new(config: &Config, source: Box<dyn LandmarkSource>, sink: Box<dyn EventSink>) -> Result<Self> {
        info!("Initializing expression game");
        let pipeline = FramePipeline::from_config(config, sink)?;
        Ok(Self { pipeline, source })
    }

    /// Start the game and feed frames until the stream ends or the game completes
    ///
    /// # Errors
    ///
    /// Returns an error if the game cannot start or the source fails.
    pub fn run(&mut self) -> Result<RunSummary> {
        self.pipeline.start()?;

        let mut frames_processed = 0;
        let mut no_face_frames = 0;

        while let Some(frame) = self.source.next_frame()? {
            let outcome = self.pipeline.process_frame(frame.face.as_ref());
            frames_processed += 1;
            if outcome.raw == crate::classifier::Expression::NoFace {
                no_face_frames += 1;
            }
            debug!(
                "Frame {}: raw={} accuracy={:.0}% confirmed={:?}",
                frame.index, outcome.raw, outcome.observation.accuracy_percent, outcome.observation.confirmed
            );

            if self.pipeline.state() == GameState::Completed {
                info!("Game completed after {frames_processed} frames");
                break;
            }
        }

        if self.pipeline.state() == GameState::InProgress {
            info!("Landmark stream ended with the game in progress");
        }

        Ok(RunSummary {
            frames_processed,
            no_face_frames,
            snapshot: self.pipeline.snapshot(),
        })
    }

    /// Reset the game and its expression history
    pub fn reset(&mut self) {
        self.pipeline.reset();
    }

    /// Current session view
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.pipeline.snapshot()
    }
}
