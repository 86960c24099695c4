//! Facial expression classification and an expression-matching game.
//!
//! This library turns per-frame facial landmarks into expression labels and
//! drives a level-based game with them:
//! 1. Feature extraction reduces a landmark set to a few geometric scalars
//! 2. An ordered decision list maps the features to one expression label
//! 3. A rolling history confirms a label only once it dominates recent frames
//! 4. The game state machine advances a level when the confirmed label matches
//!    the current target
//!
//! Landmark detection, cameras, rendering and audio are left to the caller;
//! results come back as plain values and [`events::GameEvent`] cues.
//!
//! # Examples
//!
//! ## Classifying a single frame
//!
//! ```no_run
//! use expression_quest::{classifier::ExpressionClassifier, features::extract_features,
//!                        landmarks::LandmarkSet};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let landmarks = LandmarkSet::default();
//! let classifier = ExpressionClassifier::new();
//! let features = extract_features(&landmarks)?;
//! println!("Expression: {}", classifier.classify(&features));
//! # Ok(())
//! # }
//! ```
//!
//! ## Running the game
//!
//! ```no_run
//! use expression_quest::{config::Config, events::LogEvents, pipeline::FramePipeline,
//!                        landmarks::LandmarkSet};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let mut pipeline = FramePipeline::from_config(&config, Box::new(LogEvents))?;
//! pipeline.start()?;
//!
//! # let frames: Vec<Option<LandmarkSet>> = Vec::new();
//! for face in &frames {
//!     let outcome = pipeline.process_frame(face.as_ref());
//!     println!("{} ({:.0}%)", outcome.raw, outcome.observation.accuracy_percent);
//! }
//!
//! let snapshot = pipeline.snapshot();
//! println!("Level {} / score {}", snapshot.level, snapshot.score);
//! # Ok(())
//! # }
//! ```

/// Landmark sets delivered by the upstream detector
pub mod landmarks;

/// Geometric feature extraction
pub mod features;

/// Rule-based expression classification
pub mod classifier;

/// Rolling-window confidence smoothing
pub mod smoothing;

/// Game progression state machine
pub mod game;

/// Cues for presentation layers
pub mod events;

/// Per-frame processing pipeline
pub mod pipeline;

/// Landmark frame sources and recorded replays
pub mod replay;

/// Error types and result handling
pub mod error;

/// Main application module
pub mod app;

/// Constants used throughout the crate
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
