//! Configuration management for the expression game

use crate::{
    classifier::{Expression, Thresholds},
    constants::{DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_HISTORY_CAPACITY, DEFAULT_POINTS_PER_LEVEL},
    game::{validate_targets, GameStateMachine, DEFAULT_TARGET_SEQUENCE},
    smoothing::ConfidenceSmoother,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Rolling confirmation window
    pub smoothing: SmoothingConfig,

    /// Classifier threshold table
    pub thresholds: Thresholds,

    /// Level sequence and scoring
    pub game: GameConfig,
}

/// Confidence smoother parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Number of recent labels kept
    pub capacity: usize,

    /// Share of the history a label needs to be confirmed (0.0-1.0)
    pub confidence_threshold: f64,
}

/// Game parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Expressions to produce, one per level
    pub target_sequence: Vec<Expression>,

    /// Score awarded per completed level
    pub points_per_level: u32,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_HISTORY_CAPACITY,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            target_sequence: DEFAULT_TARGET_SEQUENCE.to_vec(),
            points_per_level: DEFAULT_POINTS_PER_LEVEL,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid YAML for
    /// this schema.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the text does not parse.
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| Error::InvalidConfiguration(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::InvalidConfiguration(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Build the confidence smoother described by this configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for an out-of-range window.
    pub fn create_smoother(&self) -> Result<ConfidenceSmoother> {
        ConfidenceSmoother::new(self.smoothing.capacity, self.smoothing.confidence_threshold)
    }

    /// Build the game state machine described by this configuration
    #[must_use]
    pub fn create_game(&self) -> GameStateMachine {
        GameStateMachine::new(self.game.target_sequence.clone(), self.game.points_per_level)
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.smoothing.capacity == 0 {
            return Err(Error::InvalidConfiguration(
                "History capacity must be greater than 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.smoothing.confidence_threshold) {
            return Err(Error::InvalidConfiguration(
                "Confidence threshold must be between 0.0 and 1.0".to_string(),
            ));
        }

        self.thresholds.validate()?;

        validate_targets(&self.game.target_sequence)?;
        if self.game.points_per_level == 0 {
            return Err(Error::InvalidConfiguration(
                "Points per level must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Expression Quest Configuration

# Rolling confirmation window
smoothing:
  capacity: 20
  confidence_threshold: 0.7

# Classifier thresholds (normalized frame units)
thresholds:
  eye_closed_gap: 0.008
  squint_gap: 0.012
  smile_mouth_aspect: 2.5
  smile_curve: 0.005
  laugh_mouth_open: 0.035
  surprise_mouth_open: 0.04
  surprise_brow_raise: 0.05
  sad_curve: 0.004
  cry_curve: 0.008
  angry_brow_raise: 0.02
  angry_mouth_open: 0.01
  head_turn_yaw: 0.06
  mouth_height_floor: 0.0001

# Levels, in order
game:
  target_sequence:
    - blink-left
    - blink-right
    - turn-left
    - turn-right
    - smile
    - sad
    - surprised
    - angry
  points_per_level: 10
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_config_matches_defaults() {
        let parsed = Config::from_yaml(EXAMPLE_CONFIG).unwrap();
        assert_eq!(parsed, Config::default());
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed = Config::from_yaml("game:\n  target_sequence: [smile, turn-left]\n").unwrap();
        assert_eq!(parsed.game.target_sequence, vec![Expression::Smile, Expression::TurnLeft]);
        assert_eq!(parsed.game.points_per_level, 10);
        assert_eq!(parsed.smoothing.capacity, 20);
        assert_eq!(parsed.thresholds, Thresholds::default());
    }

    #[test]
    fn test_unknown_expression_rejected() {
        assert!(matches!(
            Config::from_yaml("game:\n  target_sequence: [wink]\n"),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_validation_rules() {
        let mut config = Config::default();
        config.smoothing.capacity = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.smoothing.confidence_threshold = 1.2;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.game.target_sequence.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.game.points_per_level = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.thresholds.head_turn_yaw = f64::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_factories() {
        let config = Config::default();
        let smoother = config.create_smoother().unwrap();
        assert_eq!(smoother.capacity(), 20);
        assert_eq!(smoother.confidence_threshold(), 0.7);

        let game = config.create_game();
        assert_eq!(game.target_sequence(), &DEFAULT_TARGET_SEQUENCE);
    }
}
