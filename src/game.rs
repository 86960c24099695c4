//! Level-based game progression driven by confirmed expressions.
//!
//! The state machine walks an ordered target sequence. Each confirmed label
//! equal to the current target completes a level; anything else is ignored.
//! There is no timeout: a session waits on the current target indefinitely.

use crate::{
    classifier::Expression,
    constants::DEFAULT_POINTS_PER_LEVEL,
    events::GameEvent,
    Error, Result,
};
use serde::Serialize;

/// Target sequence used by the original game
pub const DEFAULT_TARGET_SEQUENCE: [Expression; 8] = [
    Expression::BlinkLeft,
    Expression::BlinkRight,
    Expression::TurnLeft,
    Expression::TurnRight,
    Expression::Smile,
    Expression::Sad,
    Expression::Surprised,
    Expression::Angry,
];

/// Lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    /// No session exists
    NotStarted,
    /// Waiting for the current target
    InProgress,
    /// Every level completed
    Completed,
}

/// Progress of one play-through
#[derive(Debug, Clone, PartialEq)]
pub struct GameSession {
    level: u32,
    score: u32,
    target_sequence: Vec<Expression>,
    current_target: Expression,
    detected: Option<Expression>,
    accuracy_percent: f64,
    completed: bool,
}

impl GameSession {
    fn new(target_sequence: Vec<Expression>) -> Result<Self> {
        let current_target = *target_sequence
            .first()
            .ok_or_else(|| Error::InvalidConfiguration("Target sequence must not be empty".to_string()))?;

        Ok(Self {
            level: 1,
            score: 0,
            target_sequence,
            current_target,
            detected: None,
            accuracy_percent: 0.0,
            completed: false,
        })
    }

    /// Current level, 1-based
    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Accumulated score
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Ordered targets, one per level
    #[must_use]
    pub fn target_sequence(&self) -> &[Expression] {
        &self.target_sequence
    }

    /// Expression the player has to produce next
    #[must_use]
    pub fn current_target(&self) -> Expression {
        self.current_target
    }

    /// Last confirmed label seen during the session
    #[must_use]
    pub fn detected(&self) -> Option<Expression> {
        self.detected
    }

    /// Instantaneous accuracy of the latest frame, 0-100
    #[must_use]
    pub fn accuracy_percent(&self) -> f64 {
        self.accuracy_percent
    }

    /// Whether the final level has been completed
    #[must_use]
    pub fn completed(&self) -> bool {
        self.completed
    }

    fn total_levels(&self) -> u32 {
        u32::try_from(self.target_sequence.len()).unwrap_or(u32::MAX)
    }

    /// Award the current level and move on, returning the resulting transition
    fn complete_level(&mut self, points: u32) -> Transition {
        let completed_level = self.level;
        self.score = self.score.saturating_add(points);

        if self.level < self.total_levels() {
            self.level += 1;
            self.current_target = self.target_sequence[(self.level - 1) as usize];
            Transition::LevelComplete {
                level: completed_level,
                score: self.score,
            }
        } else {
            self.completed = true;
            Transition::GameComplete {
                level: completed_level,
                score: self.score,
            }
        }
    }
}

/// Read-only view of the session for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    /// Lifecycle state
    pub state: GameState,
    /// Current level, 1-based
    pub level: u32,
    /// Number of levels in the target sequence
    pub total_levels: u32,
    /// Accumulated score
    pub score: u32,
    /// Instantaneous accuracy of the latest frame, 0-100
    pub accuracy_percent: f64,
    /// Expression the player has to produce next
    pub current_target: Option<Expression>,
    /// Last confirmed label
    pub detected: Option<Expression>,
    /// Completed levels over total levels, 0-100
    pub progress_percent: f64,
    /// Whether the final level has been completed
    pub completed: bool,
}

/// Outcome of delivering a confirmed label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// No session in progress, or the label was not the target
    Ignored,
    /// Level completed, next target selected
    LevelComplete {
        /// Level just completed
        level: u32,
        /// Score after the award
        score: u32,
    },
    /// Final level completed
    GameComplete {
        /// Level just completed
        level: u32,
        /// Final score
        score: u32,
    },
}

impl Transition {
    /// Cues to emit for this transition
    #[must_use]
    pub fn events(&self) -> Vec<GameEvent> {
        match *self {
            Self::Ignored => Vec::new(),
            Self::LevelComplete { level, score } => vec![GameEvent::LevelComplete { level, score }],
            Self::GameComplete { level, score } => vec![
                GameEvent::LevelComplete { level, score },
                GameEvent::GameComplete { score },
            ],
        }
    }
}

/// Check a target sequence before it is used for a session
///
/// # Errors
///
/// Returns [`Error::InvalidConfiguration`] when the sequence is empty or
/// contains `no-face`.
pub fn validate_targets(targets: &[Expression]) -> Result<()> {
    if targets.is_empty() {
        return Err(Error::InvalidConfiguration("Target sequence must not be empty".to_string()));
    }
    if targets.contains(&Expression::NoFace) {
        return Err(Error::InvalidConfiguration(
            "Target sequence must not contain no-face".to_string(),
        ));
    }
    if u32::try_from(targets.len()).is_err() {
        return Err(Error::InvalidConfiguration(format!(
            "Target sequence too long: {} entries",
            targets.len()
        )));
    }
    Ok(())
}

/// Game progression state machine
#[derive(Debug, Clone)]
pub struct GameStateMachine {
    target_sequence: Vec<Expression>,
    points_per_level: u32,
    session: Option<GameSession>,
}

impl Default for GameStateMachine {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_SEQUENCE.to_vec(), DEFAULT_POINTS_PER_LEVEL)
    }
}

impl GameStateMachine {
    /// Create a state machine; the configuration is checked by [`Self::start`]
    #[must_use]
    pub fn new(target_sequence: Vec<Expression>, points_per_level: u32) -> Self {
        Self {
            target_sequence,
            points_per_level,
            session: None,
        }
    }

    /// Current lifecycle state
    #[must_use]
    pub fn state(&self) -> GameState {
        match &self.session {
            None => GameState::NotStarted,
            Some(session) if session.completed => GameState::Completed,
            Some(_) => GameState::InProgress,
        }
    }

    /// Active session, if any
    #[must_use]
    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    /// Configured targets
    #[must_use]
    pub fn target_sequence(&self) -> &[Expression] {
        &self.target_sequence
    }

    /// Begin a session at level 1 with score 0
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if a session already exists and
    /// [`Error::InvalidConfiguration`] if the targets or scoring are unusable.
    pub fn start(&mut self) -> Result<GameEvent> {
        if let Some(session) = &self.session {
            return Err(Error::InvalidState(format!(
                "Session already exists at level {} (reset first)",
                session.level
            )));
        }
        validate_targets(&self.target_sequence)?;
        if self.points_per_level == 0 {
            return Err(Error::InvalidConfiguration(
                "Points per level must be greater than 0".to_string(),
            ));
        }

        let session = GameSession::new(self.target_sequence.clone())?;
        log::info!(
            "Starting game with {} levels, first target: {}",
            session.total_levels(),
            session.current_target
        );
        self.session = Some(session);

        Ok(GameEvent::GameStart)
    }

    /// Deliver a confirmed label
    pub fn on_confirmed(&mut self, label: Expression) -> Transition {
        let points = self.points_per_level;
        let Some(session) = self.session.as_mut().filter(|s| !s.completed) else {
            return Transition::Ignored;
        };

        session.detected = Some(label);
        if label != session.current_target {
            return Transition::Ignored;
        }

        let transition = session.complete_level(points);
        match transition {
            Transition::LevelComplete { level, score } => {
                log::info!("Level {level} complete (score {score}), next target: {}", session.current_target);
            }
            Transition::GameComplete { score, .. } => log::info!("Game complete with score {score}"),
            Transition::Ignored => {}
        }
        transition
    }

    /// Record the latest frame's accuracy on the running session
    pub fn record_accuracy(&mut self, accuracy_percent: f64) {
        if let Some(session) = self.session.as_mut().filter(|s| !s.completed) {
            session.accuracy_percent = accuracy_percent.clamp(0.0, 100.0);
        }
    }

    /// Discard any session and return to `NotStarted`
    pub fn reset(&mut self) -> GameEvent {
        if self.session.take().is_some() {
            log::info!("Game reset");
        }
        GameEvent::GameReset
    }

    /// Snapshot for rendering
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let total_levels = u32::try_from(self.target_sequence.len()).unwrap_or(u32::MAX);

        match &self.session {
            None => SessionSnapshot {
                state: GameState::NotStarted,
                level: 1,
                total_levels,
                score: 0,
                accuracy_percent: 0.0,
                current_target: self.target_sequence.first().copied(),
                detected: None,
                progress_percent: 0.0,
                completed: false,
            },
            Some(session) => {
                let completed_levels = if session.completed {
                    session.level
                } else {
                    session.level - 1
                };
                SessionSnapshot {
                    state: self.state(),
                    level: session.level,
                    total_levels,
                    score: session.score,
                    accuracy_percent: session.accuracy_percent,
                    current_target: Some(session.current_target),
                    detected: session.detected,
                    progress_percent: 100.0 * f64::from(completed_levels) / f64::from(total_levels.max(1)),
                    completed: session.completed,
                }
            }
        }
    }
}
